use nexza_domain::clock::Clock;
use nexza_domain::id::AnnouncementId;

use crate::domain::repository::AnnouncementRepository;
use crate::domain::types::{Announcement, Background};
use crate::error::ConsoleError;

pub struct CreateAnnouncementInput {
    pub title: String,
    pub content: String,
    pub background: Background,
}

pub struct CreateAnnouncementUseCase<A, C>
where
    A: AnnouncementRepository,
    C: Clock,
{
    pub announcements: A,
    pub clock: C,
}

impl<A, C> CreateAnnouncementUseCase<A, C>
where
    A: AnnouncementRepository,
    C: Clock,
{
    pub async fn execute(
        &self,
        input: CreateAnnouncementInput,
        created_by: &str,
    ) -> Result<Announcement, ConsoleError> {
        let title = input.title.trim();
        let content = input.content.trim();
        if title.is_empty() || content.is_empty() {
            return Err(ConsoleError::invalid_input("Title and content are required"));
        }
        match &input.background {
            Background::Color { color } if color.trim().is_empty() => {
                return Err(ConsoleError::invalid_input("Background color is required"));
            }
            Background::Image { url, .. } if url.trim().is_empty() => {
                return Err(ConsoleError::invalid_input("Background image URL is required"));
            }
            _ => {}
        }

        let announcement = Announcement {
            id: AnnouncementId::new(),
            title: title.to_owned(),
            content: content.to_owned(),
            background: input.background,
            created_at: self.clock.now(),
            created_by: created_by.to_owned(),
        };
        self.announcements.insert(&announcement).await?;
        Ok(announcement)
    }
}

pub struct ListAnnouncementsUseCase<A: AnnouncementRepository> {
    pub announcements: A,
}

impl<A: AnnouncementRepository> ListAnnouncementsUseCase<A> {
    /// Newest first, optionally narrowed by a case-insensitive title match.
    pub async fn execute(&self, search: Option<&str>) -> Result<Vec<Announcement>, ConsoleError> {
        let needle = search.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty());
        let mut rows: Vec<Announcement> = self
            .announcements
            .list()
            .await?
            .into_iter()
            .filter(|a| {
                needle
                    .as_deref()
                    .is_none_or(|n| a.title.to_lowercase().contains(n))
            })
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}

/// Announcements as shown on signed-in pages.
#[derive(Debug)]
pub struct Feed {
    pub announcements: Vec<Announcement>,
    /// The store could not be read; the list is empty rather than an error.
    pub degraded: bool,
}

pub struct AnnouncementFeedUseCase<A: AnnouncementRepository> {
    pub announcements: A,
}

impl<A: AnnouncementRepository> AnnouncementFeedUseCase<A> {
    pub async fn execute(&self) -> Feed {
        match self.announcements.list().await {
            Ok(mut announcements) => {
                announcements.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                Feed {
                    announcements,
                    degraded: false,
                }
            }
            Err(e) => {
                tracing::warn!(error = ?e, "announcement feed unavailable");
                Feed {
                    announcements: Vec::new(),
                    degraded: true,
                }
            }
        }
    }
}

pub struct DeleteAnnouncementUseCase<A: AnnouncementRepository> {
    pub announcements: A,
}

impl<A: AnnouncementRepository> DeleteAnnouncementUseCase<A> {
    pub async fn execute(&self, id: AnnouncementId) -> Result<(), ConsoleError> {
        if !self.announcements.delete(id).await? {
            return Err(ConsoleError::AnnouncementNotFound);
        }
        Ok(())
    }
}
