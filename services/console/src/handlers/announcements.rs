use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use nexza_domain::id::AnnouncementId;

use crate::domain::types::{Announcement, Background};
use crate::error::ConsoleError;
use crate::handlers::extract::{AdminSession, Session};
use crate::state::AppState;
use crate::usecase::announcement::{
    AnnouncementFeedUseCase, CreateAnnouncementInput, CreateAnnouncementUseCase,
    DeleteAnnouncementUseCase, ListAnnouncementsUseCase,
};

// ── GET /announcements ────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct FeedResponse {
    pub announcements: Vec<Announcement>,
    pub degraded: bool,
}

pub async fn feed(State(state): State<AppState>, _session: Session) -> Json<FeedResponse> {
    let usecase = AnnouncementFeedUseCase {
        announcements: state.announcement_repo(),
    };
    let feed = usecase.execute().await;
    Json(FeedResponse {
        announcements: feed.announcements,
        degraded: feed.degraded,
    })
}

// ── GET /admin/announcements ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ListAnnouncementsQuery {
    pub search: Option<String>,
}

pub async fn list_announcements(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(query): Query<ListAnnouncementsQuery>,
) -> Result<Json<Vec<Announcement>>, ConsoleError> {
    let usecase = ListAnnouncementsUseCase {
        announcements: state.announcement_repo(),
    };
    Ok(Json(usecase.execute(query.search.as_deref()).await?))
}

// ── POST /admin/announcements ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateAnnouncementRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub background: Background,
}

pub async fn create_announcement(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Json(body): Json<CreateAnnouncementRequest>,
) -> Result<(StatusCode, Json<Announcement>), ConsoleError> {
    let usecase = CreateAnnouncementUseCase {
        announcements: state.announcement_repo(),
        clock: state.clock.clone(),
    };
    let announcement = usecase
        .execute(
            CreateAnnouncementInput {
                title: body.title,
                content: body.content,
                background: body.background,
            },
            &admin.email,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(announcement)))
}

// ── DELETE /admin/announcements/{id} ──────────────────────────────────────────

pub async fn delete_announcement(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<AnnouncementId>,
) -> Result<StatusCode, ConsoleError> {
    let usecase = DeleteAnnouncementUseCase {
        announcements: state.announcement_repo(),
    };
    usecase.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
