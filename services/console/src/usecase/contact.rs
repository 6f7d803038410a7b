use nexza_domain::clock::Clock;
use nexza_domain::email::looks_like_email;
use nexza_domain::id::{ContactMessageId, IdentityId};

use crate::domain::repository::ContactMessageRepository;
use crate::domain::types::{ContactMessage, MessageStatus, StatusChange};
use crate::error::ConsoleError;

fn required(value: &str, field: &str) -> Result<String, ConsoleError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConsoleError::invalid_input(format!("{field} is required")));
    }
    Ok(value.to_owned())
}

// ── Submit ────────────────────────────────────────────────────────────────────

pub struct SubmitContactInput {
    pub name: String,
    pub email: String,
    pub message: String,
    /// Set when the sender has a session.
    pub user_id: Option<IdentityId>,
}

pub struct SubmitContactUseCase<M, C>
where
    M: ContactMessageRepository,
    C: Clock,
{
    pub messages: M,
    pub clock: C,
}

impl<M, C> SubmitContactUseCase<M, C>
where
    M: ContactMessageRepository,
    C: Clock,
{
    pub async fn execute(&self, input: SubmitContactInput) -> Result<ContactMessage, ConsoleError> {
        let name = required(&input.name, "name")?;
        let email = required(&input.email, "email")?;
        let body = required(&input.message, "message")?;
        if !looks_like_email(&email) {
            return Err(ConsoleError::invalid_input("Please enter a valid email address"));
        }

        let message = ContactMessage {
            id: ContactMessageId::new(),
            name,
            email,
            message: body,
            user_id: input.user_id,
            status: MessageStatus::Waiting,
            status_history: Vec::new(),
            created_at: self.clock.now(),
        };
        self.messages.insert(&message).await?;
        Ok(message)
    }
}

// ── List ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct ListContactInput {
    /// Case-insensitive substring of the sender email or user id.
    pub search: Option<String>,
    /// `None` lists every status.
    pub status: Option<MessageStatus>,
}

pub struct ListContactMessagesUseCase<M: ContactMessageRepository> {
    pub messages: M,
}

impl<M: ContactMessageRepository> ListContactMessagesUseCase<M> {
    pub async fn execute(&self, input: ListContactInput) -> Result<Vec<ContactMessage>, ConsoleError> {
        let needle = input
            .search
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());
        let mut rows: Vec<ContactMessage> = self
            .messages
            .list()
            .await?
            .into_iter()
            .filter(|m| input.status.is_none_or(|s| m.status == s))
            .filter(|m| {
                needle.as_deref().is_none_or(|n| {
                    m.email.to_lowercase().contains(n)
                        || m
                            .user_id
                            .as_ref()
                            .is_some_and(|id| id.as_str().to_lowercase().contains(n))
                })
            })
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}

// ── Status ────────────────────────────────────────────────────────────────────

pub struct UpdateContactStatusUseCase<M, C>
where
    M: ContactMessageRepository,
    C: Clock,
{
    pub messages: M,
    pub clock: C,
}

impl<M, C> UpdateContactStatusUseCase<M, C>
where
    M: ContactMessageRepository,
    C: Clock,
{
    /// Set the status and append `{status, at, by}` to the history.
    pub async fn execute(
        &self,
        id: ContactMessageId,
        status: MessageStatus,
        by: &str,
    ) -> Result<ContactMessage, ConsoleError> {
        let mut message = self
            .messages
            .find(id)
            .await?
            .ok_or(ConsoleError::MessageNotFound)?;

        message.status = status;
        message.status_history.push(StatusChange {
            status,
            at: self.clock.now(),
            by: by.to_owned(),
        });
        self.messages
            .set_status(id, status, &message.status_history)
            .await?;
        Ok(message)
    }
}

// ── Delete ────────────────────────────────────────────────────────────────────

pub struct DeleteContactMessageUseCase<M: ContactMessageRepository> {
    pub messages: M,
}

impl<M: ContactMessageRepository> DeleteContactMessageUseCase<M> {
    pub async fn execute(&self, id: ContactMessageId) -> Result<(), ConsoleError> {
        if !self.messages.delete(id).await? {
            return Err(ConsoleError::MessageNotFound);
        }
        Ok(())
    }
}
