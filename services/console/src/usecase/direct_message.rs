use nexza_domain::clock::Clock;
use nexza_domain::id::{AdminMessageId, IdentityId};

use crate::domain::repository::AdminMessageRepository;
use crate::domain::types::{AdminMessage, AdminMessageStatus};
use crate::error::ConsoleError;

pub struct ComposeInput {
    pub recipients: Vec<IdentityId>,
    pub title: String,
    pub body: String,
}

pub struct ComposeDirectMessageUseCase<M, C>
where
    M: AdminMessageRepository,
    C: Clock,
{
    pub messages: M,
    pub clock: C,
}

impl<M, C> ComposeDirectMessageUseCase<M, C>
where
    M: AdminMessageRepository,
    C: Clock,
{
    /// Writes one record per distinct recipient. Returns the records written.
    pub async fn execute(
        &self,
        input: ComposeInput,
        created_by: &str,
    ) -> Result<Vec<AdminMessage>, ConsoleError> {
        let title = input.title.trim();
        let body = input.body.trim();
        if title.is_empty() || body.is_empty() {
            return Err(ConsoleError::invalid_input("Title and message are required"));
        }
        let mut recipients = input.recipients;
        recipients.sort();
        recipients.dedup();
        if recipients.is_empty() {
            return Err(ConsoleError::invalid_input("Select at least one recipient"));
        }

        let now = self.clock.now();
        let mut sent = Vec::with_capacity(recipients.len());
        for user_id in recipients {
            let message = AdminMessage {
                id: AdminMessageId::new(),
                user_id,
                title: title.to_owned(),
                body: body.to_owned(),
                status: AdminMessageStatus::New,
                created_at: now,
                created_by: created_by.to_owned(),
            };
            self.messages.insert(&message).await?;
            sent.push(message);
        }
        tracing::info!(count = sent.len(), created_by, "direct messages sent");
        Ok(sent)
    }
}

pub struct InboxUseCase<M: AdminMessageRepository> {
    pub messages: M,
}

impl<M: AdminMessageRepository> InboxUseCase<M> {
    /// Newest first.
    pub async fn execute(&self, recipient: &IdentityId) -> Result<Vec<AdminMessage>, ConsoleError> {
        let mut inbox = self.messages.list_for(recipient).await?;
        inbox.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(inbox)
    }
}

pub struct MarkReadUseCase<M: AdminMessageRepository> {
    pub messages: M,
}

impl<M: AdminMessageRepository> MarkReadUseCase<M> {
    /// Recipients may only touch their own messages; anything else is not found.
    pub async fn execute(
        &self,
        recipient: &IdentityId,
        id: AdminMessageId,
    ) -> Result<AdminMessage, ConsoleError> {
        let mut message = self
            .messages
            .find(id)
            .await?
            .filter(|m| &m.user_id == recipient)
            .ok_or(ConsoleError::MessageNotFound)?;
        if message.status != AdminMessageStatus::Read {
            self.messages.mark_read(id).await?;
            message.status = AdminMessageStatus::Read;
        }
        Ok(message)
    }
}
