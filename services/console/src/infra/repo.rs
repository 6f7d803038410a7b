use anyhow::Context as _;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use nexza_domain::id::{AdminMessageId, AnnouncementId, ContactMessageId, IdentityId};
use nexza_domain::username::Username;

use crate::domain::repository::{
    AdminMessageRepository, AnnouncementRepository, ContactMessageRepository, Document,
    DocumentStore, FieldFilter, UserRepository, UsernameRepository, VerificationCodeRepository,
};
use crate::domain::types::{
    ADMIN_MESSAGES, ANNOUNCEMENTS, AdminMessage, AdminMessageStatus, Announcement,
    CONTACT_MESSAGES, ContactMessage, MessageStatus, StatusChange, USERNAMES, USERS,
    UserProfile, UsernameClaim, VERIFICATION_CODES, VerificationCode, Versioned,
};
use crate::error::ConsoleError;
use crate::infra::memory::merge_fields;

fn encode<T: Serialize>(value: &T) -> Result<Value, ConsoleError> {
    Ok(serde_json::to_value(value).context("encode document")?)
}

fn decode<T: DeserializeOwned>(doc: Document) -> Result<T, ConsoleError> {
    Ok(serde_json::from_value(doc.fields).with_context(|| format!("decode document {}", doc.key))?)
}

fn decode_all<T: DeserializeOwned>(docs: Vec<Document>) -> Result<Vec<T>, ConsoleError> {
    docs.into_iter().map(decode).collect()
}

// ── Verification codes ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DocVerificationCodeRepository<S> {
    pub store: S,
}

impl<S: DocumentStore> VerificationCodeRepository for DocVerificationCodeRepository<S> {
    async fn find(&self, subject: &str) -> Result<Option<Versioned<VerificationCode>>, ConsoleError> {
        let Some(doc) = self.store.get(VERIFICATION_CODES, subject).await? else {
            return Ok(None);
        };
        let version = doc.version;
        Ok(Some(Versioned {
            value: decode(doc)?,
            version,
        }))
    }

    async fn put(&self, code: &VerificationCode) -> Result<(), ConsoleError> {
        self.store
            .set(VERIFICATION_CODES, &code.subject, encode(code)?, false)
            .await
    }

    async fn replace(
        &self,
        code: &VerificationCode,
        expected_version: i64,
    ) -> Result<bool, ConsoleError> {
        self.store
            .compare_and_set(VERIFICATION_CODES, &code.subject, expected_version, encode(code)?)
            .await
    }

    async fn delete(&self, subject: &str) -> Result<(), ConsoleError> {
        self.store.delete(VERIFICATION_CODES, subject).await?;
        Ok(())
    }
}

// ── Users ─────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DocUserRepository<S> {
    pub store: S,
}

impl<S: DocumentStore> UserRepository for DocUserRepository<S> {
    async fn find(&self, id: &IdentityId) -> Result<Option<UserProfile>, ConsoleError> {
        self.store
            .get(USERS, id.as_str())
            .await?
            .map(decode)
            .transpose()
    }

    async fn create(&self, profile: &UserProfile) -> Result<bool, ConsoleError> {
        self.store
            .create(USERS, profile.identity_id.as_str(), encode(profile)?)
            .await
    }

    async fn list(&self) -> Result<Vec<UserProfile>, ConsoleError> {
        decode_all(self.store.list(USERS, None).await?)
    }

    async fn record_login(
        &self,
        id: &IdentityId,
        is_admin: bool,
        at: DateTime<Utc>,
    ) -> Result<(), ConsoleError> {
        self.store
            .update(USERS, id.as_str(), json!({ "isAdmin": is_admin, "lastLoginAt": at }))
            .await?;
        Ok(())
    }

    async fn set_banned(
        &self,
        id: &IdentityId,
        banned: bool,
        at: DateTime<Utc>,
    ) -> Result<bool, ConsoleError> {
        let fields = if banned {
            json!({ "isBanned": true, "bannedAt": at })
        } else {
            json!({ "isBanned": false, "unbannedAt": at })
        };
        self.store.update(USERS, id.as_str(), fields).await
    }

    async fn set_username_if_unset(
        &self,
        id: &IdentityId,
        username: &Username,
    ) -> Result<bool, ConsoleError> {
        // Other profile writes bump the version too; retry until the handle
        // is written or someone else's handle is seen.
        loop {
            let Some(doc) = self.store.get(USERS, id.as_str()).await? else {
                return Ok(false);
            };
            if !doc.fields.get("username").is_none_or(Value::is_null) {
                return Ok(false);
            }
            let mut fields = doc.fields;
            merge_fields(&mut fields, json!({ "username": username }));
            if self
                .store
                .compare_and_set(USERS, id.as_str(), doc.version, fields)
                .await?
            {
                return Ok(true);
            }
        }
    }

    async fn mark_email_verified(&self, id: &IdentityId) -> Result<(), ConsoleError> {
        self.store
            .update(USERS, id.as_str(), json!({ "emailVerified": true }))
            .await?;
        Ok(())
    }

    async fn delete(&self, id: &IdentityId) -> Result<bool, ConsoleError> {
        self.store.delete(USERS, id.as_str()).await
    }
}

// ── Username claims ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DocUsernameRepository<S> {
    pub store: S,
}

impl<S: DocumentStore> UsernameRepository for DocUsernameRepository<S> {
    async fn is_taken(&self, username: &Username) -> Result<bool, ConsoleError> {
        Ok(self.store.get(USERNAMES, username.as_str()).await?.is_some())
    }

    async fn claim(
        &self,
        username: &Username,
        owner: &IdentityId,
        at: DateTime<Utc>,
    ) -> Result<bool, ConsoleError> {
        let claim = UsernameClaim {
            identity_id: owner.clone(),
            claimed_at: at,
        };
        self.store
            .create(USERNAMES, username.as_str(), encode(&claim)?)
            .await
    }

    async fn release(&self, username: &Username) -> Result<(), ConsoleError> {
        self.store.delete(USERNAMES, username.as_str()).await?;
        Ok(())
    }
}

// ── Contact messages ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DocContactMessageRepository<S> {
    pub store: S,
}

impl<S: DocumentStore> ContactMessageRepository for DocContactMessageRepository<S> {
    async fn insert(&self, message: &ContactMessage) -> Result<(), ConsoleError> {
        self.store
            .set(CONTACT_MESSAGES, &message.id.to_string(), encode(message)?, false)
            .await
    }

    async fn find(&self, id: ContactMessageId) -> Result<Option<ContactMessage>, ConsoleError> {
        self.store
            .get(CONTACT_MESSAGES, &id.to_string())
            .await?
            .map(decode)
            .transpose()
    }

    async fn list(&self) -> Result<Vec<ContactMessage>, ConsoleError> {
        decode_all(self.store.list(CONTACT_MESSAGES, None).await?)
    }

    async fn set_status(
        &self,
        id: ContactMessageId,
        status: MessageStatus,
        history: &[StatusChange],
    ) -> Result<(), ConsoleError> {
        self.store
            .update(
                CONTACT_MESSAGES,
                &id.to_string(),
                json!({ "status": status, "statusHistory": history }),
            )
            .await?;
        Ok(())
    }

    async fn delete(&self, id: ContactMessageId) -> Result<bool, ConsoleError> {
        self.store.delete(CONTACT_MESSAGES, &id.to_string()).await
    }
}

// ── Direct admin messages ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DocAdminMessageRepository<S> {
    pub store: S,
}

impl<S: DocumentStore> AdminMessageRepository for DocAdminMessageRepository<S> {
    async fn insert(&self, message: &AdminMessage) -> Result<(), ConsoleError> {
        self.store
            .set(ADMIN_MESSAGES, &message.id.to_string(), encode(message)?, false)
            .await
    }

    async fn list_for(&self, recipient: &IdentityId) -> Result<Vec<AdminMessage>, ConsoleError> {
        let filter = FieldFilter::eq("userId", recipient.as_str());
        decode_all(self.store.list(ADMIN_MESSAGES, Some(&filter)).await?)
    }

    async fn find(&self, id: AdminMessageId) -> Result<Option<AdminMessage>, ConsoleError> {
        self.store
            .get(ADMIN_MESSAGES, &id.to_string())
            .await?
            .map(decode)
            .transpose()
    }

    async fn mark_read(&self, id: AdminMessageId) -> Result<(), ConsoleError> {
        self.store
            .update(
                ADMIN_MESSAGES,
                &id.to_string(),
                json!({ "status": AdminMessageStatus::Read }),
            )
            .await?;
        Ok(())
    }
}

// ── Announcements ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DocAnnouncementRepository<S> {
    pub store: S,
}

impl<S: DocumentStore> AnnouncementRepository for DocAnnouncementRepository<S> {
    async fn insert(&self, announcement: &Announcement) -> Result<(), ConsoleError> {
        self.store
            .set(
                ANNOUNCEMENTS,
                &announcement.id.to_string(),
                encode(announcement)?,
                false,
            )
            .await
    }

    async fn list(&self) -> Result<Vec<Announcement>, ConsoleError> {
        decode_all(self.store.list(ANNOUNCEMENTS, None).await?)
    }

    async fn delete(&self, id: AnnouncementId) -> Result<bool, ConsoleError> {
        self.store.delete(ANNOUNCEMENTS, &id.to_string()).await
    }
}
