#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use serde_json::Value;

use nexza_domain::id::{AdminMessageId, AnnouncementId, ContactMessageId, IdentityId};
use nexza_domain::username::Username;

use crate::domain::types::{
    AdminMessage, Announcement, ContactMessage, MessageStatus, StatusChange, UserProfile,
    VerificationCode, Versioned,
};
use crate::error::{AuthError, ConsoleError};

// ── Document store ────────────────────────────────────────────────────────────

/// A stored document. `version` starts at 1 and grows on every write.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub key: String,
    pub fields: Value,
    pub version: i64,
}

/// Equality match on one top-level field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub value: Value,
}

impl FieldFilter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn matches(&self, fields: &Value) -> bool {
        fields.get(&self.field) == Some(&self.value)
    }
}

/// Named collections of JSON documents.
///
/// Every call is an independent round trip. `create` and `compare_and_set`
/// are the only atomic primitives; everything else is last-write-wins.
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, ConsoleError>;

    /// Write a document. With `merge`, top-level fields are merged into the
    /// existing document instead of replacing it.
    async fn set(
        &self,
        collection: &str,
        key: &str,
        fields: Value,
        merge: bool,
    ) -> Result<(), ConsoleError>;

    /// Merge fields into an existing document. Returns `false` if it is absent.
    async fn update(&self, collection: &str, key: &str, fields: Value)
    -> Result<bool, ConsoleError>;

    /// Returns `true` if a document was removed.
    async fn delete(&self, collection: &str, key: &str) -> Result<bool, ConsoleError>;

    /// Documents in insertion order, optionally narrowed by a field match.
    async fn list(
        &self,
        collection: &str,
        filter: Option<&FieldFilter>,
    ) -> Result<Vec<Document>, ConsoleError>;

    /// Insert only if absent. Returns `false` when the key already exists.
    async fn create(&self, collection: &str, key: &str, fields: Value)
    -> Result<bool, ConsoleError>;

    /// Replace the document only if its version still equals
    /// `expected_version`. Returns `false` when another write got there first.
    async fn compare_and_set(
        &self,
        collection: &str,
        key: &str,
        expected_version: i64,
        fields: Value,
    ) -> Result<bool, ConsoleError>;
}

// ── External ports ────────────────────────────────────────────────────────────

/// Account as known by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderIdentity {
    pub identity_id: IdentityId,
    pub email: String,
}

/// Credential storage lives with the provider; the console only relays.
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> Result<ProviderIdentity, AuthError>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<ProviderIdentity, AuthError>;
}

/// Delivers a freshly issued code to its subject.
pub trait CodeNotifier: Send + Sync {
    async fn deliver(&self, subject: &str, code: &str) -> Result<(), ConsoleError>;
}

// ── Repositories ──────────────────────────────────────────────────────────────

pub trait VerificationCodeRepository: Send + Sync {
    async fn find(&self, subject: &str) -> Result<Option<Versioned<VerificationCode>>, ConsoleError>;

    /// Overwrite whatever code the subject had.
    async fn put(&self, code: &VerificationCode) -> Result<(), ConsoleError>;

    /// Write `code` only if the stored version is still `expected_version`.
    async fn replace(
        &self,
        code: &VerificationCode,
        expected_version: i64,
    ) -> Result<bool, ConsoleError>;

    async fn delete(&self, subject: &str) -> Result<(), ConsoleError>;
}

pub trait UserRepository: Send + Sync {
    async fn find(&self, id: &IdentityId) -> Result<Option<UserProfile>, ConsoleError>;

    /// Insert if absent. Returns `false` if a profile already exists.
    async fn create(&self, profile: &UserProfile) -> Result<bool, ConsoleError>;

    async fn list(&self) -> Result<Vec<UserProfile>, ConsoleError>;

    /// Refresh the derived admin flag and last login instant.
    async fn record_login(
        &self,
        id: &IdentityId,
        is_admin: bool,
        at: DateTime<Utc>,
    ) -> Result<(), ConsoleError>;

    /// Returns `false` if the profile does not exist.
    async fn set_banned(
        &self,
        id: &IdentityId,
        banned: bool,
        at: DateTime<Utc>,
    ) -> Result<bool, ConsoleError>;

    /// Write the handle only while the stored profile has none. Returns
    /// `false` if the profile is missing or already carries a handle.
    async fn set_username_if_unset(
        &self,
        id: &IdentityId,
        username: &Username,
    ) -> Result<bool, ConsoleError>;

    async fn mark_email_verified(&self, id: &IdentityId) -> Result<(), ConsoleError>;

    async fn delete(&self, id: &IdentityId) -> Result<bool, ConsoleError>;
}

pub trait UsernameRepository: Send + Sync {
    async fn is_taken(&self, username: &Username) -> Result<bool, ConsoleError>;

    /// Atomically claim the handle. Returns `false` if someone holds it.
    async fn claim(
        &self,
        username: &Username,
        owner: &IdentityId,
        at: DateTime<Utc>,
    ) -> Result<bool, ConsoleError>;

    async fn release(&self, username: &Username) -> Result<(), ConsoleError>;
}

pub trait ContactMessageRepository: Send + Sync {
    async fn insert(&self, message: &ContactMessage) -> Result<(), ConsoleError>;
    async fn find(&self, id: ContactMessageId) -> Result<Option<ContactMessage>, ConsoleError>;
    async fn list(&self) -> Result<Vec<ContactMessage>, ConsoleError>;

    async fn set_status(
        &self,
        id: ContactMessageId,
        status: MessageStatus,
        history: &[StatusChange],
    ) -> Result<(), ConsoleError>;

    async fn delete(&self, id: ContactMessageId) -> Result<bool, ConsoleError>;
}

pub trait AdminMessageRepository: Send + Sync {
    async fn insert(&self, message: &AdminMessage) -> Result<(), ConsoleError>;
    async fn list_for(&self, recipient: &IdentityId) -> Result<Vec<AdminMessage>, ConsoleError>;
    async fn find(&self, id: AdminMessageId) -> Result<Option<AdminMessage>, ConsoleError>;
    async fn mark_read(&self, id: AdminMessageId) -> Result<(), ConsoleError>;
}

pub trait AnnouncementRepository: Send + Sync {
    async fn insert(&self, announcement: &Announcement) -> Result<(), ConsoleError>;
    async fn list(&self) -> Result<Vec<Announcement>, ConsoleError>;
    async fn delete(&self, id: AnnouncementId) -> Result<bool, ConsoleError>;
}
