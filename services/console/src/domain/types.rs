use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nexza_domain::id::{AdminMessageId, AnnouncementId, ContactMessageId, IdentityId};
use nexza_domain::username::Username;

// ── Collections ───────────────────────────────────────────────────────────────

pub const VERIFICATION_CODES: &str = "verificationCodes";
pub const USERS: &str = "users";
pub const USERNAMES: &str = "usernames";
pub const CONTACT_MESSAGES: &str = "contactMessages";
pub const ANNOUNCEMENTS: &str = "announcements";
pub const ADMIN_MESSAGES: &str = "adminMessages";

/// Inclusive range verification codes are drawn from.
pub const CODE_MIN: u32 = 100_000;
pub const CODE_MAX: u32 = 999_999;
pub const CODE_LEN: usize = 6;

pub const PASSWORD_MIN_LEN: usize = 6;

// ── Verification code ─────────────────────────────────────────────────────────

/// One active code per subject; reissuing overwrites the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationCode {
    pub subject: String,
    pub code: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub consumed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumed_at: Option<DateTime<Utc>>,
}

impl VerificationCode {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// A stored value together with the version used for compare-and-set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned<T> {
    pub value: T,
    pub version: i64,
}

// ── Users ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub identity_id: IdentityId,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<Username>,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub is_banned: bool,
    /// Cache of the last allow-list check; never read for authorization.
    #[serde(default)]
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banned_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unbanned_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Profile written on first successful authentication.
    pub fn first_seen(identity_id: IdentityId, email: String, at: DateTime<Utc>) -> Self {
        Self {
            identity_id,
            email,
            username: None,
            email_verified: false,
            is_banned: false,
            is_admin: false,
            created_at: at,
            last_login_at: at,
            banned_at: None,
            unbanned_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsernameClaim {
    pub identity_id: IdentityId,
    pub claimed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserFilter {
    #[default]
    All,
    Active,
    Banned,
    Admin,
}

impl UserFilter {
    pub fn matches(&self, user: &UserProfile) -> bool {
        match self {
            Self::All => true,
            Self::Active => !user.is_banned,
            Self::Banned => user.is_banned,
            Self::Admin => user.is_admin,
        }
    }
}

/// Counts over every stored profile, independent of search and filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub total: usize,
    pub banned: usize,
    pub active: usize,
    pub admins: usize,
}

impl UserStats {
    pub fn tally<'a>(users: impl IntoIterator<Item = &'a UserProfile>) -> Self {
        users.into_iter().fold(Self::default(), |mut s, u| {
            s.total += 1;
            if u.is_banned {
                s.banned += 1;
            } else {
                s.active += 1;
            }
            if u.is_admin {
                s.admins += 1;
            }
            s
        })
    }
}

// ── Contact messages ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    #[default]
    Waiting,
    Pending,
    Approved,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: MessageStatus,
    pub at: DateTime<Utc>,
    pub by: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: ContactMessageId,
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<IdentityId>,
    #[serde(default)]
    pub status: MessageStatus,
    #[serde(default)]
    pub status_history: Vec<StatusChange>,
    pub created_at: DateTime<Utc>,
}

// ── Direct admin messages ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminMessageStatus {
    #[default]
    New,
    Read,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminMessage {
    pub id: AdminMessageId,
    pub user_id: IdentityId,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub status: AdminMessageStatus,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
}

// ── Announcements ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Background {
    #[default]
    None,
    Color {
        color: String,
    },
    Image {
        url: String,
        /// Blur radius in pixels.
        #[serde(default)]
        blur: u8,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: AnnouncementId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub background: Background,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
}
