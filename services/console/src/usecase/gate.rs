use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use nexza_domain::clock::Clock;
use nexza_domain::email::{AdminAllowList, normalize_email};
use nexza_domain::id::IdentityId;
use nexza_domain::window::{SessionCheck, check_session};
use nexza_session_types::token::validate_session_token;

use crate::domain::repository::UserRepository;
use crate::domain::types::UserProfile;
use crate::error::{AccessError, ConsoleError};

/// Identity and profile exposed to protected handlers.
#[derive(Debug, Clone)]
pub struct ResolvedSession {
    pub identity_id: IdentityId,
    pub email: String,
    pub mobile: bool,
    pub started_at: DateTime<Utc>,
    /// Time left before the mobile ceiling; `None` for desktop sessions.
    pub remaining: Option<Duration>,
    pub profile: UserProfile,
    pub is_admin: bool,
}

impl ResolvedSession {
    pub fn require_admin(&self) -> Result<(), ConsoleError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AccessError::NotAdmin.into())
        }
    }
}

/// Load (or create) the profile, turn away banned identities, and refresh the
/// derived admin flag from the allow-list.
///
/// A ban is terminal regardless of admin status.
pub async fn admit<U: UserRepository>(
    users: &U,
    admins: &AdminAllowList,
    identity_id: &IdentityId,
    email: &str,
    now: DateTime<Utc>,
) -> Result<UserProfile, ConsoleError> {
    let mut profile = match users.find(identity_id).await? {
        Some(profile) => profile,
        None => {
            let fresh = UserProfile::first_seen(identity_id.clone(), normalize_email(email), now);
            if users.create(&fresh).await? {
                tracing::info!(identity_id = %identity_id, "profile created");
                fresh
            } else {
                // Lost the race to a concurrent first resolution.
                users
                    .find(identity_id)
                    .await?
                    .ok_or(ConsoleError::UserNotFound)?
            }
        }
    };

    if profile.is_banned {
        tracing::info!(identity_id = %identity_id, "banned identity signed out");
        return Err(AccessError::Banned.into());
    }

    let is_admin = admins.contains(email);
    users.record_login(identity_id, is_admin, now).await?;
    profile.is_admin = is_admin;
    profile.last_login_at = now;
    Ok(profile)
}

pub struct ResolveSessionUseCase<U, C>
where
    U: UserRepository,
    C: Clock,
{
    pub users: U,
    pub clock: C,
    pub admins: Arc<AdminAllowList>,
    pub session_secret: String,
}

impl<U, C> ResolveSessionUseCase<U, C>
where
    U: UserRepository,
    C: Clock,
{
    /// Resolve the session cookie value, if any, into a [`ResolvedSession`].
    pub async fn execute(&self, token: Option<&str>) -> Result<ResolvedSession, ConsoleError> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(AccessError::Unauthenticated)?;
        let info = validate_session_token(token, &self.session_secret)
            .map_err(|_| AccessError::Unauthenticated)?;

        let now = self.clock.now();
        let remaining = match check_session(info.started_at, info.mobile, now) {
            SessionCheck::Expired => {
                tracing::info!(identity_id = %info.identity_id, "mobile session ceiling reached");
                return Err(AccessError::SessionExpired.into());
            }
            SessionCheck::Active { remaining } => remaining,
        };

        let profile = admit(&self.users, &self.admins, &info.identity_id, &info.email, now).await?;
        let is_admin = profile.is_admin;

        Ok(ResolvedSession {
            identity_id: info.identity_id,
            email: info.email,
            mobile: info.mobile,
            started_at: info.started_at,
            remaining,
            profile,
            is_admin,
        })
    }
}
