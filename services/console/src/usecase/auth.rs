use std::sync::Arc;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use nexza_domain::clock::Clock;
use nexza_domain::email::AdminAllowList;
use nexza_domain::username::Username;
use nexza_session_types::token::issue_session_token;

use crate::domain::repository::{
    IdentityProvider, UserRepository, UsernameRepository, VerificationCodeRepository,
};
use crate::domain::types::{PASSWORD_MIN_LEN, UserProfile};
use crate::error::ConsoleError;
use crate::usecase::gate::admit;
use crate::usecase::verification::{subject_from, validate_code};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

pub struct CompleteAuthInput {
    pub email: String,
    pub password: String,
    pub code: String,
    pub mode: AuthMode,
    /// Optional handle, only honoured on sign-up.
    pub username: Option<String>,
    pub mobile: bool,
}

#[derive(Debug)]
pub struct CompleteAuthOutput {
    pub session_token: String,
    pub session_exp: u64,
    pub started_at: DateTime<Utc>,
    pub profile: UserProfile,
    pub is_admin: bool,
}

pub struct CompleteAuthUseCase<R, P, U, N, C>
where
    R: VerificationCodeRepository,
    P: IdentityProvider,
    U: UserRepository,
    N: UsernameRepository,
    C: Clock,
{
    pub codes: R,
    pub provider: P,
    pub users: U,
    pub usernames: N,
    pub clock: C,
    pub admins: Arc<AdminAllowList>,
    pub session_secret: String,
}

impl<R, P, U, N, C> CompleteAuthUseCase<R, P, U, N, C>
where
    R: VerificationCodeRepository,
    P: IdentityProvider,
    U: UserRepository,
    N: UsernameRepository,
    C: Clock,
{
    pub async fn execute(&self, input: CompleteAuthInput) -> Result<CompleteAuthOutput, ConsoleError> {
        // 1. Entry validation
        let email = subject_from(&input.email)?;
        if input.password.chars().count() < PASSWORD_MIN_LEN {
            return Err(ConsoleError::invalid_input(
                "Password must be at least 6 characters",
            ));
        }
        let username = match (input.mode, input.username.as_deref().map(str::trim)) {
            (AuthMode::SignUp, Some(raw)) if !raw.is_empty() => Some(Username::parse(raw)?),
            _ => None,
        };

        // 2. Handle pre-check, so a taken handle does not burn the code
        if let Some(ref username) = username {
            if self.usernames.is_taken(username).await? {
                return Err(ConsoleError::UsernameTaken);
            }
        }

        // 3. Code must be valid before any provider call
        validate_code(&self.codes, &self.clock, &email, &input.code).await?;

        // 4. Deferred sign-in / sign-up
        let identity = match input.mode {
            AuthMode::SignIn => self.provider.sign_in(&email, &input.password).await?,
            AuthMode::SignUp => self.provider.sign_up(&email, &input.password).await?,
        };
        let now = self.clock.now();

        if input.mode == AuthMode::SignUp {
            let mut profile = UserProfile::first_seen(identity.identity_id.clone(), email.clone(), now);
            profile.email_verified = true;
            if !self.users.create(&profile).await? {
                self.users.mark_email_verified(&identity.identity_id).await?;
            }
            if let Some(ref username) = username {
                let claimed = self
                    .usernames
                    .claim(username, &identity.identity_id, now)
                    .await?;
                if !claimed {
                    tracing::warn!(
                        identity_id = %identity.identity_id,
                        username = %username,
                        "username claimed concurrently; account created without it"
                    );
                } else if !self
                    .users
                    .set_username_if_unset(&identity.identity_id, username)
                    .await?
                {
                    self.usernames.release(username).await?;
                }
            }
        }

        // 5. Gate runs before any cookie is handed out
        let profile = admit(&self.users, &self.admins, &identity.identity_id, &identity.email, now).await?;

        let (session_token, session_exp) = issue_session_token(
            &identity.identity_id,
            &identity.email,
            input.mobile,
            now,
            &self.session_secret,
        )
        .context("sign session token")?;

        tracing::info!(
            identity_id = %identity.identity_id,
            mode = ?input.mode,
            mobile = input.mobile,
            "authentication completed"
        );

        let is_admin = profile.is_admin;
        Ok(CompleteAuthOutput {
            session_token,
            session_exp,
            started_at: now,
            profile,
            is_admin,
        })
    }
}
