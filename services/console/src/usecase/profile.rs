use nexza_domain::clock::Clock;
use nexza_domain::username::Username;

use crate::domain::repository::{UserRepository, UsernameRepository};
use crate::domain::types::UserProfile;
use crate::error::ConsoleError;

pub struct SetUsernameUseCase<U, N, C>
where
    U: UserRepository,
    N: UsernameRepository,
    C: Clock,
{
    pub users: U,
    pub usernames: N,
    pub clock: C,
}

impl<U, N, C> SetUsernameUseCase<U, N, C>
where
    U: UserRepository,
    N: UsernameRepository,
    C: Clock,
{
    /// Assign a handle to a profile that has none. Handles never change once set.
    pub async fn execute(
        &self,
        profile: &UserProfile,
        raw: &str,
    ) -> Result<UserProfile, ConsoleError> {
        let username = Username::parse(raw)?;
        if profile.username.is_some() {
            return Err(ConsoleError::UsernameImmutable);
        }
        if !self
            .usernames
            .claim(&username, &profile.identity_id, self.clock.now())
            .await?
        {
            return Err(ConsoleError::UsernameTaken);
        }
        // The gate's snapshot may be stale; the conditional write decides.
        if !self
            .users
            .set_username_if_unset(&profile.identity_id, &username)
            .await?
        {
            self.usernames.release(&username).await?;
            return Err(ConsoleError::UsernameImmutable);
        }

        Ok(UserProfile {
            username: Some(username),
            ..profile.clone()
        })
    }
}
