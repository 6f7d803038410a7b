use nexza_domain::clock::Clock;
use nexza_domain::id::IdentityId;

use crate::domain::repository::{UserRepository, UsernameRepository};
use crate::domain::types::{UserFilter, UserProfile, UserStats};
use crate::error::ConsoleError;

// ── List ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct ListUsersInput {
    /// Case-insensitive substring of the email.
    pub search: Option<String>,
    pub filter: UserFilter,
}

#[derive(Debug)]
pub struct ListUsersOutput {
    pub users: Vec<UserProfile>,
    pub stats: UserStats,
}

pub struct ListUsersUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> ListUsersUseCase<U> {
    pub async fn execute(&self, input: ListUsersInput) -> Result<ListUsersOutput, ConsoleError> {
        let all = self.users.list().await?;
        let stats = UserStats::tally(&all);

        let needle = input
            .search
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());
        let mut users: Vec<UserProfile> = all
            .into_iter()
            .filter(|u| input.filter.matches(u))
            .filter(|u| {
                needle
                    .as_deref()
                    .is_none_or(|n| u.email.to_lowercase().contains(n))
            })
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(ListUsersOutput { users, stats })
    }
}

// ── View ──────────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> GetUserUseCase<U> {
    pub async fn execute(&self, id: &IdentityId) -> Result<UserProfile, ConsoleError> {
        self.users.find(id).await?.ok_or(ConsoleError::UserNotFound)
    }
}

// ── Ban / unban ───────────────────────────────────────────────────────────────

pub struct SetBanUseCase<U, C>
where
    U: UserRepository,
    C: Clock,
{
    pub users: U,
    pub clock: C,
}

impl<U, C> SetBanUseCase<U, C>
where
    U: UserRepository,
    C: Clock,
{
    /// The target's next gate resolution signs it out.
    pub async fn execute(
        &self,
        target: &IdentityId,
        banned: bool,
        actor: &str,
    ) -> Result<(), ConsoleError> {
        if !self.users.set_banned(target, banned, self.clock.now()).await? {
            return Err(ConsoleError::UserNotFound);
        }
        tracing::info!(user = %target, banned, actor, "ban status changed");
        Ok(())
    }
}

// ── Delete ────────────────────────────────────────────────────────────────────

pub struct DeleteUserUseCase<U, N>
where
    U: UserRepository,
    N: UsernameRepository,
{
    pub users: U,
    pub usernames: N,
}

impl<U, N> DeleteUserUseCase<U, N>
where
    U: UserRepository,
    N: UsernameRepository,
{
    /// Remove the profile and free its handle. The provider account is untouched.
    pub async fn execute(&self, target: &IdentityId, actor: &str) -> Result<(), ConsoleError> {
        let profile = self
            .users
            .find(target)
            .await?
            .ok_or(ConsoleError::UserNotFound)?;
        self.users.delete(target).await?;
        if let Some(ref username) = profile.username {
            self.usernames.release(username).await?;
        }
        tracing::info!(user = %target, actor, "user deleted");
        Ok(())
    }
}
