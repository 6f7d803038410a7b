//! Start-up wiring: backing services must come up within one time budget.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use sea_orm::Database;

use nexza_domain::clock::SystemClock;
use nexza_domain::email::AdminAllowList;

use crate::config::ConsoleConfig;
use crate::infra::db::PgDocumentStore;
use crate::infra::identity::IdentityToolkitProvider;
use crate::infra::memory::MemoryDocumentStore;
use crate::infra::notifier::LogCodeNotifier;
use crate::infra::store::AnyDocumentStore;
use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("backing services not ready within {0:?}")]
    InitializationTimeout(Duration),
    #[error("failed to initialise backing services")]
    Unavailable(#[source] anyhow::Error),
}

/// Await `ready` for at most `budget`.
pub async fn within<F, T>(budget: Duration, ready: F) -> Result<T, InitError>
where
    F: Future<Output = anyhow::Result<T>>,
{
    match tokio::time::timeout(budget, ready).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(InitError::Unavailable(e)),
        Err(_) => Err(InitError::InitializationTimeout(budget)),
    }
}

pub async fn connect_store(database_url: Option<&str>) -> anyhow::Result<AnyDocumentStore> {
    let Some(url) = database_url else {
        tracing::warn!("DATABASE_URL not set, documents are kept in memory");
        return Ok(MemoryDocumentStore::new().into());
    };
    let db = Database::connect(url)
        .await
        .context("connect to database")?;
    let store = PgDocumentStore { db };
    store.ping().await.context("database not ready")?;
    Ok(store.into())
}

pub async fn build_state(config: &ConsoleConfig) -> Result<AppState, InitError> {
    let budget = Duration::from_secs(config.ready_timeout_secs);
    let store = within(budget, connect_store(config.database_url.as_deref())).await?;

    let identity = IdentityToolkitProvider::new(
        &config.identity_base_url,
        &config.identity_api_key,
        Duration::from_secs(config.identity_timeout_secs),
    )
    .map_err(InitError::Unavailable)?;

    let admins = AdminAllowList::parse(&config.admin_emails);
    if admins.is_empty() {
        tracing::warn!("ADMIN_EMAILS is empty, no session will resolve as admin");
    }

    Ok(AppState {
        store,
        identity,
        notifier: LogCodeNotifier,
        clock: Arc::new(SystemClock),
        admins: Arc::new(admins),
        session_secret: config.session_secret.clone(),
        cookie_domain: config.cookie_domain.clone(),
    })
}
