use serde_json::Value;

use crate::domain::repository::{Document, DocumentStore, FieldFilter};
use crate::error::ConsoleError;
use crate::infra::db::PgDocumentStore;
use crate::infra::memory::MemoryDocumentStore;

/// The store selected at start-up: Postgres when `DATABASE_URL` is set,
/// otherwise process memory.
#[derive(Clone)]
pub enum AnyDocumentStore {
    Postgres(PgDocumentStore),
    Memory(MemoryDocumentStore),
}

impl AnyDocumentStore {
    pub async fn ping(&self) -> Result<(), ConsoleError> {
        match self {
            Self::Postgres(s) => s.ping().await,
            Self::Memory(_) => Ok(()),
        }
    }
}

impl From<MemoryDocumentStore> for AnyDocumentStore {
    fn from(store: MemoryDocumentStore) -> Self {
        Self::Memory(store)
    }
}

impl From<PgDocumentStore> for AnyDocumentStore {
    fn from(store: PgDocumentStore) -> Self {
        Self::Postgres(store)
    }
}

impl DocumentStore for AnyDocumentStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, ConsoleError> {
        match self {
            Self::Postgres(s) => s.get(collection, key).await,
            Self::Memory(s) => s.get(collection, key).await,
        }
    }

    async fn set(
        &self,
        collection: &str,
        key: &str,
        fields: Value,
        merge: bool,
    ) -> Result<(), ConsoleError> {
        match self {
            Self::Postgres(s) => s.set(collection, key, fields, merge).await,
            Self::Memory(s) => s.set(collection, key, fields, merge).await,
        }
    }

    async fn update(
        &self,
        collection: &str,
        key: &str,
        fields: Value,
    ) -> Result<bool, ConsoleError> {
        match self {
            Self::Postgres(s) => s.update(collection, key, fields).await,
            Self::Memory(s) => s.update(collection, key, fields).await,
        }
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<bool, ConsoleError> {
        match self {
            Self::Postgres(s) => s.delete(collection, key).await,
            Self::Memory(s) => s.delete(collection, key).await,
        }
    }

    async fn list(
        &self,
        collection: &str,
        filter: Option<&FieldFilter>,
    ) -> Result<Vec<Document>, ConsoleError> {
        match self {
            Self::Postgres(s) => s.list(collection, filter).await,
            Self::Memory(s) => s.list(collection, filter).await,
        }
    }

    async fn create(
        &self,
        collection: &str,
        key: &str,
        fields: Value,
    ) -> Result<bool, ConsoleError> {
        match self {
            Self::Postgres(s) => s.create(collection, key, fields).await,
            Self::Memory(s) => s.create(collection, key, fields).await,
        }
    }

    async fn compare_and_set(
        &self,
        collection: &str,
        key: &str,
        expected_version: i64,
        fields: Value,
    ) -> Result<bool, ConsoleError> {
        match self {
            Self::Postgres(s) => {
                s.compare_and_set(collection, key, expected_version, fields)
                    .await
            }
            Self::Memory(s) => {
                s.compare_and_set(collection, key, expected_version, fields)
                    .await
            }
        }
    }
}
