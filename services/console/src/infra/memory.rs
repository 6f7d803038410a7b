use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;

use crate::domain::repository::{Document, DocumentStore, FieldFilter};
use crate::error::ConsoleError;

#[derive(Debug, Clone)]
struct Entry {
    fields: Value,
    version: i64,
    seq: u64,
}

#[derive(Debug, Default)]
struct Collections {
    docs: HashMap<(String, String), Entry>,
    next_seq: u64,
}

impl Collections {
    fn insert(&mut self, collection: &str, key: &str, fields: Value) {
        self.next_seq += 1;
        self.docs.insert(
            (collection.to_owned(), key.to_owned()),
            Entry {
                fields,
                version: 1,
                seq: self.next_seq,
            },
        );
    }
}

/// Process-local document store for local runs and tests.
///
/// Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    inner: Arc<RwLock<Collections>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Shallow merge: top-level keys of `patch` overwrite those of `target`.
pub(crate) fn merge_fields(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (k, v) in patch {
                target.insert(k, v);
            }
        }
        (target, patch) => *target = patch,
    }
}

fn doc_key(collection: &str, key: &str) -> (String, String) {
    (collection.to_owned(), key.to_owned())
}

impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, ConsoleError> {
        let inner = self.inner.read().await;
        Ok(inner.docs.get(&doc_key(collection, key)).map(|e| Document {
            key: key.to_owned(),
            fields: e.fields.clone(),
            version: e.version,
        }))
    }

    async fn set(
        &self,
        collection: &str,
        key: &str,
        fields: Value,
        merge: bool,
    ) -> Result<(), ConsoleError> {
        let mut inner = self.inner.write().await;
        match inner.docs.get_mut(&doc_key(collection, key)) {
            Some(entry) => {
                if merge {
                    merge_fields(&mut entry.fields, fields);
                } else {
                    entry.fields = fields;
                }
                entry.version += 1;
            }
            None => inner.insert(collection, key, fields),
        }
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        key: &str,
        fields: Value,
    ) -> Result<bool, ConsoleError> {
        let mut inner = self.inner.write().await;
        let Some(entry) = inner.docs.get_mut(&doc_key(collection, key)) else {
            return Ok(false);
        };
        merge_fields(&mut entry.fields, fields);
        entry.version += 1;
        Ok(true)
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<bool, ConsoleError> {
        let mut inner = self.inner.write().await;
        Ok(inner.docs.remove(&doc_key(collection, key)).is_some())
    }

    async fn list(
        &self,
        collection: &str,
        filter: Option<&FieldFilter>,
    ) -> Result<Vec<Document>, ConsoleError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<(u64, Document)> = inner
            .docs
            .iter()
            .filter(|((c, _), e)| c == collection && filter.is_none_or(|f| f.matches(&e.fields)))
            .map(|((_, k), e)| {
                (
                    e.seq,
                    Document {
                        key: k.clone(),
                        fields: e.fields.clone(),
                        version: e.version,
                    },
                )
            })
            .collect();
        rows.sort_by_key(|(seq, _)| *seq);
        Ok(rows.into_iter().map(|(_, doc)| doc).collect())
    }

    async fn create(
        &self,
        collection: &str,
        key: &str,
        fields: Value,
    ) -> Result<bool, ConsoleError> {
        let mut inner = self.inner.write().await;
        if inner.docs.contains_key(&doc_key(collection, key)) {
            return Ok(false);
        }
        inner.insert(collection, key, fields);
        Ok(true)
    }

    async fn compare_and_set(
        &self,
        collection: &str,
        key: &str,
        expected_version: i64,
        fields: Value,
    ) -> Result<bool, ConsoleError> {
        let mut inner = self.inner.write().await;
        match inner.docs.get_mut(&doc_key(collection, key)) {
            Some(entry) if entry.version == expected_version => {
                entry.fields = fields;
                entry.version += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
