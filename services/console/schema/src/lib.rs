//! sea-orm entities for the console's Postgres-backed document store.

pub mod documents;
