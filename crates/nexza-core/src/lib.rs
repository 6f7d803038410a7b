//! Service plumbing shared by Nexza binaries: tracing, env config, error
//! bodies, health probes, request ids, and serde helpers.

pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
