//! Domain types shared across Nexza crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod clock;
pub mod email;
pub mod id;
pub mod username;
pub mod window;
