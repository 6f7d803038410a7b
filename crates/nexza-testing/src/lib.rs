//! Test utilities for Nexza services.
//!
//! Provides `MockSession` (pre-signed session cookies) and `ManualClock`.
//! Dev-dependency only.

pub mod clock;
pub mod session;
