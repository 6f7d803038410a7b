//! Session types shared by the console service and its test helpers.
//!
//! Provides session-token signing/validation, cookie builders, and the
//! mobile-device heuristic used to pick the session ceiling.

pub mod cookie;
pub mod device;
pub mod token;
