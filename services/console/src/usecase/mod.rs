pub mod announcement;
pub mod auth;
pub mod contact;
pub mod direct_message;
pub mod gate;
pub mod moderation;
pub mod profile;
pub mod verification;
