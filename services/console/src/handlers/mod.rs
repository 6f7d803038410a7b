pub mod admin;
pub mod announcements;
pub mod extract;
pub mod health;
pub mod messages;
pub mod profile;
pub mod session;
pub mod verification;
