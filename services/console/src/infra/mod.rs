pub mod db;
pub mod identity;
pub mod memory;
pub mod notifier;
pub mod repo;
pub mod store;
