//! Persistent key/value storage and its one-time namespace migration.
//!
//! The migration runs on load, independent of (and concurrently with)
//! application startup; nothing in startup waits for it.

mod migrate;
mod store;

pub use migrate::{migrate_storage_items, MigrationReport, MIGRATION_MARKER, STORAGE_PREFIX};
pub use store::LocalStore;
