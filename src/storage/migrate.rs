//! Namespace migration for stored keys.

use anyhow::Result;
use tracing::{debug, info};

use super::store::LocalStore;

/// Prefix every stored key carries after migration
pub const STORAGE_PREFIX: &str = "lora_manager_";

/// Set once migration has run
pub const MIGRATION_MARKER: &str = "lora_manager_migration_completed";

/// What a migration run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Legacy keys moved under the prefix
    pub migrated: Vec<String>,
    /// Legacy keys dropped because a namespaced value already existed
    pub skipped: Vec<String>,
    /// Migration had already completed; nothing was touched
    pub already_done: bool,
}

/// Move every unprefixed key under `STORAGE_PREFIX`.
///
/// Existing namespaced values win over legacy ones. Re-running after a
/// completed migration is a no-op.
pub fn migrate_storage_items(store: &mut LocalStore) -> Result<MigrationReport> {
    if store.contains(MIGRATION_MARKER) {
        debug!("Storage migration already completed");
        return Ok(MigrationReport {
            already_done: true,
            ..Default::default()
        });
    }

    let mut report = MigrationReport::default();
    let legacy: Vec<String> = store
        .keys()
        .into_iter()
        .filter(|k| !k.starts_with(STORAGE_PREFIX))
        .collect();

    for key in legacy {
        let namespaced = format!("{}{}", STORAGE_PREFIX, key);
        let Some(value) = store.remove(&key) else {
            continue;
        };
        if store.contains(&namespaced) {
            debug!("Keeping existing {} over legacy {}", namespaced, key);
            report.skipped.push(key);
        } else {
            store.set(&namespaced, &value);
            report.migrated.push(key);
        }
    }

    store.set(MIGRATION_MARKER, "true");
    store.save()?;

    info!(
        "Storage migration complete: {} migrated, {} skipped",
        report.migrated.len(),
        report.skipped.len()
    );
    Ok(report)
}
