use anyhow::Result;
use std::path::Path;

use crate::storage::{migrate_storage_items, LocalStore, STORAGE_PREFIX};

pub async fn run_migrate(data_dir: &Path) -> Result<()> {
    let mut store = LocalStore::open(data_dir)?;
    let report = migrate_storage_items(&mut store)?;

    if report.already_done {
        println!("Storage is already namespaced, nothing to do.");
        return Ok(());
    }

    println!("✅ Storage migrated to '{}' namespace", STORAGE_PREFIX);
    println!("   Migrated: {}", report.migrated.len());
    for key in &report.migrated {
        println!("     - {} -> {}{}", key, STORAGE_PREFIX, key);
    }
    if !report.skipped.is_empty() {
        println!("   Dropped (namespaced value kept): {}", report.skipped.len());
        for key in &report.skipped {
            println!("     - {}", key);
        }
    }

    Ok(())
}
