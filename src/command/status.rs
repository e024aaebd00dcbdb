use anyhow::Result;
use std::path::Path;

use crate::managers::{onboarding_state, ONBOARDING_FILE};
use crate::settings::SettingsStore;
use crate::storage::{LocalStore, MIGRATION_MARKER};

pub async fn run_status(data_dir: &Path) -> Result<()> {
    println!("Data directory: {}", data_dir.display());

    let settings = SettingsStore::load(data_dir)?.snapshot();
    println!("Settings:");
    println!(
        "   Card info display: {:?}",
        settings.display_preference()
    );
    println!(
        "   Theme: {}",
        settings.theme.as_deref().unwrap_or("auto")
    );

    let onboarding = onboarding_state(&data_dir.join(ONBOARDING_FILE))?;
    if onboarding.completed {
        println!(
            "✅ Onboarding completed{}",
            onboarding
                .completed_at
                .map(|at| format!(" at {}", at))
                .unwrap_or_default()
        );
    } else {
        println!("❌ Onboarding not completed");
    }

    let store = LocalStore::open(data_dir)?;
    let migrated = store.contains(MIGRATION_MARKER);
    println!(
        "Storage: {} key(s), {}",
        store.len(),
        if migrated { "namespaced" } else { "not migrated" }
    );

    Ok(())
}
