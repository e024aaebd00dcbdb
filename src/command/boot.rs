use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::cli::{locales_dir, BootArgs};
use crate::config::StartupConfig;
use crate::context::Collaborators;
use crate::document::DocumentRoot;
use crate::i18n::{CatalogGate, LocalizationGate};
use crate::managers::{
    Banners, Manager, OnboardingManager, ScrollActivator, ThemeManager, UiComponent,
    UpdateService,
};
use crate::settings::SettingsStore;
use crate::startup::{AppCore, DeferredOutcome};
use crate::storage::{migrate_storage_items, LocalStore, MigrationReport};

pub async fn run_boot(data_dir: &Path, args: BootArgs) -> Result<()> {
    // Runs alongside startup; startup never waits for it.
    let migration_dir = data_dir.to_path_buf();
    let migration = tokio::task::spawn_blocking(move || -> Result<MigrationReport> {
        let mut store = LocalStore::open(&migration_dir)?;
        migrate_storage_items(&mut store)
    });

    let config = StartupConfig::resolve(args.onboarding_delay_ms);

    let document = Arc::new(match args.page.as_deref() {
        Some(page) => DocumentRoot::with_page(page),
        None => DocumentRoot::new(),
    });
    let settings = Arc::new(SettingsStore::load(data_dir)?);
    let gate = Arc::new(CatalogGate::from_dir(
        &args.locale,
        locales_dir(data_dir),
        config.locale_load_timeout,
    ));
    let banners = Arc::new(Banners::new());
    let onboarding = Arc::new(OnboardingManager::load(data_dir)?);
    let scroll = Arc::new(ScrollActivator::new());
    let updates = UpdateService::new(banners.clone(), args.remote_version.clone())
        .with_check_delay(Duration::from_millis(args.update_check_delay_ms));

    let component = |name: &'static str| Arc::new(UiComponent::new(name, document.clone()));

    // Handed over ready
    let moves = component("move");
    moves.initialize()?;

    let collaborators = Collaborators {
        i18n: gate.clone(),
        document: document.clone(),
        settings: settings.clone(),
        loading: component("loading"),
        modals: component("modal"),
        updates: Arc::new(updates),
        banners: banners.clone(),
        header: component("header"),
        theme: Arc::new(ThemeManager::new(settings.clone(), document.clone())),
        back_to_top: component("back-to-top"),
        bulk: component("bulk"),
        example_images: component("example-images"),
        help: component("help"),
        moves,
        onboarding: onboarding.clone(),
        scroll: scroll.clone(),
    };

    let core = AppCore::new(collaborators, config);
    core.initialize().await?.initialize_page_features();
    debug!(
        "Startup settled as {:?} at {:?}",
        core.state(),
        core.initialized_at()
    );

    let outcome = match core.deferred_onboarding() {
        Some(handle) => match handle.await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                warn!("Onboarding check did not complete: {}", e);
                None
            }
        },
        None => None,
    };

    match migration.await {
        Ok(Ok(report)) if report.already_done => info!("Storage already namespaced"),
        Ok(Ok(report)) => info!("Migrated {} storage key(s)", report.migrated.len()),
        Ok(Err(e)) => warn!("Storage migration failed: {:#}", e),
        Err(e) => warn!("Storage migration task failed: {}", e),
    }

    println!("✅ {}", gate.translate("app.ready"));
    println!("   Locale: {}", gate.current_locale());
    println!("   Page: {}", document.page_type());
    println!(
        "   Theme: {}",
        document.data("theme").unwrap_or_else(|| "-".to_string())
    );
    println!("   Document classes: {}", document.classes().join(" "));

    let published: Vec<String> = core
        .context()
        .registry
        .published()
        .iter()
        .map(|id| id.to_string())
        .collect();
    println!("   Managers: {}", published.join(", "));

    let pages = scroll.active_pages();
    if pages.is_empty() {
        println!("   Infinite scroll: off");
    } else {
        println!("   Infinite scroll: {}", pages.join(", "));
    }

    for banner in banners.visible() {
        println!("   Banner [{}]: {}", banner.id, banner.message);
    }

    match outcome {
        Some(DeferredOutcome::Started) if onboarding.runs() > 0 => {
            println!("   Onboarding: shown")
        }
        Some(DeferredOutcome::Started) => println!("   Onboarding: already completed"),
        Some(DeferredOutcome::SuppressedByBanner) => {
            println!("   Onboarding: postponed (version banner visible)")
        }
        None => println!("   Onboarding: unknown"),
    }

    Ok(())
}
