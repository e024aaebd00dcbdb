//! Tests for the startup orchestrator.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use tokio::time::Instant;

use super::{AppCore, DeferredOutcome, InitState, StartupError, StartupStep};
use crate::config::StartupConfig;
use crate::context::{Collaborators, ManagerId};
use crate::document::{DocumentRoot, PAGE_DATA_KEY};
use crate::i18n::LocalizationGate;
use crate::managers::{
    BannerService, Banners, InfiniteScroll, Manager, Onboarding, UiComponent, UpdateService,
    VERSION_MISMATCH_BANNER,
};
use crate::settings::{GlobalSettings, SettingsStore};

type EventLog = Arc<Mutex<Vec<String>>>;

fn events(log: &EventLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

struct FakeGate {
    log: EventLog,
    delay: Duration,
    waits: AtomicUsize,
}

#[async_trait]
impl LocalizationGate for FakeGate {
    async fn wait_for_ready(&self) {
        self.waits.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.log.lock().unwrap().push("i18n".to_string());
    }

    fn current_locale(&self) -> String {
        "en".to_string()
    }
}

struct FakeManager {
    name: &'static str,
    log: EventLog,
    fail: bool,
    panic: bool,
    calls: AtomicUsize,
}

impl Manager for FakeManager {
    fn name(&self) -> &'static str {
        self.name
    }

    fn initialize(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push(self.name.to_string());
        if self.panic {
            panic!("{} panicked", self.name);
        }
        if self.fail {
            bail!("{} exploded", self.name);
        }
        Ok(())
    }
}

struct FakeBanners {
    log: EventLog,
    visible: AtomicBool,
    queries: AtomicUsize,
}

impl Manager for FakeBanners {
    fn name(&self) -> &'static str {
        "banners"
    }

    fn initialize(&self) -> Result<()> {
        self.log.lock().unwrap().push("banners".to_string());
        Ok(())
    }
}

impl BannerService for FakeBanners {
    fn is_banner_visible(&self, banner_id: &str) -> bool {
        self.queries.fetch_add(1, Ordering::SeqCst);
        banner_id == "version-mismatch" && self.visible.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
struct FakeOnboarding {
    starts: AtomicUsize,
    started_at: Mutex<Option<Instant>>,
}

impl Onboarding for FakeOnboarding {
    fn start(&self) {
        self.starts.fetch_add(1, Ordering::SeqCst);
        *self.started_at.lock().unwrap() = Some(Instant::now());
    }
}

#[derive(Default)]
struct FakeScroll {
    calls: Mutex<Vec<String>>,
}

impl InfiniteScroll for FakeScroll {
    fn initialize(&self, page_type: &str) {
        self.calls.lock().unwrap().push(page_type.to_string());
    }
}

struct Harness {
    log: EventLog,
    gate: Arc<FakeGate>,
    managers: Vec<Arc<FakeManager>>,
    banners: Arc<FakeBanners>,
    onboarding: Arc<FakeOnboarding>,
    scroll: Arc<FakeScroll>,
    document: Arc<DocumentRoot>,
}

impl Harness {
    fn manager(&self, name: &str) -> &FakeManager {
        self.managers
            .iter()
            .find(|m| m.name == name)
            .expect("known manager")
    }

    fn calls(&self, name: &str) -> usize {
        self.manager(name).calls.load(Ordering::SeqCst)
    }

    fn starts(&self) -> usize {
        self.onboarding.starts.load(Ordering::SeqCst)
    }
}

struct Setup {
    settings: GlobalSettings,
    failing: Option<&'static str>,
    panicking: Option<&'static str>,
    gate_delay: Duration,
    page: Option<&'static str>,
}

impl Default for Setup {
    fn default() -> Self {
        Self {
            settings: GlobalSettings::default(),
            failing: None,
            panicking: None,
            gate_delay: Duration::from_millis(50),
            page: None,
        }
    }
}

fn build(setup: Setup) -> (AppCore, Harness) {
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let fake = |name: &'static str| {
        Arc::new(FakeManager {
            name,
            log: log.clone(),
            fail: setup.failing == Some(name),
            panic: setup.panicking == Some(name),
            calls: AtomicUsize::new(0),
        })
    };

    let loading = fake("loading");
    let modals = fake("modal");
    let updates = fake("updates");
    let header = fake("header");
    let theme = fake("theme");
    let back_to_top = fake("back-to-top");
    let bulk = fake("bulk");
    let example_images = fake("example-images");
    let help = fake("help");
    let moves = fake("move");

    let gate = Arc::new(FakeGate {
        log: log.clone(),
        delay: setup.gate_delay,
        waits: AtomicUsize::new(0),
    });
    let banners = Arc::new(FakeBanners {
        log: log.clone(),
        visible: AtomicBool::new(false),
        queries: AtomicUsize::new(0),
    });
    let onboarding = Arc::new(FakeOnboarding::default());
    let scroll = Arc::new(FakeScroll::default());
    let document = Arc::new(match setup.page {
        Some(page) => DocumentRoot::with_page(page),
        None => DocumentRoot::new(),
    });

    let collaborators = Collaborators {
        i18n: gate.clone(),
        document: document.clone(),
        settings: Arc::new(SettingsStore::new(setup.settings)),
        loading: loading.clone(),
        modals: modals.clone(),
        updates: updates.clone(),
        banners: banners.clone(),
        header: header.clone(),
        theme: theme.clone(),
        back_to_top: back_to_top.clone(),
        bulk: bulk.clone(),
        example_images: example_images.clone(),
        help: help.clone(),
        moves: moves.clone(),
        onboarding: onboarding.clone(),
        scroll: scroll.clone(),
    };

    let core = AppCore::new(collaborators, StartupConfig::default());
    let harness = Harness {
        log,
        gate,
        managers: vec![
            loading,
            modals,
            updates,
            header,
            theme,
            back_to_top,
            bulk,
            example_images,
            help,
            moves,
        ],
        banners,
        onboarding,
        scroll,
        document,
    };
    (core, harness)
}

fn settings_with_display(value: Option<&str>) -> GlobalSettings {
    GlobalSettings {
        card_info_display: value.map(str::to_string),
        ..Default::default()
    }
}

#[tokio::test(start_paused = true)]
async fn test_managers_start_in_order_after_gate() {
    let (core, h) = build(Setup::default());
    assert_eq!(core.state(), InitState::Uninitialized);

    core.initialize().await.unwrap();

    assert_eq!(
        events(&h.log),
        vec![
            "i18n",
            "loading",
            "modal",
            "updates",
            "banners",
            "header",
            "theme",
            "back-to-top",
            "bulk",
            "example-images",
            "help",
        ]
    );
    // published for lookup, not started by the orchestrator
    assert_eq!(h.calls("move"), 0);
    assert!(core.is_initialized());
    assert!(core.initialized_at().is_some());
}

#[tokio::test(start_paused = true)]
async fn test_second_initialize_is_noop() {
    let (core, h) = build(Setup::default());
    core.initialize().await.unwrap();
    let after_first = events(&h.log);

    let again = core.initialize().await.unwrap();
    assert!(std::ptr::eq(again, &core));
    assert_eq!(events(&h.log), after_first);
    assert_eq!(h.gate.waits.load(Ordering::SeqCst), 1);
    for name in ["loading", "modal", "bulk", "help"] {
        assert_eq!(h.calls(name), 1, "{} initialized more than once", name);
    }
    // only one onboarding check was scheduled
    assert!(core.deferred_onboarding().is_some());
    assert!(core.deferred_onboarding().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_initialize_activates_once() {
    let (core, h) = build(Setup {
        gate_delay: Duration::from_millis(500),
        ..Default::default()
    });

    let (first, second) = tokio::join!(core.initialize(), core.initialize());
    assert!(first.is_ok());
    assert!(second.is_ok());
    assert_eq!(h.gate.waits.load(Ordering::SeqCst), 1);
    assert_eq!(h.calls("help"), 1);
    assert_eq!(core.state(), InitState::Initialized);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_initialize_can_be_retried() {
    let (core, h) = build(Setup {
        gate_delay: Duration::from_secs(1),
        ..Default::default()
    });

    let attempt = tokio::time::timeout(Duration::from_millis(10), core.initialize()).await;
    assert!(attempt.is_err());
    assert_eq!(core.state(), InitState::Uninitialized);
    assert_eq!(h.calls("loading"), 0);

    core.initialize().await.unwrap();
    assert!(core.is_initialized());
    assert_eq!(h.calls("loading"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_failing_manager_aborts_remaining_steps() {
    let (core, h) = build(Setup {
        failing: Some("bulk"),
        ..Default::default()
    });

    let err = core.initialize().await.err().expect("startup should fail");
    assert!(matches!(
        err,
        StartupError::ManagerInit {
            step: StartupStep::BulkActions,
            ..
        }
    ));
    assert_eq!(h.calls("bulk"), 1);
    assert_eq!(h.calls("example-images"), 0);
    assert_eq!(h.calls("help"), 0);
    assert_eq!(core.state(), InitState::Failed);
    assert!(core.initialized_at().is_none());
    assert!(core.deferred_onboarding().is_none());

    // Only managers that reported ready were published
    let registry = &core.context().registry;
    assert!(registry.contains(ManagerId::Header));
    assert!(!registry.contains(ManagerId::Bulk));
    assert!(!registry.contains(ManagerId::Help));

    assert!(matches!(
        core.initialize().await,
        Err(StartupError::AlreadyFailed)
    ));
    assert_eq!(h.calls("loading"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_panicking_manager_leaves_failed_state() {
    let (core, h) = build(Setup {
        panicking: Some("help"),
        ..Default::default()
    });
    let core = Arc::new(core);

    let first = tokio::spawn({
        let core = core.clone();
        async move { core.initialize().await.map(|_| ()) }
    });
    let joined = first.await;
    assert!(joined.unwrap_err().is_panic());
    assert_eq!(core.state(), InitState::Failed);
    assert!(core.deferred_onboarding().is_none());

    // Later callers settle instead of waiting on a startup that never ends
    let second = tokio::time::timeout(Duration::from_secs(3600), core.initialize()).await;
    assert!(matches!(second, Ok(Err(StartupError::AlreadyFailed))));
    assert_eq!(h.calls("help"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_registry_populated_after_initialize() {
    let (core, _h) = build(Setup::default());
    core.initialize().await.unwrap();

    assert_eq!(
        core.context().registry.published(),
        vec![
            ManagerId::Modal,
            ManagerId::Settings,
            ManagerId::Move,
            ManagerId::Header,
            ManagerId::Bulk,
            ManagerId::ExampleImages,
            ManagerId::Help,
        ]
    );
    let settings = core.context().registry.get(ManagerId::Settings).unwrap();
    assert_eq!(settings.name(), "settings");
}

#[tokio::test(start_paused = true)]
async fn test_display_preference_applied() {
    let cases = [
        (Some("hover"), true),
        (Some("always"), false),
        (None, false),
        (Some("sometimes"), false),
    ];
    for (value, expected) in cases {
        let (core, h) = build(Setup {
            settings: settings_with_display(value),
            ..Default::default()
        });
        core.initialize().await.unwrap();
        assert_eq!(
            h.document.has_class("hover-reveal"),
            expected,
            "cardInfoDisplay = {:?}",
            value
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_page_features_for_listing_pages() {
    for page in ["loras", "recipes", "checkpoints", "embeddings"] {
        let (core, h) = build(Setup {
            page: Some(page),
            ..Default::default()
        });
        core.initialize().await.unwrap().initialize_page_features();
        assert_eq!(*h.scroll.calls.lock().unwrap(), vec![page.to_string()]);
    }
}

#[tokio::test(start_paused = true)]
async fn test_page_features_skipped_for_other_pages() {
    for page in [Some("statistics"), Some("unknown"), Some(""), None] {
        let (core, h) = build(Setup {
            page,
            ..Default::default()
        });
        core.initialize().await.unwrap().initialize_page_features();
        assert!(h.scroll.calls.lock().unwrap().is_empty(), "page {:?}", page);
    }
}

#[tokio::test(start_paused = true)]
async fn test_page_type_read_at_call_time() {
    let (core, h) = build(Setup {
        page: Some("statistics"),
        ..Default::default()
    });
    core.initialize().await.unwrap();
    core.initialize_page_features();
    assert!(h.scroll.calls.lock().unwrap().is_empty());

    h.document.set_data(PAGE_DATA_KEY, "recipes");
    core.initialize_page_features();
    assert_eq!(*h.scroll.calls.lock().unwrap(), vec!["recipes".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_onboarding_starts_after_delay_when_banner_hidden() {
    let (core, h) = build(Setup::default());
    core.initialize().await.unwrap();
    let initialized_at = core.initialized_at().unwrap();
    let handle = core.deferred_onboarding().unwrap();

    tokio::time::advance(Duration::from_millis(999)).await;
    tokio::task::yield_now().await;
    assert_eq!(h.starts(), 0);
    assert_eq!(h.banners.queries.load(Ordering::SeqCst), 0);

    assert_eq!(handle.await.unwrap(), DeferredOutcome::Started);
    assert_eq!(h.starts(), 1);
    let started_at = h.onboarding.started_at.lock().unwrap().unwrap();
    assert!(started_at >= initialized_at + Duration::from_millis(1000));
}

#[tokio::test(start_paused = true)]
async fn test_onboarding_suppressed_when_banner_visible() {
    let (core, h) = build(Setup::default());
    h.banners.visible.store(true, Ordering::SeqCst);
    core.initialize().await.unwrap();

    let outcome = core.deferred_onboarding().unwrap().await.unwrap();
    assert_eq!(outcome, DeferredOutcome::SuppressedByBanner);
    assert_eq!(h.starts(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_banner_shown_during_delay_suppresses_onboarding() {
    let (core, h) = build(Setup::default());
    core.initialize().await.unwrap();
    assert!(!h.banners.visible.load(Ordering::SeqCst));

    tokio::time::sleep(Duration::from_millis(500)).await;
    h.banners.visible.store(true, Ordering::SeqCst);

    let outcome = core.deferred_onboarding().unwrap().await.unwrap();
    assert_eq!(outcome, DeferredOutcome::SuppressedByBanner);
    assert_eq!(h.starts(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_banner_hidden_during_delay_allows_onboarding() {
    let (core, h) = build(Setup::default());
    h.banners.visible.store(true, Ordering::SeqCst);
    core.initialize().await.unwrap();

    tokio::time::sleep(Duration::from_millis(500)).await;
    h.banners.visible.store(false, Ordering::SeqCst);

    let outcome = core.deferred_onboarding().unwrap().await.unwrap();
    assert_eq!(outcome, DeferredOutcome::Started);
    assert_eq!(h.starts(), 1);
}

fn build_with_update_check(
    check_delay: Duration,
) -> (AppCore, Arc<Banners>, Arc<FakeOnboarding>) {
    let document = Arc::new(DocumentRoot::with_page("loras"));
    let component = |name: &'static str| Arc::new(UiComponent::new(name, document.clone()));
    let banners = Arc::new(Banners::new());
    let onboarding = Arc::new(FakeOnboarding::default());
    let updates = UpdateService::new(banners.clone(), Some("99.0.0".to_string()))
        .with_check_delay(check_delay);

    let collaborators = Collaborators {
        i18n: Arc::new(FakeGate {
            log: Arc::new(Mutex::new(Vec::new())),
            delay: Duration::from_millis(50),
            waits: AtomicUsize::new(0),
        }),
        document: document.clone(),
        settings: Arc::new(SettingsStore::default()),
        loading: component("loading"),
        modals: component("modal"),
        updates: Arc::new(updates),
        banners: banners.clone(),
        header: component("header"),
        theme: component("theme"),
        back_to_top: component("back-to-top"),
        bulk: component("bulk"),
        example_images: component("example-images"),
        help: component("help"),
        moves: component("move"),
        onboarding: onboarding.clone(),
        scroll: Arc::new(FakeScroll::default()),
    };
    (
        AppCore::new(collaborators, StartupConfig::default()),
        banners,
        onboarding,
    )
}

#[tokio::test(start_paused = true)]
async fn test_version_check_inside_delay_suppresses_onboarding() {
    let (core, banners, onboarding) = build_with_update_check(Duration::from_millis(300));
    core.initialize().await.unwrap();
    assert!(!banners.is_banner_visible(VERSION_MISMATCH_BANNER));

    let outcome = core.deferred_onboarding().unwrap().await.unwrap();
    assert_eq!(outcome, DeferredOutcome::SuppressedByBanner);
    assert!(banners.is_banner_visible(VERSION_MISMATCH_BANNER));
    assert_eq!(onboarding.starts.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_version_check_after_delay_does_not_suppress() {
    let (core, banners, onboarding) = build_with_update_check(Duration::from_millis(1500));
    core.initialize().await.unwrap();

    let outcome = core.deferred_onboarding().unwrap().await.unwrap();
    assert_eq!(outcome, DeferredOutcome::Started);
    assert_eq!(onboarding.starts.load(Ordering::SeqCst), 1);

    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert!(banners.is_banner_visible(VERSION_MISMATCH_BANNER));
}
