//! The startup orchestrator.
//!
//! Startup flow:
//! ```text
//! await i18n.wait_for_ready()        // only suspension point
//! loading -> modals -> updates -> banners -> header/theme/back-to-top
//!         -> bulk -> example images -> help   // synchronous, fail-fast
//! apply cardInfoDisplay to the document root
//! mark initialized
//! spawn: after onboarding_delay, start onboarding unless the
//!        version-mismatch banner is visible at that moment
//! ```

use std::sync::{Arc, Mutex, OnceLock};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::error::StartupError;
use super::state::{DeferredOutcome, InitState, StartupStep};
use crate::config::StartupConfig;
use crate::context::{AppContext, Collaborators, ManagerId};
use crate::document::uses_infinite_scroll;
use crate::managers::Manager;
use crate::settings::DisplayPreference;

/// Settles a claimed-but-unfinished startup when `initialize()` does not
/// run to completion. While suspended on the localization gate a dropped
/// future resets to `Uninitialized`; once activation has begun, a panic
/// leaves the orchestrator `Failed`.
struct ClaimGuard<'a> {
    state: &'a watch::Sender<InitState>,
    on_drop: Option<InitState>,
}

impl<'a> ClaimGuard<'a> {
    fn new(state: &'a watch::Sender<InitState>) -> Self {
        Self {
            state,
            on_drop: Some(InitState::Uninitialized),
        }
    }

    fn settle_as(&mut self, state: InitState) {
        self.on_drop = Some(state);
    }

    fn disarm(mut self) {
        self.on_drop = None;
    }
}

impl Drop for ClaimGuard<'_> {
    fn drop(&mut self) {
        if let Some(state) = self.on_drop.take() {
            warn!("AppCore: initialization interrupted, settling as {:?}", state);
            self.state.send_replace(state);
        }
    }
}

/// One-shot application bootstrap.
///
/// Construct once per page load and hand it through the bootstrap call graph.
///
/// # Example
/// ```ignore
/// let core = AppCore::new(collaborators, StartupConfig::default());
/// core.initialize().await?.initialize_page_features();
/// ```
pub struct AppCore {
    ctx: Arc<AppContext>,
    config: StartupConfig,
    state: watch::Sender<InitState>,
    initialized_at: OnceLock<Instant>,
    deferred: Mutex<Option<JoinHandle<DeferredOutcome>>>,
}

impl AppCore {
    pub fn new(managers: Collaborators, config: StartupConfig) -> Self {
        let (state, _) = watch::channel(InitState::Uninitialized);
        Self {
            ctx: Arc::new(AppContext::new(managers)),
            config,
            state,
            initialized_at: OnceLock::new(),
            deferred: Mutex::new(None),
        }
    }

    pub fn context(&self) -> &Arc<AppContext> {
        &self.ctx
    }

    pub fn state(&self) -> InitState {
        *self.state.borrow()
    }

    pub fn is_initialized(&self) -> bool {
        self.state() == InitState::Initialized
    }

    /// When the initialized state was reached
    pub fn initialized_at(&self) -> Option<Instant> {
        self.initialized_at.get().copied()
    }

    /// Take the handle of the pending onboarding check, if one was scheduled
    /// and not taken yet. Dropping the handle does not cancel the check.
    pub fn deferred_onboarding(&self) -> Option<JoinHandle<DeferredOutcome>> {
        self.deferred
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
    }

    /// Bring every manager up, once.
    ///
    /// Later calls return immediately once startup has settled. A call that
    /// arrives while another is still waiting on the localization gate waits
    /// for that one instead of starting a second activation.
    pub async fn initialize(&self) -> Result<&Self, StartupError> {
        loop {
            let mut observed = InitState::Uninitialized;
            self.state.send_if_modified(|state| {
                observed = *state;
                if *state == InitState::Uninitialized {
                    *state = InitState::Initializing;
                    true
                } else {
                    false
                }
            });

            match observed {
                InitState::Uninitialized => break,
                InitState::Initialized => return Ok(self),
                InitState::Failed => return Err(StartupError::AlreadyFailed),
                InitState::Initializing => {
                    debug!("AppCore: initialization in progress, waiting");
                    // The sender lives in `self`, so the channel stays open.
                    let mut rx = self.state.subscribe();
                    let _ = rx.wait_for(|s| *s != InitState::Initializing).await;
                }
            }
        }

        let mut guard = ClaimGuard::new(&self.state);

        info!("AppCore: Initializing...");
        self.ctx.managers.i18n.wait_for_ready().await;
        info!(
            "AppCore: Language set: {}",
            self.ctx.managers.i18n.current_locale()
        );

        // No await from here on: nothing else runs until startup settles.
        guard.settle_as(InitState::Failed);
        if let Err(e) = self.activate_managers() {
            error!("AppCore: {}", e);
            self.state.send_replace(InitState::Failed);
            guard.disarm();
            return Err(e);
        }

        self.apply_display_preference();

        let now = Instant::now();
        let _ = self.initialized_at.set(now);
        self.state.send_replace(InitState::Initialized);
        guard.disarm();
        info!("AppCore: Initialized");

        self.schedule_onboarding_check(now);

        Ok(self)
    }

    /// Enable page-specific features for the current page type.
    pub fn initialize_page_features(&self) -> &Self {
        if !self.is_initialized() {
            warn!("Page features enabled before startup completed");
        }
        let page_type = self.ctx.managers.document.page_type();
        if uses_infinite_scroll(&page_type) {
            self.ctx.managers.scroll.initialize(&page_type);
        } else {
            debug!("No page features for page type '{}'", page_type);
        }
        self
    }

    fn activate<M: Manager + ?Sized>(
        &self,
        step: StartupStep,
        manager: &M,
    ) -> Result<(), StartupError> {
        debug!("AppCore: [{}] {}", step, manager.name());
        manager
            .initialize()
            .map_err(|source| StartupError::ManagerInit { step, source })
    }

    fn activate_managers(&self) -> Result<(), StartupError> {
        let m = &self.ctx.managers;
        let registry = &self.ctx.registry;

        self.activate(StartupStep::LoadingIndicator, &*m.loading)?;

        self.activate(StartupStep::Modals, &*m.modals)?;
        registry.publish(ManagerId::Modal, m.modals.clone());

        self.activate(StartupStep::UpdateCheck, &*m.updates)?;
        self.activate(StartupStep::Banners, &*m.banners)?;

        // Ready at construction
        registry.publish(ManagerId::Settings, m.settings.clone());
        registry.publish(ManagerId::Move, m.moves.clone());

        self.activate(StartupStep::HeaderUi, &*m.header)?;
        registry.publish(ManagerId::Header, m.header.clone());
        self.activate(StartupStep::HeaderUi, &*m.theme)?;
        self.activate(StartupStep::HeaderUi, &*m.back_to_top)?;

        self.activate(StartupStep::BulkActions, &*m.bulk)?;
        registry.publish(ManagerId::Bulk, m.bulk.clone());

        self.activate(StartupStep::ExampleImages, &*m.example_images)?;
        registry.publish(ManagerId::ExampleImages, m.example_images.clone());

        self.activate(StartupStep::Help, &*m.help)?;
        registry.publish(ManagerId::Help, m.help.clone());

        Ok(())
    }

    fn apply_display_preference(&self) -> DisplayPreference {
        let settings = self.ctx.managers.settings.snapshot();
        let preference = settings.display_preference();
        self.ctx
            .managers
            .document
            .toggle_class(DisplayPreference::HOVER_CLASS, preference.hover_reveal());
        debug!("Card info display: {:?}", preference);
        preference
    }

    fn schedule_onboarding_check(&self, initialized_at: Instant) {
        let banners = self.ctx.managers.banners.clone();
        let onboarding = self.ctx.managers.onboarding.clone();
        let banner_id = self.config.version_banner_id.clone();
        let deadline = initialized_at + self.config.onboarding_delay;

        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            // Visibility is read now, not when the check was scheduled.
            if banners.is_banner_visible(&banner_id) {
                info!("Onboarding skipped: '{}' banner is visible", banner_id);
                DeferredOutcome::SuppressedByBanner
            } else {
                onboarding.start();
                DeferredOutcome::Started
            }
        });

        *self.deferred.lock().unwrap_or_else(|e| e.into_inner()) = Some(handle);
        debug!(
            "Onboarding check scheduled in {:?}",
            self.config.onboarding_delay
        );
    }
}
