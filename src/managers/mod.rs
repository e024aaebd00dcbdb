//! Feature managers started by the orchestrator.
//!
//! Each manager is an independent component with its own `initialize` hook.
//! The orchestrator only relies on the traits below; the concrete types in
//! the submodules are headless stand-ins used by the `boot` command.

mod banner;
mod component;
mod onboarding;
mod scroll;
mod theme;
mod update;

pub use banner::Banners;
pub use component::UiComponent;
pub use onboarding::{read_state as onboarding_state, OnboardingManager, ONBOARDING_FILE};
pub use scroll::ScrollActivator;
pub use theme::ThemeManager;
pub use update::UpdateService;

use anyhow::Result;

/// Banner shown when the loaded frontend does not match the running server
pub const VERSION_MISMATCH_BANNER: &str = "version-mismatch";

/// A component with a one-shot startup hook.
///
/// The orchestrator calls `initialize` at most once per bootstrap; repeated
/// calls from elsewhere must be harmless. Managers that are ready at
/// construction keep the default no-op.
pub trait Manager: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    fn initialize(&self) -> Result<()> {
        Ok(())
    }
}

/// Transient notices with a queryable visibility state.
pub trait BannerService: Manager {
    /// Live visibility check; never cached by callers.
    fn is_banner_visible(&self, banner_id: &str) -> bool;
}

/// First-run tour.
pub trait Onboarding: Send + Sync {
    /// Start the tour. Must be safe to call when the tour is already
    /// completed or running.
    fn start(&self);
}

/// Infinite scrolling for listing pages.
pub trait InfiniteScroll: Send + Sync {
    fn initialize(&self, page_type: &str);
}
