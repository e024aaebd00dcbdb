//! Localization readiness gate.
//!
//! Nothing that renders text may start before the gate is ready. Readiness
//! always resolves: when the requested catalog cannot be loaded, the gate
//! falls back to the default locale instead of leaving startup suspended.

mod catalog;
mod locale;

pub use catalog::CatalogGate;

use async_trait::async_trait;

#[async_trait]
pub trait LocalizationGate: Send + Sync {
    /// Suspend until a catalog (possibly the fallback) is loaded.
    async fn wait_for_ready(&self);

    /// Resolved locale identifier. Before readiness this is the default locale.
    fn current_locale(&self) -> String;
}
