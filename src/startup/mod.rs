//! Application startup orchestration.
//!
//! `AppCore` brings the page's managers up in a fixed order, exactly once:
//! - wait for the localization gate
//! - activate managers synchronously, failing fast on the first error
//! - apply the card display preference
//! - schedule the deferred onboarding check
//!
//! Page features (infinite scroll) are enabled separately through
//! `AppCore::initialize_page_features` once startup has completed.

mod error;
mod orchestrator;
mod state;
#[cfg(test)]
mod tests;

pub use error::StartupError;
pub use orchestrator::AppCore;
pub use state::{DeferredOutcome, InitState, StartupStep};
