//! Startup state and step identifiers.

use std::fmt;

/// Orchestrator lifecycle.
///
/// `Uninitialized -> Initializing -> Initialized` on success. A failure in
/// the activation block ends in `Failed`. Neither terminal state is left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitState {
    #[default]
    Uninitialized,
    Initializing,
    Initialized,
    Failed,
}

/// Activation groups, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StartupStep {
    LoadingIndicator,
    Modals,
    UpdateCheck,
    Banners,
    HeaderUi,
    BulkActions,
    ExampleImages,
    Help,
}

impl StartupStep {
    pub fn label(&self) -> &'static str {
        match self {
            StartupStep::LoadingIndicator => "loading indicator",
            StartupStep::Modals => "modal system",
            StartupStep::UpdateCheck => "update check",
            StartupStep::Banners => "banner service",
            StartupStep::HeaderUi => "header UI",
            StartupStep::BulkActions => "bulk actions",
            StartupStep::ExampleImages => "example images",
            StartupStep::Help => "help",
        }
    }
}

impl fmt::Display for StartupStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Result of the deferred onboarding check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredOutcome {
    /// Onboarding `start()` was called
    Started,
    /// The version banner was visible when the check fired
    SuppressedByBanner,
}
