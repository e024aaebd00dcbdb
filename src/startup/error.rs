//! Startup errors.

use thiserror::Error;

use super::state::StartupStep;

#[derive(Debug, Error)]
pub enum StartupError {
    /// A manager failed; later steps were not run.
    #[error("Startup aborted at {step}: {source:#}")]
    ManagerInit {
        step: StartupStep,
        #[source]
        source: anyhow::Error,
    },

    /// An earlier `initialize()` call failed; startup is not retried.
    #[error("Startup already failed for this page load")]
    AlreadyFailed,
}
