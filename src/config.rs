//! Startup configuration.

use std::time::Duration;
use tracing::warn;

/// Environment variable overriding the onboarding delay (milliseconds)
pub const ONBOARDING_DELAY_ENV: &str = "APPCORE_ONBOARDING_DELAY_MS";

/// Delay between reaching the initialized state and the onboarding check
pub const DEFAULT_ONBOARDING_DELAY_MS: u64 = 1000;

/// Upper bound on a single catalog load
pub const DEFAULT_LOCALE_LOAD_TIMEOUT_SECS: u64 = 5;

/// Tunables for `AppCore`
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Delay before the deferred onboarding check fires
    pub onboarding_delay: Duration,
    /// Banner that suppresses onboarding while visible
    pub version_banner_id: String,
    /// Timeout applied to each catalog load by the localization gate
    pub locale_load_timeout: Duration,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            onboarding_delay: Duration::from_millis(DEFAULT_ONBOARDING_DELAY_MS),
            version_banner_id: crate::managers::VERSION_MISMATCH_BANNER.to_string(),
            locale_load_timeout: Duration::from_secs(DEFAULT_LOCALE_LOAD_TIMEOUT_SECS),
        }
    }
}

impl StartupConfig {
    /// Build a config, taking the onboarding delay from (in order) the
    /// explicit flag, `APPCORE_ONBOARDING_DELAY_MS`, or the default.
    pub fn resolve(onboarding_delay_ms: Option<u64>) -> Self {
        let delay_ms = onboarding_delay_ms
            .or_else(onboarding_delay_from_env)
            .unwrap_or(DEFAULT_ONBOARDING_DELAY_MS);
        Self {
            onboarding_delay: Duration::from_millis(delay_ms),
            ..Self::default()
        }
    }
}

/// Read the delay override; unparsable values are ignored.
pub fn onboarding_delay_from_env() -> Option<u64> {
    let raw = std::env::var(ONBOARDING_DELAY_ENV).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(ms) => Some(ms),
        Err(_) => {
            warn!("Ignoring invalid {}={:?}", ONBOARDING_DELAY_ENV, raw);
            None
        }
    }
}
