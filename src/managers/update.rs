//! Version check service.
//!
//! Compares the running client version with the version reported by the
//! server and raises the `version-mismatch` banner when they differ. The
//! check resolves asynchronously, so the banner can appear after the rest of
//! startup has finished.

use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, info};

use super::{Banners, Manager, VERSION_MISMATCH_BANNER};

/// Running client version (from Cargo.toml)
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct UpdateService {
    banners: Arc<Banners>,
    current_version: String,
    remote_version: Option<String>,
    check_delay: Duration,
    initialized: AtomicBool,
}

impl UpdateService {
    pub fn new(banners: Arc<Banners>, remote_version: Option<String>) -> Self {
        Self {
            banners,
            current_version: CLIENT_VERSION.to_string(),
            remote_version,
            check_delay: Duration::ZERO,
            initialized: AtomicBool::new(false),
        }
    }

    /// Delay before the remote version is compared, simulating the request
    pub fn with_check_delay(mut self, delay: Duration) -> Self {
        self.check_delay = delay;
        self
    }
}

/// Whether two version strings differ, ignoring a leading `v` and whitespace.
pub fn versions_differ(current: &str, remote: &str) -> bool {
    let normalize = |v: &str| v.trim().trim_start_matches('v').to_string();
    normalize(current) != normalize(remote)
}

fn check_versions(banners: &Banners, current: &str, remote: &str) {
    if versions_differ(current, remote) {
        info!(
            "Version mismatch: client {} vs server {}",
            current, remote
        );
        banners.show(
            VERSION_MISMATCH_BANNER,
            &format!(
                "Application updated to {} (loaded {}). Reload the page to use the new version.",
                remote, current
            ),
        );
    } else {
        debug!("Client version {} is current", current);
    }
}

impl Manager for UpdateService {
    fn name(&self) -> &'static str {
        "update-service"
    }

    fn initialize(&self) -> Result<()> {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let Some(remote) = self.remote_version.clone() else {
            debug!("No server version reported, skipping update check");
            return Ok(());
        };

        match Handle::try_current() {
            Ok(handle) => {
                let banners = self.banners.clone();
                let current = self.current_version.clone();
                let delay = self.check_delay;
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    check_versions(&banners, &current, &remote);
                });
            }
            Err(_) => check_versions(&self.banners, &self.current_version, &remote),
        }

        Ok(())
    }
}
