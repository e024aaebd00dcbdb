//! In-memory banner service.

use anyhow::Result;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use tracing::{debug, info};

use super::{BannerService, Manager};

/// A single banner entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub id: String,
    pub message: String,
    pub visible: bool,
}

/// Banner registry. Visibility is mutable at any time, including while the
/// deferred onboarding check is pending.
#[derive(Debug, Default)]
pub struct Banners {
    banners: RwLock<BTreeMap<String, Banner>>,
    initialized: AtomicBool,
}

impl Banners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a banner, registering it if needed.
    pub fn show(&self, id: &str, message: &str) {
        let mut banners = self.banners.write().unwrap_or_else(|e| e.into_inner());
        let banner = banners.entry(id.to_string()).or_insert_with(|| Banner {
            id: id.to_string(),
            message: String::new(),
            visible: false,
        });
        banner.message = message.to_string();
        banner.visible = true;
        info!("Banner shown: {} - {}", id, message);
    }

    /// Banners currently shown, ordered by id
    pub fn visible(&self) -> Vec<Banner> {
        let banners = self.banners.read().unwrap_or_else(|e| e.into_inner());
        banners.values().filter(|b| b.visible).cloned().collect()
    }
}

impl Manager for Banners {
    fn name(&self) -> &'static str {
        "banners"
    }

    fn initialize(&self) -> Result<()> {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        debug!("Banner service ready, {} visible", self.visible().len());
        Ok(())
    }
}

impl BannerService for Banners {
    fn is_banner_visible(&self, banner_id: &str) -> bool {
        let banners = self.banners.read().unwrap_or_else(|e| e.into_inner());
        banners
            .get(banner_id)
            .map(|b| b.visible)
            .unwrap_or(false)
    }
}
