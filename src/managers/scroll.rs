//! Infinite scroll activation.

use std::collections::BTreeSet;
use std::sync::RwLock;
use tracing::{debug, info};

use super::InfiniteScroll;

/// Tracks which listing pages have infinite scrolling wired up.
/// Activating the same page type twice is a no-op.
#[derive(Debug, Default)]
pub struct ScrollActivator {
    active: RwLock<BTreeSet<String>>,
}

impl ScrollActivator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_pages(&self) -> Vec<String> {
        let active = self.active.read().unwrap_or_else(|e| e.into_inner());
        active.iter().cloned().collect()
    }
}

impl InfiniteScroll for ScrollActivator {
    fn initialize(&self, page_type: &str) {
        let mut active = self.active.write().unwrap_or_else(|e| e.into_inner());
        if !active.insert(page_type.to_string()) {
            debug!("Infinite scroll already active for {}", page_type);
            return;
        }
        info!("Infinite scroll enabled for {}", page_type);
    }
}
