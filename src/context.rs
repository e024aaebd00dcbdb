//! Application context shared by the orchestrator and its managers.
//!
//! Replaces page-global manager lookups with one explicitly owned object:
//! the orchestrator builds it once from the collaborators handed to it and
//! passes it by reference to anything that needs cross-manager lookup. The
//! registry is written during startup and read any time after.
//!
//! ## Usage
//!
//! ```ignore
//! let core = AppCore::new(collaborators, config);
//! core.initialize().await?;
//!
//! // Anywhere else holding the context:
//! if let Some(bulk) = core.context().registry.get(ManagerId::Bulk) {
//!     debug!("bulk manager: {}", bulk.name());
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use crate::document::DocumentRoot;
use crate::i18n::LocalizationGate;
use crate::managers::{BannerService, InfiniteScroll, Manager, Onboarding};
use crate::settings::SettingsStore;

/// Managers available for cross-component lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ManagerId {
    Modal,
    Settings,
    Move,
    Header,
    Bulk,
    ExampleImages,
    Help,
}

impl fmt::Display for ManagerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ManagerId::Modal => "modal",
            ManagerId::Settings => "settings",
            ManagerId::Move => "move",
            ManagerId::Header => "header",
            ManagerId::Bulk => "bulk",
            ManagerId::ExampleImages => "example-images",
            ManagerId::Help => "help",
        };
        write!(f, "{}", name)
    }
}

/// Lookup table of ready managers.
#[derive(Default)]
pub struct ManagerRegistry {
    entries: RwLock<BTreeMap<ManagerId, Arc<dyn Manager>>>,
}

impl ManagerRegistry {
    /// Publish a manager. Callers publish only after the manager is ready.
    pub fn publish(&self, id: ManagerId, manager: Arc<dyn Manager>) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        if entries.insert(id, manager).is_some() {
            warn!("Manager '{}' published twice, keeping the latest", id);
        } else {
            debug!("Published manager '{}'", id);
        }
    }

    pub fn get(&self, id: ManagerId) -> Option<Arc<dyn Manager>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(&id).cloned()
    }

    pub fn contains(&self, id: ManagerId) -> bool {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.contains_key(&id)
    }

    /// Published ids in declaration order
    pub fn published(&self) -> Vec<ManagerId> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.keys().copied().collect()
    }
}

/// Everything the orchestrator starts or consults.
///
/// `settings` and `moves` must already be ready when handed over; they are
/// published for lookup but never initialized by the orchestrator.
pub struct Collaborators {
    pub i18n: Arc<dyn LocalizationGate>,
    pub document: Arc<DocumentRoot>,
    pub settings: Arc<SettingsStore>,
    pub loading: Arc<dyn Manager>,
    pub modals: Arc<dyn Manager>,
    pub updates: Arc<dyn Manager>,
    pub banners: Arc<dyn BannerService>,
    pub header: Arc<dyn Manager>,
    pub theme: Arc<dyn Manager>,
    pub back_to_top: Arc<dyn Manager>,
    pub bulk: Arc<dyn Manager>,
    pub example_images: Arc<dyn Manager>,
    pub help: Arc<dyn Manager>,
    pub moves: Arc<dyn Manager>,
    pub onboarding: Arc<dyn Onboarding>,
    pub scroll: Arc<dyn InfiniteScroll>,
}

/// Page-lifetime application state.
pub struct AppContext {
    pub managers: Collaborators,
    pub registry: ManagerRegistry,
}

impl AppContext {
    pub fn new(managers: Collaborators) -> Self {
        Self {
            managers,
            registry: ManagerRegistry::default(),
        }
    }
}
