//! Headless document root.
//!
//! Stands in for the page's root element: a string dataset (where the page
//! template publishes its `page` classifier) and a set of classes that
//! startup steps toggle. Several managers write here during startup, in a
//! fixed order, so last-writer-wins is fine.

use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

use tracing::debug;

/// Dataset key carrying the page classifier
pub const PAGE_DATA_KEY: &str = "page";

/// Classifier returned when the page attribute is absent
pub const UNKNOWN_PAGE: &str = "unknown";

/// Page types that get infinite scrolling
pub const SCROLL_PAGES: &[&str] = &["loras", "recipes", "checkpoints", "embeddings"];

/// Root element state shared by every startup step.
#[derive(Debug, Default)]
pub struct DocumentRoot {
    dataset: RwLock<HashMap<String, String>>,
    classes: RwLock<BTreeSet<String>>,
}

impl DocumentRoot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a root already tagged with a page classifier.
    pub fn with_page(page: &str) -> Self {
        let root = Self::new();
        root.set_data(PAGE_DATA_KEY, page);
        root
    }

    pub fn set_data(&self, key: &str, value: &str) {
        let mut dataset = self.dataset.write().unwrap_or_else(|e| e.into_inner());
        dataset.insert(key.to_string(), value.to_string());
    }

    pub fn data(&self, key: &str) -> Option<String> {
        let dataset = self.dataset.read().unwrap_or_else(|e| e.into_inner());
        dataset.get(key).cloned()
    }

    /// Current page classifier, re-read on every call.
    ///
    /// An absent or empty attribute reads as `"unknown"`.
    pub fn page_type(&self) -> String {
        match self.data(PAGE_DATA_KEY) {
            Some(page) if !page.is_empty() => page,
            _ => UNKNOWN_PAGE.to_string(),
        }
    }

    /// Add or remove a class depending on `on`.
    pub fn toggle_class(&self, class: &str, on: bool) {
        let mut classes = self.classes.write().unwrap_or_else(|e| e.into_inner());
        if on {
            classes.insert(class.to_string());
        } else {
            classes.remove(class);
        }
        debug!("Document class '{}' -> {}", class, on);
    }

    pub fn has_class(&self, class: &str) -> bool {
        let classes = self.classes.read().unwrap_or_else(|e| e.into_inner());
        classes.contains(class)
    }

    pub fn classes(&self) -> Vec<String> {
        let classes = self.classes.read().unwrap_or_else(|e| e.into_inner());
        classes.iter().cloned().collect()
    }
}

/// Whether a page classifier gets infinite scrolling.
pub fn uses_infinite_scroll(page_type: &str) -> bool {
    SCROLL_PAGES.contains(&page_type)
}
