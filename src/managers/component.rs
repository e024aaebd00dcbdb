//! Generic UI component manager.

use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

use super::Manager;
use crate::document::DocumentRoot;

/// A named UI component that marks itself ready on the document root.
///
/// Used for the managers whose internals live outside this crate (loading
/// indicator, modals, header, bulk actions, example images, help, move,
/// back-to-top).
pub struct UiComponent {
    name: &'static str,
    document: Arc<DocumentRoot>,
    initialized: AtomicBool,
}

impl UiComponent {
    pub fn new(name: &'static str, document: Arc<DocumentRoot>) -> Self {
        Self {
            name,
            document,
            initialized: AtomicBool::new(false),
        }
    }

    /// Class this component sets once ready
    pub fn ready_class(&self) -> String {
        format!("{}-ready", self.name)
    }
}

impl Manager for UiComponent {
    fn name(&self) -> &'static str {
        self.name
    }

    fn initialize(&self) -> Result<()> {
        if self.initialized.swap(true, Ordering::SeqCst) {
            debug!("{} already initialized", self.name);
            return Ok(());
        }
        self.document.toggle_class(&self.ready_class(), true);
        debug!("{} initialized", self.name);
        Ok(())
    }
}
