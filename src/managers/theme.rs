//! Theme application.

use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, warn};

use super::Manager;
use crate::document::DocumentRoot;
use crate::settings::SettingsStore;

/// Dataset key holding the resolved theme
pub const THEME_DATA_KEY: &str = "theme";

/// Applies the configured color theme to the document root.
pub struct ThemeManager {
    settings: Arc<SettingsStore>,
    document: Arc<DocumentRoot>,
}

impl ThemeManager {
    pub fn new(settings: Arc<SettingsStore>, document: Arc<DocumentRoot>) -> Self {
        Self { settings, document }
    }
}

/// Resolve a theme setting to a concrete theme. Headless, so "auto" has no
/// system preference to follow and resolves to light.
pub fn resolve_theme(setting: Option<&str>) -> &'static str {
    match setting {
        Some("dark") => "dark",
        Some("light") | Some("auto") | None => "light",
        Some(other) => {
            warn!("Unknown theme '{}', using light", other);
            "light"
        }
    }
}

impl Manager for ThemeManager {
    fn name(&self) -> &'static str {
        "theme"
    }

    fn initialize(&self) -> Result<()> {
        let settings = self.settings.snapshot();
        let theme = resolve_theme(settings.theme.as_deref());
        self.document.set_data(THEME_DATA_KEY, theme);
        debug!("Theme set to {}", theme);
        Ok(())
    }
}
