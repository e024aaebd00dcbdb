//! Global settings snapshot.
//!
//! Settings are loaded once from `settings.json` in the data directory and
//! exposed read-only. Startup only needs two fields (`cardInfoDisplay` and
//! `theme`); everything else in the file is carried through untouched.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use tracing::debug;

use crate::managers::Manager;

/// Settings file name inside the data directory
pub const SETTINGS_FILE: &str = "settings.json";

/// Settings as persisted on disk
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSettings {
    /// How card info is displayed: "always" or "hover". Non-string values
    /// read as unset.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub card_info_display: Option<String>,

    /// Color theme: "light", "dark" or "auto"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    /// Fields this crate does not interpret
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(Some(s)),
        serde_json::Value::Null => Ok(None),
        other => {
            debug!("Ignoring non-string setting value: {}", other);
            Ok(None)
        }
    }
}

/// Card info display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayPreference {
    #[default]
    Always,
    Hover,
}

impl DisplayPreference {
    /// Document class set while the hover mode is active
    pub const HOVER_CLASS: &'static str = "hover-reveal";

    /// Map the raw setting. Only `"hover"` selects hover mode; missing and
    /// unrecognized values behave like `"always"`.
    pub fn from_setting(value: Option<&str>) -> Self {
        match value {
            Some("hover") => DisplayPreference::Hover,
            _ => DisplayPreference::Always,
        }
    }

    /// Value of the `hover-reveal` class flag
    pub fn hover_reveal(self) -> bool {
        self == DisplayPreference::Hover
    }
}

impl GlobalSettings {
    pub fn display_preference(&self) -> DisplayPreference {
        DisplayPreference::from_setting(self.card_info_display.as_deref())
    }
}

/// Read-only holder of the settings snapshot.
///
/// Ready as soon as it is constructed; it is a `Manager` only so it can be
/// published for cross-component lookup.
#[derive(Debug, Default)]
pub struct SettingsStore {
    settings: GlobalSettings,
}

impl SettingsStore {
    /// Wrap an in-memory snapshot
    pub fn new(settings: GlobalSettings) -> Self {
        Self { settings }
    }

    /// Load `settings.json` from `data_dir`. A missing file yields defaults.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(SETTINGS_FILE);
        let settings = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings file: {:?}", path))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse settings file: {:?}", path))?
        } else {
            debug!("No settings file at {:?}, using defaults", path);
            GlobalSettings::default()
        };

        Ok(Self { settings })
    }

    /// Copy of the current settings
    pub fn snapshot(&self) -> GlobalSettings {
        self.settings.clone()
    }
}

impl Manager for SettingsStore {
    fn name(&self) -> &'static str {
        "settings"
    }
}
