//! First-run onboarding tour.
//!
//! Completion is persisted in `onboarding.json` so the tour only runs once
//! per data directory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tracing::{debug, info, warn};

use super::Onboarding;

/// Onboarding state file name inside the data directory
pub const ONBOARDING_FILE: &str = "onboarding.json";

/// Tour steps, in display order
const TOUR_STEPS: &[&str] = &[
    "Browse your models from the listing pages",
    "Use bulk mode to act on several cards at once",
    "Open a card to see example images and metadata",
    "Find shortcuts and documentation under Help",
];

/// Persisted onboarding state
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingState {
    #[serde(default)]
    pub completed: bool,

    /// RFC 3339 timestamp of completion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

pub struct OnboardingManager {
    state_path: PathBuf,
    completed: AtomicBool,
    in_progress: AtomicBool,
    runs: AtomicUsize,
}

impl OnboardingManager {
    /// Create a manager backed by `onboarding.json` in `data_dir`
    pub fn load(data_dir: &Path) -> Result<Self> {
        let state_path = data_dir.join(ONBOARDING_FILE);
        let state = read_state(&state_path)?;
        Ok(Self {
            state_path,
            completed: AtomicBool::new(state.completed),
            in_progress: AtomicBool::new(false),
            runs: AtomicUsize::new(0),
        })
    }

    pub fn is_completed(&self) -> bool {
        self.completed.load(Ordering::SeqCst)
    }

    /// Number of times the tour actually ran
    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    fn persist_completion(&self) -> Result<()> {
        let path = &self.state_path;
        let state = OnboardingState {
            completed: true,
            completed_at: Some(chrono::Utc::now().to_rfc3339()),
        };
        let content = serde_json::to_string_pretty(&state)
            .context("Failed to serialize onboarding state")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write onboarding state: {:?}", path))?;
        debug!("Onboarding state saved to {:?}", path);
        Ok(())
    }
}

/// Read onboarding state; a missing file means the tour never ran.
pub fn read_state(path: &Path) -> Result<OnboardingState> {
    if !path.exists() {
        return Ok(OnboardingState::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read onboarding state: {:?}", path))?;
    serde_json::from_str(&content).with_context(|| "Failed to parse onboarding state JSON")
}

impl Onboarding for OnboardingManager {
    fn start(&self) {
        if self.is_completed() {
            debug!("Onboarding already completed, skipping");
            return;
        }
        if self.in_progress.swap(true, Ordering::SeqCst) {
            debug!("Onboarding already in progress");
            return;
        }

        self.runs.fetch_add(1, Ordering::SeqCst);
        info!("Starting onboarding tour");
        for (i, step) in TOUR_STEPS.iter().enumerate() {
            info!("  {}/{} {}", i + 1, TOUR_STEPS.len(), step);
        }

        self.completed.store(true, Ordering::SeqCst);
        self.in_progress.store(false, Ordering::SeqCst);
        if let Err(e) = self.persist_completion() {
            warn!("Failed to save onboarding state: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_start_runs_once_and_persists() {
        let tmp = tempdir().unwrap();
        let manager = OnboardingManager::load(tmp.path()).unwrap();
        assert!(!manager.is_completed());

        manager.start();
        manager.start();
        assert_eq!(manager.runs(), 1);
        assert!(manager.is_completed());

        let state = read_state(&tmp.path().join(ONBOARDING_FILE)).unwrap();
        assert!(state.completed);
        assert!(state.completed_at.is_some());
    }

    #[test]
    fn test_completed_state_is_respected() {
        let tmp = tempdir().unwrap();
        std::fs::write(tmp.path().join(ONBOARDING_FILE), r#"{"completed": true}"#).unwrap();

        let manager = OnboardingManager::load(tmp.path()).unwrap();
        assert!(manager.is_completed());
        manager.start();
        assert_eq!(manager.runs(), 0);
    }
}
