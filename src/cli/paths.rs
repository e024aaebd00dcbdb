use anyhow::{Context, Result};
use std::path::PathBuf;

/// Default data directory name under the home directory
const DATA_DIR_NAME: &str = ".appcore";

/// Resolve the data directory, creating it if needed.
pub fn resolve_data_dir(data_dir: Option<String>) -> Result<PathBuf> {
    let dir = match data_dir {
        Some(dir) => PathBuf::from(dir),
        None => dirs::home_dir()
            .context("Could not determine home directory")?
            .join(DATA_DIR_NAME),
    };

    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create data directory: {:?}", dir))?;

    Ok(dir)
}

/// Directory holding `<locale>.json` catalogs
pub fn locales_dir(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join("locales")
}
