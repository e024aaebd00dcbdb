//! Catalog-backed localization gate.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use super::locale::{resolve_locale, DEFAULT_LOCALE};
use super::LocalizationGate;

/// Where catalogs come from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch(&self, locale: &str) -> Result<Value>;
}

/// Reads `<dir>/<locale>.json`.
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

#[async_trait]
impl CatalogSource for DirSource {
    async fn fetch(&self, locale: &str) -> Result<Value> {
        let path = self.dir.join(format!("{}.json", locale));
        let content = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read catalog: {:?}", path))?;
        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse catalog: {:?}", path))?;
        if !value.is_object() {
            bail!("Catalog {:?} is not a JSON object", path);
        }
        Ok(value)
    }
}

/// A loaded catalog
#[derive(Debug, Clone)]
struct Catalog {
    locale: String,
    entries: Value,
}

/// Localization gate that loads one catalog on first wait.
///
/// Concurrent waiters share the single load. Every failure path ends in a
/// ready state: requested locale, then default locale, then an empty
/// catalog.
pub struct CatalogGate {
    requested: String,
    source: Arc<dyn CatalogSource>,
    load_timeout: Duration,
    catalog: OnceCell<Catalog>,
}

impl CatalogGate {
    pub fn new(requested: &str, source: Arc<dyn CatalogSource>, load_timeout: Duration) -> Self {
        Self {
            requested: requested.to_string(),
            source,
            load_timeout,
            catalog: OnceCell::new(),
        }
    }

    /// Gate backed by a locales directory
    pub fn from_dir(requested: &str, dir: PathBuf, load_timeout: Duration) -> Self {
        Self::new(requested, Arc::new(DirSource::new(dir)), load_timeout)
    }

    /// Look up a dotted key such as `header.title`. Returns the key itself
    /// when the gate is not ready or the key is missing.
    pub fn translate(&self, key: &str) -> String {
        let Some(catalog) = self.catalog.get() else {
            return key.to_string();
        };
        key.split('.')
            .try_fold(&catalog.entries, |node, part| node.get(part))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| key.to_string())
    }

    async fn fetch_with_timeout(&self, locale: &str) -> Result<Value> {
        match tokio::time::timeout(self.load_timeout, self.source.fetch(locale)).await {
            Ok(result) => result,
            Err(_) => bail!(
                "Timed out loading catalog for {} after {:?}",
                locale,
                self.load_timeout
            ),
        }
    }

    async fn load(&self) -> Catalog {
        let resolved = resolve_locale(&self.requested);
        debug!("Requested locale '{}' resolved to '{}'", self.requested, resolved);

        match self.fetch_with_timeout(resolved).await {
            Ok(entries) => {
                return Catalog {
                    locale: resolved.to_string(),
                    entries,
                }
            }
            Err(e) => warn!("Localization unavailable for {}: {:#}", resolved, e),
        }

        if resolved != DEFAULT_LOCALE {
            match self.fetch_with_timeout(DEFAULT_LOCALE).await {
                Ok(entries) => {
                    info!("Falling back to {} catalog", DEFAULT_LOCALE);
                    return Catalog {
                        locale: DEFAULT_LOCALE.to_string(),
                        entries,
                    };
                }
                Err(e) => warn!("Default catalog unavailable: {:#}", e),
            }
        }

        warn!("No catalog loaded; text keys will be shown untranslated");
        Catalog {
            locale: DEFAULT_LOCALE.to_string(),
            entries: Value::Object(Default::default()),
        }
    }
}

#[async_trait]
impl LocalizationGate for CatalogGate {
    async fn wait_for_ready(&self) {
        self.catalog.get_or_init(|| self.load()).await;
    }

    fn current_locale(&self) -> String {
        self.catalog
            .get()
            .map(|c| c.locale.clone())
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string())
    }
}
