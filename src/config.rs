use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

const DEFAULT_PRODUCT_URL: &str = "https://world.openfoodfacts.org";
const DEFAULT_ADVERSE_EVENT_URL: &str = "https://api.fda.gov";
const DEFAULT_CACHE_CAPACITY: usize = 512;
const DEFAULT_MAX_CONCURRENCY: usize = 8;
const MAX_CONCURRENCY_LIMIT: usize = 32;

/// Root configuration structure, deserialized from `.food-checkr/config.toml`.
///
/// Every section and field is optional; omitted values take the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sources: SourcesConfig,
    pub adverse_events: AdverseEventsConfig,
    pub knowledge_base: KnowledgeBaseConfig,
    pub logging: LoggingConfig,
}

/// Endpoints and timeouts of the two external data sources.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Base URL of the Open Food Facts compatible product API.
    pub product_url: String,
    /// Base URL of the openFDA compatible adverse-event API.
    pub adverse_event_url: String,
    /// Product lookup timeout, clamped to 1–30 seconds.
    pub product_timeout_secs: u64,
    /// Per-ingredient adverse-event lookup timeout, clamped to 1–9 seconds.
    pub adverse_event_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        SourcesConfig {
            product_url: DEFAULT_PRODUCT_URL.to_string(),
            adverse_event_url: DEFAULT_ADVERSE_EVENT_URL.to_string(),
            product_timeout_secs: 8,
            adverse_event_timeout_secs: 3,
            user_agent: format!("food-checkr/{} (food label analysis)", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl SourcesConfig {
    pub fn product_timeout(&self) -> Duration {
        Duration::from_secs(self.product_timeout_secs.clamp(1, 30))
    }

    pub fn adverse_event_timeout(&self) -> Duration {
        Duration::from_secs(self.adverse_event_timeout_secs.clamp(1, 9))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdverseEventsConfig {
    /// Query the adverse-event source for ingredients the knowledge base does not flag.
    pub enabled: bool,
    /// Maximum number of cached ingredient lookups.
    pub cache_capacity: usize,
    /// Maximum number of lookups in flight for one analysis.
    pub max_concurrency: usize,
}

impl Default for AdverseEventsConfig {
    fn default() -> Self {
        AdverseEventsConfig {
            enabled: true,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

impl AdverseEventsConfig {
    pub fn cache_capacity(&self) -> usize {
        if self.cache_capacity == 0 {
            DEFAULT_CACHE_CAPACITY
        } else {
            self.cache_capacity
        }
    }

    pub fn max_concurrency(&self) -> usize {
        match self.max_concurrency {
            0 => DEFAULT_MAX_CONCURRENCY,
            n => n.min(MAX_CONCURRENCY_LIMIT),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KnowledgeBaseConfig {
    /// Replaces the table built into the binary.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "warn".to_string(),
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override`: path passed via `--config`
/// 2. `<working_dir>/.food-checkr/config.toml`
/// 3. `~/.config/food-checkr/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(working_dir: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let local_config = working_dir.join(".food-checkr").join("config.toml");
    if local_config.exists() {
        return read_config(&local_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("food-checkr").join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
}
