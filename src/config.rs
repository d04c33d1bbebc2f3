//! Configuration file parser for ~/.config/makedon-news/config.toml.
//!
//! The config file is optional: a missing or empty file yields
//! `Config::default()`. Unknown keys are ignored by serde but logged, since
//! they are usually typos.
use crate::filter::{
    ControllerSettings, RegionAliasTable, DEFAULT_PAGE_SIZE, DEFAULT_REGION,
    DEFAULT_SCROLL_THRESHOLD,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Topic controls, in display order. The last one is preselected.
pub const DEFAULT_TOPICS: &[&str] = &[
    "Новости",
    "Политика",
    "Економија",
    "Спорт",
    "Култура",
    "Наука",
    "Забава",
    "Најнови Вести",
];

/// Region controls, in display order.
pub const DEFAULT_REGIONS: &[&str] = &[
    "Македонија",
    "Балкан",
    "Европа",
    "Азија",
    "Индија",
    "Африка",
    "Америка",
    "Австралија",
    "Антарктик",
];

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),

    /// Parsed fine but a value is out of range.
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Payload location: an `http(s)://` URL or a local path.
    pub feed_url: String,

    /// Reload interval in minutes. 0 = reload only on demand.
    pub refresh_interval_minutes: u64,

    /// Timeout for a single payload request.
    pub request_timeout_secs: u64,

    /// Articles disclosed per page. Must be at least 1.
    pub page_size: usize,

    /// Distance from the bottom, in layout units, that loads the next page.
    pub scroll_threshold: u32,

    /// Delay before a filter change or page disclosure takes effect.
    pub transition_delay_ms: u64,

    /// Region selected when the article list is first shown.
    pub default_region: String,

    pub topics: Vec<String>,

    pub regions: Vec<String>,

    /// Extra or replacement region label → match string entries.
    pub region_aliases: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_url: "data/news.json".to_string(),
            refresh_interval_minutes: 5,
            request_timeout_secs: 30,
            page_size: DEFAULT_PAGE_SIZE,
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
            transition_delay_ms: 300,
            default_region: DEFAULT_REGION.to_string(),
            topics: DEFAULT_TOPICS.iter().map(|s| s.to_string()).collect(),
            regions: DEFAULT_REGIONS.iter().map(|s| s.to_string()).collect(),
            region_aliases: HashMap::new(),
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Longest reload interval (1 week).
    const MAX_REFRESH_MINUTES: u64 = 7 * 24 * 60;
    /// Longest request timeout (1 hour).
    const MAX_TIMEOUT_SECS: u64 = 3600;
    /// Longest filter transition delay (1 minute).
    const MAX_TRANSITION_DELAY_MS: u64 = 60_000;

    const KNOWN_KEYS: &'static [&'static str] = &[
        "feed_url",
        "refresh_interval_minutes",
        "request_timeout_secs",
        "page_size",
        "scroll_threshold",
        "transition_delay_ms",
        "default_region",
        "topics",
        "regions",
        "region_aliases",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - `page_size = 0` or an out-of-range duration → `Err(ConfigError::Invalid)`
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // Check size before reading so a huge file is never pulled into memory.
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        let config = Self::from_toml(&content)?;
        tracing::info!(
            path = %path.display(),
            feed_url = %config.feed_url,
            page_size = config.page_size,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be at least 1".into()));
        }
        if self.feed_url.trim().is_empty() {
            return Err(ConfigError::Invalid("feed_url must not be empty".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be at least 1".into(),
            ));
        }
        if self.request_timeout_secs > Self::MAX_TIMEOUT_SECS {
            return Err(ConfigError::Invalid(format!(
                "request_timeout_secs must be at most {}",
                Self::MAX_TIMEOUT_SECS
            )));
        }
        if self.refresh_interval_minutes > Self::MAX_REFRESH_MINUTES {
            return Err(ConfigError::Invalid(format!(
                "refresh_interval_minutes must be at most {}",
                Self::MAX_REFRESH_MINUTES
            )));
        }
        if self.transition_delay_ms > Self::MAX_TRANSITION_DELAY_MS {
            return Err(ConfigError::Invalid(format!(
                "transition_delay_ms must be at most {}",
                Self::MAX_TRANSITION_DELAY_MS
            )));
        }
        Ok(())
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            page_size: self.page_size,
            scroll_threshold: self.scroll_threshold,
            transition_delay: Duration::from_millis(self.transition_delay_ms),
            default_region: self.default_region.clone(),
        }
    }

    /// Built-in aliases with `[region_aliases]` applied on top.
    pub fn region_aliases(&self) -> RegionAliasTable {
        RegionAliasTable::with_overrides(&self.region_aliases)
    }

    /// Periodic reload interval, `None` when disabled.
    pub fn refresh_interval(&self) -> Option<Duration> {
        match self.refresh_interval_minutes {
            0 => None,
            mins => Some(Duration::from_secs(mins.saturating_mul(60))),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// ============================================================================
// Tests
// ============================================================================
