use crate::application::QueryOptions;
use crate::constants::{
    CACHE_GC_TIME_SECS, DEFAULT_BASE_URL, DEFAULT_PAGE_LIMIT, INFINITE_STALE_TIME_SECS,
    LIST_STALE_TIME_SECS,
};
use crate::domain::{SortField, SortOrder};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// TOML configuration for the notes client
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub defaults: ListDefaults,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CacheConfig {
    #[serde(default = "default_stale_time_secs")]
    pub stale_time_secs: u64,
    #[serde(default = "default_infinite_stale_time_secs")]
    pub infinite_stale_time_secs: u64,
    #[serde(default = "default_gc_time_secs")]
    pub gc_time_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ListDefaults {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub sort_by: SortField,
    #[serde(default)]
    pub order: SortOrder,
}

// Default value functions
fn default_base_url() -> String { DEFAULT_BASE_URL.to_string() }
fn default_stale_time_secs() -> u64 { LIST_STALE_TIME_SECS }
fn default_infinite_stale_time_secs() -> u64 { INFINITE_STALE_TIME_SECS }
fn default_gc_time_secs() -> u64 { CACHE_GC_TIME_SECS }
fn default_limit() -> u32 { DEFAULT_PAGE_LIMIT }

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_time_secs: default_stale_time_secs(),
            infinite_stale_time_secs: default_infinite_stale_time_secs(),
            gc_time_secs: default_gc_time_secs(),
        }
    }
}

impl Default for ListDefaults {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            sort_by: SortField::default(),
            order: SortOrder::default(),
        }
    }
}

impl CacheConfig {
    pub fn list_options(&self) -> QueryOptions {
        QueryOptions::new(
            Duration::from_secs(self.stale_time_secs),
            Duration::from_secs(self.gc_time_secs),
        )
    }

    pub fn infinite_options(&self) -> QueryOptions {
        QueryOptions::new(
            Duration::from_secs(self.infinite_stale_time_secs),
            Duration::from_secs(self.gc_time_secs),
        )
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .context("Failed to parse TOML config")?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .context("Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), toml_string)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Create default configuration file at path
    pub fn create_default(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }

    /// `<config_dir>/notekeep/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("notekeep").join("config.toml"))
    }

    /// An explicit path must exist; the default path is optional
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            debug!(?path, "Loading config from provided path");
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => {
                debug!(?path, "Loading config from default location");
                Self::load(path)
            }
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }
}
