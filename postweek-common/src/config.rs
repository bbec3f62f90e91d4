//! Configuration loading
//!
//! TOML bootstrap configuration, resolved in priority order:
//! 1. Explicit `--config` path (highest priority; must exist)
//! 2. `$POSTWEEK_CONFIG` environment variable
//! 3. Platform config directory (`~/.config/postweek/config.toml`)
//! 4. Built-in defaults (no file at all)
//!
//! Individual settings given on the command line (port, bind) override
//! whatever the file says; that happens in the binary. The admin API
//! key is environment-only (`POSTWEEK_API_KEY`) and never appears in a
//! config file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Error, Result};

const API_KEY_ENV: &str = "POSTWEEK_API_KEY";
const CONFIG_ENV: &str = "POSTWEEK_CONFIG";

/// Which remote backend supplies publication dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Json,
    Feed,
    Archive,
}

/// Remote source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub url: String,
    /// Posts directory inside the extracted snapshot (archive kind only)
    #[serde(default)]
    pub posts_dir: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Bootstrap configuration loaded from TOML
///
/// These settings cannot change during runtime; restart to pick up
/// changes.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Address to bind the HTTP server to
    #[serde(default = "default_bind")]
    pub bind: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Calendar years to derive week states for, as 4-digit strings
    #[serde(default = "default_tracked_years")]
    pub tracked_years: Vec<String>,

    /// `Cache-Control: max-age` advertised on the data endpoint
    #[serde(default = "default_cache_max_age")]
    pub cache_max_age_secs: u64,

    /// Remote date source
    #[serde(default = "default_source")]
    pub source: SourceConfig,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Shared secret for the clear-cache endpoint; environment-only.
    /// `None` disables the endpoint entirely.
    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5780
}

fn default_tracked_years() -> Vec<String> {
    vec!["2022".to_string()]
}

fn default_cache_max_age() -> u64 {
    300
}

fn default_source() -> SourceConfig {
    SourceConfig {
        kind: SourceKind::Json,
        url: "https://example.com/api/post-dates.json".to_string(),
        posts_dir: None,
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            tracked_years: default_tracked_years(),
            cache_max_age_secs: default_cache_max_age(),
            source: default_source(),
            logging: LoggingConfig::default(),
            api_key: None,
        }
    }
}

impl Config {
    /// Load configuration following the resolution priority order
    ///
    /// An explicitly given path must exist; the environment and
    /// platform-default paths are only used when present on disk.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match resolve_config_path(explicit_path)? {
            Some(path) => {
                let content = std::fs::read_to_string(&path)?;
                toml::from_str(&content)
                    .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?
            }
            None => Self::default(),
        };

        config.api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
        config.validate()?;
        Ok(config)
    }

    /// Validate settings that TOML deserialization cannot check
    pub fn validate(&self) -> Result<()> {
        if self.tracked_years.is_empty() {
            return Err(Error::Config("tracked_years must not be empty".into()));
        }
        for year in &self.tracked_years {
            if year.len() != 4 || year.parse::<i32>().is_err() {
                return Err(Error::Config(format!(
                    "tracked year {:?} is not a 4-digit year",
                    year
                )));
            }
        }
        if self.source.url.is_empty() {
            return Err(Error::Config("source.url must not be empty".into()));
        }
        if self.source.kind == SourceKind::Archive
            && self.source.posts_dir.as_deref().unwrap_or("").is_empty()
        {
            return Err(Error::Config(
                "source.posts_dir is required for the archive source".into(),
            ));
        }
        Ok(())
    }
}

/// Pick the config file to read, if any
fn resolve_config_path(explicit_path: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit_path {
        if !path.exists() {
            return Err(Error::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        return Ok(Some(path.to_path_buf()));
    }

    if let Ok(path) = std::env::var(CONFIG_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Ok(Some(path));
        }
    }

    if let Some(path) = dirs::config_dir().map(|d| d.join("postweek").join("config.toml")) {
        if path.exists() {
            return Ok(Some(path));
        }
    }

    Ok(None)
}
