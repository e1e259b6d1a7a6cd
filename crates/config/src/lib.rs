#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for the SCORM service
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/scorm/config.toml)
//! - Environment variables
//! - CLI flags

use scorm_errors::{ConfigError, Error};
use scorm_types::{ColorChoice, OutputFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub ingest: IngestConfig,

    #[serde(default)]
    pub proxy: ProxyConfig,

    #[serde(default)]
    pub paths: PathConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    #[serde(default = "default_color_choice")]
    pub color: ColorChoice,
}

/// Content store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Filesystem root of the local content store
    #[serde(default = "default_storage_root")]
    pub root: PathBuf,
    /// Namespace that extracted assets are stored under
    #[serde(default = "default_location")]
    pub location: String,
}

/// Package ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Entries written to the store in parallel (0 or 1 = sequential)
    #[serde(default = "default_extract_concurrency")]
    pub extract_concurrency: usize,
    /// Reject archives larger than this many bytes
    #[serde(default)]
    pub max_archive_bytes: Option<u64>,
    /// Reject archives whose entries decompress to more than this many bytes
    #[serde(default = "default_max_extracted_bytes")]
    pub max_extracted_bytes: u64,
}

/// Content proxy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Prefix prepended to `v0/...` and `v1/...` live URLs
    #[serde(default = "default_route_prefix")]
    pub route_prefix: String,
}

/// Path configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathConfig {
    pub db_path: Option<PathBuf>,
}

// Default implementations

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: OutputFormat::Tty,
            color: ColorChoice::Auto,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
            location: default_location(),
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            extract_concurrency: default_extract_concurrency(),
            max_archive_bytes: None,
            max_extracted_bytes: default_max_extracted_bytes(),
        }
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            route_prefix: default_route_prefix(),
        }
    }
}

// Default value functions for serde
fn default_output_format() -> OutputFormat {
    OutputFormat::Tty
}

fn default_color_choice() -> ColorChoice {
    ColorChoice::Auto
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("./scorm-data/storage")
}

fn default_location() -> String {
    "scorm".to_string()
}

fn default_extract_concurrency() -> usize {
    4
}

fn default_max_extracted_bytes() -> u64 {
    1 << 30
}

fn default_route_prefix() -> String {
    "/scorm-proxy".to_string()
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("scorm").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        let config: Self = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // SCORM_OUTPUT
        if let Ok(output) = std::env::var("SCORM_OUTPUT") {
            self.general.default_output = match output.as_str() {
                "plain" => OutputFormat::Plain,
                "tty" => OutputFormat::Tty,
                "json" => OutputFormat::Json,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "SCORM_OUTPUT".to_string(),
                        value: output,
                    }
                    .into())
                }
            };
        }

        // SCORM_COLOR
        if let Ok(color) = std::env::var("SCORM_COLOR") {
            self.general.color = match color.as_str() {
                "always" => ColorChoice::Always,
                "auto" => ColorChoice::Auto,
                "never" => ColorChoice::Never,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "SCORM_COLOR".to_string(),
                        value: color,
                    }
                    .into())
                }
            };
        }

        if let Ok(root) = std::env::var("SCORM_STORAGE_ROOT") {
            self.storage.root = PathBuf::from(root);
        }

        // SCORM_LOCATION
        if let Ok(location) = std::env::var("SCORM_LOCATION") {
            let trimmed = location.trim_matches('/');
            if trimmed.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "SCORM_LOCATION".to_string(),
                    value: location,
                }
                .into());
            }
            self.storage.location = trimmed.to_string();
        }

        // SCORM_EXTRACT_CONCURRENCY
        if let Ok(jobs) = std::env::var("SCORM_EXTRACT_CONCURRENCY") {
            self.ingest.extract_concurrency =
                jobs.parse().map_err(|_| ConfigError::InvalidValue {
                    field: "SCORM_EXTRACT_CONCURRENCY".to_string(),
                    value: jobs,
                })?;
        }

        if let Ok(db_path) = std::env::var("SCORM_DB_PATH") {
            self.paths.db_path = Some(PathBuf::from(db_path));
        }

        Ok(())
    }

    /// Number of entries extracted in parallel, never below one
    #[must_use]
    pub fn extract_concurrency(&self) -> usize {
        self.ingest.extract_concurrency.max(1)
    }

    /// Get the database path (with default)
    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.paths
            .db_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("./scorm-data/state.sqlite"))
    }
}
