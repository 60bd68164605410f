use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::analysis::AnalysisDefaults;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Source table configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Planting table to ingest (`.csv`, `.txt` or `.json`).
    pub source_path: PathBuf,
    /// CSV field delimiter; the public planting dataset uses `;`.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

/// Persisted snapshot configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub db_path: PathBuf,
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: PathBuf,
}

/// Defaults for analysis requests
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default = "default_sizes_sample")]
    pub sizes_sample: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            sizes_sample: default_sizes_sample(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_delimiter() -> String {
    ";".to_string()
}

fn default_migrations_dir() -> PathBuf {
    PathBuf::from("migrations")
}

fn default_limit() -> usize {
    AnalysisDefaults::default().limit
}

fn default_sizes_sample() -> usize {
    AnalysisDefaults::default().sizes_sample
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in PLANTGRAPH_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        // .env is optional
        let _ = dotenv::dotenv();

        let config_path = std::env::var("PLANTGRAPH_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        Self::from_file(&config_path)
    }

    /// Read, parse and validate a config file
    pub fn from_file(config_path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    ///
    /// The source file is not checked here; readers of the stored snapshot
    /// work without it. `ingest` calls [`Config::validate_source`].
    fn validate(&self) -> Result<()> {
        self.delimiter_byte()?;

        if self.analysis.default_limit == 0 {
            anyhow::bail!("analysis.default_limit must be greater than 0");
        }

        if self.analysis.sizes_sample == 0 {
            anyhow::bail!("analysis.sizes_sample must be greater than 0");
        }

        Ok(())
    }

    /// Check that the source table exists and is a regular file
    pub fn validate_source(&self) -> Result<()> {
        if !self.data.source_path.exists() {
            anyhow::bail!(
                "source_path does not exist: {}. Set data.source_path in config.toml to the planting table.",
                self.data.source_path.display()
            );
        }

        if !self.data.source_path.is_file() {
            anyhow::bail!(
                "source_path must be a file, not a directory: {}",
                self.data.source_path.display()
            );
        }

        Ok(())
    }

    /// The CSV delimiter as the single byte the reader expects
    pub fn delimiter_byte(&self) -> Result<u8> {
        match self.data.delimiter.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => anyhow::bail!(
                "data.delimiter must be a single ASCII character, got {:?}",
                self.data.delimiter
            ),
        }
    }

    pub fn source_path(&self) -> &Path {
        &self.data.source_path
    }

    pub fn db_path(&self) -> &Path {
        &self.storage.db_path
    }

    pub fn migrations_dir(&self) -> &Path {
        &self.storage.migrations_dir
    }

    /// Initialize `env_logger`; `RUST_LOG` overrides `logging.log_level`.
    pub fn init_logging(&self) {
        let _ = env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(self.logging.log_level.as_str()),
        )
        .try_init();
    }

    pub fn analysis_defaults(&self) -> AnalysisDefaults {
        AnalysisDefaults {
            limit: self.analysis.default_limit,
            sizes_sample: self.analysis.sizes_sample,
        }
    }
}
