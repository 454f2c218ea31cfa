//! Configuration management for biopredict

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Default model asset name
pub const DEFAULT_MODEL_ASSET: &str = "MIDTERM_linear.tflite";

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub model: ModelConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

/// Model asset configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory containing the model asset
    pub assets_dir: String,
    /// File name of the model asset
    pub asset_name: String,
    /// Number of threads for ONNX inference, unused for TFLite assets
    pub onnx_threads: usize,
    /// Memory-map the asset instead of reading it into a buffer
    pub memory_map: bool,
}

impl ModelConfig {
    /// Full path of the configured asset
    pub fn asset_path(&self) -> PathBuf {
        Path::new(&self.assets_dir).join(&self.asset_name)
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            assets_dir: "assets".to_string(),
            asset_name: DEFAULT_MODEL_ASSET.to_string(),
            onnx_threads: 1,
            memory_map: true,
        }
    }
}

/// Result display configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Fixed decimals for the result; `None` uses the shortest rendering
    pub decimal_places: Option<usize>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            decimal_places: Some(3),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path, falling back to defaults
    /// when the file does not exist
    pub fn load() -> Result<Self> {
        Self::load_or_default(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from `path` if it exists, otherwise start from
    /// defaults. Environment overrides apply in both cases.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        Self::build(File::from(path).required(false))
            .with_context(|| format!("Failed to load configuration from {}", path.display()))
    }

    /// Load configuration from a specific path, which must exist
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        Self::build(File::from(path))
            .with_context(|| format!("Failed to load configuration from {}", path.display()))
    }

    fn build<S>(file: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("BIOPREDICT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
