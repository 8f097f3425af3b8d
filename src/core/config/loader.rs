//! Loading and saving pipeline configurations.
//!
//! Supports TOML and JSON, chosen by file extension or given explicitly.
//! Loaded configurations are validated before they are returned.

use std::fs;
use std::path::Path;

use crate::core::config::{ConfigValidatorExt, PipelineConfig};
use crate::core::errors::{NormalizeError, NormalizeResult};

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Determines the format from a file extension, case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "toml" => Some(ConfigFormat::Toml),
            "json" => Some(ConfigFormat::Json),
            _ => None,
        }
    }

    fn from_path(path: &Path) -> NormalizeResult<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| {
                NormalizeError::config_error(format!(
                    "unsupported config extension for {}, expected .toml or .json",
                    path.display()
                ))
            })
    }
}

/// Reads and writes [`PipelineConfig`] values.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads a configuration from a file, detecting the format from the
    /// extension.
    pub fn load_from_file(path: impl AsRef<Path>) -> NormalizeResult<PipelineConfig> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content = fs::read_to_string(path)?;
        Self::load_from_str(&content, format)
    }

    /// Parses a configuration from a string in the given format.
    pub fn load_from_str(content: &str, format: ConfigFormat) -> NormalizeResult<PipelineConfig> {
        match format {
            ConfigFormat::Toml => Self::load_from_toml(content),
            ConfigFormat::Json => Self::load_from_json(content),
        }
    }

    /// Parses a TOML configuration string.
    pub fn load_from_toml(content: &str) -> NormalizeResult<PipelineConfig> {
        let config: PipelineConfig = toml::from_str(content)
            .map_err(|e| NormalizeError::config_error(format!("failed to parse TOML: {e}")))?;
        config.validate_and_wrap()
    }

    /// Parses a JSON configuration string.
    pub fn load_from_json(content: &str) -> NormalizeResult<PipelineConfig> {
        let config: PipelineConfig = serde_json::from_str(content)
            .map_err(|e| NormalizeError::config_error(format!("failed to parse JSON: {e}")))?;
        config.validate_and_wrap()
    }

    /// Writes a configuration to a file, detecting the format from the
    /// extension.
    pub fn save_to_file(config: &PipelineConfig, path: impl AsRef<Path>) -> NormalizeResult<()> {
        let path = path.as_ref();
        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => toml::to_string_pretty(config).map_err(|e| {
                NormalizeError::config_error(format!("failed to serialize TOML: {e}"))
            })?,
            ConfigFormat::Json => serde_json::to_string_pretty(config).map_err(|e| {
                NormalizeError::config_error(format!("failed to serialize JSON: {e}"))
            })?,
        };
        fs::write(path, content)?;
        Ok(())
    }
}
