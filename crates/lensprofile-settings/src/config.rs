//! Configuration management for LensProfile
//!
//! Generator sampling and JFL protocol boilerplate, stored as JSON or TOML
//! in the platform configuration directory.
//!
//! Configuration is organized into two sections:
//! - Sampling (radial step, outer radius override)
//! - Format (header block, footer token, three-coordinate marker)

use std::path::{Path, PathBuf};

use lensprofile_camtools::SamplingParameters;
use lensprofile_core::{ProtocolFormat, MARKER_PREFIX};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{SettingsError, SettingsResult};

/// Application directory name under the platform config directory
pub const APP_DIR: &str = "lensprofile";

/// Default configuration file name
pub const CONFIG_FILE: &str = "config.toml";

/// On-disk format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    /// Format for `path`, by its `.json` or `.toml` extension
    pub fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            other => Err(SettingsError::UnsupportedFormat(format!(
                "'{}' must be .json or .toml (got {})",
                path.display(),
                other.unwrap_or("no extension")
            ))),
        }
    }

    /// Deserialize `content`
    pub fn decode<T: DeserializeOwned>(&self, content: &str) -> SettingsResult<T> {
        Ok(match self {
            Self::Json => serde_json::from_str(content)?,
            Self::Toml => toml::from_str(content)?,
        })
    }

    /// Serialize `value` in human-readable form
    pub fn encode<T: Serialize>(&self, value: &T) -> SettingsResult<String> {
        Ok(match self {
            Self::Json => serde_json::to_string_pretty(value)?,
            Self::Toml => toml::to_string_pretty(value)?,
        })
    }
}

/// Read and deserialize a JSON or TOML file
pub(crate) fn read_file<T: DeserializeOwned>(path: &Path) -> SettingsResult<T> {
    let format = FileFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)?;
    format.decode(&content)
}

/// Serialize and write a JSON or TOML file
pub(crate) fn write_file<T: Serialize>(path: &Path, value: &T) -> SettingsResult<()> {
    let format = FileFormat::from_path(path)?;
    let content = format.encode(value)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Radius grid used for every surface
    pub sampling: SamplingParameters,
    /// JFL boilerplate
    pub format: ProtocolFormat,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config dir>/lensprofile/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory(
                    "no configuration directory on this platform".to_string(),
                )
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let config: Self = read_file(path)?;
        config.validate()?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load `path`, or the default location; defaults when neither exists
    pub fn load_or_default(path: Option<&Path>) -> SettingsResult<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Ok(path) if path.exists() => path,
                _ => {
                    debug!("No configuration file, using defaults");
                    return Ok(Self::default());
                }
            },
        };
        Self::load_from_file(&path)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        write_file(path, self)?;
        info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let step = self.sampling.step;
        if !step.is_finite() || step <= 0.0 {
            return Err(invalid("sampling.step", "must be a finite value > 0"));
        }

        if let Some(outer) = self.sampling.outer_radius {
            if !outer.is_finite() || outer <= 0.0 {
                return Err(invalid("sampling.outer_radius", "must be a finite value > 0"));
            }
        }

        if self.format.footer.trim().is_empty() {
            return Err(invalid("format.footer", "must not be empty"));
        }

        if !self.format.three_coord_marker.starts_with(MARKER_PREFIX) {
            return Err(invalid(
                "format.three_coord_marker",
                format!("must start with '{}'", MARKER_PREFIX),
            ));
        }

        Ok(())
    }
}

fn invalid(key: &str, reason: impl Into<String>) -> SettingsError {
    SettingsError::InvalidSetting {
        key: key.to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.format.footer, "Q");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.sampling.step = 0.0;
        assert!(matches!(
            config.validate(),
            Err(SettingsError::InvalidSetting { .. })
        ));

        let mut config = Config::default();
        config.sampling.outer_radius = Some(-1.0);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.format.three_coord_marker = "S015A000".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.format.footer = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load_both_formats() {
        let dir = tempdir().unwrap();
        let mut config = Config::default();
        config.sampling.step = 0.01;
        config.sampling.outer_radius = Some(4.5);
        config.format.label_xzw_segments = true;

        for name in ["config.toml", "config.json"] {
            let path = dir.path().join("nested").join(name);
            config.save_to_file(&path).unwrap();
            assert_eq!(Config::load_from_file(&path).unwrap(), config);
        }
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[sampling]\nstep = 0.005\n").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.sampling.step, 0.005);
        assert_eq!(config.sampling.outer_radius, None);
        assert_eq!(config.format, ProtocolFormat::default());
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        assert!(matches!(
            Config::default().save_to_file(&path),
            Err(SettingsError::UnsupportedFormat(_))
        ));
    }
}
