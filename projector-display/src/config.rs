//! Display configuration
//!
//! Per-target display assignment and format, navigation controls, virtual
//! output settings and logging, stored as JSON in the user config directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::frame::Color;
use crate::output::{VirtualResolution, MAX_DISPLAY_TARGETS};
use crate::render::ScreenFormat;
use crate::settings::DisplayControlsSettings;
use crate::telemetry::LogConfig;

/// Errors reading or writing configuration files
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid configuration in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("No configuration directory available")]
    NoConfigDir,
}

/// Configuration of one display target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayTargetConfig {
    /// Zero-based physical display, `None` leaves a secondary target off
    pub screen: Option<usize>,
    pub format: ScreenFormat,
    /// Background when nothing else is configured
    pub fallback_color: Color,
}

impl Default for DisplayTargetConfig {
    fn default() -> Self {
        Self {
            screen: None,
            format: ScreenFormat::default(),
            fallback_color: Color::TRANSPARENT,
        }
    }
}

/// Virtual output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VirtualOutputConfig {
    pub enabled: bool,
    pub resolution: VirtualResolution,
    /// Use the primary display's style instead of `theme_id`
    pub mirror_primary: bool,
    pub theme_id: Option<i64>,
    pub logo: Option<PathBuf>,
}

impl Default for VirtualOutputConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            resolution: VirtualResolution::default(),
            mirror_primary: true,
            theme_id: None,
            logo: None,
        }
    }
}

/// Complete display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Display targets in order, the first is the primary display
    pub displays: Vec<DisplayTargetConfig>,
    pub controls: DisplayControlsSettings,
    pub virtual_output: VirtualOutputConfig,
    pub logging: LogConfig,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            displays: vec![DisplayTargetConfig {
                screen: Some(0),
                ..Default::default()
            }],
            controls: DisplayControlsSettings::default(),
            virtual_output: VirtualOutputConfig::default(),
            logging: LogConfig::default(),
        }
    }
}

impl DisplayConfig {
    /// Default location of the configuration file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("ProjectorDisplay");
            p.push("displays.json");
            p
        })
    }

    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "No display configuration, using defaults");
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if config.displays.len() > MAX_DISPLAY_TARGETS as usize {
            tracing::warn!(
                count = config.displays.len(),
                "More display targets configured than supported, extra entries ignored"
            );
        }
        Ok(config)
    }

    /// Load from the default location
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = Self::default_path().ok_or(ConfigError::NoConfigDir)?;
        Self::load(&path)
    }

    /// Write to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(io_error)?;
        tracing::info!(path = %path.display(), "Saved display configuration");
        Ok(())
    }

    /// Configuration of display target `index` (zero-based)
    pub fn display(&self, index: usize) -> Option<&DisplayTargetConfig> {
        self.displays.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::FormatPreset;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("projector-display-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let config = DisplayConfig::load(Path::new("/no/such/displays.json")).unwrap();
        assert_eq!(config, DisplayConfig::default());
        assert_eq!(config.displays[0].screen, Some(0));
        assert!(config.virtual_output.mirror_primary);
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("save");
        let mut config = DisplayConfig::default();
        config.displays.push(DisplayTargetConfig {
            screen: Some(1),
            format: ScreenFormat::new(FormatPreset::Hd16x9),
            fallback_color: Color::BLACK,
        });
        config.virtual_output.enabled = true;
        config.virtual_output.resolution = VirtualResolution::Custom {
            width: 1080,
            height: 1920,
        };
        config.save(&path).unwrap();

        let loaded = DisplayConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = temp_path("partial");
        fs::write(&path, r#"{"virtual_output": {"enabled": true}}"#).unwrap();
        let config = DisplayConfig::load(&path).unwrap();
        assert!(config.virtual_output.enabled);
        assert_eq!(config.virtual_output.resolution, VirtualResolution::Hd1080);
        assert_eq!(config.controls, DisplayControlsSettings::default());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_file_is_parse_error() {
        let path = temp_path("invalid");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(DisplayConfig::load(&path), Err(ConfigError::Parse { .. })));
        let _ = fs::remove_file(&path);
    }
}
