//! Configuration for KerfKit
//!
//! Settings are read from a JSON or TOML file and validated after loading.
//! Missing keys fall back to their defaults, so an empty file is a valid
//! configuration.
//!
//! ```toml
//! output_file = "output.cam"
//!
//! [processing]
//! coordinate_precision = 1
//! geometry_tolerance = 1e-9
//! exterior_policy = "mirror-hole"
//! ```

use kerfkit_camtools::{CorrectionOptions, ExteriorPolicy, MAX_COORDINATE_PRECISION};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, SettingsError, SettingsResult};

/// Directory name under the platform config directory
pub const APP_DIR: &str = "kerfkit";

/// Config file name looked up in [`APP_DIR`]
pub const CONFIG_FILE: &str = "config.toml";

/// Correction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingSettings {
    /// Decimal places for recomputed lead-in coordinates
    pub coordinate_precision: usize,
    /// Zero tolerance for orientation sums and distinct-vertex checks
    pub geometry_tolerance: f64,
    /// Compensation policy for exterior blocks pierced inside their own path
    pub exterior_policy: ExteriorPolicy,
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        let options = CorrectionOptions::default();
        Self {
            coordinate_precision: options.coordinate_precision,
            geometry_tolerance: options.geometry_tolerance,
            exterior_policy: options.exterior_policy,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output path used when none is given on the command line
    pub output_file: PathBuf,
    pub processing: ProcessingSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_file: PathBuf::from("output.cam"),
            processing: ProcessingSettings::default(),
        }
    }
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("none").to_string()).into()),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::LoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => {
                toml::to_string_pretty(self).map_err(|e| SettingsError::SaveError(e.to_string()))?
            }
        };

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if self.output_file.as_os_str().is_empty() {
            return Err(SettingsError::invalid("output_file", "must not be empty"));
        }

        if self.processing.coordinate_precision > MAX_COORDINATE_PRECISION {
            return Err(SettingsError::invalid(
                "processing.coordinate_precision",
                format!("must be at most {}", MAX_COORDINATE_PRECISION),
            ));
        }

        let tolerance = self.processing.geometry_tolerance;
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(SettingsError::invalid(
                "processing.geometry_tolerance",
                "must be a positive number",
            ));
        }

        Ok(())
    }

    /// Platform config file location, e.g. `~/.config/kerfkit/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Resolve the configuration for a run.
    ///
    /// An explicit path must exist and load cleanly. Without one, the
    /// platform config file is used when present, otherwise defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> SettingsResult<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.display().to_string()).into());
            }
            return Self::load_from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => Self::load_from_file(&path),
            _ => {
                tracing::debug!("No configuration file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Options for the correction pipeline
    pub fn correction_options(&self) -> CorrectionOptions {
        CorrectionOptions {
            coordinate_precision: self.processing.coordinate_precision,
            geometry_tolerance: self.processing.geometry_tolerance,
            exterior_policy: self.processing.exterior_policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.output_file, PathBuf::from("output.cam"));
        assert_eq!(config.processing.coordinate_precision, 1);
        assert!(config.validate().is_ok());
        assert_eq!(config.correction_options(), CorrectionOptions::default());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str("[processing]\nexterior_policy = \"keep\"\n").unwrap();
        assert_eq!(config.processing.exterior_policy, ExteriorPolicy::Keep);
        assert_eq!(config.processing.coordinate_precision, 1);
        assert_eq!(config.output_file, PathBuf::from("output.cam"));
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut config = Config::new();
        config.processing.coordinate_precision = 7;
        assert!(matches!(
            config.validate(),
            Err(SettingsError::InvalidSetting { .. })
        ));

        let mut config = Config::new();
        config.processing.geometry_tolerance = -1.0;
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.output_file = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let err = Config::load_from_file(Path::new("settings.yaml")).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Config(ConfigError::UnsupportedFormat(_))
        ));
    }
}
