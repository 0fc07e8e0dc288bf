//! KerfKit Settings Crate
//!
//! Handles application configuration: file formats, defaults, lookup and
//! validation.

pub mod config;
pub mod error;

pub use config::{Config, ProcessingSettings, APP_DIR, CONFIG_FILE};
pub use error::{ConfigError, SettingsError, SettingsResult};
