//! Configuration management for avshift.
//!
//! This module provides:
//! - TOML-based configuration with logical sections
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates (only changed section is modified)
//! - Validation of run parameters before any job starts
//!
//! # Example
//!
//! ```no_run
//! use avshift_core::config::{ConfigManager, ConfigSection};
//!
//! // Create manager and load (or create default) config
//! let mut config = ConfigManager::new(".config/avshift.toml");
//! config.load_or_create().unwrap();
//!
//! // Read settings
//! println!("Offset: {}", config.settings().shift.offset_seconds);
//!
//! // Modify a setting
//! config.settings_mut().shift.offset_seconds = "-1.25".to_string();
//! config.validate().unwrap();
//!
//! // Save just the shift section atomically
//! config.update_section(ConfigSection::Shift).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    BatchSettings, ConfigSection, LoggingSettings, Settings, ShiftSettings, SplitSettings,
    ToolSettings,
};
