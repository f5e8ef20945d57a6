//! millkit Settings Crate
//!
//! Handles G-code output settings and configuration file loading.

pub mod config;
pub mod error;

pub use config::{
    read_document, write_document, Config, DocumentFormat, FallbackValues, GCodeSettings,
    LineNumbering, Units,
};
pub use error::{ConfigError, SettingsError, SettingsResult};
