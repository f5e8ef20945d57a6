//! Configuration and settings management for millkit
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats, stored by default in the platform config directory.
//!
//! Configuration is organized into logical sections:
//! - G-code output settings (comments, arcs, line numbering, units)
//! - Fallback values substituted for invalid operation parameters

pub use millkit_core::units::Units;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ConfigError, SettingsError, SettingsResult};

/// Line numbering policy for emitted programs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineNumbering {
    /// Prefix lines with `N` words
    pub enabled: bool,
    /// First line number
    pub start: u32,
    /// Increment between lines
    pub increment: u32,
}

impl Default for LineNumbering {
    fn default() -> Self {
        Self {
            enabled: false,
            start: 10,
            increment: 10,
        }
    }
}

/// Values used in place of invalid operation parameters.
///
/// Generation substitutes these at the point of use instead of failing
/// the whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackValues {
    /// Tool diameter used when an operation has `tool_diameter <= 0` (mm)
    pub tool_diameter: f64,
    /// Stepover used when `step_percent_of_tool <= 0` (% of tool diameter)
    pub step_percent_of_tool: f64,
    /// Chord length used when `max_segment_length <= 0` (mm)
    pub max_segment_length: f64,
}

impl Default for FallbackValues {
    fn default() -> Self {
        Self {
            tool_diameter: 3.175,
            step_percent_of_tool: 40.0,
            max_segment_length: 0.5,
        }
    }
}

/// G-code generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GCodeSettings {
    /// Emit comments (per pass, per operation, skip notices)
    pub use_comments: bool,
    /// Emit G2/G3 for shapes with exact arcs instead of linearizing
    pub allow_arcs: bool,
    /// Line numbering policy
    pub line_numbers: LineNumbering,
    /// Program units
    pub units: Units,
    /// Write the setup header and end-of-program footer
    pub program_header: bool,
    /// Substitutes for invalid operation parameters
    pub fallback: FallbackValues,
}

impl Default for GCodeSettings {
    fn default() -> Self {
        Self {
            use_comments: true,
            allow_arcs: false,
            line_numbers: LineNumbering::default(),
            units: Units::Mm,
            program_header: true,
            fallback: FallbackValues::default(),
        }
    }
}

impl GCodeSettings {
    /// Validate settings
    pub fn validate(&self) -> SettingsResult<()> {
        if self.line_numbers.enabled && self.line_numbers.increment == 0 {
            return Err(SettingsError::invalid(
                "line_numbers.increment",
                "must be > 0 when numbering is enabled",
            ));
        }
        if !(self.fallback.tool_diameter > 0.0) {
            return Err(SettingsError::invalid(
                "fallback.tool_diameter",
                "must be > 0",
            ));
        }
        if !(self.fallback.step_percent_of_tool > 0.0) {
            return Err(SettingsError::invalid(
                "fallback.step_percent_of_tool",
                "must be > 0",
            ));
        }
        if !(self.fallback.max_segment_length > 0.0) {
            return Err(SettingsError::invalid(
                "fallback.max_segment_length",
                "must be > 0",
            ));
        }
        Ok(())
    }
}

/// Supported document formats, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    /// Detect the format from a path's extension
    pub fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )
            .into()),
        }
    }
}

/// Read a JSON or TOML document into `T`.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> SettingsResult<T> {
    let format = DocumentFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)?;
    debug!("Reading {:?} document from {}", format, path.display());
    let value = match format {
        DocumentFormat::Json => serde_json::from_str(&content)?,
        DocumentFormat::Toml => toml::from_str(&content)?,
    };
    Ok(value)
}

/// Write `value` as a JSON or TOML document.
pub fn write_document<T: Serialize>(path: &Path, value: &T) -> SettingsResult<()> {
    let content = match DocumentFormat::from_path(path)? {
        DocumentFormat::Json => serde_json::to_string_pretty(value)?,
        DocumentFormat::Toml => toml::to_string_pretty(value)?,
    };
    std::fs::write(path, content)?;
    Ok(())
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// G-code output settings
    pub gcode: GCodeSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config location: `<config dir>/millkit/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("millkit").join("config.toml"))
            .ok_or_else(|| {
                ConfigError::UnsupportedPlatform(std::env::consts::OS.to_string()).into()
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let config: Self = read_document(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load the config at `path` if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        write_document(path, self)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        self.gcode.validate()
    }
}
