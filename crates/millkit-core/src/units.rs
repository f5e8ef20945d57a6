//! Unit handling and number formatting
//!
//! Handles the Metric (mm) / Imperial (inch) selection written into program
//! headers, and the fixed-point formatting used for every coordinate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Program units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Millimeters (metric)
    #[default]
    Mm,
    /// Inches (imperial)
    Inch,
}

impl Units {
    /// G-code word selecting these units (G21 / G20)
    pub fn gcode(&self) -> &'static str {
        match self {
            Units::Mm => "G21",
            Units::Inch => "G20",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mm => write!(f, "mm"),
            Self::Inch => write!(f, "inch"),
        }
    }
}

/// Format a value as fixed-point with `decimals` fractional digits.
///
/// Rust formatting ignores the process locale, so the decimal separator is
/// always `.`. Values that round to zero are written without a sign.
pub fn format_number(value: f64, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value);
    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text[1..].to_string()
    } else {
        text
    }
}
