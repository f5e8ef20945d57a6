//! Error types for the CAM tools crate.
//!
//! Only conditions a caller must act on are errors. Geometry that is too
//! small to cut is reported through [`crate::GenerationOutcome`] instead.

use thiserror::Error;

/// Errors that can occur during toolpath generation.
#[derive(Error, Debug)]
pub enum CamToolError {
    /// An operation reached a factory that has no geometry for its shape.
    #[error("Unsupported {role} operation for shape '{shape}'")]
    UnsupportedOperation {
        role: &'static str,
        shape: &'static str,
    },

    /// A parameter validation error occurred.
    #[error("Parameter error: {0}")]
    Parameter(#[from] ParameterError),
}

/// Errors related to operation parameter validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// A parameter value is out of the valid range.
    #[error("Parameter '{name}' out of range: {value} (valid: {min}..{max})")]
    OutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A parameter value is invalid.
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: String, reason: String },

    /// Dimensions are invalid (not finite).
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),
}

/// Result type alias for CAM tool operations.
pub type CamToolResult<T> = Result<T, CamToolError>;

/// Result type alias for parameter validation.
pub type ParameterResult<T> = Result<T, ParameterError>;
