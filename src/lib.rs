//! # millkit
//!
//! Profile and pocket G-code generation for 2D CNC milling.
//!
//! ## Architecture
//!
//! millkit is organized as a workspace with multiple crates:
//!
//! 1. **millkit-core** - Error type, units and number formatting
//! 2. **millkit-settings** - G-code output settings and config files
//! 3. **millkit-camtools** - Geometry, toolpath generation and G-code output
//! 4. **millkit** - Job files, logging setup and the command line tool

pub mod job;

pub use job::JobFile;

pub use millkit_core::{format_number, Units};
pub use millkit_settings::{Config, FallbackValues, GCodeSettings, LineNumbering};

pub use millkit_camtools::{
    generate_operation, generate_program, to_gcode, GeneratedToolpath, GenerationOutcome,
    Operation, PocketOperation, Program, ProfileOperation, Shape, SkipReason, Toolpath,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Log output options
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOptions {
    /// Log at DEBUG instead of INFO
    pub verbose: bool,
    /// One JSON object per event
    pub json: bool,
}

/// Initialize logging
///
/// Sets up structured logging with:
/// - Output on stderr, so G-code written to stdout stays clean
/// - RUST_LOG environment variable support
/// - Human readable or JSON formatting
pub fn init_logging(options: LogOptions) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let level = if options.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let env_filter = EnvFilter::from_default_env().add_directive(level.into());

    let (plain, json) = if options.json {
        let layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true);
        (None, Some(layer))
    } else {
        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_line_number(options.verbose);
        (Some(layer), None)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(plain)
        .with(json)
        .try_init()?;

    Ok(())
}
