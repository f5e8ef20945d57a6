//! millkit command line tool.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use millkit::{init_logging, JobFile, LogOptions, Operation, BUILD_DATE, VERSION};
use millkit_camtools::geometry::{create_pocket_geometry, create_profile_geometry};
use millkit_camtools::math::{resolve_tool_diameter, tool_path_offset, tool_radius};
use millkit_camtools::{generate_operation, generate_program, PocketGeometry, ProfileGeometry};
use millkit_settings::{Config, GCodeSettings};
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(name = "millkit")]
#[command(about = "Profile and pocket G-code generation for 2D CNC milling", long_about = None)]
#[command(version = VERSION)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Log as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,
    /// Config file (default: platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate G-code for a job file
    Generate {
        /// Job file (.toml or .json)
        job: PathBuf,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Emit G2/G3 arcs where the geometry has them
        #[arg(long)]
        arcs: bool,
        /// Leave comments out of the program
        #[arg(long)]
        no_comments: bool,
        /// Prefix lines with N numbers
        #[arg(long)]
        line_numbers: bool,
    },
    /// Show the geometry and outcome of every operation in a job
    Inspect {
        /// Job file (.toml or .json)
        job: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(LogOptions {
        verbose: cli.verbose,
        json: cli.json_logs,
    })?;
    debug!("millkit {} (built {})", VERSION, BUILD_DATE);

    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Commands::Generate {
            job,
            output,
            arcs,
            no_comments,
            line_numbers,
        } => {
            let job = JobFile::load(&job)?;
            let mut settings = job.effective_settings(&config.gcode);
            if arcs {
                settings.allow_arcs = true;
            }
            if no_comments {
                settings.use_comments = false;
            }
            if line_numbers {
                settings.line_numbers.enabled = true;
            }
            settings.validate().context("Invalid G-code settings")?;
            generate(&job, &settings, output.as_deref())?;
        }
        Commands::Inspect { job } => {
            let job = JobFile::load(&job)?;
            let settings = job.effective_settings(&config.gcode);
            inspect(&job, &settings)?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => match Config::default_path() {
            Ok(path) => Ok(Config::load_or_default(&path)?),
            Err(e) => {
                warn!("No config directory ({}), using defaults", e);
                Ok(Config::default())
            }
        },
    }
}

fn generate(job: &JobFile, settings: &GCodeSettings, output: Option<&Path>) -> Result<()> {
    let program = generate_program(&job.operations, settings)?;
    let gcode = program.to_gcode(settings);
    match output {
        Some(path) => {
            std::fs::write(path, &gcode)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(
                lines = gcode.lines().count(),
                "Wrote G-code to {}",
                path.display()
            );
        }
        None => print!("{}", gcode),
    }
    Ok(())
}

fn inspect(job: &JobFile, settings: &GCodeSettings) -> Result<()> {
    for (index, op) in job.operations.iter().enumerate() {
        println!(
            "#{} {} '{}' ({})",
            index + 1,
            op.role_name(),
            op.name(),
            op.shape().kind_name()
        );
        match op {
            Operation::Profile(profile) => {
                let geometry = create_profile_geometry(profile, &settings.fallback)?;
                let tool_d =
                    resolve_tool_diameter(profile.cutting.tool_diameter, &settings.fallback);
                let offset = tool_path_offset(profile.profile.tool_path_mode, tool_radius(tool_d));
                let contour = geometry.contour_points(offset, profile.profile.direction);
                println!("  offset:     {:.3}", offset);
                println!("  points:     {}", contour.len());
                println!("  perimeter:  {:.3}", contour.perimeter());
                println!("  area:       {:.3}", contour.area());
                println!("  too small:  {}", geometry.is_too_small(offset));
                println!("  arcs:       {}", geometry.supports_arcs());
            }
            Operation::Pocket(pocket) => match create_pocket_geometry(pocket) {
                Ok(geometry) => {
                    let tool_d =
                        resolve_tool_diameter(pocket.cutting.tool_diameter, &settings.fallback);
                    let contour = geometry.contour(tool_radius(tool_d), 0.0);
                    println!("  boundary:   {} points", contour.len());
                    println!("  perimeter:  {:.3}", contour.perimeter());
                    println!("  area:       {:.3}", contour.area());
                    println!("  too small:  {}", geometry.is_too_small());
                }
                Err(e) => {
                    println!("  error:      {}", e);
                    continue;
                }
            },
        }
        let result = generate_operation(op, settings)?;
        let outcome = match &result.outcome {
            millkit::GenerationOutcome::Completed => "completed".to_string(),
            millkit::GenerationOutcome::Skipped(reason) => format!("skipped ({})", reason),
        };
        println!("  outcome:    {}", outcome);
        println!("  moves:      {}", result.toolpath.move_count());
        println!("  cut length: {:.3}", result.toolpath.cut_length());
    }
    Ok(())
}
