//! Job files: the list of operations to generate, plus optional settings.

use std::path::Path;

use anyhow::Context;
use millkit_camtools::Operation;
use millkit_settings::{read_document, write_document, GCodeSettings};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A job as read from a `.toml` or `.json` file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobFile {
    /// Overrides the configured G-code settings when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<GCodeSettings>,
    #[serde(default)]
    pub operations: Vec<Operation>,
}

impl JobFile {
    /// Load and validate a job.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let job: Self = read_document(path)
            .with_context(|| format!("Failed to read job file {}", path.display()))?;
        job.validate()?;
        debug!(
            operations = job.operations.len(),
            "Loaded job from {}",
            path.display()
        );
        Ok(job)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        self.validate()?;
        write_document(path, self)
            .with_context(|| format!("Failed to write job file {}", path.display()))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(settings) = &self.settings {
            settings.validate().context("Invalid job settings")?;
        }
        for (index, op) in self.operations.iter().enumerate() {
            op.validate().with_context(|| {
                format!("Invalid {} operation #{} '{}'", op.role_name(), index + 1, op.name())
            })?;
        }
        Ok(())
    }

    /// The job's own settings, or `configured` when the job has none.
    pub fn effective_settings(&self, configured: &GCodeSettings) -> GCodeSettings {
        self.settings.clone().unwrap_or_else(|| configured.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use millkit_camtools::{
        generate_program, CircleShape, MillingDirection, Point, PocketStrategy, ProfileOperation,
        Shape, ToolPathMode,
    };

    #[test]
    fn test_settings_fall_back_to_config() {
        let configured = GCodeSettings {
            allow_arcs: true,
            ..GCodeSettings::default()
        };
        let job = JobFile::default();
        assert!(job.effective_settings(&configured).allow_arcs);

        let job = JobFile {
            settings: Some(GCodeSettings::default()),
            operations: Vec::new(),
        };
        assert!(!job.effective_settings(&configured).allow_arcs);
    }

    #[test]
    fn test_invalid_operation_is_named() {
        let mut op = ProfileOperation::new(
            "rim",
            Shape::Circle(CircleShape {
                center: Point::new(0.0, 0.0),
                radius: 5.0,
            }),
        );
        op.feeds.work_xy = 0.0;
        let job = JobFile {
            settings: None,
            operations: vec![Operation::Profile(op)],
        };
        let message = format!("{:#}", job.validate().unwrap_err());
        assert!(message.contains("profile operation #1 'rim'"));
    }

    const JOB: &str = r#"
[settings]
allow_arcs = true
use_comments = false

[[operations]]
role = "profile"
name = "outline"

[operations.shape]
kind = "circle"
center = { x = 50.0, y = 50.0 }
radius = 20.0

[operations.cutting]
total_depth = 3.0
step_depth = 1.5
tool_diameter = 6.0

[operations.profile]
tool_path_mode = "outside"
direction = "clockwise"

[[operations]]
role = "pocket"
name = "recess"

[operations.shape]
kind = "rectangle"
center = { x = 50.0, y = 50.0 }
width = 20.0
height = 10.0

[operations.pocket]
strategy = "zig_zag"
"#;

    #[test]
    fn test_toml_job_generates_program() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.toml");
        std::fs::write(&path, JOB).unwrap();

        let job = JobFile::load(&path).unwrap();
        assert_eq!(job.operations.len(), 2);
        let Operation::Profile(profile) = &job.operations[0] else {
            panic!("expected a profile first");
        };
        assert_eq!(profile.profile.tool_path_mode, ToolPathMode::Outside);
        assert_eq!(profile.profile.direction, MillingDirection::Clockwise);
        let Operation::Pocket(pocket) = &job.operations[1] else {
            panic!("expected a pocket second");
        };
        assert_eq!(pocket.pocket.strategy, PocketStrategy::ZigZag);

        let settings = job.effective_settings(&Default::default());
        let program = generate_program(&job.operations, &settings).unwrap();
        assert_eq!(program.skipped_count(), 0);

        let gcode = program.to_gcode(&settings);
        assert!(gcode.starts_with("G90\nG21\nG17\n"));
        assert!(!gcode.contains(';'));
        // Two half arcs per pass, two passes.
        assert_eq!(gcode.lines().filter(|l| l.starts_with("G2 ")).count(), 4);
        assert!(gcode.contains("Z-3.000"));
        assert!(gcode.trim_end().ends_with("M30"));
    }

    #[test]
    fn test_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let toml_path = dir.path().join("job.toml");
        std::fs::write(&toml_path, JOB).unwrap();
        let job = JobFile::load(&toml_path).unwrap();

        let json_path = dir.path().join("job.json");
        job.save(&json_path).unwrap();
        assert_eq!(JobFile::load(&json_path).unwrap(), job);
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.yaml");
        std::fs::write(&path, JOB).unwrap();
        assert!(JobFile::load(&path).is_err());
    }
}
