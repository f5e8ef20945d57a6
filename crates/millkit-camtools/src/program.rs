//! Whole-job generation: every operation in order, then G-code text.

use millkit_settings::GCodeSettings;
use tracing::{info, warn};

use crate::error::CamToolResult;
use crate::gcode_gen;
use crate::operation::Operation;
use crate::pocket::PocketGenerator;
use crate::profile::ProfileGenerator;
use crate::toolpath::{GeneratedToolpath, GenerationOutcome, Toolpath};

/// Generated toolpaths for a list of operations, in caller order.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub results: Vec<GeneratedToolpath>,
}

impl Program {
    pub fn toolpaths(&self) -> impl Iterator<Item = &Toolpath> + '_ {
        self.results.iter().map(|r| &r.toolpath)
    }

    pub fn outcomes(&self) -> impl Iterator<Item = &GenerationOutcome> + '_ {
        self.results.iter().map(|r| &r.outcome)
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes().filter(|o| o.is_skipped()).count()
    }

    pub fn move_count(&self) -> usize {
        self.toolpaths().map(Toolpath::move_count).sum()
    }

    pub fn to_gcode(&self, settings: &GCodeSettings) -> String {
        gcode_gen::to_gcode(self.toolpaths(), settings)
    }
}

/// Generates one operation.
pub fn generate_operation(
    operation: &Operation,
    settings: &GCodeSettings,
) -> CamToolResult<GeneratedToolpath> {
    match operation {
        Operation::Pocket(op) => PocketGenerator::new(settings).generate(op),
        Operation::Profile(op) => ProfileGenerator::new(settings).generate(op),
    }
}

/// Generates every operation in order.
///
/// Skipped operations are kept with their outcome and contribute no moves.
/// An operation that cannot be generated at all stops the run.
pub fn generate_program(
    operations: &[Operation],
    settings: &GCodeSettings,
) -> CamToolResult<Program> {
    let mut results = Vec::with_capacity(operations.len());
    for operation in operations {
        operation.validate()?;
        let result = generate_operation(operation, settings)?;
        if let GenerationOutcome::Skipped(reason) = &result.outcome {
            warn!(
                name = operation.name(),
                role = operation.role_name(),
                %reason,
                "Operation produced no moves"
            );
        }
        results.push(result);
    }
    let program = Program { results };
    info!(
        operations = operations.len(),
        skipped = program.skipped_count(),
        moves = program.move_count(),
        "Program generated"
    );
    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CamToolError;
    use crate::geometry::Point;
    use crate::operation::{
        CircleShape, CornerRadii, PocketOperation, ProfileOperation, RoundedRectangleShape, Shape,
    };

    fn circle(radius: f64) -> Shape {
        Shape::Circle(CircleShape {
            center: Point::new(0.0, 0.0),
            radius,
        })
    }

    #[test]
    fn test_keeps_order_and_skips() {
        let settings = GCodeSettings::default();
        let mut tiny = PocketOperation::new("tiny", circle(0.5));
        tiny.pocket.finish_allowance = 1.0;
        let operations = vec![
            Operation::Profile(ProfileOperation::new("outer", circle(20.0))),
            Operation::Pocket(tiny),
            Operation::Pocket(PocketOperation::new("bore", circle(8.0))),
        ];
        let program = generate_program(&operations, &settings).unwrap();
        let names: Vec<&str> = program.toolpaths().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["outer", "tiny", "bore"]);
        assert_eq!(program.skipped_count(), 1);
        assert!(program.results[1].outcome.is_skipped());

        let text = program.to_gcode(&settings);
        assert!(text.contains("; Profile: outer (circle)"));
        assert!(text.contains("; Pocket skipped: geometry too small"));
        assert!(text.trim_end().ends_with("M30"));
    }

    #[test]
    fn test_unsupported_pocket_fails_run() {
        let settings = GCodeSettings::default();
        let operations = vec![Operation::Pocket(PocketOperation::new(
            "rr",
            Shape::RoundedRectangle(RoundedRectangleShape {
                center: Point::new(0.0, 0.0),
                width: 10.0,
                height: 10.0,
                rotation: 0.0,
                corner_radii: CornerRadii::uniform(2.0),
            }),
        ))];
        let err = generate_program(&operations, &settings).unwrap_err();
        assert!(matches!(err, CamToolError::UnsupportedOperation { .. }));
    }
}
