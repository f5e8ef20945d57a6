//! Profile toolpath generation: the offset outline cut layer by layer.

use std::f64::consts::{PI, TAU};

use millkit_core::format_number;
use millkit_settings::GCodeSettings;
use tracing::{debug, info, warn};

use crate::depth::{DepthLayers, DepthPass};
use crate::error::CamToolResult;
use crate::geometry::{create_profile_geometry, PathElement, Point, Profile, ProfileGeometry};
use crate::math::{resolve_tool_diameter, tool_path_offset, tool_radius};
use crate::operation::{EntryMode, MillingDirection, ProfileOperation};
use crate::toolpath::{GeneratedToolpath, GenerationOutcome, Move, SkipReason, Toolpath};

/// Fewest moves in a ramp.
const MIN_RAMP_STEPS: usize = 4;

/// Largest sweep covered by one ramp move.
const RAMP_STEP_ANGLE: f64 = PI / 16.0;

/// Horizontal travel needed to descend `drop` at `angle_deg` from horizontal.
pub fn ramp_distance(drop: f64, angle_deg: f64) -> f64 {
    drop / angle_deg.to_radians().tan()
}

/// Angular sweep of a ramp of `distance` along a contour of `perimeter`,
/// signed by `direction` and never more than one revolution.
pub fn ramp_sweep(distance: f64, perimeter: f64, direction: MillingDirection) -> f64 {
    let sweep = if perimeter > f64::EPSILON {
        distance / perimeter * TAU
    } else {
        distance * 2.0
    };
    sweep.abs().min(TAU) * direction.sign()
}

/// Number of linear moves used to trace a ramp of `sweep` radians.
pub fn ramp_steps(sweep: f64) -> usize {
    ((sweep.abs() / RAMP_STEP_ANGLE).ceil() as usize).max(MIN_RAMP_STEPS)
}

/// Generates profile toolpaths.
pub struct ProfileGenerator<'a> {
    settings: &'a GCodeSettings,
}

impl<'a> ProfileGenerator<'a> {
    pub fn new(settings: &'a GCodeSettings) -> Self {
        Self { settings }
    }

    /// Generates the full toolpath for `op`.
    pub fn generate(&self, op: &ProfileOperation) -> CamToolResult<GeneratedToolpath> {
        let geometry = create_profile_geometry(op, &self.settings.fallback)?;
        let mut toolpath = Toolpath::new(op.name.clone(), op.cutting.decimals);
        self.comment(
            &mut toolpath,
            format!("Profile: {} ({})", op.name, op.shape.kind_name()),
        );
        info!(name = %op.name, shape = op.shape.kind_name(), "Generating profile");

        let tool_d = resolve_tool_diameter(op.cutting.tool_diameter, &self.settings.fallback);
        let offset = tool_path_offset(op.profile.tool_path_mode, tool_radius(tool_d));
        let direction = op.profile.direction;

        if geometry.is_too_small(offset) {
            return Ok(self.skip(toolpath, op, SkipReason::GeometryTooSmall));
        }
        let contour = geometry.contour_points(offset, direction);
        let Some(start) = contour.first().filter(|_| contour.len() >= 2) else {
            return Ok(self.skip(toolpath, op, SkipReason::GeometryTooSmall));
        };
        let layers = DepthLayers::new(
            op.cutting.contour_height,
            op.cutting.total_depth,
            op.cutting.step_depth,
        );
        if layers.pass_count() == 0 {
            return Ok(self.skip(toolpath, op, SkipReason::NoDepth));
        }

        let use_arcs = self.settings.allow_arcs && geometry.supports_arcs();
        let path = if use_arcs {
            geometry.path(offset, direction)
        } else {
            None
        };

        for pass in layers {
            let z = format_number(pass.next_z, toolpath.decimals);
            self.comment(&mut toolpath, format!("Pass {}: Z {z}", pass.number));
            debug!(pass = pass.number, z = pass.next_z, "Cutting profile layer");

            self.entry(op, &geometry, offset, start, &pass, &mut toolpath);

            match &path {
                Some(path) => {
                    for element in &path.elements {
                        match element {
                            PathElement::Line { end } => {
                                toolpath.push(Move::linear_xy(*end, op.feeds.work_xy));
                            }
                            PathElement::Arc(arc) => {
                                toolpath.push(Move::arc(arc, op.feeds.work_xy));
                            }
                        }
                    }
                }
                None => {
                    for p in &contour.points()[1..] {
                        toolpath.push(Move::linear_xy(*p, op.feeds.work_xy));
                    }
                }
            }

            if !pass.is_last {
                toolpath.push(Move::rapid_z(
                    pass.next_z + op.safety.retract_height,
                    op.feeds.rapid_z,
                ));
            }
        }
        toolpath.push(Move::rapid_z(op.safety.safe_z, op.feeds.rapid_z));

        debug!(
            name = %op.name,
            moves = toolpath.move_count(),
            arcs = use_arcs,
            "Profile toolpath complete"
        );
        Ok(GeneratedToolpath {
            toolpath,
            outcome: GenerationOutcome::Completed,
        })
    }

    /// Brings the tool from above the work down to `pass.next_z` at `start`.
    fn entry(
        &self,
        op: &ProfileOperation,
        geometry: &Profile,
        offset: f64,
        start: Point,
        pass: &DepthPass,
        toolpath: &mut Toolpath,
    ) {
        let feeds = &op.feeds;
        let safe_z = op.safety.safe_z;

        let angle = op.profile.entry_angle;
        let ramp = match op.profile.entry_mode {
            EntryMode::Vertical => false,
            EntryMode::Angled if angle > 0.0 && angle < 90.0 => true,
            EntryMode::Angled => {
                warn!(angle, "Invalid ramp angle, plunging vertically");
                false
            }
        };

        toolpath.push(Move::rapid_z(safe_z, feeds.rapid_z));
        toolpath.push(Move::rapid_xy(start, feeds.rapid_xy));
        if !ramp {
            toolpath.push(Move::rapid_z(pass.current_z, feeds.rapid_z));
            toolpath.push(Move::linear_z(pass.next_z, feeds.work_z));
            return;
        }

        let retract_z = pass.current_z + op.safety.retract_height;
        toolpath.push(Move::rapid_z(retract_z, feeds.rapid_z));

        let distance = ramp_distance(retract_z - pass.next_z, angle);
        let perimeter = geometry.perimeter(offset);
        let sweep = ramp_sweep(distance, perimeter, op.profile.direction);
        let steps = ramp_steps(sweep);
        debug!(distance, sweep, steps, "Ramping into profile");

        for i in 1..=steps {
            let t = i as f64 / steps as f64;
            let along = perimeter * sweep * t / TAU;
            let point = geometry.point_on_contour(along, offset).unwrap_or(start);
            let z = retract_z + (pass.next_z - retract_z) * t;
            toolpath.push(Move::linear_xyz(point, z, feeds.work_z));
        }

        toolpath.push(Move::rapid_z(safe_z, feeds.rapid_z));
        toolpath.push(Move::rapid_xy(start, feeds.rapid_xy));
        toolpath.push(Move::rapid_z(pass.next_z, feeds.rapid_z));
    }

    fn skip(
        &self,
        mut toolpath: Toolpath,
        op: &ProfileOperation,
        reason: SkipReason,
    ) -> GeneratedToolpath {
        warn!(name = %op.name, %reason, "Skipping profile");
        self.comment(&mut toolpath, format!("Profile skipped: {reason}"));
        GeneratedToolpath {
            toolpath,
            outcome: GenerationOutcome::Skipped(reason),
        }
    }

    fn comment(&self, toolpath: &mut Toolpath, text: impl Into<String>) {
        if self.settings.use_comments {
            toolpath.comment(text);
        }
    }
}
