//! Pocket toolpath generation.
//!
//! A pocket is cleared layer by layer. Roughing leaves the finish allowance
//! on the walls and floor; finishing then takes the floor slice and walks
//! the final walls over the full depth.

use millkit_core::format_number;
use millkit_settings::GCodeSettings;
use tracing::{debug, info, warn};

use crate::clearing::{clearing_pattern, link_stays_inside, ClearingPattern};
use crate::depth::{DepthLayers, DepthPass};
use crate::error::CamToolResult;
use crate::geometry::{create_pocket_geometry, Contour, Point, Pocket, PocketGeometry};
use crate::math::{resolve_tool_diameter, step_size, taper_offset, tool_radius};
use crate::operation::{FinishingMode, PocketOperation};
use crate::toolpath::{GeneratedToolpath, GenerationOutcome, Move, SkipReason, Toolpath};

/// Depth allowances are kept this far above the full depth so roughing
/// always has something to cut.
const DEPTH_EPSILON: f64 = 1e-6;

/// Generates pocket toolpaths.
pub struct PocketGenerator<'a> {
    settings: &'a GCodeSettings,
}

impl<'a> PocketGenerator<'a> {
    pub fn new(settings: &'a GCodeSettings) -> Self {
        Self { settings }
    }

    /// Generates the full toolpath for `op`.
    ///
    /// Shapes that cannot be pocketed are an error. Geometry too small to
    /// cut is not: the result is a skipped outcome with an explanatory
    /// comment.
    pub fn generate(&self, op: &PocketOperation) -> CamToolResult<GeneratedToolpath> {
        let geometry = create_pocket_geometry(op)?;
        let mut toolpath = Toolpath::new(op.name.clone(), op.cutting.decimals);
        self.comment(
            &mut toolpath,
            format!("Pocket: {} ({})", op.name, op.shape.kind_name()),
        );
        info!(name = %op.name, shape = op.shape.kind_name(), "Generating pocket");

        if geometry.is_too_small() {
            return Ok(self.skip(toolpath, op, SkipReason::GeometryTooSmall));
        }
        if !(op.cutting.total_depth > 0.0) {
            return Ok(self.skip(toolpath, op, SkipReason::NoDepth));
        }

        let settings = &op.pocket;
        let flags = (settings.is_roughing_enabled, settings.is_finishing_enabled);
        let (roughing, finishing) = match flags {
            (false, false) => (true, false),
            flags => flags,
        };
        let allowance = if settings.is_roughing_enabled || settings.is_finishing_enabled {
            settings.finish_allowance.max(0.0)
        } else {
            0.0
        };
        let surface_z = op.cutting.contour_height;

        if roughing {
            let roughing_allowance = allowance.min(op.cutting.total_depth - DEPTH_EPSILON);
            let rough = if roughing_allowance > 0.0 {
                geometry.apply_roughing_allowance(roughing_allowance)
            } else {
                geometry.clone()
            };
            if rough.is_too_small() {
                self.comment(&mut toolpath, "Pocket too small for the finish allowance");
                return Ok(self.skip(toolpath, op, SkipReason::GeometryTooSmall));
            }
            self.comment(&mut toolpath, "Roughing");
            self.clear_layers(&rough, surface_z, "Roughing", &mut toolpath);
        }

        if finishing {
            if allowance > 0.0 {
                self.finish(op, &geometry, allowance, &mut toolpath)?;
            } else {
                debug!(name = %op.name, "Finishing enabled without allowance, nothing to finish");
            }
        }

        // Every layer was narrower than the tool.
        if toolpath.move_count() == 0 {
            return Ok(self.skip(toolpath, op, SkipReason::GeometryTooSmall));
        }
        debug!(
            name = %op.name,
            moves = toolpath.move_count(),
            "Pocket toolpath complete"
        );
        Ok(GeneratedToolpath {
            toolpath,
            outcome: GenerationOutcome::Completed,
        })
    }

    fn finish(
        &self,
        op: &PocketOperation,
        geometry: &Pocket,
        allowance: f64,
        toolpath: &mut Toolpath,
    ) -> CamToolResult<()> {
        let depth_allowance = allowance.min(op.cutting.total_depth);
        if depth_allowance <= DEPTH_EPSILON {
            return Ok(());
        }
        let slice = finishing_slice(op, depth_allowance);
        let slice_geometry = create_pocket_geometry(&slice)?;
        let surface_z = op.cutting.contour_height;

        match op.pocket.finishing_mode {
            FinishingMode::Bottom => {
                self.finish_bottom(&slice_geometry, allowance, surface_z, toolpath);
            }
            FinishingMode::Walls => self.finish_walls(geometry, toolpath),
            FinishingMode::All => {
                self.finish_bottom(&slice_geometry, allowance, surface_z, toolpath);
                self.finish_walls(geometry, toolpath);
            }
        }
        Ok(())
    }

    /// Clears the floor slice once, staying clear of the unfinished walls.
    fn finish_bottom(
        &self,
        slice: &Pocket,
        allowance: f64,
        surface_z: f64,
        toolpath: &mut Toolpath,
    ) {
        let bottom = slice.apply_bottom_finishing_allowance(allowance);
        if bottom.is_too_small() {
            warn!(
                name = %slice.operation().name,
                "Pocket too small for bottom finishing, skipping"
            );
            self.comment(toolpath, "Bottom finishing skipped: pocket too small");
            return;
        }
        self.comment(toolpath, "Bottom finishing");
        self.clear_layers(&bottom, surface_z, "Bottom finishing", toolpath);
    }

    /// Walks the final wall contour at every depth layer.
    fn finish_walls(&self, geometry: &Pocket, toolpath: &mut Toolpath) {
        let params = geometry.parameters();
        let tool_r = tool_radius(resolve_tool_diameter(
            params.cutting.tool_diameter,
            &self.settings.fallback,
        ));
        let feeds = &params.feeds;
        let safety = &params.safety;
        self.comment(toolpath, "Wall finishing");

        let mut down = false;
        let layers = DepthLayers::new(
            params.cutting.contour_height,
            params.cutting.total_depth,
            params.cutting.step_depth,
        );
        for pass in layers {
            let taper = taper_offset(
                params.cutting.contour_height - pass.next_z,
                params.pocket.wall_taper_angle,
            );
            if geometry.is_contour_too_small(tool_r, taper) {
                warn!(pass = pass.number, "Wall contour too small, skipping layer");
                continue;
            }
            let contour = geometry.contour(tool_r, taper);
            let Some((start, rest)) = contour.points().split_first() else {
                continue;
            };
            let z = format_number(pass.next_z, toolpath.decimals);
            self.comment(toolpath, format!("Wall pass {}: Z {z}", pass.number));
            if down {
                toolpath.push(Move::linear_xy(*start, feeds.work_xy));
            } else {
                toolpath.push(Move::rapid_z(safety.safe_z, feeds.rapid_z));
                toolpath.push(Move::rapid_xy(*start, feeds.rapid_xy));
                toolpath.push(Move::rapid_z(pass.current_z, feeds.rapid_z));
            }
            toolpath.push(Move::linear_z(pass.next_z, feeds.work_z));
            for p in rest {
                toolpath.push(Move::linear_xy(*p, feeds.work_xy));
            }
            down = true;
        }
        if down {
            toolpath.push(Move::rapid_z(safety.safe_z, feeds.rapid_z));
        }
    }

    /// Clears every depth layer of `geometry`. The tool stays down between
    /// layers and retracts to the safe height at the end.
    fn clear_layers(
        &self,
        geometry: &Pocket,
        surface_z: f64,
        label: &str,
        toolpath: &mut Toolpath,
    ) {
        let params = geometry.parameters();
        let tool_d = resolve_tool_diameter(params.cutting.tool_diameter, &self.settings.fallback);
        let tool_r = tool_radius(tool_d);
        let step_percent = if params.pocket.step_percent_of_tool > 0.0 {
            params.pocket.step_percent_of_tool
        } else {
            self.settings.fallback.step_percent_of_tool
        };
        let step = step_size(tool_d, step_percent);

        let layers = DepthLayers::new(
            params.cutting.contour_height,
            params.cutting.total_depth,
            params.cutting.step_depth,
        );
        let mut at_depth: Option<Point> = None;
        for pass in layers {
            let taper = taper_offset(surface_z - pass.next_z, params.pocket.wall_taper_angle);
            if geometry.is_contour_too_small(tool_r, taper) {
                warn!(
                    pass = pass.number,
                    z = pass.next_z,
                    "Pocket contour too small for the tool, skipping layer"
                );
                self.comment(toolpath, format!("{label} pass {} skipped: too small", pass.number));
                continue;
            }
            let boundary = geometry.contour(tool_r, taper);
            let pattern = clearing_pattern(&boundary, step, params.pocket.strategy);
            if pattern.is_empty() {
                continue;
            }
            let z = format_number(pass.next_z, toolpath.decimals);
            self.comment(toolpath, format!("{label} pass {}: Z {z}", pass.number));
            debug!(
                pass = pass.number,
                z = pass.next_z,
                passes = pattern.passes.len(),
                "Clearing pocket layer"
            );
            self.emit_layer(geometry, &boundary, &pattern, &pass, at_depth, toolpath);
            at_depth = pattern.last_point().or(at_depth);
        }
        if at_depth.is_some() {
            toolpath.push(Move::rapid_z(params.safety.safe_z, params.feeds.rapid_z));
        }
    }

    fn emit_layer(
        &self,
        geometry: &Pocket,
        boundary: &Contour,
        pattern: &ClearingPattern,
        pass: &DepthPass,
        at_depth: Option<Point>,
        toolpath: &mut Toolpath,
    ) {
        let op = geometry.operation();
        let feeds = &op.feeds;
        let lift_z = pass.current_z + op.safety.retract_height;

        let mut passes = pattern.passes.iter().filter(|p| !p.is_empty());
        let Some(first) = passes.next() else {
            return;
        };

        // Enter the layer at the first pass.
        let entry = first[0];
        match at_depth {
            None => {
                toolpath.push(Move::rapid_z(op.safety.safe_z, feeds.rapid_z));
                toolpath.push(Move::rapid_xy(entry, feeds.rapid_xy));
                toolpath.push(Move::rapid_z(pass.current_z, feeds.rapid_z));
            }
            Some(position) if link_stays_inside(boundary, position, entry) => {
                toolpath.push(Move::linear_xy(entry, feeds.work_xy));
            }
            Some(_) => {
                toolpath.push(Move::rapid_z(lift_z, feeds.rapid_z));
                toolpath.push(Move::rapid_xy(entry, feeds.rapid_xy));
                toolpath.push(Move::rapid_z(pass.current_z, feeds.rapid_z));
            }
        }
        toolpath.push(Move::linear_z(pass.next_z, feeds.work_z));
        for p in &first[1..] {
            toolpath.push(Move::linear_xy(*p, feeds.work_xy));
        }

        let mut cursor = first[first.len() - 1];
        for points in passes {
            let start = points[0];
            if pattern.stay_down && link_stays_inside(boundary, cursor, start) {
                toolpath.push(Move::linear_xy(start, feeds.work_xy));
            } else {
                toolpath.push(Move::rapid_z(lift_z, feeds.rapid_z));
                toolpath.push(Move::rapid_xy(start, feeds.rapid_xy));
                toolpath.push(Move::rapid_z(pass.current_z, feeds.rapid_z));
                toolpath.push(Move::linear_z(pass.next_z, feeds.work_z));
            }
            for p in &points[1..] {
                toolpath.push(Move::linear_xy(*p, feeds.work_xy));
            }
            cursor = points[points.len() - 1];
        }
    }

    fn skip(
        &self,
        mut toolpath: Toolpath,
        op: &PocketOperation,
        reason: SkipReason,
    ) -> GeneratedToolpath {
        warn!(name = %op.name, %reason, "Skipping pocket");
        self.comment(&mut toolpath, format!("Pocket skipped: {reason}"));
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

/// The floor slice left by roughing, as a standalone operation.
fn finishing_slice(op: &PocketOperation, depth_allowance: f64) -> PocketOperation {
    let mut slice = op.clone();
    slice.cutting.contour_height -= op.cutting.total_depth - depth_allowance;
    slice.cutting.total_depth = depth_allowance;
    slice.cutting.step_depth = depth_allowance;
    slice.pocket.is_roughing_enabled = false;
    slice.pocket.is_finishing_enabled = false;
    slice
}
