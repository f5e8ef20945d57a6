//! Scalar helpers shared by the geometry providers and generators.

use millkit_settings::FallbackValues;
use tracing::warn;

use crate::operation::ToolPathMode;

/// Stepover used when an operation's `step_percent_of_tool` is not positive.
pub const DEFAULT_STEP_PERCENT: f64 = 40.0;

/// Tool radius from diameter.
pub fn tool_radius(tool_diameter: f64) -> f64 {
    tool_diameter / 2.0
}

/// The operation's tool diameter, or the configured fallback when it is not
/// positive.
pub fn resolve_tool_diameter(tool_diameter: f64, fallback: &FallbackValues) -> f64 {
    if tool_diameter > 0.0 && tool_diameter.is_finite() {
        tool_diameter
    } else {
        warn!(
            tool_diameter,
            fallback = fallback.tool_diameter,
            "Invalid tool diameter, using fallback"
        );
        fallback.tool_diameter
    }
}

/// Lateral stepover from a percentage of the tool diameter.
///
/// A non-positive percentage falls back to [`DEFAULT_STEP_PERCENT`].
pub fn step_size(tool_diameter: f64, percent_of_tool: f64) -> f64 {
    let percent = if percent_of_tool > 0.0 {
        percent_of_tool
    } else {
        DEFAULT_STEP_PERCENT
    };
    tool_diameter * percent / 100.0
}

/// Lateral displacement of a tapered wall at `depth` below the top.
pub fn taper_offset(depth: f64, taper_angle_deg: f64) -> f64 {
    if depth <= 0.0 || taper_angle_deg == 0.0 {
        return 0.0;
    }
    depth * taper_angle_deg.to_radians().tan()
}

/// Signed tool offset for a profile: outside grows, inside shrinks.
pub fn tool_path_offset(mode: ToolPathMode, tool_radius: f64) -> f64 {
    match mode {
        ToolPathMode::OnLine => 0.0,
        ToolPathMode::Outside => tool_radius,
        ToolPathMode::Inside => -tool_radius,
    }
}

/// Tool radius widened by the wall taper at `depth_from_top`.
pub fn effective_tool_radius(tool_radius: f64, depth_from_top: f64, taper_angle_deg: f64) -> f64 {
    tool_radius + taper_offset(depth_from_top, taper_angle_deg)
}

/// Number of chords needed so none is longer than `max_segment_length`.
pub fn segment_count(length: f64, max_segment_length: f64, minimum: usize) -> usize {
    if !(length.is_finite() && max_segment_length > 0.0) {
        return minimum.max(1);
    }
    let count = (length.abs() / max_segment_length).ceil();
    (count as usize).clamp(minimum.max(1), 100_000)
}

/// Ramanujan's second approximation of an ellipse perimeter.
pub fn ellipse_perimeter(a: f64, b: f64) -> f64 {
    let sum = a + b;
    if sum.abs() < f64::EPSILON {
        return 0.0;
    }
    let h = ((a - b) / sum).powi(2);
    std::f64::consts::PI * sum * (1.0 + 3.0 * h / (10.0 + (4.0 - 3.0 * h).sqrt()))
}
