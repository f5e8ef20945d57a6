use std::f64::consts::PI;

use super::{oriented, ProfileGeometry, MIN_CURVE_SEGMENTS};
use crate::geometry::{local_to_world, Contour, Point};
use crate::math::{ellipse_perimeter, segment_count};
use crate::operation::{EllipseShape, MillingDirection};

/// Ellipse outline. The offset is applied to both radii, which is an
/// approximation of a true parallel curve.
#[derive(Debug, Clone)]
pub struct EllipseProfile {
    pub center: Point,
    pub radius_x: f64,
    pub radius_y: f64,
    pub rotation: f64,
    pub max_segment_length: f64,
}

impl EllipseProfile {
    pub fn new(shape: &EllipseShape, max_segment_length: f64) -> Self {
        Self {
            center: shape.center,
            radius_x: shape.radius_x,
            radius_y: shape.radius_y,
            rotation: shape.rotation,
            max_segment_length,
        }
    }
}

impl ProfileGeometry for EllipseProfile {
    fn contour_points(&self, tool_offset: f64, direction: MillingDirection) -> Contour {
        let a = self.radius_x + tool_offset;
        let b = self.radius_y + tool_offset;
        let n = segment_count(
            ellipse_perimeter(a, b),
            self.max_segment_length,
            MIN_CURVE_SEGMENTS,
        );
        let points = (0..n)
            .map(|k| {
                let t = 2.0 * PI * k as f64 / n as f64;
                local_to_world(self.center, a * t.cos(), b * t.sin(), self.rotation)
            })
            .collect();
        oriented(points, direction)
    }

    fn perimeter(&self, tool_offset: f64) -> f64 {
        ellipse_perimeter(self.radius_x + tool_offset, self.radius_y + tool_offset)
    }

    fn is_too_small(&self, tool_offset: f64) -> bool {
        self.radius_x <= 0.0
            || self.radius_y <= 0.0
            || self.radius_x + tool_offset <= 0.0
            || self.radius_y + tool_offset <= 0.0
    }
}
