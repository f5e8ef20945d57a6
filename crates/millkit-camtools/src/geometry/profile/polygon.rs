use std::f64::consts::PI;

use super::{oriented, ProfileGeometry};
use crate::geometry::{Contour, Point};
use crate::operation::{MillingDirection, PolygonShape};

/// Regular polygon outline starting at vertex zero.
///
/// The offset moves every edge along its normal, so the circumradius grows
/// by `offset / cos(PI / sides)`.
#[derive(Debug, Clone)]
pub struct PolygonProfile {
    pub center: Point,
    pub radius: f64,
    pub sides: u32,
    pub rotation: f64,
}

impl PolygonProfile {
    pub fn new(shape: &PolygonShape) -> Self {
        Self {
            center: shape.center,
            radius: shape.radius,
            sides: shape.sides,
            rotation: shape.rotation,
        }
    }

    fn offset_radius(&self, tool_offset: f64) -> f64 {
        let half_angle = PI / self.sides.max(3) as f64;
        let apothem = self.radius * half_angle.cos();
        (apothem + tool_offset) / half_angle.cos()
    }
}

impl ProfileGeometry for PolygonProfile {
    fn contour_points(&self, tool_offset: f64, direction: MillingDirection) -> Contour {
        if self.sides < 3 {
            return Contour::empty();
        }
        let radius = self.offset_radius(tool_offset);
        let n = self.sides as usize;
        let base = self.rotation.to_radians();
        let step = 2.0 * PI / n as f64;
        let points = (0..n)
            .map(|k| {
                let angle = base + step * k as f64;
                Point::new(
                    self.center.x + radius * angle.cos(),
                    self.center.y + radius * angle.sin(),
                )
            })
            .collect();
        oriented(points, direction)
    }

    fn perimeter(&self, tool_offset: f64) -> f64 {
        if self.sides < 3 {
            return 0.0;
        }
        let n = self.sides as f64;
        n * 2.0 * self.offset_radius(tool_offset) * (PI / n).sin()
    }

    fn is_too_small(&self, tool_offset: f64) -> bool {
        self.sides < 3 || self.radius <= 0.0 || self.offset_radius(tool_offset) <= 0.0
    }
}
