use super::{oriented, ProfileGeometry};
use crate::geometry::{local_to_world, Contour, Point};
use crate::operation::{MillingDirection, RectangleShape};

/// Rectangle outline starting at the bottom-left corner of its own frame.
///
/// Offsets move the edges without rounding the corners.
#[derive(Debug, Clone)]
pub struct RectangleProfile {
    pub center: Point,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
}

impl RectangleProfile {
    pub fn new(shape: &RectangleShape) -> Self {
        Self {
            center: shape.center,
            width: shape.width,
            height: shape.height,
            rotation: shape.rotation,
        }
    }

    fn half_extents(&self, tool_offset: f64) -> (f64, f64) {
        (
            self.width / 2.0 + tool_offset,
            self.height / 2.0 + tool_offset,
        )
    }
}

impl ProfileGeometry for RectangleProfile {
    fn contour_points(&self, tool_offset: f64, direction: MillingDirection) -> Contour {
        let (hw, hh) = self.half_extents(tool_offset);
        let corners = [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)]
            .into_iter()
            .map(|(x, y)| local_to_world(self.center, x, y, self.rotation))
            .collect();
        oriented(corners, direction)
    }

    fn perimeter(&self, tool_offset: f64) -> f64 {
        let (hw, hh) = self.half_extents(tool_offset);
        4.0 * (hw + hh)
    }

    fn is_too_small(&self, tool_offset: f64) -> bool {
        let (hw, hh) = self.half_extents(tool_offset);
        self.width <= 0.0 || self.height <= 0.0 || hw <= 0.0 || hh <= 0.0
    }
}
