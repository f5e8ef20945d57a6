use super::ProfileGeometry;
use crate::geometry::{polygon, Contour, Point};
use crate::operation::{DxfShape, MillingDirection};

/// Outline of the primary contour of an imported drawing.
#[derive(Debug, Clone)]
pub struct DxfProfile {
    /// Counter-clockwise open ring; empty when the drawing has no usable
    /// closed contour.
    pub primary: Vec<Point>,
}

impl DxfProfile {
    pub fn new(shape: &DxfShape) -> Self {
        Self {
            primary: polygon::primary_contour(&shape.contours),
        }
    }
}

impl ProfileGeometry for DxfProfile {
    fn contour_points(&self, tool_offset: f64, direction: MillingDirection) -> Contour {
        if self.primary.len() < 3 {
            return Contour::empty();
        }
        let contour = Contour::new(polygon::offset_polygon(&self.primary, tool_offset));
        match direction {
            MillingDirection::CounterClockwise => contour,
            MillingDirection::Clockwise => contour.reversed(),
        }
    }

    fn is_too_small(&self, tool_offset: f64) -> bool {
        if self.primary.len() < 3 {
            return true;
        }
        // Outward offsets always leave an outline.
        tool_offset < 0.0 && polygon::inset_loops(&self.primary, -tool_offset).is_empty()
    }
}
