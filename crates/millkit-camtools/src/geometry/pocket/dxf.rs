use super::{narrower_than_threshold, raised_floor, PocketGeometry};
use crate::geometry::{polygon, Contour, Point};
use crate::operation::{DxfShape, PocketOperation};

/// Smallest area a drawing contour may enclose and still be pocketed.
const MIN_AREA: f64 = 0.001 * 0.001;

/// Pocket bounded by the primary contour of an imported drawing.
///
/// Allowances accumulate in `extra_offset` and are applied together with
/// the tool radius, since the contour itself cannot be resized.
#[derive(Debug, Clone)]
pub struct DxfPocket {
    op: PocketOperation,
    primary: Vec<Point>,
    extra_offset: f64,
}

impl DxfPocket {
    pub fn new(op: &PocketOperation, shape: &DxfShape) -> Self {
        Self {
            op: op.clone(),
            primary: polygon::primary_contour(&shape.contours),
            extra_offset: 0.0,
        }
    }

    pub fn extra_offset(&self) -> f64 {
        self.extra_offset
    }

    fn inset(&self, tool_radius: f64, taper_offset: f64) -> f64 {
        tool_radius + taper_offset + self.extra_offset
    }
}

impl PocketGeometry for DxfPocket {
    fn operation(&self) -> &PocketOperation {
        &self.op
    }

    fn center(&self) -> Point {
        polygon::centroid(&self.primary)
    }

    fn contour(&self, tool_radius: f64, taper_offset: f64) -> Contour {
        if self.primary.len() < 3 {
            return Contour::empty();
        }
        Contour::new(polygon::offset_polygon(
            &self.primary,
            -self.inset(tool_radius, taper_offset),
        ))
    }

    fn is_point_inside(&self, point: Point, tool_radius: f64, taper_offset: f64) -> bool {
        polygon::point_in_polygon(point, self.contour(tool_radius, taper_offset).points())
    }

    fn apply_roughing_allowance(&self, allowance: f64) -> Self {
        Self {
            op: raised_floor(&self.op, allowance),
            primary: self.primary.clone(),
            extra_offset: self.extra_offset + allowance,
        }
    }

    fn apply_bottom_finishing_allowance(&self, allowance: f64) -> Self {
        Self {
            op: self.op.clone(),
            primary: self.primary.clone(),
            extra_offset: self.extra_offset + allowance,
        }
    }

    fn is_too_small(&self) -> bool {
        if self.primary.len() < 3 || polygon::signed_area(&self.primary) < MIN_AREA {
            return true;
        }
        self.extra_offset > 0.0 && polygon::inset_loops(&self.primary, self.extra_offset).is_empty()
    }

    fn is_contour_too_small(&self, tool_radius: f64, taper_offset: f64) -> bool {
        let inset = self.inset(tool_radius, taper_offset);
        let area = if inset > 0.0 {
            polygon::inset_loops(&self.primary, inset)
                .iter()
                .map(|ring| polygon::signed_area(ring))
                .fold(0.0, f64::max)
        } else {
            polygon::signed_area(&self.primary)
        };
        // Width of the circle with the same area.
        let equivalent_diameter = (4.0 * area.max(0.0) / std::f64::consts::PI).sqrt();
        narrower_than_threshold(equivalent_diameter, tool_radius)
    }
}
