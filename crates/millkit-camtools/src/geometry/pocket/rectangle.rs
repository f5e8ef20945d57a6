use super::{at_least_min, narrower_than_threshold, raised_floor, PocketGeometry};
use crate::geometry::{local_to_world, world_to_local, Contour, Point};
use crate::operation::{PocketOperation, RectangleShape, Shape};

#[derive(Debug, Clone)]
pub struct RectanglePocket {
    op: PocketOperation,
    center: Point,
    width: f64,
    height: f64,
    rotation: f64,
}

impl RectanglePocket {
    pub fn new(op: &PocketOperation, shape: &RectangleShape) -> Self {
        Self {
            op: op.clone(),
            center: shape.center,
            width: shape.width,
            height: shape.height,
            rotation: shape.rotation,
        }
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn compensated_half_extents(&self, tool_radius: f64, taper_offset: f64) -> (f64, f64) {
        let shrink = tool_radius + taper_offset;
        (self.width / 2.0 - shrink, self.height / 2.0 - shrink)
    }

    fn shrunk(&self, mut op: PocketOperation, allowance: f64) -> Self {
        let shape = RectangleShape {
            center: self.center,
            width: self.width - 2.0 * allowance,
            height: self.height - 2.0 * allowance,
            rotation: self.rotation,
        };
        op.shape = Shape::Rectangle(shape.clone());
        Self::new(&op, &shape)
    }
}

impl PocketGeometry for RectanglePocket {
    fn operation(&self) -> &PocketOperation {
        &self.op
    }

    fn center(&self) -> Point {
        self.center
    }

    fn contour(&self, tool_radius: f64, taper_offset: f64) -> Contour {
        let (hw, hh) = self.compensated_half_extents(tool_radius, taper_offset);
        let (hw, hh) = (at_least_min(hw), at_least_min(hh));
        let points = [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)]
            .into_iter()
            .map(|(x, y)| local_to_world(self.center, x, y, self.rotation))
            .collect();
        Contour::closed(points)
    }

    fn is_point_inside(&self, point: Point, tool_radius: f64, taper_offset: f64) -> bool {
        let (hw, hh) = self.compensated_half_extents(tool_radius, taper_offset);
        let (lx, ly) = world_to_local(self.center, point, self.rotation);
        lx.abs() <= at_least_min(hw) && ly.abs() <= at_least_min(hh)
    }

    fn apply_roughing_allowance(&self, allowance: f64) -> Self {
        self.shrunk(raised_floor(&self.op, allowance), allowance)
    }

    fn apply_bottom_finishing_allowance(&self, allowance: f64) -> Self {
        self.shrunk(self.op.clone(), allowance)
    }

    fn is_too_small(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    fn is_contour_too_small(&self, tool_radius: f64, taper_offset: f64) -> bool {
        let (hw, hh) = self.compensated_half_extents(tool_radius, taper_offset);
        narrower_than_threshold(2.0 * hw.min(hh), tool_radius)
    }
}
