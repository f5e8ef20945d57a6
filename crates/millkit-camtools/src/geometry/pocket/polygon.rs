use std::f64::consts::PI;

use super::{at_least_min, narrower_than_threshold, raised_floor, PocketGeometry};
use crate::geometry::{polygon as engine, Contour, Point};
use crate::operation::{PocketOperation, PolygonShape, Shape};

/// Regular polygon pocket. Sizes are tracked by circumradius; wall offsets
/// are applied to the apothem so every edge moves by the same distance.
#[derive(Debug, Clone)]
pub struct PolygonPocket {
    op: PocketOperation,
    center: Point,
    radius: f64,
    sides: u32,
    rotation: f64,
}

impl PolygonPocket {
    pub fn new(op: &PocketOperation, shape: &PolygonShape) -> Self {
        Self {
            op: op.clone(),
            center: shape.center,
            radius: shape.radius,
            sides: shape.sides,
            rotation: shape.rotation,
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    fn cos_half_angle(&self) -> f64 {
        (PI / self.sides.max(3) as f64).cos()
    }

    fn compensated_apothem(&self, tool_radius: f64, taper_offset: f64) -> f64 {
        self.radius * self.cos_half_angle() - tool_radius - taper_offset
    }

    fn shrunk(&self, mut op: PocketOperation, allowance: f64) -> Self {
        let shape = PolygonShape {
            center: self.center,
            radius: self.radius - allowance / self.cos_half_angle(),
            sides: self.sides,
            rotation: self.rotation,
        };
        op.shape = Shape::Polygon(shape.clone());
        Self::new(&op, &shape)
    }
}

impl PocketGeometry for PolygonPocket {
    fn operation(&self) -> &PocketOperation {
        &self.op
    }

    fn center(&self) -> Point {
        self.center
    }

    fn contour(&self, tool_radius: f64, taper_offset: f64) -> Contour {
        if self.sides < 3 {
            return Contour::empty();
        }
        let apothem = at_least_min(self.compensated_apothem(tool_radius, taper_offset));
        let radius = apothem / self.cos_half_angle();
        let n = self.sides as usize;
        let base = self.rotation.to_radians();
        let points = (0..n)
            .map(|k| {
                let angle = base + 2.0 * PI * k as f64 / n as f64;
                Point::new(
                    self.center.x + radius * angle.cos(),
                    self.center.y + radius * angle.sin(),
                )
            })
            .collect();
        Contour::closed(points)
    }

    fn is_point_inside(&self, point: Point, tool_radius: f64, taper_offset: f64) -> bool {
        engine::point_in_polygon(point, self.contour(tool_radius, taper_offset).points())
    }

    fn apply_roughing_allowance(&self, allowance: f64) -> Self {
        self.shrunk(raised_floor(&self.op, allowance), allowance)
    }

    fn apply_bottom_finishing_allowance(&self, allowance: f64) -> Self {
        self.shrunk(self.op.clone(), allowance)
    }

    fn is_too_small(&self) -> bool {
        self.sides < 3 || self.radius <= 0.0
    }

    fn is_contour_too_small(&self, tool_radius: f64, taper_offset: f64) -> bool {
        narrower_than_threshold(
            2.0 * self.compensated_apothem(tool_radius, taper_offset),
            tool_radius,
        )
    }
}
