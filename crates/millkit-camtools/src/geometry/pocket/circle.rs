use std::f64::consts::PI;

use super::{at_least_min, curve_segments, narrower_than_threshold, raised_floor, PocketGeometry};
use crate::geometry::{Contour, Point};
use crate::operation::{CircleShape, PocketOperation, Shape};

#[derive(Debug, Clone)]
pub struct CirclePocket {
    op: PocketOperation,
    center: Point,
    radius: f64,
}

impl CirclePocket {
    pub fn new(op: &PocketOperation, shape: &CircleShape) -> Self {
        Self {
            op: op.clone(),
            center: shape.center,
            radius: shape.radius,
        }
    }

    fn shrunk(&self, mut op: PocketOperation, allowance: f64) -> Self {
        let shape = CircleShape {
            center: self.center,
            radius: self.radius - allowance,
        };
        op.shape = Shape::Circle(shape.clone());
        Self::new(&op, &shape)
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    fn compensated_radius(&self, tool_radius: f64, taper_offset: f64) -> f64 {
        self.radius - tool_radius - taper_offset
    }
}

impl PocketGeometry for CirclePocket {
    fn operation(&self) -> &PocketOperation {
        &self.op
    }

    fn center(&self) -> Point {
        self.center
    }

    fn contour(&self, tool_radius: f64, taper_offset: f64) -> Contour {
        let r = at_least_min(self.compensated_radius(tool_radius, taper_offset));
        let n = curve_segments(2.0 * PI * r);
        let points = (0..n)
            .map(|k| {
                let angle = 2.0 * PI * k as f64 / n as f64;
                Point::new(self.center.x + r * angle.cos(), self.center.y + r * angle.sin())
            })
            .collect();
        Contour::closed(points)
    }

    fn is_point_inside(&self, point: Point, tool_radius: f64, taper_offset: f64) -> bool {
        let r = at_least_min(self.compensated_radius(tool_radius, taper_offset));
        self.center.distance_to(&point) <= r
    }

    fn apply_roughing_allowance(&self, allowance: f64) -> Self {
        self.shrunk(raised_floor(&self.op, allowance), allowance)
    }

    fn apply_bottom_finishing_allowance(&self, allowance: f64) -> Self {
        self.shrunk(self.op.clone(), allowance)
    }

    fn is_too_small(&self) -> bool {
        self.radius <= 0.0
    }

    fn is_contour_too_small(&self, tool_radius: f64, taper_offset: f64) -> bool {
        narrower_than_threshold(
            2.0 * self.compensated_radius(tool_radius, taper_offset),
            tool_radius,
        )
    }
}
