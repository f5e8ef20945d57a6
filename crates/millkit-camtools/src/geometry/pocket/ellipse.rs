use std::f64::consts::PI;

use super::{at_least_min, curve_segments, narrower_than_threshold, raised_floor, PocketGeometry};
use crate::geometry::{local_to_world, world_to_local, Contour, Point};
use crate::math::ellipse_perimeter;
use crate::operation::{EllipseShape, PocketOperation, Shape};

#[derive(Debug, Clone)]
pub struct EllipsePocket {
    op: PocketOperation,
    center: Point,
    radius_x: f64,
    radius_y: f64,
    rotation: f64,
}

impl EllipsePocket {
    pub fn new(op: &PocketOperation, shape: &EllipseShape) -> Self {
        Self {
            op: op.clone(),
            center: shape.center,
            radius_x: shape.radius_x,
            radius_y: shape.radius_y,
            rotation: shape.rotation,
        }
    }

    pub fn radii(&self) -> (f64, f64) {
        (self.radius_x, self.radius_y)
    }

    fn compensated_radii(&self, tool_radius: f64, taper_offset: f64) -> (f64, f64) {
        let shrink = tool_radius + taper_offset;
        (self.radius_x - shrink, self.radius_y - shrink)
    }

    fn shrunk(&self, mut op: PocketOperation, allowance: f64) -> Self {
        let shape = EllipseShape {
            center: self.center,
            radius_x: self.radius_x - allowance,
            radius_y: self.radius_y - allowance,
            rotation: self.rotation,
        };
        op.shape = Shape::Ellipse(shape.clone());
        Self::new(&op, &shape)
    }
}

impl PocketGeometry for EllipsePocket {
    fn operation(&self) -> &PocketOperation {
        &self.op
    }

    fn center(&self) -> Point {
        self.center
    }

    fn contour(&self, tool_radius: f64, taper_offset: f64) -> Contour {
        let (a, b) = self.compensated_radii(tool_radius, taper_offset);
        let (a, b) = (at_least_min(a), at_least_min(b));
        let n = curve_segments(ellipse_perimeter(a, b));
        let points = (0..n)
            .map(|k| {
                let t = 2.0 * PI * k as f64 / n as f64;
                local_to_world(self.center, a * t.cos(), b * t.sin(), self.rotation)
            })
            .collect();
        Contour::closed(points)
    }

    fn is_point_inside(&self, point: Point, tool_radius: f64, taper_offset: f64) -> bool {
        let (a, b) = self.compensated_radii(tool_radius, taper_offset);
        let (a, b) = (at_least_min(a), at_least_min(b));
        let (lx, ly) = world_to_local(self.center, point, self.rotation);
        (lx / a).powi(2) + (ly / b).powi(2) <= 1.0
    }

    fn apply_roughing_allowance(&self, allowance: f64) -> Self {
        self.shrunk(raised_floor(&self.op, allowance), allowance)
    }

    fn apply_bottom_finishing_allowance(&self, allowance: f64) -> Self {
        self.shrunk(self.op.clone(), allowance)
    }

    fn is_too_small(&self) -> bool {
        self.radius_x <= 0.0 || self.radius_y <= 0.0
    }

    fn is_contour_too_small(&self, tool_radius: f64, taper_offset: f64) -> bool {
        let (a, b) = self.compensated_radii(tool_radius, taper_offset);
        narrower_than_threshold(2.0 * a.min(b), tool_radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pocket() -> EllipsePocket {
        let shape = EllipseShape {
            center: Point::new(0.0, 0.0),
            radius_x: 10.0,
            radius_y: 4.0,
            rotation: 90.0,
        };
        let op = PocketOperation::new("ellipse", Shape::Ellipse(shape.clone()));
        EllipsePocket::new(&op, &shape)
    }

    #[test]
    fn test_rotation_applies_to_inside_test() {
        let p = pocket();
        // Rotated 90 degrees, the long axis runs along Y.
        assert!(p.is_point_inside(Point::new(0.0, 8.0), 1.0, 0.0));
        assert!(!p.is_point_inside(Point::new(8.0, 0.0), 1.0, 0.0));
    }

    #[test]
    fn test_contour_points_inside_boundary() {
        let p = pocket();
        let contour = p.contour(1.0, 0.5);
        assert!(contour.is_closed());
        for point in contour.points() {
            assert!(p.is_point_inside(*point, 1.0, 0.4));
        }
    }

    #[test]
    fn test_allowance_shrinks_both_radii() {
        let p = pocket().apply_roughing_allowance(1.0);
        assert_eq!(p.radii(), (9.0, 3.0));
        assert!(matches!(
            p.operation().shape,
            Shape::Ellipse(EllipseShape { radius_x, radius_y, .. })
                if radius_x == 9.0 && radius_y == 3.0
        ));
        assert_eq!(p.operation().cutting.total_depth, 0.0);
        assert!(pocket().apply_bottom_finishing_allowance(4.0).is_too_small());
    }

    #[test]
    fn test_narrow_axis_limits_contour() {
        let p = pocket();
        assert!(p.is_contour_too_small(3.99, 0.0));
        assert!(!p.is_contour_too_small(3.0, 0.0));
    }
}
