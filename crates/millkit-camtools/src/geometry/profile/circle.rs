use std::f64::consts::PI;

use super::{ProfileGeometry, MIN_CURVE_SEGMENTS};
use crate::geometry::{ArcSegment, Contour, ContourPath, PathElement, Point};
use crate::math::segment_count;
use crate::operation::{CircleShape, MillingDirection};

/// Circle outline starting at angle zero (the +X side).
#[derive(Debug, Clone)]
pub struct CircleProfile {
    pub center: Point,
    pub radius: f64,
    pub max_segment_length: f64,
}

impl CircleProfile {
    pub fn new(shape: &CircleShape, max_segment_length: f64) -> Self {
        Self {
            center: shape.center,
            radius: shape.radius,
            max_segment_length,
        }
    }

    fn at(&self, radius: f64, angle: f64) -> Point {
        Point::new(
            self.center.x + radius * angle.cos(),
            self.center.y + radius * angle.sin(),
        )
    }
}

impl ProfileGeometry for CircleProfile {
    fn contour_points(&self, tool_offset: f64, direction: MillingDirection) -> Contour {
        let radius = self.radius + tool_offset;
        let n = segment_count(
            2.0 * PI * radius,
            self.max_segment_length,
            MIN_CURVE_SEGMENTS,
        );
        let step = direction.sign() * 2.0 * PI / n as f64;
        let start = self.at(radius, 0.0);
        let mut points: Vec<Point> = (0..n).map(|k| self.at(radius, step * k as f64)).collect();
        points.push(start);
        Contour::new(points)
    }

    fn perimeter(&self, tool_offset: f64) -> f64 {
        2.0 * PI * (self.radius + tool_offset)
    }

    fn path(&self, tool_offset: f64, direction: MillingDirection) -> Option<ContourPath> {
        let arcs = self.arc_segments(tool_offset);
        let (first, second) = (arcs.first()?, arcs.get(1)?);
        let elements = match direction {
            MillingDirection::CounterClockwise => vec![
                PathElement::Arc(*first),
                PathElement::Arc(*second),
            ],
            MillingDirection::Clockwise => vec![
                PathElement::Arc(second.reversed()),
                PathElement::Arc(first.reversed()),
            ],
        };
        Some(ContourPath {
            start: first.start,
            elements,
        })
    }

    fn arc_segments(&self, tool_offset: f64) -> Vec<ArcSegment> {
        let radius = self.radius + tool_offset;
        let start = self.at(radius, 0.0);
        let mid = self.at(radius, PI);
        let ccw = MillingDirection::CounterClockwise;
        vec![
            ArcSegment::new(start, mid, self.center, ccw),
            ArcSegment::new(mid, start, self.center, ccw),
        ]
    }

    fn supports_arcs(&self) -> bool {
        true
    }

    fn is_too_small(&self, tool_offset: f64) -> bool {
        self.radius <= 0.0 || self.radius + tool_offset <= 0.0
    }
}
