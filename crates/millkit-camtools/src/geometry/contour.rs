//! Contours, arc segments and mixed line/arc paths.

use std::f64::consts::PI;

use super::{polygon, Point, CLOSE_TOLERANCE};
use crate::math::segment_count;
use crate::operation::MillingDirection;

/// An ordered list of points tracing a boundary.
///
/// Contours produced by the geometry providers are explicitly closed: the
/// last point repeats the first. An empty contour is the "no geometry"
/// sentinel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Contour {
    points: Vec<Point>,
}

impl Contour {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn empty() -> Self {
        Self { points: Vec::new() }
    }

    /// Builds a contour and appends the first point if the ends drifted apart.
    pub fn closed(points: Vec<Point>) -> Self {
        Self {
            points: polygon::close_polygon(points),
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(a), Some(b)) if self.points.len() > 1 => a.distance_to(b) <= CLOSE_TOLERANCE,
            _ => false,
        }
    }

    /// Shoelace area, positive for counter-clockwise contours.
    pub fn signed_area(&self) -> f64 {
        polygon::signed_area(&self.points)
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn is_clockwise(&self) -> bool {
        self.signed_area() < 0.0
    }

    /// Sum of chord lengths along the point list.
    pub fn perimeter(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| w[0].distance_to(&w[1]))
            .sum()
    }

    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }

    pub fn contains(&self, point: Point) -> bool {
        polygon::point_in_polygon(point, &self.points)
    }

    /// Axis-aligned bounds as `(min, max)`.
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let first = self.first()?;
        let (min, max) = self.points.iter().fold((first, first), |(min, max), p| {
            (
                Point::new(min.x.min(p.x), min.y.min(p.y)),
                Point::new(max.x.max(p.x), max.y.max(p.y)),
            )
        });
        Some((min, max))
    }

    /// Walks `distance` along the point list from the first point.
    ///
    /// Distances wrap around the perimeter; negative distances walk backwards.
    pub fn point_at_distance(&self, distance: f64) -> Option<Point> {
        let first = self.first()?;
        let perimeter = self.perimeter();
        if perimeter <= f64::EPSILON || !distance.is_finite() {
            return Some(first);
        }
        let mut remaining = distance.rem_euclid(perimeter);
        for w in self.points.windows(2) {
            let len = w[0].distance_to(&w[1]);
            if len <= f64::EPSILON {
                continue;
            }
            if remaining <= len {
                return Some(w[0].lerp(&w[1], remaining / len));
            }
            remaining -= len;
        }
        self.last()
    }
}

/// A circular arc between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSegment {
    pub start: Point,
    pub end: Point,
    pub center: Point,
    pub radius: f64,
    pub direction: MillingDirection,
}

impl ArcSegment {
    pub fn new(start: Point, end: Point, center: Point, direction: MillingDirection) -> Self {
        Self {
            start,
            end,
            center,
            radius: center.distance_to(&start),
            direction,
        }
    }

    /// Signed sweep in radians; positive is counter-clockwise.
    ///
    /// Coincident start and end points describe a full circle.
    pub fn sweep(&self) -> f64 {
        let a0 = (self.start.y - self.center.y).atan2(self.start.x - self.center.x);
        let a1 = (self.end.y - self.center.y).atan2(self.end.x - self.center.x);
        let mut sweep = a1 - a0;
        match self.direction {
            MillingDirection::CounterClockwise => {
                if sweep <= 1e-12 {
                    sweep += 2.0 * PI;
                }
            }
            MillingDirection::Clockwise => {
                if sweep >= -1e-12 {
                    sweep -= 2.0 * PI;
                }
            }
        }
        sweep
    }

    pub fn length(&self) -> f64 {
        self.sweep().abs() * self.radius
    }

    pub fn reversed(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
            center: self.center,
            radius: self.radius,
            direction: self.direction.reversed(),
        }
    }

    /// Offset of the center from the start point, as G-code `I`/`J` words use it.
    pub fn center_offset(&self) -> (f64, f64) {
        (self.center.x - self.start.x, self.center.y - self.start.y)
    }

    /// Chord points after `start`, ending exactly at `end`.
    pub fn flatten(&self, max_segment_length: f64) -> Vec<Point> {
        let sweep = self.sweep();
        let steps = segment_count(sweep.abs() * self.radius, max_segment_length, 1);
        let a0 = (self.start.y - self.center.y).atan2(self.start.x - self.center.x);
        let mut points: Vec<Point> = (1..steps)
            .map(|i| {
                let angle = a0 + sweep * i as f64 / steps as f64;
                Point::new(
                    self.center.x + self.radius * angle.cos(),
                    self.center.y + self.radius * angle.sin(),
                )
            })
            .collect();
        points.push(self.end);
        points
    }
}

/// One step of a [`ContourPath`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathElement {
    Line { end: Point },
    Arc(ArcSegment),
}

impl PathElement {
    pub fn end(&self) -> Point {
        match self {
            PathElement::Line { end } => *end,
            PathElement::Arc(arc) => arc.end,
        }
    }
}

/// A closed path made of lines and arcs, starting at `start`.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourPath {
    pub start: Point,
    pub elements: Vec<PathElement>,
}

impl ContourPath {
    /// A line-only path through the contour's points.
    pub fn from_contour(contour: &Contour) -> Option<Self> {
        let (start, rest) = contour.points().split_first()?;
        Some(Self {
            start: *start,
            elements: rest.iter().map(|&end| PathElement::Line { end }).collect(),
        })
    }

    /// The same path traversed the other way.
    pub fn reversed(&self) -> Self {
        let mut starts = Vec::with_capacity(self.elements.len());
        let mut cursor = self.start;
        for element in &self.elements {
            starts.push(cursor);
            cursor = element.end();
        }
        let elements = self
            .elements
            .iter()
            .zip(starts)
            .rev()
            .map(|(element, from)| match element {
                PathElement::Line { .. } => PathElement::Line { end: from },
                PathElement::Arc(arc) => PathElement::Arc(arc.reversed()),
            })
            .collect();
        Self {
            start: cursor,
            elements,
        }
    }

    pub fn length(&self) -> f64 {
        let mut cursor = self.start;
        let mut total = 0.0;
        for element in &self.elements {
            total += match element {
                PathElement::Line { end } => cursor.distance_to(end),
                PathElement::Arc(arc) => arc.length(),
            };
            cursor = element.end();
        }
        total
    }

    pub fn arcs(&self) -> Vec<ArcSegment> {
        self.elements
            .iter()
            .filter_map(|e| match e {
                PathElement::Arc(arc) => Some(*arc),
                PathElement::Line { .. } => None,
            })
            .collect()
    }

    /// Flattens arcs into chords no longer than `max_segment_length`.
    pub fn to_contour(&self, max_segment_length: f64) -> Contour {
        let mut points = vec![self.start];
        for element in &self.elements {
            match element {
                PathElement::Line { end } => points.push(*end),
                PathElement::Arc(arc) => points.extend(arc.flatten(max_segment_length)),
            }
        }
        Contour::new(points)
    }
}
