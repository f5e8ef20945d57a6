//! Profile geometry: tool-compensated outlines for each shape family.
//!
//! Every provider produces closed contours whose first point is the
//! canonical start. A clockwise contour is the counter-clockwise one walked
//! backwards from the same start, so both directions plunge in one place.

mod circle;
mod dxf;
mod ellipse;
mod polygon;
mod rectangle;
mod rounded_rectangle;

pub use circle::CircleProfile;
pub use dxf::DxfProfile;
pub use ellipse::EllipseProfile;
pub use polygon::PolygonProfile;
pub use rectangle::RectangleProfile;
pub use rounded_rectangle::RoundedRectangleProfile;

use super::{ArcSegment, Contour, ContourPath, Point};
use crate::operation::MillingDirection;

/// Chords used for a full curve regardless of how short it is.
pub(crate) const MIN_CURVE_SEGMENTS: usize = 16;

/// Geometry capable of producing an offset outline.
///
/// `tool_offset` is signed: positive grows the shape, negative shrinks it.
pub trait ProfileGeometry {
    /// Closed outline walked in `direction`, starting at the canonical start.
    fn contour_points(&self, tool_offset: f64, direction: MillingDirection) -> Contour;

    /// The first point of the outline at this offset.
    fn start_point(&self, tool_offset: f64) -> Option<Point> {
        self.contour_points(tool_offset, MillingDirection::CounterClockwise)
            .first()
    }

    /// Point `distance` along the counter-clockwise outline from the start.
    /// Negative distances walk clockwise.
    fn point_on_contour(&self, distance: f64, tool_offset: f64) -> Option<Point> {
        self.contour_points(tool_offset, MillingDirection::CounterClockwise)
            .point_at_distance(distance)
    }

    fn perimeter(&self, tool_offset: f64) -> f64 {
        self.contour_points(tool_offset, MillingDirection::CounterClockwise)
            .perimeter()
    }

    /// Outline as lines and arcs. Shapes without arcs return the contour's
    /// chords.
    fn path(&self, tool_offset: f64, direction: MillingDirection) -> Option<ContourPath> {
        ContourPath::from_contour(&self.contour_points(tool_offset, direction))
    }

    /// Exact arcs of the counter-clockwise outline.
    fn arc_segments(&self, _tool_offset: f64) -> Vec<ArcSegment> {
        Vec::new()
    }

    fn supports_arcs(&self) -> bool {
        false
    }

    /// Whether the outline vanishes (or turns inside out) at this offset.
    fn is_too_small(&self, tool_offset: f64) -> bool;
}

/// Profile geometry for any supported shape.
#[derive(Debug, Clone)]
pub enum Profile {
    Circle(CircleProfile),
    Ellipse(EllipseProfile),
    Rectangle(RectangleProfile),
    RoundedRectangle(RoundedRectangleProfile),
    Polygon(PolygonProfile),
    Dxf(DxfProfile),
}

impl Profile {
    fn inner(&self) -> &dyn ProfileGeometry {
        match self {
            Profile::Circle(p) => p,
            Profile::Ellipse(p) => p,
            Profile::Rectangle(p) => p,
            Profile::RoundedRectangle(p) => p,
            Profile::Polygon(p) => p,
            Profile::Dxf(p) => p,
        }
    }
}

impl ProfileGeometry for Profile {
    fn contour_points(&self, tool_offset: f64, direction: MillingDirection) -> Contour {
        self.inner().contour_points(tool_offset, direction)
    }

    fn start_point(&self, tool_offset: f64) -> Option<Point> {
        self.inner().start_point(tool_offset)
    }

    fn point_on_contour(&self, distance: f64, tool_offset: f64) -> Option<Point> {
        self.inner().point_on_contour(distance, tool_offset)
    }

    fn perimeter(&self, tool_offset: f64) -> f64 {
        self.inner().perimeter(tool_offset)
    }

    fn path(&self, tool_offset: f64, direction: MillingDirection) -> Option<ContourPath> {
        self.inner().path(tool_offset, direction)
    }

    fn arc_segments(&self, tool_offset: f64) -> Vec<ArcSegment> {
        self.inner().arc_segments(tool_offset)
    }

    fn supports_arcs(&self) -> bool {
        self.inner().supports_arcs()
    }

    fn is_too_small(&self, tool_offset: f64) -> bool {
        self.inner().is_too_small(tool_offset)
    }
}

/// Counter-clockwise points, reversed in place for clockwise walks.
pub(crate) fn oriented(ccw: Vec<Point>, direction: MillingDirection) -> Contour {
    let contour = Contour::closed(ccw);
    match direction {
        MillingDirection::CounterClockwise => contour,
        MillingDirection::Clockwise => contour.reversed(),
    }
}
