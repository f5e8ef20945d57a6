use super::ProfileGeometry;
use crate::geometry::{local_to_world, ArcSegment, Contour, ContourPath, PathElement, Point};
use crate::operation::{CornerRadii, MillingDirection, RoundedRectangleShape};

/// Corner signs in walk order: bottom-left, bottom-right, top-right, top-left.
const CORNER_SIGNS: [(f64, f64); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

/// Offset corner radii smaller than this are sharp corners.
const SHARP_CORNER_RADIUS: f64 = 1e-9;

/// Rounded rectangle outline starting where the bottom edge leaves the
/// bottom-left corner.
///
/// Corner radii follow the offset and are capped by the half extents but
/// are not clamped at zero: an inside offset deeper than a corner radius
/// produces a reversed notch at that corner.
#[derive(Debug, Clone)]
pub struct RoundedRectangleProfile {
    pub center: Point,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub corner_radii: CornerRadii,
    pub max_segment_length: f64,
}

impl RoundedRectangleProfile {
    pub fn new(shape: &RoundedRectangleShape, max_segment_length: f64) -> Self {
        Self {
            center: shape.center,
            width: shape.width,
            height: shape.height,
            rotation: shape.rotation,
            corner_radii: shape.corner_radii,
            max_segment_length,
        }
    }

    fn world(&self, local: (f64, f64)) -> Point {
        local_to_world(self.center, local.0, local.1, self.rotation)
    }

    /// Counter-clockwise path at the given offset.
    fn ccw_path(&self, tool_offset: f64) -> ContourPath {
        let hw = self.width / 2.0 + tool_offset;
        let hh = self.height / 2.0 + tool_offset;
        let radii = self
            .corner_radii
            .as_array()
            .map(|r| (r + tool_offset).min(hw).min(hh))
            .map(|r| if r.abs() < SHARP_CORNER_RADIUS { 0.0 } else { r });
        let corners = CORNER_SIGNS.map(|(sx, sy)| (sx * hw, sy * hh));

        // Trimmed ends of edge i, which runs from corner i to corner i + 1.
        let edge_trims = |i: usize| -> ((f64, f64), (f64, f64)) {
            let a = corners[i];
            let b = corners[(i + 1) % 4];
            let len = (b.0 - a.0).hypot(b.1 - a.1);
            let (ux, uy) = if len > 0.0 {
                ((b.0 - a.0) / len, (b.1 - a.1) / len)
            } else {
                (0.0, 0.0)
            };
            let r_a = radii[i];
            let r_b = radii[(i + 1) % 4];
            (
                (a.0 + ux * r_a, a.1 + uy * r_a),
                (b.0 - ux * r_b, b.1 - uy * r_b),
            )
        };

        let start = self.world(edge_trims(0).0);
        let mut cursor = start;
        let mut elements = Vec::with_capacity(8);
        for i in 0..4 {
            let (_, edge_end) = edge_trims(i);
            let edge_end = self.world(edge_end);
            if cursor.distance_to(&edge_end) > 1e-12 {
                elements.push(PathElement::Line { end: edge_end });
                cursor = edge_end;
            }

            let c = (i + 1) % 4;
            let r = radii[c];
            if r.abs() < SHARP_CORNER_RADIUS {
                continue;
            }
            let (sx, sy) = CORNER_SIGNS[c];
            let arc_center = self.world((sx * (hw - r), sy * (hh - r)));
            let arc_end = self.world(edge_trims(c).0);
            elements.push(PathElement::Arc(ArcSegment::new(
                cursor,
                arc_end,
                arc_center,
                MillingDirection::CounterClockwise,
            )));
            cursor = arc_end;
        }
        ContourPath { start, elements }
    }
}

impl ProfileGeometry for RoundedRectangleProfile {
    fn contour_points(&self, tool_offset: f64, direction: MillingDirection) -> Contour {
        match self.path(tool_offset, direction) {
            Some(path) => Contour::closed(path.to_contour(self.max_segment_length).into_points()),
            None => Contour::empty(),
        }
    }

    fn start_point(&self, tool_offset: f64) -> Option<Point> {
        Some(self.ccw_path(tool_offset).start)
    }

    fn perimeter(&self, tool_offset: f64) -> f64 {
        self.ccw_path(tool_offset).length()
    }

    fn path(&self, tool_offset: f64, direction: MillingDirection) -> Option<ContourPath> {
        let path = self.ccw_path(tool_offset);
        Some(match direction {
            MillingDirection::CounterClockwise => path,
            MillingDirection::Clockwise => path.reversed(),
        })
    }

    fn arc_segments(&self, tool_offset: f64) -> Vec<ArcSegment> {
        self.ccw_path(tool_offset).arcs()
    }

    fn supports_arcs(&self) -> bool {
        true
    }

    fn is_too_small(&self, tool_offset: f64) -> bool {
        self.width <= 0.0
            || self.height <= 0.0
            || self.width / 2.0 + tool_offset <= 0.0
            || self.height / 2.0 + tool_offset <= 0.0
    }
}
