//! Polygon offset and containment engine.
//!
//! Offsets move every vertex along its corner bisector so parallel edges
//! end up exactly `|offset|` apart (a miter join). Sharp corners are limited
//! to [`MITER_LIMIT`] times the offset. Inputs may be open rings or closed
//! lists that repeat the first point; outputs are always closed.

use std::panic;

use cavalier_contours::polyline::{PlineSource, PlineSourceMut, PlineVertex, Polyline};
use tracing::warn;

use super::{Point, CLOSE_TOLERANCE};

/// Maximum vertex displacement as a multiple of the offset distance.
pub const MITER_LIMIT: f64 = 4.0;

/// Shoelace area, positive for counter-clockwise winding.
pub fn signed_area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice / 2.0
}

pub fn is_clockwise(points: &[Point]) -> bool {
    signed_area(points) < 0.0
}

/// Appends the first point when the last one is not already on it.
pub fn close_polygon(mut points: Vec<Point>) -> Vec<Point> {
    if let (Some(first), Some(last)) = (points.first().copied(), points.last().copied()) {
        if points.len() > 1 && first.distance_to(&last) > CLOSE_TOLERANCE {
            points.push(first);
        }
    }
    points
}

/// Drops a trailing point that repeats the first.
pub fn open_ring(points: &[Point]) -> Vec<Point> {
    let mut ring = points.to_vec();
    while ring.len() > 1 {
        match (ring.first(), ring.last()) {
            (Some(a), Some(b)) if a.distance_to(b) <= CLOSE_TOLERANCE => {
                ring.pop();
            }
            _ => break,
        }
    }
    ring
}

/// Vertex average of an open ring.
pub fn centroid(points: &[Point]) -> Point {
    let ring = open_ring(points);
    if ring.is_empty() {
        return Point::default();
    }
    let n = ring.len() as f64;
    let (sx, sy) = ring.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point::new(sx / n, sy / n)
}

/// Even-odd ray casting test. Works on open or closed point lists.
pub fn point_in_polygon(point: Point, polygon: &[Point]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = polygon[i];
        let pj = polygon[j];
        if (pi.y > point.y) != (pj.y > point.y)
            && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Picks the contour enclosing the largest area and winds it
/// counter-clockwise. Contours with fewer than three distinct points are
/// ignored.
pub fn primary_contour(contours: &[Vec<Point>]) -> Vec<Point> {
    let mut best: Option<(f64, Vec<Point>)> = None;
    for contour in contours {
        let ring = open_ring(contour);
        if ring.len() < 3 {
            continue;
        }
        let area = signed_area(&ring);
        if best.as_ref().map_or(true, |(a, _)| area.abs() > a.abs()) {
            best = Some((area, ring));
        }
    }
    match best {
        Some((area, mut ring)) => {
            if area < 0.0 {
                ring.reverse();
            }
            ring
        }
        None => Vec::new(),
    }
}

/// Offsets a polygon outward (`offset > 0`) or inward (`offset < 0`).
///
/// Polygons with fewer than three distinct vertices come back unchanged
/// (closed). Large inward offsets are not clipped and can turn the polygon
/// inside out; [`inset_loops`] tells whether anything is left.
pub fn offset_polygon(points: &[Point], offset: f64) -> Vec<Point> {
    let ring = open_ring(points);
    let n = ring.len();
    if n < 3 || offset == 0.0 || !offset.is_finite() {
        return close_polygon(ring);
    }

    // Left normals point inward on a counter-clockwise ring.
    let flip = is_clockwise(&ring) != (offset > 0.0);
    let distance = offset.abs();

    let edge_normal = |from: Point, to: Point| -> Option<(f64, f64)> {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let len = dx.hypot(dy);
        if len <= f64::EPSILON {
            return None;
        }
        let (nx, ny) = (-dy / len, dx / len);
        Some(if flip { (-nx, -ny) } else { (nx, ny) })
    };

    let shifted = (0..n)
        .map(|i| {
            let prev = ring[(i + n - 1) % n];
            let cur = ring[i];
            let next = ring[(i + 1) % n];
            let (n1, n2) = match (edge_normal(prev, cur), edge_normal(cur, next)) {
                (Some(a), Some(b)) => (a, b),
                (Some(a), None) => (a, a),
                (None, Some(b)) => (b, b),
                (None, None) => return cur,
            };

            let (bx, by) = (n1.0 + n2.0, n1.1 + n2.1);
            let blen = bx.hypot(by);
            let (bx, by) = if blen <= 1e-12 { n1 } else { (bx / blen, by / blen) };

            let cos_half = (bx * n1.0 + by * n1.1).max(1.0 / MITER_LIMIT);
            let scale = distance / cos_half;
            Point::new(cur.x + bx * scale, cur.y + by * scale)
        })
        .collect();

    close_polygon(shifted)
}

/// Converts a point list into a closed cavalier polyline wound clockwise.
fn to_clockwise_polyline(points: &[Point]) -> Polyline<f64> {
    let mut ring = open_ring(points);
    if !is_clockwise(&ring) {
        ring.reverse();
    }
    let mut polyline = Polyline::new();
    for p in ring {
        polyline.add_vertex(PlineVertex::new(p.x, p.y, 0.0));
    }
    polyline.set_is_closed(true);
    polyline
}

/// Insets a closed boundary with the robust offsetter, returning every
/// resulting loop counter-clockwise and closed.
///
/// Concave boundaries can split into several loops. Arc joins are reduced
/// to their end vertices.
pub fn inset_loops(points: &[Point], distance: f64) -> Vec<Vec<Point>> {
    if open_ring(points).len() < 3 || !(distance > 0.0) {
        return Vec::new();
    }
    let polyline = to_clockwise_polyline(points);
    let offsets = match panic::catch_unwind(panic::AssertUnwindSafe(|| {
        polyline.parallel_offset(-distance)
    })) {
        Ok(offsets) => offsets,
        Err(_) => {
            warn!("Panic during parallel offset of pocket boundary");
            return Vec::new();
        }
    };
    offsets
        .into_iter()
        .filter(|pl| pl.vertex_count() >= 3 && pl.area().abs() > 1e-9)
        .map(|pl| {
            let mut ring: Vec<Point> = pl
                .vertex_data
                .iter()
                .map(|v| Point::new(v.x, v.y))
                .collect();
            if is_clockwise(&ring) {
                ring.reverse();
            }
            close_polygon(ring)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(size: f64) -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(size, 0.0),
            Point::new(size, size),
            Point::new(0.0, size),
        ]
    }

    #[test]
    fn test_signed_area_orientation() {
        let mut sq = square(10.0);
        assert_relative_eq!(signed_area(&sq), 100.0);
        sq.reverse();
        assert_relative_eq!(signed_area(&sq), -100.0);
        assert!(is_clockwise(&sq));
    }

    #[test]
    fn test_inward_offset_of_square() {
        let inset = offset_polygon(&square(10.0), -1.0);
        assert_eq!(inset.len(), 5);
        assert_relative_eq!(signed_area(&inset), 64.0, epsilon = 1e-9);
        assert_relative_eq!(inset[0].x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(inset[0].y, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_outward_offset_of_clockwise_square() {
        let mut sq = square(10.0);
        sq.reverse();
        let grown = offset_polygon(&sq, 1.0);
        assert_relative_eq!(signed_area(&grown).abs(), 144.0, epsilon = 1e-9);
        // Winding is preserved.
        assert!(is_clockwise(&grown));
    }

    #[test]
    fn test_offset_accepts_closed_input() {
        let closed = close_polygon(square(10.0));
        let inset = offset_polygon(&closed, -1.0);
        assert_eq!(inset.len(), 5);
        assert_relative_eq!(signed_area(&inset), 64.0, epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_offset_returns_input() {
        let line = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)];
        let result = offset_polygon(&line, 1.0);
        assert_eq!(result, close_polygon(line));
    }

    #[test]
    fn test_point_in_polygon() {
        let sq = square(10.0);
        assert!(point_in_polygon(Point::new(5.0, 5.0), &sq));
        assert!(!point_in_polygon(Point::new(15.0, 5.0), &sq));
        assert!(point_in_polygon(Point::new(5.0, 5.0), &close_polygon(sq)));
    }

    #[test]
    fn test_inset_loops_shrink_square() {
        let loops = inset_loops(&square(10.0), 2.0);
        assert_eq!(loops.len(), 1);
        assert_relative_eq!(signed_area(&loops[0]), 36.0, epsilon = 1e-6);
        assert!(inset_loops(&square(10.0), 6.0).is_empty());
    }

    #[test]
    fn test_centroid_ignores_closing_point() {
        let c = centroid(&close_polygon(square(4.0)));
        assert_relative_eq!(c.x, 2.0);
        assert_relative_eq!(c.y, 2.0);
    }
}
