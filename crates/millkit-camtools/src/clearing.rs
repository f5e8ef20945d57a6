//! Area clearing patterns for one pocket layer.
//!
//! Patterns work on a boundary that is already in tool-center space, so
//! every returned point is a valid tool position.

use crate::geometry::{polygon, Contour, Point};
use crate::operation::PocketStrategy;

/// Upper bound on concentric rings per layer.
const MAX_RINGS: usize = 10_000;

/// Points this close to the boundary count as inside it.
const BOUNDARY_TOLERANCE: f64 = 1e-6;

/// Ordered cut polylines for one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ClearingPattern {
    /// Each pass is cut start to end; the tool moves between passes.
    pub passes: Vec<Vec<Point>>,
    /// Whether links between passes may stay at depth when they do not
    /// leave the boundary.
    pub stay_down: bool,
}

impl ClearingPattern {
    pub fn is_empty(&self) -> bool {
        self.passes.iter().all(|p| p.is_empty())
    }

    pub fn first_point(&self) -> Option<Point> {
        self.passes.iter().find_map(|p| p.first().copied())
    }

    pub fn last_point(&self) -> Option<Point> {
        self.passes.iter().rev().find_map(|p| p.last().copied())
    }
}

/// Builds the clearing pattern for `boundary` with lateral spacing `step`.
pub fn clearing_pattern(
    boundary: &Contour,
    step: f64,
    strategy: PocketStrategy,
) -> ClearingPattern {
    if boundary.len() < 2 {
        return ClearingPattern {
            passes: Vec::new(),
            stay_down: false,
        };
    }
    match strategy {
        PocketStrategy::Spiral => ClearingPattern {
            passes: spiral_passes(boundary, step),
            stay_down: true,
        },
        PocketStrategy::Lines => ClearingPattern {
            passes: line_passes(boundary, step, false),
            stay_down: false,
        },
        PocketStrategy::ZigZag => ClearingPattern {
            passes: line_passes(boundary, step, true),
            stay_down: true,
        },
    }
}

/// Concentric rings from the innermost out to the boundary itself.
fn spiral_passes(boundary: &Contour, step: f64) -> Vec<Vec<Point>> {
    let mut rings = vec![boundary.points().to_vec()];
    if step > 0.0 {
        for k in 1..MAX_RINGS {
            let inner = polygon::inset_loops(boundary.points(), step * k as f64);
            if inner.is_empty() {
                break;
            }
            rings.extend(inner);
        }
    }
    rings.reverse();

    // Plunge in the middle of the innermost ring so its center is cleared.
    if let Some(innermost) = rings.first_mut() {
        let center = polygon::centroid(innermost);
        if polygon::point_in_polygon(center, innermost) {
            innermost.insert(0, center);
        }
    }
    rings
}

/// Horizontal raster lines clipped to the boundary, followed by one walk
/// around the boundary to clean up the scallops.
fn line_passes(boundary: &Contour, step: f64, alternate: bool) -> Vec<Vec<Point>> {
    let mut passes = Vec::new();
    if let Some((min, max)) = boundary.bounds() {
        let height = max.y - min.y;
        if height > 0.0 && step > 0.0 {
            let lines = (height / step).ceil().max(1.0) as usize;
            let spacing = height / lines as f64;
            for k in 1..lines {
                let y = min.y + spacing * k as f64;
                let mut segments = scanline_segments(boundary.points(), y);
                let reverse = alternate && k % 2 == 0;
                if reverse {
                    segments.reverse();
                }
                for (x0, x1) in segments {
                    let (from, to) = if reverse { (x1, x0) } else { (x0, x1) };
                    passes.push(vec![Point::new(from, y), Point::new(to, y)]);
                }
            }
        }
    }
    passes.push(boundary.points().to_vec());
    passes
}

/// Inside spans of a closed point list along the line at `y`, left to right.
pub fn scanline_segments(points: &[Point], y: f64) -> Vec<(f64, f64)> {
    let mut xs: Vec<f64> = points
        .windows(2)
        .filter_map(|w| {
            let (p1, p2) = (w[0], w[1]);
            let crosses = (p1.y <= y && y < p2.y) || (p2.y <= y && y < p1.y);
            crosses.then(|| p1.x + (y - p1.y) * (p2.x - p1.x) / (p2.y - p1.y))
        })
        .collect();
    xs.sort_by(|a, b| a.total_cmp(b));
    xs.chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .filter(|(a, b)| b - a > f64::EPSILON)
        .collect()
}

/// Whether a straight move from `from` to `to` stays within `boundary`.
pub fn link_stays_inside(boundary: &Contour, from: Point, to: Point) -> bool {
    const SAMPLES: usize = 16;
    (0..=SAMPLES).all(|i| {
        let p = from.lerp(&to, i as f64 / SAMPLES as f64);
        boundary.contains(p) || distance_to_boundary(boundary.points(), p) <= BOUNDARY_TOLERANCE
    })
}

fn distance_to_boundary(points: &[Point], p: Point) -> f64 {
    points
        .windows(2)
        .map(|w| {
            let (a, b) = (w[0], w[1]);
            let (dx, dy) = (b.x - a.x, b.y - a.y);
            let len_sq = dx * dx + dy * dy;
            if len_sq <= f64::EPSILON {
                return a.distance_to(&p);
            }
            let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
            a.lerp(&b, t).distance_to(&p)
        })
        .fold(f64::INFINITY, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(size: f64) -> Contour {
        Contour::closed(vec![
            Point::new(0.0, 0.0),
            Point::new(size, 0.0),
            Point::new(size, size),
            Point::new(0.0, size),
        ])
    }

    fn l_shape() -> Contour {
        Contour::closed(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 4.0),
            Point::new(4.0, 4.0),
            Point::new(4.0, 10.0),
            Point::new(0.0, 10.0),
        ])
    }

    #[test]
    fn test_spiral_ends_on_boundary() {
        let boundary = square(10.0);
        let pattern = clearing_pattern(&boundary, 2.0, PocketStrategy::Spiral);
        assert!(pattern.stay_down);
        assert_eq!(pattern.passes.last().unwrap(), &boundary.points().to_vec());
        // Rings at insets 2 and 4, then the boundary.
        assert_eq!(pattern.passes.len(), 3);
        let start = pattern.first_point().unwrap();
        assert_relative_eq!(start.x, 5.0, epsilon = 1e-9);
        assert_relative_eq!(start.y, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_lines_cover_height_and_lift() {
        let pattern = clearing_pattern(&square(10.0), 4.0, PocketStrategy::Lines);
        assert!(!pattern.stay_down);
        // ceil(10 / 4) = 3 bands, so two interior lines plus the boundary walk.
        assert_eq!(pattern.passes.len(), 3);
        for line in &pattern.passes[..2] {
            assert!(line[0].x < line[1].x);
        }
    }

    #[test]
    fn test_zigzag_alternates() {
        let pattern = clearing_pattern(&square(10.0), 2.0, PocketStrategy::ZigZag);
        let first = &pattern.passes[0];
        let second = &pattern.passes[1];
        assert!(first[0].x < first[1].x);
        assert!(second[0].x > second[1].x);
    }

    #[test]
    fn test_scanline_of_concave_shape() {
        let boundary = l_shape();
        let spans = scanline_segments(boundary.points(), 2.0);
        assert_eq!(spans.len(), 1);
        assert_relative_eq!(spans[0].0, 0.0);
        assert_relative_eq!(spans[0].1, 10.0);
        let spans = scanline_segments(boundary.points(), 6.0);
        assert_relative_eq!(spans[0].1, 4.0);
    }

    #[test]
    fn test_link_inside_checks() {
        let boundary = l_shape();
        assert!(link_stays_inside(&boundary, Point::new(1.0, 1.0), Point::new(9.0, 1.0)));
        // Along the boundary edge still counts as inside.
        assert!(link_stays_inside(&boundary, Point::new(10.0, 0.0), Point::new(10.0, 4.0)));
        // Cutting the corner of the L leaves the pocket.
        assert!(!link_stays_inside(&boundary, Point::new(9.0, 1.0), Point::new(1.0, 9.0)));
    }

    #[test]
    fn test_degenerate_boundary() {
        let pattern = clearing_pattern(&Contour::empty(), 1.0, PocketStrategy::Spiral);
        assert!(pattern.is_empty());
        assert!(pattern.first_point().is_none());
    }
}
