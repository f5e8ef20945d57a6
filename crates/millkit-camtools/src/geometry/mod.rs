//! 2D geometry: points, contours, arcs, the polygon offset engine and the
//! per-shape profile and pocket providers.

pub mod contour;
pub mod factory;
pub mod pocket;
pub mod polygon;
pub mod profile;

use serde::{Deserialize, Serialize};

pub use contour::{ArcSegment, Contour, ContourPath, PathElement};
pub use factory::{create_pocket_geometry, create_profile_geometry};
pub use pocket::{Pocket, PocketGeometry, PocketParameters};
pub use profile::{Profile, ProfileGeometry};

/// Points closer than this are treated as coincident when closing contours.
pub const CLOSE_TOLERANCE: f64 = 0.001;

/// A point in the XY plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub(crate) fn lerp(&self, other: &Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// Rotates `point` around `center` by `angle_deg` degrees, counter-clockwise.
pub fn rotate_point(point: Point, center: Point, angle_deg: f64) -> Point {
    if angle_deg.abs() < f64::EPSILON {
        return point;
    }
    let (sin_a, cos_a) = angle_deg.to_radians().sin_cos();
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    Point::new(
        center.x + dx * cos_a - dy * sin_a,
        center.y + dx * sin_a + dy * cos_a,
    )
}

/// Maps a shape-local offset (relative to `center`, unrotated) into world space.
pub(crate) fn local_to_world(
    center: Point,
    local_x: f64,
    local_y: f64,
    rotation_deg: f64,
) -> Point {
    rotate_point(
        Point::new(center.x + local_x, center.y + local_y),
        center,
        rotation_deg,
    )
}

/// Inverse of [`local_to_world`]: returns the shape-local offset of `point`.
pub(crate) fn world_to_local(center: Point, point: Point, rotation_deg: f64) -> (f64, f64) {
    let p = rotate_point(point, center, -rotation_deg);
    (p.x - center.x, p.y - center.y)
}
