//! Pocket geometry: shrinkable clear-out boundaries.
//!
//! A pocket boundary is the shape pulled inward by the tool radius plus the
//! wall taper at the current depth. Providers are values: applying an
//! allowance returns a new, smaller pocket and leaves the original alone.

mod circle;
mod dxf;
mod ellipse;
mod polygon;
mod rectangle;

pub use circle::CirclePocket;
pub use dxf::DxfPocket;
pub use ellipse::EllipsePocket;
pub use polygon::PolygonPocket;
pub use rectangle::RectanglePocket;

use super::{Contour, Point};
use crate::math::segment_count;
use crate::operation::{
    CuttingParameters, FeedRates, PocketOperation, PocketSettings, SafetyHeights,
};

/// Stand-in size for a boundary that would otherwise vanish.
pub(crate) const MIN_BOUNDARY_SIZE: f64 = 0.001;

/// Boundaries narrower than this fraction of the tool diameter are not cut.
pub(crate) const MIN_CONTOUR_FRACTION: f64 = 0.05;

const CHORD_LENGTH: f64 = 0.5;
const MIN_CURVE_SEGMENTS: usize = 36;

/// Snapshot of the parameters a pocket generator reads.
#[derive(Debug, Clone, PartialEq)]
pub struct PocketParameters {
    pub cutting: CuttingParameters,
    pub feeds: FeedRates,
    pub safety: SafetyHeights,
    pub pocket: PocketSettings,
}

impl From<&PocketOperation> for PocketParameters {
    fn from(op: &PocketOperation) -> Self {
        Self {
            cutting: op.cutting.clone(),
            feeds: op.feeds.clone(),
            safety: op.safety.clone(),
            pocket: op.pocket.clone(),
        }
    }
}

pub trait PocketGeometry {
    /// The operation this geometry was built from, allowances included.
    fn operation(&self) -> &PocketOperation;

    fn center(&self) -> Point;

    /// Closed counter-clockwise boundary of the tool center.
    fn contour(&self, tool_radius: f64, taper_offset: f64) -> Contour;

    fn is_point_inside(&self, point: Point, tool_radius: f64, taper_offset: f64) -> bool;

    /// Shrinks the walls by `allowance` and raises the floor by the same amount.
    fn apply_roughing_allowance(&self, allowance: f64) -> Self
    where
        Self: Sized;

    /// Shrinks the walls by `allowance` and keeps the depth.
    fn apply_bottom_finishing_allowance(&self, allowance: f64) -> Self
    where
        Self: Sized;

    /// Whether the nominal shape has no area left.
    fn is_too_small(&self) -> bool;

    /// Whether the compensated boundary is too narrow to be worth cutting.
    fn is_contour_too_small(&self, tool_radius: f64, taper_offset: f64) -> bool;

    fn parameters(&self) -> PocketParameters {
        PocketParameters::from(self.operation())
    }
}

/// Pocket geometry for any shape that supports pocketing.
#[derive(Debug, Clone)]
pub enum Pocket {
    Circle(CirclePocket),
    Ellipse(EllipsePocket),
    Rectangle(RectanglePocket),
    Polygon(PolygonPocket),
    Dxf(DxfPocket),
}

impl PocketGeometry for Pocket {
    fn operation(&self) -> &PocketOperation {
        match self {
            Pocket::Circle(p) => p.operation(),
            Pocket::Ellipse(p) => p.operation(),
            Pocket::Rectangle(p) => p.operation(),
            Pocket::Polygon(p) => p.operation(),
            Pocket::Dxf(p) => p.operation(),
        }
    }

    fn center(&self) -> Point {
        match self {
            Pocket::Circle(p) => p.center(),
            Pocket::Ellipse(p) => p.center(),
            Pocket::Rectangle(p) => p.center(),
            Pocket::Polygon(p) => p.center(),
            Pocket::Dxf(p) => p.center(),
        }
    }

    fn contour(&self, tool_radius: f64, taper_offset: f64) -> Contour {
        match self {
            Pocket::Circle(p) => p.contour(tool_radius, taper_offset),
            Pocket::Ellipse(p) => p.contour(tool_radius, taper_offset),
            Pocket::Rectangle(p) => p.contour(tool_radius, taper_offset),
            Pocket::Polygon(p) => p.contour(tool_radius, taper_offset),
            Pocket::Dxf(p) => p.contour(tool_radius, taper_offset),
        }
    }

    fn is_point_inside(&self, point: Point, tool_radius: f64, taper_offset: f64) -> bool {
        match self {
            Pocket::Circle(p) => p.is_point_inside(point, tool_radius, taper_offset),
            Pocket::Ellipse(p) => p.is_point_inside(point, tool_radius, taper_offset),
            Pocket::Rectangle(p) => p.is_point_inside(point, tool_radius, taper_offset),
            Pocket::Polygon(p) => p.is_point_inside(point, tool_radius, taper_offset),
            Pocket::Dxf(p) => p.is_point_inside(point, tool_radius, taper_offset),
        }
    }

    fn apply_roughing_allowance(&self, allowance: f64) -> Self {
        match self {
            Pocket::Circle(p) => Pocket::Circle(p.apply_roughing_allowance(allowance)),
            Pocket::Ellipse(p) => Pocket::Ellipse(p.apply_roughing_allowance(allowance)),
            Pocket::Rectangle(p) => Pocket::Rectangle(p.apply_roughing_allowance(allowance)),
            Pocket::Polygon(p) => Pocket::Polygon(p.apply_roughing_allowance(allowance)),
            Pocket::Dxf(p) => Pocket::Dxf(p.apply_roughing_allowance(allowance)),
        }
    }

    fn apply_bottom_finishing_allowance(&self, allowance: f64) -> Self {
        match self {
            Pocket::Circle(p) => Pocket::Circle(p.apply_bottom_finishing_allowance(allowance)),
            Pocket::Ellipse(p) => Pocket::Ellipse(p.apply_bottom_finishing_allowance(allowance)),
            Pocket::Rectangle(p) => {
                Pocket::Rectangle(p.apply_bottom_finishing_allowance(allowance))
            }
            Pocket::Polygon(p) => Pocket::Polygon(p.apply_bottom_finishing_allowance(allowance)),
            Pocket::Dxf(p) => Pocket::Dxf(p.apply_bottom_finishing_allowance(allowance)),
        }
    }

    fn is_too_small(&self) -> bool {
        match self {
            Pocket::Circle(p) => p.is_too_small(),
            Pocket::Ellipse(p) => p.is_too_small(),
            Pocket::Rectangle(p) => p.is_too_small(),
            Pocket::Polygon(p) => p.is_too_small(),
            Pocket::Dxf(p) => p.is_too_small(),
        }
    }

    fn is_contour_too_small(&self, tool_radius: f64, taper_offset: f64) -> bool {
        match self {
            Pocket::Circle(p) => p.is_contour_too_small(tool_radius, taper_offset),
            Pocket::Ellipse(p) => p.is_contour_too_small(tool_radius, taper_offset),
            Pocket::Rectangle(p) => p.is_contour_too_small(tool_radius, taper_offset),
            Pocket::Polygon(p) => p.is_contour_too_small(tool_radius, taper_offset),
            Pocket::Dxf(p) => p.is_contour_too_small(tool_radius, taper_offset),
        }
    }
}

/// Replaces a vanished size with [`MIN_BOUNDARY_SIZE`].
pub(crate) fn at_least_min(size: f64) -> f64 {
    if size > 0.0 {
        size
    } else {
        MIN_BOUNDARY_SIZE
    }
}

pub(crate) fn curve_segments(perimeter: f64) -> usize {
    segment_count(perimeter, CHORD_LENGTH, MIN_CURVE_SEGMENTS)
}

/// Whether a boundary of `width` (tool center space) is below the cutting threshold.
pub(crate) fn narrower_than_threshold(width: f64, tool_radius: f64) -> bool {
    width < MIN_CONTOUR_FRACTION * 2.0 * tool_radius
}

/// The operation with its total depth reduced by `allowance`.
pub(crate) fn raised_floor(op: &PocketOperation, allowance: f64) -> PocketOperation {
    let mut op = op.clone();
    op.cutting.total_depth -= allowance;
    op
}
