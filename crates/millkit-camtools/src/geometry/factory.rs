//! Builds geometry providers from operations.

use millkit_settings::FallbackValues;

use super::pocket::{
    CirclePocket, DxfPocket, EllipsePocket, Pocket, PolygonPocket, RectanglePocket,
};
use super::profile::{
    CircleProfile, DxfProfile, EllipseProfile, PolygonProfile, Profile, RectangleProfile,
    RoundedRectangleProfile,
};
use crate::error::{CamToolError, CamToolResult};
use crate::operation::{PocketOperation, ProfileOperation, Shape};

/// Profile geometry for `op`. Every shape family supports profiling.
///
/// A non-positive `max_segment_length` is replaced by the configured fallback.
pub fn create_profile_geometry(
    op: &ProfileOperation,
    fallback: &FallbackValues,
) -> CamToolResult<Profile> {
    let max_segment_length = if op.profile.max_segment_length > 0.0 {
        op.profile.max_segment_length
    } else {
        fallback.max_segment_length
    };
    Ok(match &op.shape {
        Shape::Circle(s) => Profile::Circle(CircleProfile::new(s, max_segment_length)),
        Shape::Ellipse(s) => Profile::Ellipse(EllipseProfile::new(s, max_segment_length)),
        Shape::Rectangle(s) => Profile::Rectangle(RectangleProfile::new(s)),
        Shape::RoundedRectangle(s) => {
            Profile::RoundedRectangle(RoundedRectangleProfile::new(s, max_segment_length))
        }
        Shape::Polygon(s) => Profile::Polygon(PolygonProfile::new(s)),
        Shape::Dxf(s) => Profile::Dxf(DxfProfile::new(s)),
    })
}

/// Pocket geometry for `op`.
///
/// Rounded rectangles cannot be pocketed and produce
/// [`CamToolError::UnsupportedOperation`].
pub fn create_pocket_geometry(op: &PocketOperation) -> CamToolResult<Pocket> {
    match &op.shape {
        Shape::Circle(s) => Ok(Pocket::Circle(CirclePocket::new(op, s))),
        Shape::Ellipse(s) => Ok(Pocket::Ellipse(EllipsePocket::new(op, s))),
        Shape::Rectangle(s) => Ok(Pocket::Rectangle(RectanglePocket::new(op, s))),
        Shape::Polygon(s) => Ok(Pocket::Polygon(PolygonPocket::new(op, s))),
        Shape::Dxf(s) => Ok(Pocket::Dxf(DxfPocket::new(op, s))),
        Shape::RoundedRectangle(_) => Err(CamToolError::UnsupportedOperation {
            role: "pocket",
            shape: op.shape.kind_name(),
        }),
    }
}
