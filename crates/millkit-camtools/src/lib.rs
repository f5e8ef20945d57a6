//! # millkit CAM Tools
//!
//! Toolpath generation for 2D milling operations.
//!
//! An [`Operation`] pairs a [`Shape`] with cutting parameters and a role:
//! a profile cuts along the tool-compensated outline, a pocket clears the
//! area inside it. Generators turn operations into a structured
//! [`Toolpath`]; [`gcode_gen`] renders toolpaths as G-code text.
//!
//! ## Modules
//!
//! - **geometry**: points, contours and arcs, the polygon offset engine,
//!   and per-shape profile and pocket providers
//! - **depth**: depth layer stepping
//! - **clearing**: spiral, line and zig-zag area clearing
//! - **pocket** / **profile**: the toolpath generators
//! - **program**: whole-job generation

pub mod clearing;
pub mod depth;
pub mod error;
pub mod gcode_gen;
pub mod geometry;
pub mod math;
pub mod operation;
pub mod pocket;
pub mod profile;
pub mod program;
pub mod toolpath;

pub use depth::{DepthLayers, DepthPass, MAX_DEPTH_PASSES};
pub use error::{CamToolError, CamToolResult, ParameterError, ParameterResult};
pub use gcode_gen::{to_gcode, GcodeWriter};
pub use geometry::{
    create_pocket_geometry, create_profile_geometry, ArcSegment, Contour, ContourPath,
    PathElement, Point, Pocket, PocketGeometry, Profile, ProfileGeometry,
};
pub use operation::{
    CircleShape, CornerRadii, CuttingParameters, DxfShape, EllipseShape, EntryMode, FeedRates,
    FinishingMode, MillingDirection, Operation, PocketOperation, PocketSettings, PocketStrategy,
    PolygonShape, ProfileOperation, ProfileSettings, RectangleShape, RoundedRectangleShape,
    SafetyHeights, Shape, ToolPathMode,
};
pub use pocket::PocketGenerator;
pub use profile::ProfileGenerator;
pub use program::{generate_operation, generate_program, Program};
pub use toolpath::{
    GeneratedToolpath, GenerationOutcome, Move, MoveKind, SkipReason, Toolpath, ToolpathStep,
};
