//! Operation data model: what to cut, how deep, and with which tool.
//!
//! Operations are plain serde structs so job files can describe them
//! directly. All lengths share the program's unit system and all angles are
//! in degrees.

use serde::{Deserialize, Serialize};

use crate::depth::{required_passes, MAX_DEPTH_PASSES};
use crate::error::{ParameterError, ParameterResult};
use crate::geometry::Point;

/// A circle given by its center and radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleShape {
    pub center: Point,
    pub radius: f64,
}

/// An ellipse with independent radii, rotated about its center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EllipseShape {
    pub center: Point,
    pub radius_x: f64,
    pub radius_y: f64,
    #[serde(default)]
    pub rotation: f64,
}

/// An axis-aligned rectangle rotated about its center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectangleShape {
    pub center: Point,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
}

/// Per-corner radii of a rounded rectangle, in its unrotated frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CornerRadii {
    pub bottom_left: f64,
    pub bottom_right: f64,
    pub top_right: f64,
    pub top_left: f64,
}

impl CornerRadii {
    pub fn uniform(radius: f64) -> Self {
        Self {
            bottom_left: radius,
            bottom_right: radius,
            top_right: radius,
            top_left: radius,
        }
    }

    /// Radii in walk order: bottom-left, bottom-right, top-right, top-left.
    pub fn as_array(&self) -> [f64; 4] {
        [
            self.bottom_left,
            self.bottom_right,
            self.top_right,
            self.top_left,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundedRectangleShape {
    pub center: Point,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
    pub corner_radii: CornerRadii,
}

/// A regular polygon inscribed in a circle of `radius`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonShape {
    pub center: Point,
    pub radius: f64,
    pub sides: u32,
    #[serde(default)]
    pub rotation: f64,
}

/// Imported drawing contours. Only the largest closed contour is machined.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DxfShape {
    #[serde(default)]
    pub contours: Vec<Vec<Point>>,
}

/// The shape family an operation cuts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Circle(CircleShape),
    Ellipse(EllipseShape),
    Rectangle(RectangleShape),
    RoundedRectangle(RoundedRectangleShape),
    Polygon(PolygonShape),
    Dxf(DxfShape),
}

impl Shape {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Circle(_) => "circle",
            Shape::Ellipse(_) => "ellipse",
            Shape::Rectangle(_) => "rectangle",
            Shape::RoundedRectangle(_) => "rounded_rectangle",
            Shape::Polygon(_) => "polygon",
            Shape::Dxf(_) => "dxf",
        }
    }

    fn validate(&self) -> ParameterResult<()> {
        let mut values: Vec<(&str, f64)> = Vec::new();
        match self {
            Shape::Circle(c) => {
                values.extend([("center.x", c.center.x), ("center.y", c.center.y)]);
                values.push(("radius", c.radius));
            }
            Shape::Ellipse(e) => {
                values.extend([("center.x", e.center.x), ("center.y", e.center.y)]);
                values.extend([
                    ("radius_x", e.radius_x),
                    ("radius_y", e.radius_y),
                    ("rotation", e.rotation),
                ]);
            }
            Shape::Rectangle(r) => {
                values.extend([("center.x", r.center.x), ("center.y", r.center.y)]);
                values.extend([
                    ("width", r.width),
                    ("height", r.height),
                    ("rotation", r.rotation),
                ]);
            }
            Shape::RoundedRectangle(r) => {
                values.extend([("center.x", r.center.x), ("center.y", r.center.y)]);
                values.extend([
                    ("width", r.width),
                    ("height", r.height),
                    ("rotation", r.rotation),
                ]);
                for radius in r.corner_radii.as_array() {
                    values.push(("corner_radii", radius));
                }
            }
            Shape::Polygon(p) => {
                values.extend([("center.x", p.center.x), ("center.y", p.center.y)]);
                values.extend([("radius", p.radius), ("rotation", p.rotation)]);
            }
            Shape::Dxf(d) => {
                if d.contours.iter().flatten().any(|p| !p.is_finite()) {
                    return Err(ParameterError::InvalidDimensions(
                        "dxf contour contains a non-finite point".to_string(),
                    ));
                }
            }
        }
        require_finite(&values)
    }
}

/// Depth and tool parameters shared by every operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CuttingParameters {
    /// Cut depth below `contour_height`.
    pub total_depth: f64,
    /// Maximum depth removed per pass.
    pub step_depth: f64,
    pub tool_diameter: f64,
    /// Z of the stock surface where cutting starts.
    pub contour_height: f64,
    /// Digits after the decimal point in emitted coordinates.
    pub decimals: usize,
}

impl Default for CuttingParameters {
    fn default() -> Self {
        Self {
            total_depth: 1.0,
            step_depth: 1.0,
            tool_diameter: 3.175,
            contour_height: 0.0,
            decimals: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedRates {
    pub rapid_xy: f64,
    pub rapid_z: f64,
    pub work_xy: f64,
    pub work_z: f64,
}

impl Default for FeedRates {
    fn default() -> Self {
        Self {
            rapid_xy: 3000.0,
            rapid_z: 1000.0,
            work_xy: 800.0,
            work_z: 300.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyHeights {
    /// Absolute Z used for travel between features.
    pub safe_z: f64,
    /// Clearance above the last cut depth used between passes.
    pub retract_height: f64,
}

impl Default for SafetyHeights {
    fn default() -> Self {
        Self {
            safe_z: 5.0,
            retract_height: 1.0,
        }
    }
}

/// How each pocket layer is cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PocketStrategy {
    /// Concentric rings from the middle out to the wall.
    #[default]
    Spiral,
    /// Parallel one-way passes, lifting between lines.
    Lines,
    /// Parallel passes alternating direction.
    ZigZag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishingMode {
    Walls,
    Bottom,
    #[default]
    All,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PocketSettings {
    pub strategy: PocketStrategy,
    pub step_percent_of_tool: f64,
    /// Material left on walls and floor by roughing.
    pub finish_allowance: f64,
    pub finishing_mode: FinishingMode,
    pub is_roughing_enabled: bool,
    pub is_finishing_enabled: bool,
    /// Wall draft in degrees; the pocket narrows with depth.
    pub wall_taper_angle: f64,
}

impl Default for PocketSettings {
    fn default() -> Self {
        Self {
            strategy: PocketStrategy::Spiral,
            step_percent_of_tool: 40.0,
            finish_allowance: 0.0,
            finishing_mode: FinishingMode::All,
            is_roughing_enabled: true,
            is_finishing_enabled: false,
            wall_taper_angle: 0.0,
        }
    }
}

/// Which side of the drawn line the tool edge rides on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolPathMode {
    OnLine,
    #[default]
    Outside,
    Inside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryMode {
    #[default]
    Vertical,
    /// Ramp down along the contour at `entry_angle`.
    Angled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MillingDirection {
    Clockwise,
    #[default]
    CounterClockwise,
}

impl MillingDirection {
    pub fn reversed(self) -> Self {
        match self {
            MillingDirection::Clockwise => MillingDirection::CounterClockwise,
            MillingDirection::CounterClockwise => MillingDirection::Clockwise,
        }
    }

    /// +1 for counter-clockwise, -1 for clockwise.
    pub fn sign(self) -> f64 {
        match self {
            MillingDirection::Clockwise => -1.0,
            MillingDirection::CounterClockwise => 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSettings {
    pub tool_path_mode: ToolPathMode,
    pub entry_mode: EntryMode,
    /// Ramp angle in degrees for [`EntryMode::Angled`].
    pub entry_angle: f64,
    pub direction: MillingDirection,
    /// Longest chord used when flattening curves.
    pub max_segment_length: f64,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            tool_path_mode: ToolPathMode::Outside,
            entry_mode: EntryMode::Vertical,
            entry_angle: 5.0,
            direction: MillingDirection::CounterClockwise,
            max_segment_length: 0.5,
        }
    }
}

/// Clears the area enclosed by a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PocketOperation {
    #[serde(default)]
    pub name: String,
    pub shape: Shape,
    #[serde(default)]
    pub cutting: CuttingParameters,
    #[serde(default)]
    pub feeds: FeedRates,
    #[serde(default)]
    pub safety: SafetyHeights,
    #[serde(default)]
    pub pocket: PocketSettings,
}

impl PocketOperation {
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
            cutting: CuttingParameters::default(),
            feeds: FeedRates::default(),
            safety: SafetyHeights::default(),
            pocket: PocketSettings::default(),
        }
    }
}

/// Cuts along a shape's outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileOperation {
    #[serde(default)]
    pub name: String,
    pub shape: Shape,
    #[serde(default)]
    pub cutting: CuttingParameters,
    #[serde(default)]
    pub feeds: FeedRates,
    #[serde(default)]
    pub safety: SafetyHeights,
    #[serde(default)]
    pub profile: ProfileSettings,
}

impl ProfileOperation {
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
            cutting: CuttingParameters::default(),
            feeds: FeedRates::default(),
            safety: SafetyHeights::default(),
            profile: ProfileSettings::default(),
        }
    }
}

/// A single machining operation in a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Operation {
    Pocket(PocketOperation),
    Profile(ProfileOperation),
}

impl Operation {
    pub fn name(&self) -> &str {
        match self {
            Operation::Pocket(op) => &op.name,
            Operation::Profile(op) => &op.name,
        }
    }

    pub fn role_name(&self) -> &'static str {
        match self {
            Operation::Pocket(_) => "pocket",
            Operation::Profile(_) => "profile",
        }
    }

    pub fn shape(&self) -> &Shape {
        match self {
            Operation::Pocket(op) => &op.shape,
            Operation::Profile(op) => &op.shape,
        }
    }

    /// Rejects values no generator can work with.
    ///
    /// Sizes that are merely too small to cut pass validation; generation
    /// skips them instead.
    pub fn validate(&self) -> ParameterResult<()> {
        self.shape().validate()?;
        let (cutting, feeds, safety) = match self {
            Operation::Pocket(op) => (&op.cutting, &op.feeds, &op.safety),
            Operation::Profile(op) => (&op.cutting, &op.feeds, &op.safety),
        };
        require_finite(&[
            ("total_depth", cutting.total_depth),
            ("step_depth", cutting.step_depth),
            ("tool_diameter", cutting.tool_diameter),
            ("contour_height", cutting.contour_height),
            ("safe_z", safety.safe_z),
            ("retract_height", safety.retract_height),
        ])?;
        if cutting.total_depth > 0.0
            && required_passes(cutting.total_depth, cutting.step_depth) > MAX_DEPTH_PASSES as f64
        {
            return Err(ParameterError::OutOfRange {
                name: "step_depth".to_string(),
                value: cutting.step_depth,
                min: cutting.total_depth / MAX_DEPTH_PASSES as f64,
                max: cutting.total_depth,
            });
        }
        if cutting.decimals > 6 {
            return Err(ParameterError::OutOfRange {
                name: "decimals".to_string(),
                value: cutting.decimals as f64,
                min: 0.0,
                max: 6.0,
            });
        }
        for (name, feed) in [
            ("rapid_xy", feeds.rapid_xy),
            ("rapid_z", feeds.rapid_z),
            ("work_xy", feeds.work_xy),
            ("work_z", feeds.work_z),
        ] {
            if !(feed.is_finite() && feed > 0.0) {
                return Err(ParameterError::InvalidValue {
                    name: name.to_string(),
                    reason: "feed rate must be positive".to_string(),
                });
            }
        }

        match self {
            Operation::Pocket(op) => require_finite(&[
                ("step_percent_of_tool", op.pocket.step_percent_of_tool),
                ("finish_allowance", op.pocket.finish_allowance),
                ("wall_taper_angle", op.pocket.wall_taper_angle),
            ]),
            Operation::Profile(op) => {
                require_finite(&[("max_segment_length", op.profile.max_segment_length)])?;
                let angle = op.profile.entry_angle;
                if op.profile.entry_mode == EntryMode::Angled && !(angle > 0.0 && angle < 90.0) {
                    return Err(ParameterError::OutOfRange {
                        name: "entry_angle".to_string(),
                        value: angle,
                        min: 0.0,
                        max: 90.0,
                    });
                }
                Ok(())
            }
        }
    }
}

fn require_finite(values: &[(&str, f64)]) -> ParameterResult<()> {
    match values.iter().find(|(_, v)| !v.is_finite()) {
        Some((name, value)) => Err(ParameterError::InvalidDimensions(format!(
            "{name} is not finite ({value})"
        ))),
        None => Ok(()),
    }
}
