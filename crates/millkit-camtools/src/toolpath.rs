//! Structured motion output.
//!
//! Generators produce a [`Toolpath`]: an ordered list of moves and
//! comments. Text rendering lives in [`crate::gcode_gen`].

use crate::geometry::{ArcSegment, Point};
use crate::operation::MillingDirection;

/// Kinds of motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Rapid,
    Linear,
    ArcCw,
    ArcCcw,
}

/// A single motion command. Axes left as `None` are not moved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Move {
    pub kind: MoveKind,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    /// Arc center offset from the start point, X axis.
    pub i: Option<f64>,
    /// Arc center offset from the start point, Y axis.
    pub j: Option<f64>,
    pub feed: f64,
}

impl Move {
    fn new(kind: MoveKind, x: Option<f64>, y: Option<f64>, z: Option<f64>, feed: f64) -> Self {
        Self {
            kind,
            x,
            y,
            z,
            i: None,
            j: None,
            feed,
        }
    }

    pub fn rapid_xy(point: Point, feed: f64) -> Self {
        Self::new(MoveKind::Rapid, Some(point.x), Some(point.y), None, feed)
    }

    pub fn rapid_z(z: f64, feed: f64) -> Self {
        Self::new(MoveKind::Rapid, None, None, Some(z), feed)
    }

    pub fn linear_xy(point: Point, feed: f64) -> Self {
        Self::new(MoveKind::Linear, Some(point.x), Some(point.y), None, feed)
    }

    pub fn linear_z(z: f64, feed: f64) -> Self {
        Self::new(MoveKind::Linear, None, None, Some(z), feed)
    }

    pub fn linear_xyz(point: Point, z: f64, feed: f64) -> Self {
        Self::new(MoveKind::Linear, Some(point.x), Some(point.y), Some(z), feed)
    }

    /// Arc move from `arc.start` (the current position) to `arc.end`.
    pub fn arc(arc: &ArcSegment, feed: f64) -> Self {
        let kind = match arc.direction {
            MillingDirection::Clockwise => MoveKind::ArcCw,
            MillingDirection::CounterClockwise => MoveKind::ArcCcw,
        };
        let (i, j) = arc.center_offset();
        Self {
            i: Some(i),
            j: Some(j),
            ..Self::new(kind, Some(arc.end.x), Some(arc.end.y), None, feed)
        }
    }

    pub fn is_rapid(&self) -> bool {
        self.kind == MoveKind::Rapid
    }

    pub fn is_arc(&self) -> bool {
        matches!(self.kind, MoveKind::ArcCw | MoveKind::ArcCcw)
    }
}

/// One entry of a toolpath.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolpathStep {
    Move(Move),
    Comment(String),
}

/// Machine position as far as it is known. Axes never commanded are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
}

impl Position {
    fn apply(&self, mv: &Move) -> Position {
        Position {
            x: mv.x.or(self.x),
            y: mv.y.or(self.y),
            z: mv.z.or(self.z),
        }
    }

    fn xy(&self) -> Option<Point> {
        Some(Point::new(self.x?, self.y?))
    }
}

/// The ordered output of one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Toolpath {
    pub name: String,
    pub steps: Vec<ToolpathStep>,
    /// Digits after the decimal point used when rendering coordinates.
    pub decimals: usize,
}

impl Toolpath {
    /// Creates a new empty toolpath.
    pub fn new(name: impl Into<String>, decimals: usize) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
            decimals,
        }
    }

    pub fn push(&mut self, mv: Move) {
        self.steps.push(ToolpathStep::Move(mv));
    }

    pub fn comment(&mut self, text: impl Into<String>) {
        self.steps.push(ToolpathStep::Comment(text.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn moves(&self) -> impl Iterator<Item = &Move> + '_ {
        self.steps.iter().filter_map(|step| match step {
            ToolpathStep::Move(mv) => Some(mv),
            ToolpathStep::Comment(_) => None,
        })
    }

    pub fn comments(&self) -> impl Iterator<Item = &str> + '_ {
        self.steps.iter().filter_map(|step| match step {
            ToolpathStep::Comment(text) => Some(text.as_str()),
            ToolpathStep::Move(_) => None,
        })
    }

    pub fn move_count(&self) -> usize {
        self.moves().count()
    }

    /// Position after the last move.
    pub fn end_position(&self) -> Position {
        self.moves()
            .fold(Position::default(), |pos, mv| pos.apply(mv))
    }

    /// Distance travelled by feed moves (lines and arcs).
    pub fn cut_length(&self) -> f64 {
        self.lengths().filter(|(rapid, _)| !rapid).map(|(_, l)| l).sum()
    }

    /// Distance travelled by rapid moves.
    pub fn rapid_length(&self) -> f64 {
        self.lengths().filter(|(rapid, _)| *rapid).map(|(_, l)| l).sum()
    }

    /// Per-move travel distance, tagged with whether the move is rapid.
    /// Axes with an unknown start position contribute nothing.
    fn lengths(&self) -> impl Iterator<Item = (bool, f64)> + '_ {
        let mut pos = Position::default();
        self.moves().map(move |mv| {
            let next = pos.apply(mv);
            let length = match (mv.is_arc(), pos.xy(), next.xy(), mv.i, mv.j) {
                (true, Some(start), Some(end), Some(i), Some(j)) => {
                    let center = Point::new(start.x + i, start.y + j);
                    let direction = if mv.kind == MoveKind::ArcCw {
                        MillingDirection::Clockwise
                    } else {
                        MillingDirection::CounterClockwise
                    };
                    ArcSegment::new(start, end, center, direction).length()
                }
                _ => {
                    let delta = |a: Option<f64>, b: Option<f64>| match (a, b) {
                        (Some(a), Some(b)) => b - a,
                        _ => 0.0,
                    };
                    let dx = delta(pos.x, next.x);
                    let dy = delta(pos.y, next.y);
                    let dz = delta(pos.z, next.z);
                    (dx * dx + dy * dy + dz * dz).sqrt()
                }
            };
            pos = next;
            (mv.is_rapid(), length)
        })
    }
}

/// Why an operation produced no cutting moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The shape, possibly after an allowance, has no area left to cut.
    GeometryTooSmall,
    /// The operation has no depth to cut.
    NoDepth,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::GeometryTooSmall => write!(f, "geometry too small"),
            SkipReason::NoDepth => write!(f, "no depth to cut"),
        }
    }
}

/// How generation of one operation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Completed,
    Skipped(SkipReason),
}

impl GenerationOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, GenerationOutcome::Skipped(_))
    }
}

/// A generator's output for one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedToolpath {
    pub toolpath: Toolpath,
    pub outcome: GenerationOutcome,
}
