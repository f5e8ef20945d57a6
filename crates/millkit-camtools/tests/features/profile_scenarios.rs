use approx::assert_relative_eq;
use millkit_camtools::profile::ramp_distance;
use millkit_camtools::{
    create_profile_geometry, CornerRadii, EllipseShape, EntryMode, MillingDirection, MoveKind,
    Point, ProfileGenerator, ProfileGeometry, ProfileOperation, RectangleShape,
    RoundedRectangleShape, Shape, ToolPathMode,
};
use millkit_settings::{FallbackValues, GCodeSettings};

fn rectangle_profile() -> ProfileOperation {
    let mut op = ProfileOperation::new(
        "panel",
        Shape::Rectangle(RectangleShape {
            center: Point::new(0.0, 0.0),
            width: 20.0,
            height: 10.0,
            rotation: 0.0,
        }),
    );
    op.cutting.tool_diameter = 4.0;
    op.profile.tool_path_mode = ToolPathMode::Outside;
    op
}

#[test]
fn test_outside_rectangle_half_dimensions() {
    let op = rectangle_profile();
    let geometry = create_profile_geometry(&op, &FallbackValues::default()).unwrap();
    let contour = geometry.contour_points(2.0, MillingDirection::CounterClockwise);
    let (min, max) = contour.bounds().unwrap();
    assert_relative_eq!(max.x, 12.0);
    assert_relative_eq!(max.y, 7.0);
    assert_relative_eq!(min.x, -12.0);
    assert_relative_eq!(min.y, -7.0);
    assert_eq!(contour.first(), Some(Point::new(-12.0, -7.0)));
    assert_eq!(contour.first(), contour.last());
}

#[test]
fn test_angled_entry_scenario() {
    assert_relative_eq!(ramp_distance(1.0, 5.0), 11.43, epsilon = 0.01);

    let settings = GCodeSettings::default();
    let mut op = rectangle_profile();
    op.profile.entry_mode = EntryMode::Angled;
    op.profile.entry_angle = 5.0;
    op.safety.retract_height = 1.0;
    op.cutting.total_depth = 2.0;
    op.cutting.step_depth = 2.0;

    let result = ProfileGenerator::new(&settings).generate(&op).unwrap();
    let ramp_moves = result
        .toolpath
        .moves()
        .filter(|m| m.kind == MoveKind::Linear && m.x.is_some() && m.z.is_some())
        .count();
    assert!(ramp_moves >= 4);

    // Cutting at depth starts back at the canonical start point.
    let moves: Vec<_> = result.toolpath.moves().collect();
    let plunge = moves
        .iter()
        .rposition(|m| m.is_rapid() && m.z == Some(-2.0))
        .unwrap();
    assert_eq!(
        (moves[plunge - 1].x, moves[plunge - 1].y),
        (Some(-12.0), Some(-7.0))
    );
}

#[test]
fn test_rounded_rectangle_arcs() {
    let settings = GCodeSettings {
        allow_arcs: true,
        ..GCodeSettings::default()
    };
    let mut op = ProfileOperation::new(
        "plate",
        Shape::RoundedRectangle(RoundedRectangleShape {
            center: Point::new(0.0, 0.0),
            width: 40.0,
            height: 20.0,
            rotation: 0.0,
            corner_radii: CornerRadii::uniform(3.0),
        }),
    );
    op.cutting.tool_diameter = 4.0;
    op.profile.direction = MillingDirection::Clockwise;

    let result = ProfileGenerator::new(&settings).generate(&op).unwrap();
    let arcs: Vec<_> = result.toolpath.moves().filter(|m| m.is_arc()).collect();
    assert_eq!(arcs.len(), 4);
    assert!(arcs.iter().all(|m| m.kind == MoveKind::ArcCw));

    let text = millkit_camtools::to_gcode([&result.toolpath], &settings);
    assert_eq!(text.lines().filter(|l| l.starts_with("G2 ")).count(), 4);
}

#[test]
fn test_arcs_disabled_linearizes() {
    let settings = GCodeSettings::default();
    let op = ProfileOperation::new(
        "oval",
        Shape::Ellipse(EllipseShape {
            center: Point::new(0.0, 0.0),
            radius_x: 20.0,
            radius_y: 10.0,
            rotation: 30.0,
        }),
    );
    let result = ProfileGenerator::new(&settings).generate(&op).unwrap();
    assert!(result.toolpath.moves().all(|m| !m.is_arc()));
    assert!(result.toolpath.move_count() > 16);
}

#[test]
fn test_clockwise_walks_backwards_from_same_start() {
    let op = rectangle_profile();
    let geometry = create_profile_geometry(&op, &FallbackValues::default()).unwrap();
    let ccw = geometry.contour_points(2.0, MillingDirection::CounterClockwise);
    let cw = geometry.contour_points(2.0, MillingDirection::Clockwise);
    assert_eq!(ccw.first(), cw.first());
    assert!(cw.is_clockwise());
    assert!(!ccw.is_clockwise());
}
