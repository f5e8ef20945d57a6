use approx::assert_relative_eq;
use millkit_camtools::{
    create_pocket_geometry, CircleShape, FinishingMode, GenerationOutcome, Point,
    PocketGenerator, PocketGeometry, PocketOperation, PocketStrategy, PolygonShape,
    RectangleShape, Shape, SkipReason, Toolpath,
};
use millkit_settings::GCodeSettings;

fn circle_pocket() -> PocketOperation {
    let mut op = PocketOperation::new(
        "bore",
        Shape::Circle(CircleShape {
            center: Point::new(50.0, 50.0),
            radius: 10.0,
        }),
    );
    op.cutting.tool_diameter = 4.0;
    op.cutting.total_depth = 3.0;
    op.cutting.step_depth = 1.0;
    op.pocket.finish_allowance = 0.5;
    op
}

fn cut_points(toolpath: &Toolpath) -> Vec<Point> {
    toolpath
        .moves()
        .filter(|m| !m.is_rapid())
        .filter_map(|m| Some(Point::new(m.x?, m.y?)))
        .collect()
}

fn deepest(toolpath: &Toolpath) -> f64 {
    toolpath
        .moves()
        .filter_map(|m| m.z)
        .fold(f64::INFINITY, f64::min)
}

#[test]
fn test_circle_roughing_boundary_radii() {
    let op = circle_pocket();
    let geometry = create_pocket_geometry(&op).unwrap();
    let center = Point::new(50.0, 50.0);

    for p in geometry.contour(2.0, 0.0).points() {
        assert_relative_eq!(p.distance_to(&center), 8.0, epsilon = 1e-9);
    }

    let rough = geometry.apply_roughing_allowance(0.5);
    for p in rough.contour(2.0, 0.0).points() {
        assert_relative_eq!(p.distance_to(&center), 7.5, epsilon = 1e-9);
    }
    assert_relative_eq!(rough.operation().cutting.total_depth, 2.5);
    // The source geometry is untouched.
    assert_relative_eq!(geometry.operation().cutting.total_depth, 3.0);
}

#[test]
fn test_roughing_then_finishing_cuts_to_wall() {
    let settings = GCodeSettings::default();
    let mut op = circle_pocket();
    op.pocket.is_finishing_enabled = true;
    op.pocket.finishing_mode = FinishingMode::Walls;

    let result = PocketGenerator::new(&settings).generate(&op).unwrap();
    assert_eq!(result.outcome, GenerationOutcome::Completed);
    assert_relative_eq!(deepest(&result.toolpath), -3.0);

    let center = Point::new(50.0, 50.0);
    let farthest = cut_points(&result.toolpath)
        .iter()
        .map(|p| p.distance_to(&center))
        .fold(0.0, f64::max);
    assert_relative_eq!(farthest, 8.0, epsilon = 1e-9);
}

#[test]
fn test_neither_flag_cuts_full_depth_without_allowance() {
    let settings = GCodeSettings::default();
    let mut op = circle_pocket();
    op.pocket.is_roughing_enabled = false;
    op.pocket.is_finishing_enabled = false;

    let result = PocketGenerator::new(&settings).generate(&op).unwrap();
    assert_relative_eq!(deepest(&result.toolpath), -3.0);
    let center = Point::new(50.0, 50.0);
    let farthest = cut_points(&result.toolpath)
        .iter()
        .map(|p| p.distance_to(&center))
        .fold(0.0, f64::max);
    assert_relative_eq!(farthest, 8.0, epsilon = 1e-9);
}

fn farthest_cut(toolpath: &Toolpath, center: Point) -> f64 {
    cut_points(toolpath)
        .iter()
        .map(|p| p.distance_to(&center))
        .fold(0.0, f64::max)
}

#[test]
fn test_bottom_finishing_skims_floor_inside_allowance() {
    let settings = GCodeSettings::default();
    let mut op = circle_pocket();
    op.pocket.is_finishing_enabled = true;
    op.pocket.finishing_mode = FinishingMode::Bottom;

    let result = PocketGenerator::new(&settings).generate(&op).unwrap();
    assert_eq!(result.outcome, GenerationOutcome::Completed);
    assert_relative_eq!(deepest(&result.toolpath), -3.0);
    assert_relative_eq!(
        farthest_cut(&result.toolpath, Point::new(50.0, 50.0)),
        7.5,
        epsilon = 1e-9
    );

    let comments: Vec<&str> = result.toolpath.comments().collect();
    let bottom_passes: Vec<&&str> = comments
        .iter()
        .filter(|c| c.starts_with("Bottom finishing pass"))
        .collect();
    assert_eq!(bottom_passes.len(), 1);
    assert!(bottom_passes[0].ends_with("Z -3.000"));
    assert!(comments.iter().any(|c| c.starts_with("Roughing pass")));
    assert!(!comments.iter().any(|c| c.starts_with("Wall")));
}

#[test]
fn test_finishing_without_roughing_emits_no_roughing_passes() {
    let settings = GCodeSettings::default();
    let mut op = circle_pocket();
    op.pocket.is_roughing_enabled = false;
    op.pocket.is_finishing_enabled = true;
    op.pocket.finishing_mode = FinishingMode::All;

    let result = PocketGenerator::new(&settings).generate(&op).unwrap();
    assert_eq!(result.outcome, GenerationOutcome::Completed);
    assert_relative_eq!(deepest(&result.toolpath), -3.0);

    let comments: Vec<&str> = result.toolpath.comments().collect();
    assert!(!comments.iter().any(|c| c.starts_with("Roughing")));
    assert!(comments.contains(&"Bottom finishing"));
    assert!(comments.contains(&"Wall finishing"));
    assert_relative_eq!(
        farthest_cut(&result.toolpath, Point::new(50.0, 50.0)),
        8.0,
        epsilon = 1e-9
    );
}

#[test]
fn test_zero_depth_is_skipped() {
    let settings = GCodeSettings::default();
    let mut op = circle_pocket();
    op.cutting.total_depth = 0.0;
    let result = PocketGenerator::new(&settings).generate(&op).unwrap();
    assert_eq!(result.outcome, GenerationOutcome::Skipped(SkipReason::NoDepth));
}

#[test]
fn test_rectangle_strategies_stay_inside() {
    let settings = GCodeSettings::default();
    for strategy in [PocketStrategy::Spiral, PocketStrategy::Lines, PocketStrategy::ZigZag] {
        let mut op = PocketOperation::new(
            "slot",
            Shape::Rectangle(RectangleShape {
                center: Point::new(0.0, 0.0),
                width: 30.0,
                height: 12.0,
                rotation: 0.0,
            }),
        );
        op.cutting.tool_diameter = 6.0;
        op.cutting.total_depth = 2.0;
        op.pocket.strategy = strategy;

        let result = PocketGenerator::new(&settings).generate(&op).unwrap();
        let points = cut_points(&result.toolpath);
        assert!(!points.is_empty(), "{strategy:?} produced no cuts");
        for p in points {
            assert!(p.x.abs() <= 12.0 + 1e-9, "{strategy:?} left the pocket at {p:?}");
            assert!(p.y.abs() <= 3.0 + 1e-9, "{strategy:?} left the pocket at {p:?}");
        }
    }
}

#[test]
fn test_lines_strategy_lifts_between_lines() {
    let settings = GCodeSettings::default();
    let mut op = PocketOperation::new(
        "raster",
        Shape::Rectangle(RectangleShape {
            center: Point::new(0.0, 0.0),
            width: 20.0,
            height: 20.0,
            rotation: 0.0,
        }),
    );
    op.cutting.tool_diameter = 4.0;
    op.pocket.strategy = PocketStrategy::Lines;
    let result = PocketGenerator::new(&settings).generate(&op).unwrap();

    let lifts = result
        .toolpath
        .moves()
        .filter(|m| m.is_rapid() && m.z == Some(op.safety.retract_height))
        .count();
    assert!(lifts > 1);
}

#[test]
fn test_polygon_pocket() {
    let settings = GCodeSettings::default();
    let mut op = PocketOperation::new(
        "hex",
        Shape::Polygon(PolygonShape {
            center: Point::new(0.0, 0.0),
            radius: 15.0,
            sides: 6,
            rotation: 0.0,
        }),
    );
    op.cutting.tool_diameter = 3.0;
    let result = PocketGenerator::new(&settings).generate(&op).unwrap();
    assert_eq!(result.outcome, GenerationOutcome::Completed);
    assert!(result.toolpath.cut_length() > 0.0);
}
