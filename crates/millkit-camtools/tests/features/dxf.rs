use approx::assert_relative_eq;
use millkit_camtools::geometry::polygon::{inset_loops, offset_polygon, signed_area};
use millkit_camtools::{
    create_pocket_geometry, create_profile_geometry, DxfShape, GenerationOutcome,
    MillingDirection, Point, PocketGenerator, PocketGeometry, PocketOperation, ProfileGenerator,
    ProfileGeometry, ProfileOperation, Shape, SkipReason, ToolPathMode,
};
use millkit_settings::{FallbackValues, GCodeSettings};

fn square(origin: Point, size: f64) -> Vec<Point> {
    vec![
        origin,
        Point::new(origin.x + size, origin.y),
        Point::new(origin.x + size, origin.y + size),
        Point::new(origin.x, origin.y + size),
    ]
}

fn drawing() -> Shape {
    Shape::Dxf(DxfShape {
        contours: vec![
            square(Point::new(3.0, 3.0), 2.0),
            square(Point::new(0.0, 0.0), 20.0),
            // Open two-point polyline, ignored.
            vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0)],
        ],
    })
}

#[test]
fn test_inset_square_area() {
    let inset = offset_polygon(&square(Point::new(0.0, 0.0), 10.0), -1.0);
    assert_relative_eq!(signed_area(&inset).abs(), 64.0, epsilon = 1e-9);
}

#[test]
fn test_profile_follows_largest_contour() {
    let mut op = ProfileOperation::new("outline", drawing());
    op.cutting.tool_diameter = 2.0;
    op.profile.tool_path_mode = ToolPathMode::Outside;
    let geometry = create_profile_geometry(&op, &FallbackValues::default()).unwrap();

    let contour = geometry.contour_points(1.0, MillingDirection::CounterClockwise);
    let (min, max) = contour.bounds().unwrap();
    assert_relative_eq!(min.x, -1.0, epsilon = 1e-9);
    assert_relative_eq!(max.y, 21.0, epsilon = 1e-9);
    assert_relative_eq!(contour.area(), 484.0, epsilon = 1e-9);

    let settings = GCodeSettings::default();
    let result = ProfileGenerator::new(&settings).generate(&op).unwrap();
    assert_eq!(result.outcome, GenerationOutcome::Completed);
}

#[test]
fn test_inside_profile_collapses() {
    let mut op = ProfileOperation::new("outline", drawing());
    op.cutting.tool_diameter = 24.0;
    op.profile.tool_path_mode = ToolPathMode::Inside;
    let settings = GCodeSettings::default();
    let result = ProfileGenerator::new(&settings).generate(&op).unwrap();
    assert_eq!(
        result.outcome,
        GenerationOutcome::Skipped(SkipReason::GeometryTooSmall)
    );
}

#[test]
fn test_pocket_clears_inside_primary() {
    let mut op = PocketOperation::new("recess", drawing());
    op.cutting.tool_diameter = 4.0;
    let geometry = create_pocket_geometry(&op).unwrap();
    assert!(!geometry.is_too_small());

    let boundary = geometry.contour(2.0, 0.0);
    assert_relative_eq!(boundary.area(), 256.0, epsilon = 1e-9);
    assert!(geometry.is_point_inside(Point::new(10.0, 10.0), 2.0, 0.0));
    assert!(!geometry.is_point_inside(Point::new(1.0, 10.0), 2.0, 0.0));

    let settings = GCodeSettings::default();
    let result = PocketGenerator::new(&settings).generate(&op).unwrap();
    assert_eq!(result.outcome, GenerationOutcome::Completed);
    for mv in result.toolpath.moves().filter(|m| !m.is_rapid()) {
        if let (Some(x), Some(y)) = (mv.x, mv.y) {
            assert!((2.0 - 1e-9..=18.0 + 1e-9).contains(&x));
            assert!((2.0 - 1e-9..=18.0 + 1e-9).contains(&y));
        }
    }
}

#[test]
fn test_empty_drawing_is_too_small() {
    let op = PocketOperation::new("empty", Shape::Dxf(DxfShape { contours: vec![] }));
    let geometry = create_pocket_geometry(&op).unwrap();
    assert!(geometry.is_too_small());
    assert!(geometry.contour(1.0, 0.0).is_empty());
    assert!(inset_loops(&[], 1.0).is_empty());
}
