use millkit_camtools::profile::{ramp_steps, ramp_sweep};
use millkit_camtools::{
    create_pocket_geometry, create_profile_geometry, CircleShape, DepthLayers, MillingDirection,
    Point, PocketGeometry, PocketOperation, PolygonShape, ProfileGeometry, ProfileOperation,
    RectangleShape, Shape,
};
use millkit_settings::FallbackValues;
use proptest::prelude::*;
use std::f64::consts::TAU;

fn circle_pocket(radius: f64, total_depth: f64) -> PocketOperation {
    let mut op = PocketOperation::new(
        "c",
        Shape::Circle(CircleShape {
            center: Point::new(0.0, 0.0),
            radius,
        }),
    );
    op.cutting.total_depth = total_depth;
    op
}

fn rectangle(width: f64, height: f64, rotation: f64) -> Shape {
    Shape::Rectangle(RectangleShape {
        center: Point::new(1.0, -2.0),
        width,
        height,
        rotation,
    })
}

proptest! {
    #[test]
    fn prop_roughing_allowance_shrinks_radius_and_depth(
        radius in 1.0f64..100.0,
        total in 0.5f64..20.0,
        fraction in 0.01f64..0.99,
    ) {
        let allowance = total * fraction;
        let op = circle_pocket(radius, total);
        let geometry = create_pocket_geometry(&op).unwrap();
        let rough = geometry.apply_roughing_allowance(allowance);

        let depth = rough.operation().cutting.total_depth;
        prop_assert!((depth - (total - allowance)).abs() < 1e-9);

        let expected = radius - allowance;
        if expected > 0.0 {
            for p in rough.contour(0.0, 0.0).points() {
                prop_assert!((p.distance_to(&Point::new(0.0, 0.0)) - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn prop_allowance_past_half_size_is_too_small(
        width in 0.1f64..50.0,
        height in 0.1f64..50.0,
        extra in 0.0f64..5.0,
    ) {
        let op = PocketOperation::new("r", rectangle(width, height, 0.0));
        let geometry = create_pocket_geometry(&op).unwrap();
        let allowance = width.min(height) / 2.0 + extra;
        prop_assert!(geometry.apply_roughing_allowance(allowance).is_too_small());
        prop_assert!(geometry.apply_bottom_finishing_allowance(allowance).is_too_small());
    }

    #[test]
    fn prop_depth_layers_end_on_final_depth(
        top in -10.0f64..10.0,
        total in 0.01f64..30.0,
        step in 0.05f64..5.0,
    ) {
        let zs: Vec<f64> = DepthLayers::new(top, total, step).map(|p| p.next_z).collect();
        prop_assert!(zs.windows(2).all(|w| w[1] < w[0]));
        prop_assert!((zs[zs.len() - 1] - (top - total)).abs() < 1e-9);
        let expected = ((total / step) - 1e-9).ceil().max(1.0) as usize;
        prop_assert_eq!(zs.len(), expected);
    }

    #[test]
    fn prop_clockwise_is_reversed_counter_clockwise(
        width in 1.0f64..50.0,
        height in 1.0f64..50.0,
        rotation in -180.0f64..180.0,
        sides in 3u32..12,
        offset in -0.4f64..3.0,
    ) {
        let shapes = [
            rectangle(width, height, rotation),
            Shape::Polygon(PolygonShape {
                center: Point::new(0.0, 0.0),
                radius: width,
                sides,
                rotation,
            }),
        ];
        for shape in shapes {
            let op = ProfileOperation::new("p", shape);
            let geometry = create_profile_geometry(&op, &FallbackValues::default()).unwrap();
            let mut ccw = geometry
                .contour_points(offset, MillingDirection::CounterClockwise)
                .into_points();
            let cw = geometry
                .contour_points(offset, MillingDirection::Clockwise)
                .into_points();
            ccw.reverse();
            prop_assert_eq!(ccw, cw);
        }
    }

    #[test]
    fn prop_ramp_sweep_within_one_turn(
        distance in 0.0f64..1e6,
        perimeter in 0.0f64..1e3,
        clockwise in any::<bool>(),
    ) {
        let direction = if clockwise {
            MillingDirection::Clockwise
        } else {
            MillingDirection::CounterClockwise
        };
        let sweep = ramp_sweep(distance, perimeter, direction);
        prop_assert!(sweep.abs() <= TAU);
        prop_assert!(ramp_steps(sweep) >= 4);
        prop_assert!(ramp_steps(sweep) <= 32);
    }
}
