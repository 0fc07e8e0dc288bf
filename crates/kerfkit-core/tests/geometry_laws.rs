//! Property tests for the containment relation

use kerfkit_core::{polygon_contains, Point, Polygon};
use proptest::prelude::*;

fn rect(x: f64, y: f64, w: f64, h: f64) -> Polygon {
    Polygon::new(vec![
        Point::new(x, y),
        Point::new(x, y + h),
        Point::new(x + w, y + h),
        Point::new(x + w, y),
    ])
}

fn arb_rect() -> impl Strategy<Value = Polygon> {
    (
        -500.0f64..500.0,
        -500.0f64..500.0,
        0.5f64..300.0,
        0.5f64..300.0,
    )
        .prop_map(|(x, y, w, h)| rect(x, y, w, h))
}

proptest! {
    #[test]
    fn containment_is_antisymmetric(a in arb_rect(), b in arb_rect()) {
        prop_assert!(!(polygon_contains(&a, &b) && polygon_contains(&b, &a)));
    }

    #[test]
    fn containment_is_irreflexive(a in arb_rect()) {
        prop_assert!(!polygon_contains(&a, &a));
    }

    #[test]
    fn shrunken_rect_is_contained(x in -500.0f64..500.0, y in -500.0f64..500.0, w in 10.0f64..300.0, h in 10.0f64..300.0) {
        let outer = rect(x, y, w, h);
        let inner = rect(x + 1.0, y + 1.0, w - 2.0, h - 2.0);
        prop_assert!(polygon_contains(&outer, &inner));
        prop_assert!(!polygon_contains(&inner, &outer));
    }

    #[test]
    fn containment_ignores_traversal_direction(a in arb_rect(), b in arb_rect()) {
        prop_assert_eq!(polygon_contains(&a, &b), polygon_contains(&a.reversed(), &b.reversed()));
    }
}
