use proptest::prelude::*;
use strata_geom::Vec2;
use strata_geom::polygon::{is_simple, segments_intersect, signed_area};

fn approx_abs_rel(a: f32, b: f32, atol: f32, rtol: f32) -> bool {
    let diff = (a - b).abs();
    let scale = a.abs().max(b.abs());
    diff <= atol + rtol * scale
}

fn coord() -> impl Strategy<Value = f32> {
    (-1_000i32..=1_000).prop_map(|v| v as f32 * 0.5)
}

fn arb_vec2() -> impl Strategy<Value = Vec2> {
    (coord(), coord()).prop_map(|(x, y)| Vec2::new(x, y))
}

fn arb_rect() -> impl Strategy<Value = Vec<Vec2>> {
    (coord(), coord(), 1i32..=200, 1i32..=200).prop_map(|(x, y, w, h)| {
        let (w, h) = (w as f32, h as f32);
        vec![
            Vec2::new(x, y),
            Vec2::new(x + w, y),
            Vec2::new(x + w, y + h),
            Vec2::new(x, y + h),
        ]
    })
}

fn arb_ring() -> impl Strategy<Value = Vec<Vec2>> {
    prop::collection::vec(arb_vec2(), 3..12)
}

proptest! {
    // Reversing a ring negates its signed area
    #[test]
    fn reversal_negates_area(ring in arb_ring()) {
        let mut rev = ring.clone();
        rev.reverse();
        prop_assert!(approx_abs_rel(signed_area(&ring), -signed_area(&rev), 1e-3, 1e-5));
    }

    // Rotating the starting vertex leaves the area unchanged
    #[test]
    fn rotation_keeps_area(ring in arb_ring(), k in 0usize..12) {
        let mut rot = ring.clone();
        let k = k % rot.len();
        rot.rotate_left(k);
        prop_assert!(approx_abs_rel(signed_area(&ring), signed_area(&rot), 1e-3, 1e-5));
    }

    // Axis-aligned rectangles are simple with area w*h
    #[test]
    fn rectangles_are_simple(rect in arb_rect()) {
        prop_assert!(is_simple(&rect));
        let w = rect[1].x - rect[0].x;
        let h = rect[3].y - rect[0].y;
        prop_assert!(approx_abs_rel(signed_area(&rect), w * h, 1e-3, 1e-5));
    }

    // Intersection is symmetric in argument order
    #[test]
    fn intersection_symmetric(a in arb_vec2(), b in arb_vec2(), c in arb_vec2(), d in arb_vec2()) {
        prop_assert_eq!(segments_intersect(a, b, c, d), segments_intersect(c, d, a, b));
        prop_assert_eq!(segments_intersect(a, b, c, d), segments_intersect(b, a, d, c));
    }
}
