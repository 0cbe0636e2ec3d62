use proptest::prelude::*;
use strata_geom::Vec2;
use strata_nav::{OptimizerConfig, OrderedShape};

/// Axis-aligned rectangle traced at unit steps, counter-clockwise.
fn traced_rect(w: u32, h: u32, origin: (f32, f32)) -> Vec<Vec2> {
    let (ox, oy) = origin;
    let mut pts = Vec::new();
    for x in 0..w {
        pts.push((x as f32, 0.0));
    }
    for y in 0..h {
        pts.push((w as f32, y as f32));
    }
    for x in (1..=w).rev() {
        pts.push((x as f32, h as f32));
    }
    for y in (1..=h).rev() {
        pts.push((0.0, y as f32));
    }
    pts.into_iter().map(|(x, y)| Vec2::new(ox + x, oy + y)).collect()
}

/// Staircase from (0,0) up to (n,n), closed along the axes.
fn staircase(n: u32) -> Vec<Vec2> {
    let mut pts = vec![Vec2::new(0.0, 0.0)];
    for i in 0..n {
        pts.push(Vec2::new(n as f32 - i as f32, i as f32));
        pts.push(Vec2::new(n as f32 - i as f32, i as f32 + 1.0));
    }
    pts.push(Vec2::new(0.0, n as f32));
    pts.dedup();
    pts
}

proptest! {
    #[test]
    fn rectangles_reduce_to_corners(
        w in 1u32..12,
        h in 1u32..12,
        ox in -50.0f32..50.0,
        oy in -50.0f32..50.0,
        reversed in any::<bool>(),
    ) {
        let mut pts = traced_rect(w, h, (ox.round(), oy.round()));
        if reversed {
            pts.reverse();
        }
        let mut shape = OrderedShape::new(pts);
        let before_area = shape.signed_area();
        let before_len = shape.len();
        shape.optimize(&OptimizerConfig::default()).unwrap();
        prop_assert_eq!(shape.len(), 4);
        prop_assert!(shape.len() <= before_len);
        prop_assert!((shape.signed_area() - before_area).abs() <= 1e-2);
        prop_assert_eq!(shape.is_hole(), reversed);
        prop_assert!(shape.is_simple());
    }

    #[test]
    fn staircases_keep_every_step(n in 1u32..10, reversed in any::<bool>()) {
        let mut pts = staircase(n);
        if reversed {
            pts.reverse();
        }
        let mut shape = OrderedShape::new(pts);
        let before = shape.clone();
        shape.optimize(&OptimizerConfig::default()).unwrap();
        prop_assert!(shape.len() <= before.len());
        prop_assert_eq!(shape.signed_area(), before.signed_area());
        prop_assert_eq!(shape.is_hole(), before.is_hole());
        prop_assert!(shape.is_simple());
    }

    #[test]
    fn jitter_within_tolerance_is_absorbed(
        w in 2u32..8,
        jitter in proptest::collection::vec(-4e-4f32..4e-4, 64),
    ) {
        let mut pts = traced_rect(w, w, (0.0, 0.0));
        // Nudge vertices off their edges by less than the collinear epsilon.
        for (p, j) in pts.iter_mut().zip(jitter.iter().cycle()) {
            let on_vertical = p.x == 0.0 || p.x == w as f32;
            let corner = on_vertical && (p.y == 0.0 || p.y == w as f32);
            if corner {
                continue;
            }
            if on_vertical {
                p.x += j;
            } else {
                p.y += j;
            }
        }
        let mut shape = OrderedShape::new(pts);
        let before_area = shape.signed_area();
        let before_len = shape.len();
        let cfg = OptimizerConfig::default();
        shape.optimize(&cfg).unwrap();
        prop_assert!(shape.len() <= before_len);
        prop_assert!(shape.len() >= 3);
        prop_assert!((shape.signed_area() - before_area).abs() <= cfg.max_area_drift + 1e-4);
        prop_assert!(!shape.is_hole());
        prop_assert!(shape.is_simple());
    }
}
