//! Vertex reduction for boundary polygons.
//!
//! Two passes: coincident neighbors collapse first, then vertices lying on
//! the chord of their neighbors are dropped one at a time. A drop is only
//! taken when the ring stays simple, keeps its winding and the total area it
//! has lost stays within `max_area_drift`.

use rayon::prelude::*;
use strata_geom::Vec2;
use strata_geom::polygon::{orient, point_segment_distance, segments_intersect, signed_area};

use crate::SolveError;
use crate::config::OptimizerConfig;
use crate::shape::OrderedShape;

impl OrderedShape {
    /// Removes redundant vertices in place. Never adds a vertex.
    pub fn optimize(&mut self, cfg: &OptimizerConfig) -> Result<(), SolveError> {
        let n = self.vertices.len();
        if n < 3 {
            return Err(SolveError::DegeneratePolygon { vertices: n });
        }
        let original = self.signed_area();

        let mut ring = drop_coincident(&self.vertices, cfg.coincident_epsilon);
        if ring.len() < 3 {
            // Everything collapsed; the input is already as small as it gets.
            return Ok(());
        }

        let mut area = signed_area(&ring);
        let mut drift = (area - original).abs();
        let mut changed = true;
        while changed && ring.len() > 3 {
            changed = false;
            let mut i = 0;
            while i < ring.len() && ring.len() > 3 {
                let n = ring.len();
                let prev = (i + n - 1) % n;
                let next = (i + 1) % n;
                let (a, p, b) = (ring[prev], ring[i], ring[next]);
                if point_segment_distance(p, a, b) > cfg.collinear_epsilon {
                    i += 1;
                    continue;
                }
                // Dropping `p` removes triangle (a, p, b) from the ring.
                let removed = 0.5 * orient(a, p, b);
                let next_area = area - removed;
                let next_drift = drift + removed.abs();
                if next_drift > cfg.max_area_drift
                    || next_area == 0.0
                    || next_area.signum() != original.signum()
                    || chord_crosses(&ring, prev, i, next)
                {
                    i += 1;
                    continue;
                }
                ring.remove(i);
                area = next_area;
                drift = next_drift;
                changed = true;
            }
        }

        log::trace!(
            target: "solver",
            "optimize vertices {} -> {} drift={:.6}",
            n,
            ring.len(),
            drift
        );
        self.vertices = ring;
        Ok(())
    }
}

/// Optimizes every shape in parallel; the first failure aborts the stage.
pub fn optimize_all(shapes: &mut [OrderedShape], cfg: &OptimizerConfig) -> Result<(), SolveError> {
    shapes.par_iter_mut().try_for_each(|s| s.optimize(cfg))
}

fn drop_coincident(ring: &[Vec2], eps: f32) -> Vec<Vec2> {
    let mut out: Vec<Vec2> = Vec::with_capacity(ring.len());
    for &v in ring {
        match out.last() {
            Some(&last) if last.distance(v) <= eps => {}
            _ => out.push(v),
        }
    }
    // Closing edge.
    while out.len() > 1 && out[0].distance(out[out.len() - 1]) <= eps {
        out.pop();
    }
    out
}

/// Would the chord `prev -> next` cut an edge not touching either endpoint?
fn chord_crosses(ring: &[Vec2], prev: usize, skip: usize, next: usize) -> bool {
    let n = ring.len();
    let (a, b) = (ring[prev], ring[next]);
    (0..n).any(|j| {
        let k = (j + 1) % n;
        let touches = [prev, skip, next].contains(&j) || [prev, skip, next].contains(&k);
        !touches && segments_intersect(a, b, ring[j], ring[k])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(pts: &[(f32, f32)]) -> OrderedShape {
        OrderedShape::new(pts.iter().map(|&(x, y)| Vec2::new(x, y)).collect())
    }

    #[test]
    fn collinear_edge_vertices_collapse_to_corners() {
        // 3x3 square traced at unit steps.
        let mut s = shape(&[
            (0.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (3.0, 0.0),
            (3.0, 1.0),
            (3.0, 2.0),
            (3.0, 3.0),
            (2.0, 3.0),
            (1.0, 3.0),
            (0.0, 3.0),
            (0.0, 2.0),
            (0.0, 1.0),
        ]);
        s.optimize(&OptimizerConfig::default()).unwrap();
        assert_eq!(s.len(), 4);
        assert_eq!(s.area(), 9.0);
        assert!(!s.is_hole());
    }

    #[test]
    fn real_corners_survive() {
        let mut s = shape(&[(0.0, 0.0), (2.0, 0.0), (2.0, 1.0), (1.0, 1.0), (1.0, 2.0), (0.0, 2.0)]);
        let before = s.clone();
        s.optimize(&OptimizerConfig::default()).unwrap();
        assert_eq!(s, before);
    }

    #[test]
    fn coincident_vertices_merge() {
        let mut s = shape(&[(0.0, 0.0), (0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.00001)]);
        s.optimize(&OptimizerConfig::default()).unwrap();
        assert_eq!(s.len(), 4);
    }

    #[test]
    fn drift_budget_is_respected() {
        // The middle vertex bows out by 0.0009, below collinear epsilon, but
        // the triangle it spans is bigger than a zero area budget allows.
        let mut s = shape(&[(0.0, 0.0), (5.0, -0.0009), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let cfg = OptimizerConfig {
            max_area_drift: 0.0,
            ..OptimizerConfig::default()
        };
        s.optimize(&cfg).unwrap();
        assert_eq!(s.len(), 5);
        s.optimize(&OptimizerConfig::default()).unwrap();
        assert_eq!(s.len(), 4);
    }

    #[test]
    fn holes_keep_clockwise_winding() {
        let mut s = shape(&[(0.0, 0.0), (0.0, 1.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0), (1.0, 0.0)]);
        assert!(s.is_hole());
        s.optimize(&OptimizerConfig::default()).unwrap();
        assert!(s.is_hole());
        assert_eq!(s.len(), 4);
    }

    #[test]
    fn too_few_vertices_is_an_error() {
        let mut s = shape(&[(0.0, 0.0), (1.0, 0.0)]);
        assert!(matches!(
            s.optimize(&OptimizerConfig::default()),
            Err(SolveError::DegeneratePolygon { vertices: 2 })
        ));
    }

    #[test]
    fn optimize_all_reports_first_failure() {
        let mut shapes = vec![
            shape(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]),
            shape(&[(0.0, 0.0)]),
        ];
        assert!(optimize_all(&mut shapes, &OptimizerConfig::default()).is_err());
    }
}
