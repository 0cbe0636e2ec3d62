//! Boundary extraction: merged quad regions to ordered planar polygons.
//!
//! Every quad side not shared with another quad of the same region becomes a
//! directed unit edge with the region on its left. Edges chain into loops;
//! where two quads touch only at a corner the walk turns left, keeping them
//! apart. A loop that still passes a grid vertex twice is cut there, so every
//! emitted ring has distinct vertices.

use hashbrown::{HashMap, HashSet};
use rayon::prelude::*;

use crate::SolveError;
use crate::graph::NodeGraph;
use crate::region::{Cell, UnorderedShape};
use crate::shape::OrderedShape;

type GridVertex = (i32, i32);
type Edge = (GridVertex, GridVertex);

/// Boundary polygons of every region, concatenated in region order.
pub fn extract_all(
    regions: &[UnorderedShape],
    graph: &NodeGraph,
) -> Result<Vec<OrderedShape>, SolveError> {
    let per_region: Vec<Vec<OrderedShape>> = regions
        .par_iter()
        .enumerate()
        .map(|(i, region)| extract_boundaries(i, region, graph))
        .collect::<Result<_, _>>()?;
    Ok(per_region.into_iter().flatten().collect())
}

/// Outer boundary plus any hole boundaries of one region.
pub fn extract_boundaries(
    region_index: usize,
    region: &UnorderedShape,
    graph: &NodeGraph,
) -> Result<Vec<OrderedShape>, SolveError> {
    let rings = trace_rings(region_index, region)?;
    Ok(rings
        .into_iter()
        .map(|ring| {
            OrderedShape::new(
                ring.into_iter()
                    .map(|(x, y)| graph.node(x as usize, y as usize).position().xz())
                    .collect(),
            )
        })
        .collect())
}

fn boundary_edges(region: &UnorderedShape) -> Vec<Edge> {
    let mut edges = Vec::new();
    for cell in region.cells() {
        let (x, y) = (cell.x as i32, cell.y as i32);
        let has = |dx: i32, dy: i32| {
            let nx = x + dx;
            let ny = y + dy;
            nx >= 0
                && ny >= 0
                && region.contains(Cell::new(nx as u32, ny as u32))
        };
        if !has(0, -1) {
            edges.push(((x, y), (x + 1, y)));
        }
        if !has(1, 0) {
            edges.push(((x + 1, y), (x + 1, y + 1)));
        }
        if !has(0, 1) {
            edges.push(((x + 1, y + 1), (x, y + 1)));
        }
        if !has(-1, 0) {
            edges.push(((x, y + 1), (x, y)));
        }
    }
    edges
}

#[inline]
fn dir(e: Edge) -> (i32, i32) {
    (e.1.0 - e.0.0, e.1.1 - e.0.1)
}

/// Turn preference: left, straight, right, back.
#[inline]
fn turn_rank(incoming: (i32, i32), outgoing: (i32, i32)) -> u8 {
    let cross = incoming.0 * outgoing.1 - incoming.1 * outgoing.0;
    let dot = incoming.0 * outgoing.0 + incoming.1 * outgoing.1;
    match (cross.signum(), dot.signum()) {
        (1, _) => 0,
        (0, 1) => 1,
        (-1, _) => 2,
        _ => 3,
    }
}

/// Closed rings of grid vertices, each with distinct vertices.
pub(crate) fn trace_rings(
    region_index: usize,
    region: &UnorderedShape,
) -> Result<Vec<Vec<GridVertex>>, SolveError> {
    let edges = boundary_edges(region);
    let mut outgoing: HashMap<GridVertex, Vec<GridVertex>> = HashMap::with_capacity(edges.len());
    for &(a, b) in &edges {
        outgoing.entry(a).or_default().push(b);
    }

    let mut used: HashSet<Edge> = HashSet::with_capacity(edges.len());
    let mut rings = Vec::new();
    for &start in &edges {
        if used.contains(&start) {
            continue;
        }
        let mut walk = Vec::new();
        let mut edge = start;
        loop {
            used.insert(edge);
            walk.push(edge.0);
            let at = edge.1;
            let incoming = dir(edge);
            let next = outgoing
                .get(&at)
                .and_then(|outs| {
                    outs.iter()
                        .copied()
                        .min_by_key(|&to| turn_rank(incoming, (to.0 - at.0, to.1 - at.1)))
                })
                .map(|to| (at, to))
                .ok_or(SolveError::OpenBoundary {
                    region: region_index,
                    x: at.0,
                    y: at.1,
                })?;
            if next == start {
                break;
            }
            if used.contains(&next) {
                return Err(SolveError::OpenBoundary {
                    region: region_index,
                    x: at.0,
                    y: at.1,
                });
            }
            edge = next;
        }
        split_at_repeats(walk, &mut rings);
    }
    Ok(rings)
}

/// Cuts a closed walk into rings at every repeated vertex.
fn split_at_repeats(walk: Vec<GridVertex>, rings: &mut Vec<Vec<GridVertex>>) {
    let mut stack: Vec<GridVertex> = Vec::with_capacity(walk.len());
    let mut seen: HashMap<GridVertex, usize> = HashMap::with_capacity(walk.len());
    for v in walk {
        if let Some(&k) = seen.get(&v) {
            let ring: Vec<GridVertex> = stack.drain(k..).collect();
            for p in &ring {
                seen.remove(p);
            }
            rings.push(ring);
        }
        seen.insert(v, stack.len());
        stack.push(v);
    }
    if !stack.is_empty() {
        rings.push(stack);
    }
}
