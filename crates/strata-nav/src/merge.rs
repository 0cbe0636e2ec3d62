//! Region construction and merging.
//!
//! Stage 1 walks each grid column independently and greedily merges quads in
//! increasing `y`. Stage 2 reduces the per-column lists with a pairwise
//! tournament: every round pairs neighboring lists, reduces all pairs in
//! parallel, and halves the list count until one list remains.

use rayon::prelude::*;

use crate::config::QuadConnectivity;
use crate::graph::NodeGraph;
use crate::region::UnorderedShape;

/// Per-column shape lists, indexed by column `x` in `[0, size_x - 2]`.
pub fn build_column_shapes(
    graph: &NodeGraph,
    connectivity: QuadConnectivity,
) -> Vec<Vec<UnorderedShape>> {
    let columns = graph.size_x().saturating_sub(1);
    (0..columns)
        .into_par_iter()
        .map(|x| build_column(graph, x, connectivity))
        .collect()
}

/// Sequential scan of one column; order matters, so this never forks.
pub fn build_column(
    graph: &NodeGraph,
    x: usize,
    connectivity: QuadConnectivity,
) -> Vec<UnorderedShape> {
    let mut shapes: Vec<UnorderedShape> = Vec::new();
    for y in 0..graph.size_y().saturating_sub(1) {
        let Some(shape) = UnorderedShape::from_nodes(graph, x, y, connectivity) else {
            continue;
        };
        match shapes.last_mut() {
            Some(last) if last.can_merge(&shape) => last.merge(shape),
            _ => shapes.push(shape),
        }
    }
    shapes
}

/// One unit of work in a tournament round.
#[derive(Debug)]
pub enum Partition {
    Pair(Vec<UnorderedShape>, Vec<UnorderedShape>),
    /// Odd list out; carried into the next round untouched.
    PassThrough(Vec<UnorderedShape>),
}

impl Partition {
    /// Splits a round's lists into pairs plus a trailing pass-through.
    pub fn split_round(lists: Vec<Vec<UnorderedShape>>) -> Vec<Partition> {
        let mut out = Vec::with_capacity(lists.len().div_ceil(2));
        let mut it = lists.into_iter();
        while let Some(a) = it.next() {
            match it.next() {
                Some(b) => out.push(Partition::Pair(a, b)),
                None => out.push(Partition::PassThrough(a)),
            }
        }
        out
    }

    pub fn reduce(self) -> Vec<UnorderedShape> {
        match self {
            Partition::Pair(mut a, b) => {
                a.extend(b);
                reduce_shapes(a)
            }
            Partition::PassThrough(a) => a,
        }
    }
}

/// Fixed-point merge: takes the first unresolved shape, absorbs every
/// mergeable shape left, repeats until it finds no partner, then emits it.
pub fn reduce_shapes(shapes: Vec<UnorderedShape>) -> Vec<UnorderedShape> {
    let mut pending = shapes;
    let mut resolved = Vec::new();
    while !pending.is_empty() {
        let mut current = pending.remove(0);
        loop {
            let mut changed = false;
            let mut i = 0;
            while i < pending.len() {
                if current.can_merge(&pending[i]) {
                    let other = pending.remove(i);
                    current.merge(other);
                    changed = true;
                } else {
                    i += 1;
                }
            }
            if !changed {
                break;
            }
        }
        resolved.push(current);
    }
    resolved
}

/// Parallel tournament over column lists. Returns the maximal regions.
pub fn tournament_reduce(mut lists: Vec<Vec<UnorderedShape>>) -> Vec<UnorderedShape> {
    let mut round = 0usize;
    while lists.len() > 1 {
        let partitions = Partition::split_round(lists);
        log::trace!(target: "solver", "merge round={} partitions={}", round, partitions.len());
        lists = partitions.into_par_iter().map(Partition::reduce).collect();
        round += 1;
    }
    lists.pop().unwrap_or_default()
}

/// Single-threaded reference merge over every shape at once.
pub fn merge_serial(lists: Vec<Vec<UnorderedShape>>) -> Vec<UnorderedShape> {
    reduce_shapes(lists.into_iter().flatten().collect())
}
