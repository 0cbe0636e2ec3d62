//! Node graph over the height grid.
//!
//! One `Node` per grid cell. Neighbors are stored as an 8-bit mask over
//! `NEIGHBOR_OFFSETS`, so a node refers to its neighbors by direction rather
//! than by owning pointer. The relation is symmetric: both directions run the
//! same distance test, and excluded nodes neither hold nor receive edges.

use rayon::prelude::*;
use strata_geom::Vec3;
use strata_terrain::HeightMap;

use crate::config::SolverConfig;

/// Grid offsets of the 8 surrounding cells. Index `i` and `7 - i` point in
/// opposite directions.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

#[inline]
pub fn direction_index(dx: i32, dy: i32) -> Option<usize> {
    NEIGHBOR_OFFSETS.iter().position(|&o| o == (dx, dy))
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    position: Vec3,
    excluded: bool,
    neighbors: u8,
}

impl Node {
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Too close to the grid's bottom to take part in connectivity.
    #[inline]
    pub fn is_excluded(&self) -> bool {
        self.excluded
    }

    #[inline]
    pub fn neighbor_mask(&self) -> u8 {
        self.neighbors
    }

    #[inline]
    pub fn has_neighbor(&self, dir: usize) -> bool {
        self.neighbors & (1 << dir) != 0
    }

    #[inline]
    pub fn neighbor_count(&self) -> u32 {
        self.neighbors.count_ones()
    }
}

#[derive(Clone, Debug)]
pub struct NodeGraph {
    size_x: usize,
    size_y: usize,
    min_height: f32,
    nodes: Vec<Node>,
}

impl NodeGraph {
    pub fn build(hm: &HeightMap, config: &SolverConfig) -> NodeGraph {
        let (size_x, size_y) = (hm.size_x(), hm.size_y());

        let min_height = hm.min_height();

        // A grid without that much relief has no bottom to cut away.
        let margin = config.min_distance_from_bottom;
        let exclusion_active = hm.relief() >= margin;
        let excluded: Vec<bool> = hm
            .positions()
            .iter()
            .map(|p| exclusion_active && (p.y - min_height).abs() < margin)
            .collect();

        let max_distance = config.max_node_distance;
        let masks: Vec<u8> = (0..hm.len())
            .into_par_iter()
            .map(|i| {
                if excluded[i] {
                    return 0;
                }
                let x = (i % size_x) as i32;
                let y = (i / size_x) as i32;
                let here = hm.positions()[i];
                let mut mask = 0u8;
                for (dir, &(dx, dy)) in NEIGHBOR_OFFSETS.iter().enumerate() {
                    let ox = x + dx;
                    let oy = y + dy;
                    if ox < 0 || oy < 0 || ox >= size_x as i32 || oy >= size_y as i32 {
                        continue;
                    }
                    let j = oy as usize * size_x + ox as usize;
                    if excluded[j] {
                        continue;
                    }
                    if here.distance(hm.positions()[j]) > max_distance {
                        continue;
                    }
                    mask |= 1 << dir;
                }
                mask
            })
            .collect();

        let nodes = hm
            .positions()
            .iter()
            .zip(excluded)
            .zip(masks)
            .map(|((&position, excluded), neighbors)| Node {
                position,
                excluded,
                neighbors,
            })
            .collect();

        NodeGraph {
            size_x,
            size_y,
            min_height,
            nodes,
        }
    }

    #[inline]
    pub fn size_x(&self) -> usize {
        self.size_x
    }

    #[inline]
    pub fn size_y(&self) -> usize {
        self.size_y
    }

    /// Lowest sampled height seen while building the graph.
    #[inline]
    pub fn min_height(&self) -> f32 {
        self.min_height
    }

    #[inline]
    pub fn node(&self, x: usize, y: usize) -> &Node {
        &self.nodes[y * self.size_x + x]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// True when `a` holds `b` as a neighbor. Cells that are not
    /// grid-adjacent are never neighbors.
    pub fn is_neighbor(&self, a: (usize, usize), b: (usize, usize)) -> bool {
        let dx = b.0 as i64 - a.0 as i64;
        let dy = b.1 as i64 - a.1 as i64;
        if dx.abs() > 1 || dy.abs() > 1 {
            return false;
        }
        match direction_index(dx as i32, dy as i32) {
            Some(dir) => self.node(a.0, a.1).has_neighbor(dir),
            None => false,
        }
    }

    /// Grid coordinates of every neighbor of `(x, y)`.
    pub fn neighbors(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        let node = self.node(x, y);
        NEIGHBOR_OFFSETS
            .iter()
            .enumerate()
            .filter(move |(dir, _)| node.has_neighbor(*dir))
            .map(move |(_, &(dx, dy))| ((x as i32 + dx) as usize, (y as i32 + dy) as usize))
    }

    pub fn excluded_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.excluded).count()
    }

    /// Undirected edge count.
    pub fn edge_count(&self) -> usize {
        self.nodes
            .iter()
            .map(|n| n.neighbor_count() as usize)
            .sum::<usize>()
            / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_geom::Vec2;

    fn flat(sx: usize, sy: usize) -> HeightMap {
        HeightMap::from_heights(sx, sy, 1.0, Vec2::ZERO, &vec![0.0; sx * sy]).unwrap()
    }

    #[test]
    fn opposite_offsets_mirror() {
        for (i, &(dx, dy)) in NEIGHBOR_OFFSETS.iter().enumerate() {
            assert_eq!(NEIGHBOR_OFFSETS[7 - i], (-dx, -dy));
        }
    }

    #[test]
    fn interior_node_on_flat_grid_has_eight_neighbors() {
        let graph = NodeGraph::build(&flat(3, 3), &SolverConfig::default());
        assert_eq!(graph.node(1, 1).neighbor_count(), 8);
        assert_eq!(graph.node(0, 0).neighbor_count(), 3);
        assert_eq!(graph.node(1, 0).neighbor_count(), 5);
        assert_eq!(graph.excluded_count(), 0);
        // 12 axis edges + 8 diagonals
        assert_eq!(graph.edge_count(), 20);
    }

    #[test]
    fn neighbors_iterates_grid_coords() {
        let graph = NodeGraph::build(&flat(2, 2), &SolverConfig::default());
        let mut n: Vec<_> = graph.neighbors(0, 0).collect();
        n.sort();
        assert_eq!(n, vec![(0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn non_adjacent_cells_are_not_neighbors() {
        let graph = NodeGraph::build(&flat(4, 1), &SolverConfig::default());
        assert!(graph.is_neighbor((0, 0), (1, 0)));
        assert!(!graph.is_neighbor((0, 0), (2, 0)));
        assert!(!graph.is_neighbor((1, 0), (1, 0)));
    }

    #[test]
    fn min_height_is_tracked() {
        let hm = HeightMap::from_heights(2, 2, 1.0, Vec2::ZERO, &[3.0, -2.0, 4.0, 1.0]).unwrap();
        let graph = NodeGraph::build(&hm, &SolverConfig::default());
        assert_eq!(graph.min_height(), -2.0);
    }
}
