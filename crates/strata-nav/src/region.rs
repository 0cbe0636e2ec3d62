//! Unordered region shapes built from walkable 2x2 node quads.
//!
//! A quad is named by its lower-left grid corner `(x, y)` and spans the
//! nodes `(x, y)`, `(x + 1, y)`, `(x, y + 1)`, `(x + 1, y + 1)`. A shape is a
//! set of such quads; two shapes can merge once some quad of one shares a
//! full side (two corner nodes) with some quad of the other.

use std::collections::BTreeSet;

use crate::config::QuadConnectivity;
use crate::graph::NodeGraph;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell {
    pub x: u32,
    pub y: u32,
}

impl Cell {
    #[inline]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// The up-to-four cells sharing a side with this one.
    pub fn side_neighbors(self) -> impl Iterator<Item = Cell> {
        let Cell { x, y } = self;
        [
            x.checked_sub(1).map(|x| Cell::new(x, y)),
            x.checked_add(1).map(|x| Cell::new(x, y)),
            y.checked_sub(1).map(|y| Cell::new(x, y)),
            y.checked_add(1).map(|y| Cell::new(x, y)),
        ]
        .into_iter()
        .flatten()
    }
}

/// Why a quad does or does not yield a shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuadState {
    Walkable,
    /// At least one corner sits at the grid's bottom.
    ExcludedCorner,
    /// The corners are not connected as `QuadConnectivity` demands.
    Disconnected,
}

pub fn classify_quad(
    graph: &NodeGraph,
    x: usize,
    y: usize,
    connectivity: QuadConnectivity,
) -> QuadState {
    let a = (x, y);
    let b = (x + 1, y);
    let c = (x, y + 1);
    let d = (x + 1, y + 1);
    if [a, b, c, d]
        .iter()
        .any(|&(cx, cy)| graph.node(cx, cy).is_excluded())
    {
        return QuadState::ExcludedCorner;
    }
    let sides = [(a, b), (b, d), (d, c), (c, a)];
    if !sides.iter().all(|&(p, q)| graph.is_neighbor(p, q)) {
        return QuadState::Disconnected;
    }
    if connectivity == QuadConnectivity::Mutual
        && !(graph.is_neighbor(a, d) && graph.is_neighbor(b, c))
    {
        return QuadState::Disconnected;
    }
    QuadState::Walkable
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnorderedShape {
    cells: BTreeSet<Cell>,
    min: Cell,
    max: Cell,
}

impl UnorderedShape {
    pub fn from_cell(cell: Cell) -> Self {
        let mut cells = BTreeSet::new();
        cells.insert(cell);
        Self {
            cells,
            min: cell,
            max: cell,
        }
    }

    /// Shape for the quad at `(x, y)`, or `None` when the quad is not
    /// walkable, contiguous terrain.
    pub fn from_nodes(
        graph: &NodeGraph,
        x: usize,
        y: usize,
        connectivity: QuadConnectivity,
    ) -> Option<Self> {
        match classify_quad(graph, x, y, connectivity) {
            QuadState::Walkable => Some(Self::from_cell(Cell::new(x as u32, y as u32))),
            QuadState::ExcludedCorner | QuadState::Disconnected => None,
        }
    }

    /// Builds a shape from arbitrary cells; `None` for an empty set.
    pub fn from_cells(cells: impl IntoIterator<Item = Cell>) -> Option<Self> {
        let mut it = cells.into_iter();
        let mut shape = Self::from_cell(it.next()?);
        for cell in it {
            shape.insert(cell);
        }
        Some(shape)
    }

    fn insert(&mut self, cell: Cell) {
        self.min.x = self.min.x.min(cell.x);
        self.min.y = self.min.y.min(cell.y);
        self.max.x = self.max.x.max(cell.x);
        self.max.y = self.max.y.max(cell.y);
        self.cells.insert(cell);
    }

    pub fn cells(&self) -> &BTreeSet<Cell> {
        &self.cells
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Inclusive cell bounds as `(min, max)`.
    pub fn bounds(&self) -> (Cell, Cell) {
        (self.min, self.max)
    }

    /// Bounds touch or overlap with at most one cell of slack on each side.
    fn bounds_touch(&self, other: &UnorderedShape) -> bool {
        self.min.x <= other.max.x.saturating_add(1)
            && other.min.x <= self.max.x.saturating_add(1)
            && self.min.y <= other.max.y.saturating_add(1)
            && other.min.y <= self.max.y.saturating_add(1)
    }

    /// True when some cell of `self` shares a side with some cell of `other`.
    pub fn can_merge(&self, other: &UnorderedShape) -> bool {
        if !self.bounds_touch(other) {
            return false;
        }
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .cells
            .iter()
            .filter(|c| {
                c.x.saturating_add(1) >= large.min.x
                    && c.x <= large.max.x.saturating_add(1)
                    && c.y.saturating_add(1) >= large.min.y
                    && c.y <= large.max.y.saturating_add(1)
            })
            .any(|c| c.side_neighbors().any(|n| large.contains(n)))
    }

    /// Unions `other` into `self`.
    pub fn merge(&mut self, other: UnorderedShape) {
        debug_assert!(self.can_merge(&other));
        if other.cells.len() > self.cells.len() {
            let UnorderedShape { cells, min, max } = other;
            let mine = std::mem::replace(&mut self.cells, cells);
            self.min = min;
            self.max = max;
            for cell in mine {
                self.insert(cell);
            }
        } else {
            for cell in other.cells {
                self.insert(cell);
            }
        }
    }
}
