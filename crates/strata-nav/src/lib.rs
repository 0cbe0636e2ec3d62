//! Walkable-terrain boundary shapes from a height grid.
//!
//! The pipeline runs in fixed stages, each a full barrier:
//! height map -> node graph -> per-column quad shapes -> tournament merge ->
//! boundary polygons -> vertex reduction. `Solver` drives it and keeps the
//! result for the zone it was initialized with.
#![forbid(unsafe_code)]

pub mod boundary;
pub mod config;
mod error;
pub mod graph;
pub mod merge;
pub mod optimize;
pub mod region;
pub mod shape;
mod solver;

pub use config::{
    MAXIMUM_NODE_DISTANCE, MINIMUM_DISTANCE_FROM_BOTTOM, OptimizerConfig, QuadConnectivity,
    SolverConfig,
};
pub use error::SolveError;
pub use graph::{Node, NodeGraph};
pub use region::{Cell, QuadState, UnorderedShape};
pub use shape::OrderedShape;
pub use solver::{SolveStats, Solver};
pub use strata_terrain::{HeightMap, HeightMapSource};
