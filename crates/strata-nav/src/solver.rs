use std::time::Instant;

use rayon::{ThreadPool, ThreadPoolBuilder};
use strata_terrain::{HeightMap, HeightMapSource};

use crate::SolveError;
use crate::boundary;
use crate::config::SolverConfig;
use crate::graph::NodeGraph;
use crate::merge;
use crate::optimize;
use crate::shape::OrderedShape;

fn elapsed_ms(start: Instant) -> u32 {
    start.elapsed().as_millis().min(u128::from(u32::MAX)) as u32
}

/// Counts and stage timings of the last successful solve.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SolveStats {
    pub nodes: usize,
    pub excluded: usize,
    pub edges: usize,
    pub columns: usize,
    pub column_shapes: usize,
    pub regions: usize,
    pub polygons: usize,
    pub holes: usize,
    pub vertices_before: usize,
    pub vertices_after: usize,
    pub graph_ms: u32,
    pub columns_ms: u32,
    pub merge_ms: u32,
    pub boundary_ms: u32,
    pub optimize_ms: u32,
    pub total_ms: u32,
}

/// Owns a zone's height map and the bounding shapes computed from it.
pub struct Solver {
    config: SolverConfig,
    pool: Option<ThreadPool>,
    height_map: Option<HeightMap>,
    bounding_shapes: Vec<OrderedShape>,
    stats: Option<SolveStats>,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Result<Self, SolveError> {
        config.validate()?;
        let pool = match config.threads {
            Some(n) => Some(
                ThreadPoolBuilder::new()
                    .num_threads(n)
                    .thread_name(|i| format!("strata-solve-{i}"))
                    .build()?,
            ),
            None => None,
        };
        Ok(Self {
            config,
            pool,
            height_map: None,
            bounding_shapes: Vec::new(),
            stats: None,
        })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Loads the terrain and computes its bounding shapes.
    ///
    /// On failure the solver holds no height map and no shapes, even if a
    /// previous call succeeded.
    pub fn initialize(&mut self, source: &impl HeightMapSource) -> Result<(), SolveError> {
        self.height_map = None;
        self.bounding_shapes.clear();
        self.stats = None;

        let hm = source.load_height_map()?;
        let (shapes, stats) = self.run(&hm)?;
        log::info!(
            target: "solver",
            "initialized {}x{} grid: {} polygons ({} holes) from {} regions",
            hm.size_x(),
            hm.size_y(),
            stats.polygons,
            stats.holes,
            stats.regions
        );
        self.height_map = Some(hm);
        self.bounding_shapes = shapes;
        self.stats = Some(stats);
        Ok(())
    }

    /// Runs the full pipeline on `hm` without touching stored state.
    pub fn solve(&self, hm: &HeightMap) -> Result<Vec<OrderedShape>, SolveError> {
        self.run(hm).map(|(shapes, _)| shapes)
    }

    pub fn height_map(&self) -> Option<&HeightMap> {
        self.height_map.as_ref()
    }

    /// Empty until `initialize` succeeds.
    pub fn bounding_shapes(&self) -> &[OrderedShape] {
        &self.bounding_shapes
    }

    pub fn stats(&self) -> Option<&SolveStats> {
        self.stats.as_ref()
    }

    fn run(&self, hm: &HeightMap) -> Result<(Vec<OrderedShape>, SolveStats), SolveError> {
        match &self.pool {
            Some(pool) => pool.install(|| solve_with(hm, &self.config)),
            None => solve_with(hm, &self.config),
        }
    }
}

/// Pipeline body. Every stage finishes before the next starts.
fn solve_with(
    hm: &HeightMap,
    config: &SolverConfig,
) -> Result<(Vec<OrderedShape>, SolveStats), SolveError> {
    let total_start = Instant::now();
    let mut stats = SolveStats::default();

    let t = Instant::now();
    let graph = NodeGraph::build(hm, config);
    stats.graph_ms = elapsed_ms(t);
    stats.nodes = graph.nodes().len();
    stats.excluded = graph.excluded_count();
    stats.edges = graph.edge_count();

    let t = Instant::now();
    let columns = merge::build_column_shapes(&graph, config.quad_connectivity);
    stats.columns_ms = elapsed_ms(t);
    stats.columns = columns.len();
    stats.column_shapes = columns.iter().map(Vec::len).sum();

    let t = Instant::now();
    let regions = merge::tournament_reduce(columns);
    stats.merge_ms = elapsed_ms(t);
    stats.regions = regions.len();

    let t = Instant::now();
    let mut shapes = boundary::extract_all(&regions, &graph)?;
    stats.boundary_ms = elapsed_ms(t);
    stats.vertices_before = shapes.iter().map(OrderedShape::len).sum();

    let t = Instant::now();
    optimize::optimize_all(&mut shapes, &config.optimizer)?;
    stats.optimize_ms = elapsed_ms(t);
    stats.vertices_after = shapes.iter().map(OrderedShape::len).sum();
    stats.polygons = shapes.len();
    stats.holes = shapes.iter().filter(|s| s.is_hole()).count();
    stats.total_ms = elapsed_ms(total_start);

    log::info!(
        target: "perf",
        "ms graph={} columns={} merge={} boundary={} optimize={} total={} solver_stages dims=({}, {})",
        stats.graph_ms,
        stats.columns_ms,
        stats.merge_ms,
        stats.boundary_ms,
        stats.optimize_ms,
        stats.total_ms,
        hm.size_x(),
        hm.size_y()
    );
    log::debug!(
        target: "solver",
        "nodes={} excluded={} edges={} column_shapes={} regions={} vertices {} -> {}",
        stats.nodes,
        stats.excluded,
        stats.edges,
        stats.column_shapes,
        stats.regions,
        stats.vertices_before,
        stats.vertices_after
    );
    Ok((shapes, stats))
}
