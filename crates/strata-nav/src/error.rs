use strata_terrain::TerrainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SolveError {
    #[error("height map unavailable: {0}")]
    Terrain(#[from] TerrainError),
    #[error("region {region} left an open boundary at grid vertex ({x}, {y})")]
    OpenBoundary { region: usize, x: i32, y: i32 },
    #[error("polygon has {vertices} vertices; at least 3 are required")]
    DegeneratePolygon { vertices: usize },
    #[error("failed to build solver thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("invalid solver config: {0}")]
    Config(String),
}
