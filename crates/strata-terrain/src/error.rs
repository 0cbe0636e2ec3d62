use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TerrainError {
    #[error("failed to read terrain resource {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("terrain grid is empty ({size_x}x{size_y})")]
    Empty { size_x: usize, size_y: usize },
    #[error("terrain grid {size_x}x{size_y} is too large to address")]
    TooLarge { size_x: usize, size_y: usize },
    #[error("terrain grid {size_x}x{size_y} expects {expected} samples, got {actual}")]
    SizeMismatch {
        size_x: usize,
        size_y: usize,
        expected: usize,
        actual: usize,
    },
    #[error("non-finite terrain sample at ({x}, {y})")]
    NonFinite { x: usize, y: usize },
    #[error("invalid cell size {0}")]
    CellSize(f32),
}
