//! Terrain height grids and the sources that produce them.
#![forbid(unsafe_code)]

mod error;
mod heightmap;
pub mod noise;
pub mod zone;

pub use error::TerrainError;
pub use heightmap::HeightMap;
pub use noise::NoiseTerrain;
pub use zone::{TerrainFile, ZoneInfo};

/// Anything that can resolve to a fully built `HeightMap`.
///
/// A failed load never yields a partial grid.
pub trait HeightMapSource {
    fn load_height_map(&self) -> Result<HeightMap, TerrainError>;
}

impl HeightMapSource for HeightMap {
    fn load_height_map(&self) -> Result<HeightMap, TerrainError> {
        Ok(self.clone())
    }
}

impl<T: HeightMapSource + ?Sized> HeightMapSource for &T {
    fn load_height_map(&self) -> Result<HeightMap, TerrainError> {
        (**self).load_height_map()
    }
}
