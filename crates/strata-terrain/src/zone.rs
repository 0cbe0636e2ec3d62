//! Zone descriptors and the TOML terrain file they point at.
//!
//! A zone file names the zone and the terrain resource:
//!
//! ```toml
//! name = "avant_gardens"
//! terrain = "avant_gardens.terrain.toml"
//! ```
//!
//! The terrain file carries the grid itself:
//!
//! ```toml
//! size_x = 3
//! size_y = 2
//! cell_size = 4.0
//! origin = [-6.0, -4.0]
//! heights = [0.0, 0.5, 1.0,
//!            0.0, 0.5, 1.0]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use strata_geom::Vec2;

use crate::{HeightMap, HeightMapSource, TerrainError};

#[derive(Clone, Debug, Deserialize)]
pub struct ZoneInfo {
    #[serde(default)]
    pub name: String,
    /// Terrain resource; relative paths resolve against the zone file.
    pub terrain: PathBuf,
}

impl ZoneInfo {
    pub fn new(name: impl Into<String>, terrain: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            terrain: terrain.into(),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TerrainError> {
        let path = path.as_ref();
        let mut zone: ZoneInfo = read_toml(path)?;
        if zone.terrain.is_relative() {
            if let Some(dir) = path.parent() {
                zone.terrain = dir.join(&zone.terrain);
            }
        }
        if zone.name.is_empty() {
            zone.name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
        Ok(zone)
    }
}

impl HeightMapSource for ZoneInfo {
    fn load_height_map(&self) -> Result<HeightMap, TerrainError> {
        let file = TerrainFile::from_path(&self.terrain)?;
        let hm = file.into_height_map()?;
        log::debug!(
            target: "terrain",
            "zone={} loaded {}x{} samples from {}",
            self.name,
            hm.size_x(),
            hm.size_y(),
            self.terrain.display()
        );
        Ok(hm)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct TerrainFile {
    pub size_x: usize,
    pub size_y: usize,
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,
    #[serde(default)]
    pub origin: [f32; 2],
    #[serde(default)]
    pub heights: Vec<f32>,
}

fn default_cell_size() -> f32 {
    1.0
}

impl TerrainFile {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TerrainError> {
        read_toml(path.as_ref())
    }

    pub fn from_toml_str(s: &str) -> Result<Self, TerrainError> {
        toml::from_str(s).map_err(|source| TerrainError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })
    }

    pub fn into_height_map(self) -> Result<HeightMap, TerrainError> {
        HeightMap::from_heights(
            self.size_x,
            self.size_y,
            self.cell_size,
            Vec2::new(self.origin[0], self.origin[1]),
            &self.heights,
        )
    }
}

fn read_toml<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, TerrainError> {
    let s = fs::read_to_string(path).map_err(|source| TerrainError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&s).map_err(|source| TerrainError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terrain_file_parses_defaults() {
        let file = TerrainFile::from_toml_str(
            r#"
            size_x = 2
            size_y = 2
            heights = [0.0, 1.0, 2.0, 3.0]
            "#,
        )
        .unwrap();
        assert_eq!(file.cell_size, 1.0);
        assert_eq!(file.origin, [0.0, 0.0]);
        let hm = file.into_height_map().unwrap();
        assert_eq!(hm.position(1, 1).y, 3.0);
    }

    #[test]
    fn terrain_file_without_heights_is_a_size_mismatch() {
        let file = TerrainFile::from_toml_str("size_x = 2\nsize_y = 2\n").unwrap();
        assert!(matches!(
            file.into_height_map(),
            Err(TerrainError::SizeMismatch { actual: 0, .. })
        ));
    }

    #[test]
    fn oversized_grid_is_rejected_not_wrapped() {
        let file =
            TerrainFile::from_toml_str("size_x = 4611686018427387904\nsize_y = 8\nheights = []\n")
                .unwrap();
        assert!(matches!(
            file.into_height_map(),
            Err(TerrainError::TooLarge { size_y: 8, .. })
        ));
    }

    #[test]
    fn missing_terrain_resource_is_io_error() {
        let zone = ZoneInfo::new("nowhere", "/definitely/not/here.terrain.toml");
        assert!(matches!(zone.load_height_map(), Err(TerrainError::Io { .. })));
    }
}
