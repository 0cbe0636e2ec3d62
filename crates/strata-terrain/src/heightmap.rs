use strata_geom::{Aabb, Vec2, Vec3};

use crate::TerrainError;

/// Grid of world-space terrain samples for one zone.
///
/// Samples are stored row-major (`y * size_x + x`). The grid is immutable
/// once built and always holds `size_x * size_y >= 1` finite samples.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightMap {
    size_x: usize,
    size_y: usize,
    positions: Vec<Vec3>,
    bounds: Aabb,
}

fn sample_count(size_x: usize, size_y: usize) -> Result<usize, TerrainError> {
    size_x
        .checked_mul(size_y)
        .ok_or(TerrainError::TooLarge { size_x, size_y })
}

impl HeightMap {
    pub fn from_positions(
        size_x: usize,
        size_y: usize,
        positions: Vec<Vec3>,
    ) -> Result<Self, TerrainError> {
        if size_x == 0 || size_y == 0 {
            return Err(TerrainError::Empty { size_x, size_y });
        }
        let expected = sample_count(size_x, size_y)?;
        if positions.len() != expected {
            return Err(TerrainError::SizeMismatch {
                size_x,
                size_y,
                expected,
                actual: positions.len(),
            });
        }
        if let Some(i) = positions.iter().position(|p| !p.is_finite()) {
            return Err(TerrainError::NonFinite {
                x: i % size_x,
                y: i / size_x,
            });
        }
        let bounds = Aabb::from_points(positions.iter().copied())
            .ok_or(TerrainError::Empty { size_x, size_y })?;
        Ok(Self {
            size_x,
            size_y,
            positions,
            bounds,
        })
    }

    /// Builds a regular grid: sample `(x, y)` sits at world
    /// `(origin.x + x * cell_size, height, origin.y + y * cell_size)`.
    pub fn from_heights(
        size_x: usize,
        size_y: usize,
        cell_size: f32,
        origin: Vec2,
        heights: &[f32],
    ) -> Result<Self, TerrainError> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(TerrainError::CellSize(cell_size));
        }
        if size_x == 0 || size_y == 0 {
            return Err(TerrainError::Empty { size_x, size_y });
        }
        let expected = sample_count(size_x, size_y)?;
        if heights.len() != expected {
            return Err(TerrainError::SizeMismatch {
                size_x,
                size_y,
                expected,
                actual: heights.len(),
            });
        }
        let positions = heights
            .iter()
            .enumerate()
            .map(|(i, &h)| {
                let x = (i % size_x) as f32;
                let y = (i / size_x) as f32;
                Vec3::new(origin.x + x * cell_size, h, origin.y + y * cell_size)
            })
            .collect();
        Self::from_positions(size_x, size_y, positions)
    }

    #[inline]
    pub fn size_x(&self) -> usize {
        self.size_x
    }

    #[inline]
    pub fn size_y(&self) -> usize {
        self.size_y
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.size_x + x
    }

    /// World-space sample at grid cell `(x, y)`. Panics when out of bounds.
    #[inline]
    pub fn position(&self, x: usize, y: usize) -> Vec3 {
        debug_assert!(x < self.size_x && y < self.size_y);
        self.positions[self.idx(x, y)]
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Vec3> {
        if x < self.size_x && y < self.size_y {
            Some(self.positions[self.idx(x, y)])
        } else {
            None
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    #[inline]
    pub fn min_height(&self) -> f32 {
        self.bounds.min.y
    }

    #[inline]
    pub fn max_height(&self) -> f32 {
        self.bounds.max.y
    }

    /// Vertical span between the lowest and highest samples.
    #[inline]
    pub fn relief(&self) -> f32 {
        self.max_height() - self.min_height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_heights_lays_out_row_major() {
        let hm = HeightMap::from_heights(3, 2, 2.0, Vec2::new(10.0, 20.0), &[
            0.0, 1.0, 2.0, //
            3.0, 4.0, 5.0,
        ])
        .unwrap();
        assert_eq!(hm.position(0, 0), Vec3::new(10.0, 0.0, 20.0));
        assert_eq!(hm.position(2, 0), Vec3::new(14.0, 2.0, 20.0));
        assert_eq!(hm.position(1, 1), Vec3::new(12.0, 4.0, 22.0));
        assert_eq!(hm.min_height(), 0.0);
        assert_eq!(hm.max_height(), 5.0);
        assert_eq!(hm.relief(), 5.0);
        assert_eq!(hm.get(3, 0), None);
    }

    #[test]
    fn empty_grid_is_rejected() {
        let err = HeightMap::from_positions(0, 4, Vec::new()).unwrap_err();
        assert!(matches!(err, TerrainError::Empty { size_x: 0, size_y: 4 }));
    }

    #[test]
    fn sample_count_must_match() {
        let err = HeightMap::from_heights(2, 2, 1.0, Vec2::ZERO, &[0.0; 3]).unwrap_err();
        assert!(matches!(err, TerrainError::SizeMismatch { expected: 4, actual: 3, .. }));
    }

    #[test]
    fn unaddressable_extents_are_rejected() {
        let err = HeightMap::from_positions(usize::MAX, 2, Vec::new()).unwrap_err();
        assert!(matches!(err, TerrainError::TooLarge { size_y: 2, .. }));
    }

    #[test]
    fn non_finite_sample_reports_cell() {
        let err =
            HeightMap::from_heights(2, 2, 1.0, Vec2::ZERO, &[0.0, 0.0, 0.0, f32::NAN]).unwrap_err();
        assert!(matches!(err, TerrainError::NonFinite { x: 1, y: 1 }));
    }

    #[test]
    fn bad_cell_size_is_rejected() {
        let err = HeightMap::from_heights(1, 1, 0.0, Vec2::ZERO, &[0.0]).unwrap_err();
        assert!(matches!(err, TerrainError::CellSize(_)));
    }
}
