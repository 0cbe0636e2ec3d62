//! Seeded fractal-noise terrain for tooling and benchmarks.

use fastnoise_lite::{FastNoiseLite, NoiseType};
use strata_geom::Vec2;

use crate::{HeightMap, HeightMapSource, TerrainError};

#[derive(Clone, Debug)]
pub struct NoiseTerrain {
    pub size_x: usize,
    pub size_y: usize,
    pub cell_size: f32,
    pub seed: i32,
    /// Peak height above the zero line.
    pub amplitude: f32,
    pub frequency: f32,
    pub octaves: i32,
    pub persistence: f32,
    pub lacunarity: f32,
    /// Normalized noise value (in `[-1, 1]`) below which samples flatten
    /// onto a common floor, carving pits into the terrain.
    pub floor: Option<f32>,
}

impl Default for NoiseTerrain {
    fn default() -> Self {
        Self {
            size_x: 128,
            size_y: 128,
            cell_size: 2.0,
            seed: 1337,
            amplitude: 40.0,
            frequency: 0.02,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            floor: Some(-0.35),
        }
    }
}

impl NoiseTerrain {
    pub fn new(size_x: usize, size_y: usize, seed: i32) -> Self {
        Self {
            size_x,
            size_y,
            seed,
            ..Self::default()
        }
    }

    fn fractal2(&self, noise: &FastNoiseLite, x: f32, y: f32) -> f32 {
        let mut amp = 1.0_f32;
        let mut freq = 1.0_f32;
        let mut sum = 0.0_f32;
        let mut max_amp = 0.0_f32;
        for _ in 0..self.octaves.max(1) {
            sum += noise.get_noise_2d(x * freq, y * freq) * amp;
            max_amp += amp;
            amp *= self.persistence;
            freq *= self.lacunarity;
        }
        if max_amp > 0.0 { sum / max_amp } else { sum }
    }

    pub fn heights(&self) -> Vec<f32> {
        let mut noise = FastNoiseLite::with_seed(self.seed);
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        noise.set_frequency(Some(self.frequency));
        let mut out = Vec::with_capacity(self.size_x * self.size_y);
        for y in 0..self.size_y {
            for x in 0..self.size_x {
                let mut n = self.fractal2(&noise, x as f32, y as f32);
                if let Some(floor) = self.floor {
                    n = n.max(floor);
                }
                out.push(n * self.amplitude);
            }
        }
        out
    }
}

impl HeightMapSource for NoiseTerrain {
    fn load_height_map(&self) -> Result<HeightMap, TerrainError> {
        HeightMap::from_heights(
            self.size_x,
            self.size_y,
            self.cell_size,
            Vec2::ZERO,
            &self.heights(),
        )
    }
}
