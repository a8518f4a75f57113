//! Noise-driven block populator.
//!
//! Density blends a fine, vertically stretched noise (squared, so it only ever
//! adds matter) with a coarse, vertically compressed one centred on zero, then
//! subtracts an inverse-square pull that hollows out the space around the
//! world origin. Environment is a single low-frequency noise sample.

use glam::IVec3;
use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};
use strata_coords::BlockCoord;
use strata_voxel::{Block, Populator};

/// Tunables for [`NoisePopulator`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    /// Frequency of the fine density noise. Default: 0.15.
    pub detail_frequency: f64,
    /// Extra z scale of the fine noise (below 1 stretches it vertically). Default: 0.1.
    pub detail_z_scale: f64,
    /// Weight of the squared fine noise. Default: 0.53.
    pub detail_weight: f32,
    /// Frequency of the coarse density noise. Default: 0.03.
    pub shape_frequency: f64,
    /// Extra z scale of the coarse noise. Default: 4.0.
    pub shape_z_scale: f64,
    /// Weight of the recentred coarse noise. Default: 0.47.
    pub shape_weight: f32,
    /// Numerator of the inverse-square term subtracted around the origin. Default: 20.0.
    pub origin_pull: f32,
    /// Frequency of the environment noise. Default: 0.05.
    pub environment_frequency: f64,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            detail_frequency: 0.15,
            detail_z_scale: 0.1,
            detail_weight: 0.53,
            shape_frequency: 0.03,
            shape_z_scale: 4.0,
            shape_weight: 0.47,
            origin_pull: 20.0,
            environment_frequency: 0.05,
        }
    }
}

/// Fills blocks from seeded 3D Perlin noise.
///
/// Every value is a pure function of the seed and the absolute cell
/// coordinate, so blocks come out identical regardless of creation order.
#[derive(Clone, Debug)]
pub struct NoisePopulator {
    seed: u32,
    noise: Perlin,
    params: TerrainParams,
}

impl NoisePopulator {
    /// Creates a populator with default [`TerrainParams`].
    pub fn new(seed: u32) -> Self {
        Self::with_params(seed, TerrainParams::default())
    }

    /// Creates a populator with explicit parameters.
    pub fn with_params(seed: u32, params: TerrainParams) -> Self {
        Self {
            seed,
            noise: Perlin::new(seed),
            params,
        }
    }

    /// The world seed.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// The generation parameters.
    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    /// Clamped density at an absolute world cell.
    pub fn density(&self, cell: IVec3) -> f32 {
        let p = &self.params;
        let (x, y, z) = (cell.x as f64, cell.y as f64, cell.z as f64);

        let detail = self.sample(
            x * p.detail_frequency,
            y * p.detail_frequency,
            z * p.detail_frequency * p.detail_z_scale,
        );
        let shape = self.sample(
            x * p.shape_frequency,
            y * p.shape_frequency,
            z * p.shape_frequency * p.shape_z_scale,
        );
        let mut value = detail * detail * p.detail_weight + (shape - 0.5) * 2.0 * p.shape_weight;

        let d2 = cell.as_i64vec3().length_squared();
        if d2 != 0 {
            value -= p.origin_pull / d2 as f32;
        }
        value.clamp(-1.0, 1.0)
    }

    /// Unclamped environment value at an absolute world cell.
    pub fn environment(&self, cell: IVec3) -> f32 {
        let f = self.params.environment_frequency;
        self.sample(cell.x as f64 * f, cell.y as f64 * f, cell.z as f64 * f)
    }

    /// Perlin noise remapped from `[-1, 1]` to `[0, 1]`.
    fn sample(&self, x: f64, y: f64, z: f64) -> f32 {
        (0.5 * (self.noise.get([x, y, z]) + 1.0)) as f32
    }
}

impl Populator for NoisePopulator {
    fn populate(&self, coord: BlockCoord, block: &mut Block) {
        block.fill_with(|cell| (self.density(cell), self.environment(cell)));
        tracing::trace!("NoisePopulator: filled block {:?}", coord);
    }
}
