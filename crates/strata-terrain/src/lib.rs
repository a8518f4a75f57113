//! Procedural population of terrain blocks from seeded Perlin noise.

mod populator;

pub use populator::{NoisePopulator, TerrainParams};
