//! Isosurface extraction for the block terrain: marching-cubes tables and
//! polygonizer, per-block mesh buffers, and the swept-sphere geometry used to
//! query those meshes.

pub mod buffers;
pub mod interpolate;
pub mod polygonize;
pub mod surface;
pub mod sweep;
pub mod tables;

pub use buffers::{BoundingSphere, MeshBuffers};
pub use interpolate::{interpolate_scalar, interpolate_vec3};
pub use polygonize::{CellSampler, DENSITY, ENVIRONMENT, polygonize_block, polygonize_cell};
pub use surface::Surface;
pub use sweep::{SweepHit, point_in_triangle, sweep_sphere_sphere, sweep_sphere_triangle};
pub use tables::{EDGE_CORNERS, EDGE_TABLE, TRI_TABLE};

/// Isolevel at which the density field is polygonized.
pub const ISOLEVEL: f32 = 0.0;
