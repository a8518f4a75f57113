//! Terrain queries built on the voxel store.
//!
//! Every query gathers its candidate blocks with a [`FloodFill`] from the
//! block containing the reference point, brings them up to date and then works
//! on their meshes:
//!
//! - [`TerrainQuery::draw`] hands every block within view distance to a [`RenderSink`].
//! - [`TerrainQuery::intersect`] sweeps a sphere (or a segment) and returns the earliest hit.
//! - [`TerrainQuery::collide`] turns a sweep into a clipped, sliding motion.
//! - [`TerrainBrush`] edits density where a ray meets the terrain.

mod brush;
mod flood;
mod query;

pub use brush::{BrushMode, TerrainBrush};
pub use flood::{DEFAULT_FLOOD_LIMIT, FloodFill};
pub use query::{Collision, RenderSink, TerrainQuery, ViewContext};
