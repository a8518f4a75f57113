//! Spatial queries against the terrain: view culling, swept-sphere
//! intersection and collision with sliding.
//!
//! All queries start from the block containing a reference point and grow a
//! [`FloodFill`] through blocks that pass a distance test, so only the region
//! the query can actually reach is materialized and meshed.

use glam::Vec3;
use strata_coords::{BLOCK_BOUNDING_RADIUS, BlockCoord, block_center};
use strata_mesh::{MeshBuffers, SweepHit};
use strata_voxel::World;

use crate::flood::FloodFill;

/// Distance kept between a sliding sphere and the surface it touches.
const CONTACT_SKIN: f32 = 1e-3;

/// Number of slide iterations a single [`TerrainQuery::collide`] performs.
const MAX_SLIDES: usize = 3;

/// Receives the meshes selected by [`TerrainQuery::draw`].
pub trait RenderSink {
    /// Called once per visible block with its current mesh.
    fn submit(&mut self, coord: BlockCoord, mesh: &MeshBuffers);
}

impl<F> RenderSink for F
where
    F: FnMut(BlockCoord, &MeshBuffers),
{
    fn submit(&mut self, coord: BlockCoord, mesh: &MeshBuffers) {
        self(coord, mesh)
    }
}

/// Camera state needed for culling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewContext {
    /// Camera position in world space.
    pub position: Vec3,
    /// Radius around the camera within which blocks are drawn.
    pub view_distance: f32,
}

/// Outcome of a blocked movement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collision {
    /// Displacement to apply instead of the requested one: clipped at the
    /// first contact, then slid along the contact planes.
    pub motion: Vec3,
    /// First contact point on the terrain.
    pub point: Vec3,
    /// Unit normal at the first contact, pointing toward the sphere.
    pub normal: Vec3,
}

/// Entry point for terrain queries.
#[derive(Clone, Copy, Debug, Default)]
pub struct TerrainQuery {
    /// Traversal used to gather candidate blocks.
    pub flood: FloodFill,
}

impl TerrainQuery {
    /// Creates a query engine whose traversals visit at most `flood_limit` blocks.
    pub fn new(flood_limit: usize) -> Self {
        Self {
            flood: FloodFill::new(flood_limit),
        }
    }

    /// Brings every block within view up to date, submits its mesh to `sink`
    /// and returns the total number of triangles submitted.
    pub fn draw(&self, world: &mut World, view: &ViewContext, sink: &mut dyn RenderSink) -> usize {
        let reach = view.view_distance + BLOCK_BOUNDING_RADIUS;
        let reach2 = reach * reach;
        let position = view.position;
        let blocks = self.flood.collect_blocks(
            world,
            BlockCoord::containing_position(position),
            |block| block_center(block.coord()).distance_squared(position) <= reach2,
        );

        refresh(world, &blocks);
        let mut triangles = 0;
        for &coord in &blocks {
            if let Some(block) = world.block(coord) {
                triangles += block.mesh().triangle_count();
                sink.submit(coord, block.mesh());
            }
        }
        tracing::debug!(
            "TerrainQuery: drew {} blocks, {} triangles ({} resident)",
            blocks.len(),
            triangles,
            world.block_count()
        );
        triangles
    }

    /// Sweeps a sphere of `radius` from `origin` along `motion` and returns the
    /// earliest contact with the terrain, `t` in `[0, 1]`.
    ///
    /// A radius of zero casts a segment. `None` means nothing was hit; use
    /// [`SweepHit::param`] for the `f32::INFINITY` form.
    pub fn intersect(
        &self,
        world: &mut World,
        origin: Vec3,
        motion: Vec3,
        radius: f32,
    ) -> Option<SweepHit> {
        let blocks = self.candidates(world, origin, motion, radius);
        refresh(world, &blocks);
        blocks
            .iter()
            .filter_map(|coord| world.block(*coord)?.mesh().sweep(origin, motion, radius))
            .min_by(|a, b| a.t.total_cmp(&b.t))
    }

    /// Moves a sphere of `radius` from `origin` by `motion` against the terrain.
    ///
    /// Returns `None` when the path is clear. Otherwise the returned
    /// [`Collision::motion`] stops short of the first contact and slides the
    /// remainder along the surface, re-checking each slide.
    pub fn collide(
        &self,
        world: &mut World,
        origin: Vec3,
        motion: Vec3,
        radius: f32,
    ) -> Option<Collision> {
        let first = self.intersect(world, origin, motion, radius)?;

        let mut position = origin;
        let mut remaining = motion;
        let mut hit = first;
        for _ in 0..MAX_SLIDES {
            let length = remaining.length();
            let travel = (hit.t * length - CONTACT_SKIN).max(0.0);
            let advance = remaining.normalize_or_zero() * travel;
            position += advance;

            let rest = remaining - advance;
            remaining = rest - hit.normal * rest.dot(hit.normal);
            if remaining.length_squared() <= CONTACT_SKIN * CONTACT_SKIN {
                break;
            }
            match self.intersect(world, position, remaining, radius) {
                Some(next) => hit = next,
                None => {
                    position += remaining;
                    break;
                }
            }
        }

        Some(Collision {
            motion: position - origin,
            point: first.point,
            normal: first.normal,
        })
    }

    /// Blocks whose bounding sphere the swept sphere can reach.
    fn candidates(&self, world: &mut World, origin: Vec3, motion: Vec3, radius: f32) -> Vec<BlockCoord> {
        let end = origin + motion;
        let dir = motion.normalize_or_zero();
        let reach = radius + BLOCK_BOUNDING_RADIUS;
        let reach2 = reach * reach;
        self.flood.collect_blocks(world, BlockCoord::containing_position(origin), |block| {
            segment_within(block_center(block.coord()), origin, end, dir, reach2)
        })
    }
}

/// Returns `true` if `point` lies within `sqrt(reach2)` of the segment `start..end`.
///
/// `dir` is the unit direction of the segment (zero for a degenerate one).
fn segment_within(point: Vec3, start: Vec3, end: Vec3, dir: Vec3, reach2: f32) -> bool {
    let to_start = start - point;
    let along = dir.dot(to_start);
    if along > 0.0 {
        return to_start.length_squared() <= reach2;
    }
    let past_end = point - end;
    if dir.dot(past_end) > 0.0 {
        return past_end.length_squared() <= reach2;
    }
    (to_start - dir * along).length_squared() <= reach2
}

/// Re-polygonizes `blocks`, materializing all neighbourhoods first so the
/// rebuilds don't dirty each other.
fn refresh(world: &mut World, blocks: &[BlockCoord]) {
    for &coord in blocks {
        world.materialize_neighborhood(coord);
    }
    for &coord in blocks {
        world.update_block(coord);
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
