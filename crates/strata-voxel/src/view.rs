//! Block-relative handles over the [`World`].

use glam::{IVec3, Vec3};
use strata_coords::{BlockCoord, join};
use strata_mesh::{CellSampler, MeshBuffers, Surface};

use crate::block::Block;
use crate::layer::Layer;
use crate::world::{EMPTY_MESH, World};

/// Read-only view of the scalar field around one block.
///
/// Cell offsets are relative to the block's `(0, 0, 0)` cell and may reach into
/// neighbouring blocks. This is what the polygonizer samples.
#[derive(Clone, Copy)]
pub struct BlockView<'w> {
    world: &'w World,
    coord: BlockCoord,
}

impl<'w> BlockView<'w> {
    pub(crate) fn new(world: &'w World, coord: BlockCoord) -> Self {
        Self { world, coord }
    }

    /// The block this view is centred on.
    pub fn coord(&self) -> BlockCoord {
        self.coord
    }

    /// Gradient at `cell` computed from the current densities, ignoring caches.
    pub fn fresh_gradient(&self, cell: IVec3) -> Vec3 {
        self.world.peek_fresh_gradient(join(self.coord, cell))
    }
}

impl CellSampler for BlockView<'_> {
    fn value(&self, cell: IVec3, layer: usize) -> f32 {
        Layer::from_index(layer).map_or(0.0, |layer| {
            self.world.peek_value(join(self.coord, cell), layer)
        })
    }

    fn gradient(&self, cell: IVec3) -> Vec3 {
        self.world.peek_gradient(join(self.coord, cell))
    }
}

/// A block borrowed together with its world, so it can rebuild its mesh from
/// neighbouring data.
pub struct BlockSurface<'w> {
    world: &'w mut World,
    coord: BlockCoord,
}

impl<'w> BlockSurface<'w> {
    pub(crate) fn new(world: &'w mut World, coord: BlockCoord) -> Self {
        Self { world, coord }
    }

    /// The block this surface wraps.
    pub fn coord(&self) -> BlockCoord {
        self.coord
    }
}

impl Surface for BlockSurface<'_> {
    fn polygonize(&mut self) -> usize {
        self.world.update_block(self.coord)
    }

    fn mesh(&self) -> &MeshBuffers {
        self.world.block(self.coord).map_or(&EMPTY_MESH, Block::mesh)
    }
}
