//! The block store: owns every resident [`Block`] and resolves all access that
//! crosses block boundaries.
//!
//! Blocks live in an [`FxHashMap`] keyed by [`BlockCoord`]. They are created and
//! populated on first touch and never evicted. Blocks hold no reference back to
//! the world; a cell offset outside a block is turned into a world cell, split
//! into `(block, cell)` again and looked up directly in the map.

use std::collections::hash_map::Entry;

use glam::{IVec3, Vec3};
use rustc_hash::FxHashMap;
use strata_coords::{BLOCK_SIZE, BlockCoord, NEIGHBOR_OFFSETS, join, local_cells, split};
use strata_mesh::{ISOLEVEL, MeshBuffers, polygonize_block};

use crate::block::{Block, UNPOPULATED};
use crate::layer::Layer;
use crate::populator::Populator;
use crate::view::{BlockSurface, BlockView};

pub(crate) static EMPTY_MESH: MeshBuffers = MeshBuffers::new();

/// Anything that names a single world cell.
///
/// Integer positions are used as-is; continuous positions are floored.
pub trait WorldPosition {
    /// The world cell this position falls in.
    fn world_cell(self) -> IVec3;
}

impl WorldPosition for IVec3 {
    fn world_cell(self) -> IVec3 {
        self
    }
}

impl WorldPosition for Vec3 {
    fn world_cell(self) -> IVec3 {
        strata_coords::world_cell(self)
    }
}

/// Offsets of the neighbours a density write at local `cell` can affect.
///
/// A neighbour on the `-1` side of an axis is included only when the cell lies
/// on that face (`0`), one on the `+1` side only when it lies on the opposite
/// face (`BLOCK_SIZE - 1`). Interior cells touch nothing; a corner cell touches
/// seven neighbours.
pub fn boundary_fanout(cell: IVec3) -> impl Iterator<Item = IVec3> {
    let last = BLOCK_SIZE - 1;
    NEIGHBOR_OFFSETS.into_iter().filter(move |d| {
        (0..3).all(|axis| match d[axis] {
            -1 => cell[axis] == 0,
            1 => cell[axis] == last,
            _ => true,
        })
    })
}

/// Sparse, lazily populated terrain volume.
pub struct World {
    pub(crate) blocks: FxHashMap<BlockCoord, Block>,
    populator: Box<dyn Populator>,
}

impl World {
    /// Creates an empty world whose blocks are filled by `populator`.
    pub fn new(populator: impl Populator + 'static) -> Self {
        Self {
            blocks: FxHashMap::default(),
            populator: Box::new(populator),
        }
    }

    /// Returns the block at `coord`, creating and populating it if absent.
    ///
    /// Repeated calls return the same block.
    pub fn get_block(&mut self, coord: BlockCoord) -> &Block {
        self.materialize(coord)
    }

    /// Returns the block at `coord` if it is resident, without creating it.
    pub fn block(&self, coord: BlockCoord) -> Option<&Block> {
        self.blocks.get(&coord)
    }

    /// Returns `true` if the block at `coord` is resident.
    pub fn contains(&self, coord: BlockCoord) -> bool {
        self.blocks.contains_key(&coord)
    }

    /// Number of resident blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Iterates the coordinates of all resident blocks.
    pub fn coords(&self) -> impl Iterator<Item = &BlockCoord> {
        self.blocks.keys()
    }

    /// Iterates the coordinates of resident blocks whose mesh is stale.
    pub fn iter_changed(&self) -> impl Iterator<Item = &BlockCoord> {
        self.blocks
            .iter()
            .filter(|(_, block)| block.is_changed())
            .map(|(coord, _)| coord)
    }

    /// Reads `layer` at a world position.
    ///
    /// Returns `0.0` for a layer index outside `{0, 1}`.
    pub fn value<P: WorldPosition>(&mut self, pos: P, layer: usize) -> f32 {
        let Some(layer) = checked_layer(layer) else {
            return 0.0;
        };
        let (coord, cell) = split(pos.world_cell());
        self.materialize(coord).get(cell, layer).unwrap_or(0.0)
    }

    /// Writes `layer` at a world position.
    ///
    /// Ignored for a layer index outside `{0, 1}`. Density writes on a block
    /// boundary mark the neighbours sharing that boundary as changed.
    pub fn set_value<P: WorldPosition>(&mut self, pos: P, value: f32, layer: usize) {
        let Some(layer) = checked_layer(layer) else {
            return;
        };
        let (coord, cell) = split(pos.world_cell());
        self.write_cell(coord, cell, layer, value);
    }

    /// Reads `layer` at a cell offset relative to `block`.
    ///
    /// `cell` may lie outside `[0, BLOCK_SIZE)`; the read is resolved against
    /// whichever block owns `join(block, cell)`, creating it if needed.
    pub fn cell_value(&mut self, block: BlockCoord, cell: IVec3, layer: usize) -> f32 {
        self.value(join(block, cell), layer)
    }

    /// Writes `layer` at a local cell of `block`.
    ///
    /// Bounds-checked: cells outside the block are ignored.
    pub fn set_cell_value(&mut self, block: BlockCoord, cell: IVec3, value: f32, layer: usize) {
        let Some(layer) = checked_layer(layer) else {
            return;
        };
        self.write_cell(block, cell, layer, value);
    }

    /// Density gradient at a cell offset relative to `block`.
    ///
    /// Served from the owning block's cache while it is unchanged, computed
    /// fresh otherwise.
    pub fn gradient(&mut self, block: BlockCoord, cell: IVec3) -> Vec3 {
        let (owner, local) = split(join(block, cell));
        let resolved = self.materialize(owner);
        if !resolved.is_changed()
            && let Some(cached) = resolved.cached_gradient(local)
        {
            return cached;
        }
        self.compute_gradient(owner, local)
    }

    /// Central-difference density gradient at a cell offset relative to `block`,
    /// pointing toward lower density.
    pub fn compute_gradient(&mut self, block: BlockCoord, cell: IVec3) -> Vec3 {
        let mut v = |d: IVec3| self.cell_value(block, cell + d, Layer::Density.index());
        0.5 * Vec3::new(
            v(-IVec3::X) - v(IVec3::X),
            v(-IVec3::Y) - v(IVec3::Y),
            v(-IVec3::Z) - v(IVec3::Z),
        )
    }

    /// Marks the block at `coord` changed if it is resident. Absent blocks are
    /// not created.
    pub fn notify_changed(&mut self, coord: BlockCoord) {
        if let Some(block) = self.blocks.get_mut(&coord) {
            block.mark_changed();
        }
    }

    /// Ensures `coord` and its 26 neighbours are resident.
    pub fn materialize_neighborhood(&mut self, coord: BlockCoord) {
        self.materialize(coord);
        for neighbor in coord.neighbors() {
            self.materialize(neighbor);
        }
    }

    /// Re-polygonizes the block at `coord` if it is changed and returns its
    /// triangle count.
    ///
    /// Rebuilding refreshes the block's gradient cache, replaces its mesh and
    /// clears `changed`. An unchanged block is left untouched.
    pub fn update_block(&mut self, coord: BlockCoord) -> usize {
        let block = self.materialize(coord);
        if !block.is_changed() {
            return block.mesh().triangle_count();
        }

        self.materialize_neighborhood(coord);
        let view = BlockView::new(self, coord);
        let gradients = local_cells().map(|cell| view.fresh_gradient(cell)).collect();
        let mesh = polygonize_block(&view, coord.origin_cell(), ISOLEVEL);
        let triangles = mesh.triangle_count();

        tracing::debug!(
            "World: rebuilt block {:?}, {} vertices, {} triangles",
            coord,
            mesh.vertex_count(),
            triangles
        );
        if let Some(block) = self.blocks.get_mut(&coord) {
            block.refresh(gradients, mesh);
        }
        triangles
    }

    /// Brings the block at `coord` up to date and returns its mesh.
    pub fn mesh(&mut self, coord: BlockCoord) -> &MeshBuffers {
        self.update_block(coord);
        self.blocks.get(&coord).map_or(&EMPTY_MESH, Block::mesh)
    }

    /// Read-only sampler over the block at `coord` and its neighbours.
    ///
    /// Reads of non-resident blocks return [`UNPOPULATED`]; call
    /// [`World::materialize_neighborhood`] first for exact results.
    pub fn view(&self, coord: BlockCoord) -> BlockView<'_> {
        BlockView::new(self, coord)
    }

    /// Drawable/collidable handle on the block at `coord`, creating it if absent.
    pub fn surface(&mut self, coord: BlockCoord) -> BlockSurface<'_> {
        self.materialize(coord);
        BlockSurface::new(self, coord)
    }

    /// Non-materializing read used by [`BlockView`].
    pub(crate) fn peek_value(&self, world_cell: IVec3, layer: Layer) -> f32 {
        let (coord, cell) = split(world_cell);
        self.blocks
            .get(&coord)
            .and_then(|block| block.get(cell, layer))
            .unwrap_or(UNPOPULATED)
    }

    /// Non-materializing gradient read used by [`BlockView`].
    pub(crate) fn peek_gradient(&self, world_cell: IVec3) -> Vec3 {
        let (coord, cell) = split(world_cell);
        if let Some(block) = self.blocks.get(&coord)
            && !block.is_changed()
            && let Some(cached) = block.cached_gradient(cell)
        {
            return cached;
        }
        self.peek_fresh_gradient(world_cell)
    }

    pub(crate) fn peek_fresh_gradient(&self, world_cell: IVec3) -> Vec3 {
        let v = |d: IVec3| self.peek_value(world_cell + d, Layer::Density);
        0.5 * Vec3::new(
            v(-IVec3::X) - v(IVec3::X),
            v(-IVec3::Y) - v(IVec3::Y),
            v(-IVec3::Z) - v(IVec3::Z),
        )
    }

    fn write_cell(&mut self, coord: BlockCoord, cell: IVec3, layer: Layer, value: f32) {
        if !self.materialize(coord).set(cell, layer, value) {
            return;
        }
        if layer == Layer::Density {
            for d in boundary_fanout(cell) {
                self.notify_changed(coord.offset(d.x, d.y, d.z));
            }
        }
    }

    fn materialize(&mut self, coord: BlockCoord) -> &mut Block {
        if !self.blocks.contains_key(&coord) {
            // Population rewrites every boundary cell, which reaches all 26 neighbours.
            for neighbor in coord.neighbors() {
                self.notify_changed(neighbor);
            }
        }
        let resident = self.blocks.len();
        match self.blocks.entry(coord) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let block = entry.insert(Block::new(coord));
                self.populator.populate(coord, block);
                tracing::trace!("World: populated block {:?} ({} resident)", coord, resident + 1);
                block
            }
        }
    }
}

fn checked_layer(index: usize) -> Option<Layer> {
    let layer = Layer::from_index(index);
    if layer.is_none() {
        tracing::warn!("World: invalid layer index {}", index);
    }
    layer
}

#[cfg(test)]
#[path = "world_tests.rs"]
mod tests;
