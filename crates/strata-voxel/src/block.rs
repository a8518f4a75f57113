//! A cubic block of cells with its scalar layers, gradient cache and mesh.
//!
//! A [`Block`] knows nothing about its neighbours. Reads that cross the block
//! boundary and the change fan-out on boundary writes are handled by
//! [`World`](crate::World).

use glam::{IVec3, Vec3};
use strata_coords::{BLOCK_VOLUME, BlockCoord, in_block, join, linear_index, local_cells};
use strata_mesh::MeshBuffers;

use crate::layer::Layer;

/// Value every cell of both layers holds before population.
pub const UNPOPULATED: f32 = -1.0;

/// One `BLOCK_SIZE³` chunk of the terrain.
#[derive(Clone, Debug)]
pub struct Block {
    coord: BlockCoord,
    layers: [Box<[f32]>; 2],
    gradients: Box<[Vec3]>,
    changed: bool,
    mesh: MeshBuffers,
}

impl Block {
    /// Creates a block at `coord` with both layers at [`UNPOPULATED`], marked changed.
    pub fn new(coord: BlockCoord) -> Self {
        Self {
            coord,
            layers: [
                vec![UNPOPULATED; BLOCK_VOLUME].into_boxed_slice(),
                vec![UNPOPULATED; BLOCK_VOLUME].into_boxed_slice(),
            ],
            gradients: vec![Vec3::ZERO; BLOCK_VOLUME].into_boxed_slice(),
            changed: true,
            mesh: MeshBuffers::new(),
        }
    }

    /// The block's position in the block grid.
    pub fn coord(&self) -> BlockCoord {
        self.coord
    }

    /// Returns the value of `layer` at a local cell, `None` outside the block.
    pub fn get(&self, cell: IVec3, layer: Layer) -> Option<f32> {
        in_block(cell).then(|| self.layers[layer.index()][linear_index(cell)])
    }

    /// Writes `value` into `layer` at a local cell and marks the block changed.
    ///
    /// Density is clamped to `[-1, 1]`. Returns `false` (and writes nothing)
    /// when the cell lies outside the block.
    pub fn set(&mut self, cell: IVec3, layer: Layer, value: f32) -> bool {
        if !in_block(cell) {
            tracing::warn!("Block::set out of bounds: {:?} in {:?}", cell, self.coord);
            return false;
        }
        let value = match layer {
            Layer::Density => value.clamp(-1.0, 1.0),
            Layer::Environment => value,
        };
        self.layers[layer.index()][linear_index(cell)] = value;
        self.changed = true;
        true
    }

    /// Fills every cell from a function of the absolute world cell returning
    /// `(density, environment)`.
    pub fn fill_with(&mut self, mut field: impl FnMut(IVec3) -> (f32, f32)) {
        for (i, cell) in local_cells().enumerate() {
            let (density, environment) = field(join(self.coord, cell));
            self.layers[0][i] = density.clamp(-1.0, 1.0);
            self.layers[1][i] = environment;
        }
        self.changed = true;
    }

    /// Raw storage of one layer, indexed by [`linear_index`].
    pub fn layer(&self, layer: Layer) -> &[f32] {
        &self.layers[layer.index()]
    }

    /// Cached gradient at a local cell.
    ///
    /// Only meaningful while the block is not changed; `None` outside the block.
    pub fn cached_gradient(&self, cell: IVec3) -> Option<Vec3> {
        in_block(cell).then(|| self.gradients[linear_index(cell)])
    }

    /// Returns `true` if the mesh and gradient cache are stale.
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Marks the mesh and gradient cache stale.
    pub fn mark_changed(&mut self) {
        self.changed = true;
    }

    /// Mesh built by the last re-polygonization.
    pub fn mesh(&self) -> &MeshBuffers {
        &self.mesh
    }

    /// Installs a freshly computed gradient cache and mesh and clears `changed`.
    pub(crate) fn refresh(&mut self, gradients: Box<[Vec3]>, mesh: MeshBuffers) {
        debug_assert_eq!(gradients.len(), BLOCK_VOLUME);
        self.gradients = gradients;
        self.mesh = mesh;
        self.changed = false;
    }
}
