//! Block addressing for the volumetric terrain.
//!
//! The world is an unbounded lattice of integer cells grouped into cubic blocks of
//! [`BLOCK_SIZE`] cells per axis. Any integer cell coordinate has two derived forms:
//!
//! 1. **Block form**: floor-divided by the block size, identifying the owning block.
//! 2. **Cell form**: the remainder in `[0, BLOCK_SIZE)`, the index inside that block.
//!
//! Both use floor (not truncating) division so negative coordinates map correctly:
//!
//! ```rust
//! use strata_coords::{block_index, cell_index, BLOCK_SIZE};
//!
//! assert_eq!(block_index(-1), -1);
//! assert_eq!(cell_index(-1), BLOCK_SIZE - 1);
//! for v in -100..100 {
//!     assert_eq!(block_index(v) * BLOCK_SIZE + cell_index(v), v);
//! }
//! ```

use glam::{IVec3, Vec3};

/// Side length of a block in cells.
pub const BLOCK_SIZE: i32 = 8;

/// Number of cells in one block (`BLOCK_SIZE³`).
pub const BLOCK_VOLUME: usize = (BLOCK_SIZE * BLOCK_SIZE * BLOCK_SIZE) as usize;

/// Number of scalar layers stored per cell (density and environment).
pub const LAYER_COUNT: usize = 2;

/// Radius of a sphere around [`block_center`] that encloses everything a block can
/// emit: the half diagonal of the block plus the half-cell shift of its mesh.
pub const BLOCK_BOUNDING_RADIUS: f32 =
    BLOCK_SIZE as f32 * 0.866_025_4 + 0.866_025_4;

/// Floor-divides a world cell coordinate by the block size.
#[inline]
pub fn block_index(v: i32) -> i32 {
    if v >= 0 {
        v / BLOCK_SIZE
    } else {
        (v + 1) / BLOCK_SIZE - 1
    }
}

/// Returns the remainder of a world cell coordinate inside its block, in `[0, BLOCK_SIZE)`.
#[inline]
pub fn cell_index(v: i32) -> i32 {
    if v >= 0 {
        v % BLOCK_SIZE
    } else {
        BLOCK_SIZE - (-v - 1) % BLOCK_SIZE - 1
    }
}

/// Identifies a block's position in the block grid.
///
/// Ordering is lexicographic on `(x, y, z)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct BlockCoord {
    /// Block-grid X coordinate.
    pub x: i32,
    /// Block-grid Y coordinate.
    pub y: i32,
    /// Block-grid Z coordinate.
    pub z: i32,
}

impl BlockCoord {
    /// Creates a new block coordinate.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns the block containing the given world cell.
    pub fn containing(world_cell: IVec3) -> Self {
        Self::new(
            block_index(world_cell.x),
            block_index(world_cell.y),
            block_index(world_cell.z),
        )
    }

    /// Returns the block containing the given continuous world position.
    pub fn containing_position(pos: Vec3) -> Self {
        Self::containing(world_cell(pos))
    }

    /// Returns the address of the block offset by `(dx, dy, dz)`.
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// World cell coordinate of this block's `(0, 0, 0)` cell.
    pub fn origin_cell(self) -> IVec3 {
        IVec3::new(self.x, self.y, self.z) * BLOCK_SIZE
    }

    /// The 26 face, edge and corner neighbours, in `dx`, `dy`, `dz` nested order.
    pub fn neighbors(self) -> impl Iterator<Item = BlockCoord> {
        NEIGHBOR_OFFSETS
            .iter()
            .map(move |o| self.offset(o.x, o.y, o.z))
    }
}

impl From<BlockCoord> for IVec3 {
    fn from(b: BlockCoord) -> Self {
        IVec3::new(b.x, b.y, b.z)
    }
}

impl From<IVec3> for BlockCoord {
    fn from(v: IVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

/// Offsets of the 26 neighbours of a block.
pub const NEIGHBOR_OFFSETS: [IVec3; 26] = {
    let mut out = [IVec3::ZERO; 26];
    let mut i = 0;
    let mut dx = -1;
    while dx <= 1 {
        let mut dy = -1;
        while dy <= 1 {
            let mut dz = -1;
            while dz <= 1 {
                if dx != 0 || dy != 0 || dz != 0 {
                    out[i] = IVec3::new(dx, dy, dz);
                    i += 1;
                }
                dz += 1;
            }
            dy += 1;
        }
        dx += 1;
    }
    out
};

/// Maps a continuous world position to the integer cell containing it (floor on every axis).
#[inline]
pub fn world_cell(pos: Vec3) -> IVec3 {
    pos.floor().as_ivec3()
}

/// Splits a world cell into its block and the local cell inside that block.
#[inline]
pub fn split(world_cell: IVec3) -> (BlockCoord, IVec3) {
    let cell = IVec3::new(
        cell_index(world_cell.x),
        cell_index(world_cell.y),
        cell_index(world_cell.z),
    );
    (BlockCoord::containing(world_cell), cell)
}

/// Inverse of [`split`]: joins a block and a (possibly out-of-range) local cell into a world cell.
#[inline]
pub fn join(block: BlockCoord, cell: IVec3) -> IVec3 {
    block.origin_cell() + cell
}

/// Returns `true` if every component of `cell` lies in `[0, BLOCK_SIZE)`.
#[inline]
pub fn in_block(cell: IVec3) -> bool {
    cell.cmpge(IVec3::ZERO).all() && cell.cmplt(IVec3::splat(BLOCK_SIZE)).all()
}

/// Linear storage index of an in-range local cell (x-major, z fastest).
#[inline]
pub fn linear_index(cell: IVec3) -> usize {
    ((cell.x * BLOCK_SIZE + cell.y) * BLOCK_SIZE + cell.z) as usize
}

/// Iterates every local cell of a block in [`linear_index`] order.
pub fn local_cells() -> impl Iterator<Item = IVec3> {
    (0..BLOCK_VOLUME as i32).map(|i| {
        IVec3::new(i / (BLOCK_SIZE * BLOCK_SIZE), (i / BLOCK_SIZE) % BLOCK_SIZE, i % BLOCK_SIZE)
    })
}

/// Center of a block in world space.
pub fn block_center(block: BlockCoord) -> Vec3 {
    (Vec3::new(block.x as f32, block.y as f32, block.z as f32) + Vec3::splat(0.5))
        * BLOCK_SIZE as f32
}
