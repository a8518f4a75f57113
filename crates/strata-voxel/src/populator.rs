//! The seam through which newly created blocks receive their initial contents.

use strata_coords::BlockCoord;

use crate::block::Block;

/// Fills a freshly created block.
///
/// Must be a pure function of `coord` (and whatever seed the implementor
/// holds): blocks are populated lazily, in whatever order they are first
/// touched.
pub trait Populator {
    /// Writes the initial layers of the block at `coord`.
    fn populate(&self, coord: BlockCoord, block: &mut Block);
}

impl<F> Populator for F
where
    F: Fn(BlockCoord, &mut Block),
{
    fn populate(&self, coord: BlockCoord, block: &mut Block) {
        self(coord, block)
    }
}

/// Leaves blocks at their unpopulated value (all air).
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyPopulator;

impl Populator for EmptyPopulator {
    fn populate(&self, _coord: BlockCoord, _block: &mut Block) {}
}
