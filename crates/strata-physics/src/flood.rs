//! Predicate-bounded traversal of the block grid.

use rustc_hash::FxHashSet;
use strata_coords::{BlockCoord, NEIGHBOR_OFFSETS};
use strata_voxel::{Block, World};

/// Default cap on the number of blocks a single traversal may visit.
pub const DEFAULT_FLOOD_LIMIT: usize = 20_000;

/// Depth-first flood fill over the 26-connected block grid.
///
/// Each visited block is materialized and handed to a predicate. Accepted
/// blocks are collected and expanded into their neighbours; rejected blocks are
/// never expanded. Every coordinate is visited at most once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FloodFill {
    /// Maximum number of blocks visited (accepted or rejected) before the
    /// traversal gives up.
    pub limit: usize,
}

impl Default for FloodFill {
    fn default() -> Self {
        Self {
            limit: DEFAULT_FLOOD_LIMIT,
        }
    }
}

impl FloodFill {
    /// Creates a flood fill visiting at most `limit` blocks.
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    /// Collects the blocks reachable from `start` through accepted blocks.
    ///
    /// The result is in visit order; `start` comes first when accepted.
    pub fn collect_blocks(
        &self,
        world: &mut World,
        start: BlockCoord,
        mut predicate: impl FnMut(&Block) -> bool,
    ) -> Vec<BlockCoord> {
        let mut accepted = Vec::new();
        let mut visited = FxHashSet::default();
        let mut stack = vec![start];

        while let Some(coord) = stack.pop() {
            if !visited.insert(coord) {
                continue;
            }
            if visited.len() > self.limit {
                tracing::warn!(
                    "FloodFill: stopped after {} blocks from {:?}, {} accepted",
                    self.limit,
                    start,
                    accepted.len()
                );
                break;
            }
            if !predicate(world.get_block(coord)) {
                continue;
            }
            accepted.push(coord);
            // Reverse so the first offset is popped first.
            for d in NEIGHBOR_OFFSETS.iter().rev() {
                let next = coord.offset(d.x, d.y, d.z);
                if !visited.contains(&next) {
                    stack.push(next);
                }
            }
        }
        accepted
    }
}

#[cfg(test)]
mod tests {
    use strata_voxel::EmptyPopulator;

    use super::*;

    fn chebyshev(a: BlockCoord, b: BlockCoord) -> i32 {
        (a.x - b.x).abs().max((a.y - b.y).abs()).max((a.z - b.z).abs())
    }

    #[test]
    fn test_collects_ball_once_each() {
        let mut world = World::new(EmptyPopulator);
        let origin = BlockCoord::new(0, 0, 0);
        let mut calls: Vec<BlockCoord> = Vec::new();
        let blocks = FloodFill::default().collect_blocks(&mut world, origin, |b| {
            calls.push(b.coord());
            chebyshev(b.coord(), origin) <= 1
        });
        assert_eq!(blocks.len(), 27);
        assert_eq!(blocks[0], origin);

        let mut unique = calls.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), calls.len(), "a block was visited twice");
        // Evaluated: the accepted 3³ plus the rejected 5³ shell around it.
        assert_eq!(calls.len(), 125);
    }

    #[test]
    fn test_no_expansion_past_rejected_blocks() {
        let mut world = World::new(EmptyPopulator);
        let origin = BlockCoord::new(0, 0, 0);
        // Accept only a line along x; reject everything else.
        let mut evaluated = Vec::new();
        let blocks = FloodFill::default().collect_blocks(&mut world, origin, |b| {
            evaluated.push(b.coord());
            let c = b.coord();
            c.y == 0 && c.z == 0 && c.x.abs() <= 3
        });
        assert_eq!(blocks.len(), 7);
        // Everything evaluated is adjacent to an accepted block (or the start).
        for c in &evaluated {
            assert!(
                *c == origin || blocks.iter().any(|a| chebyshev(*a, *c) == 1),
                "{c:?} was reached through a rejected block"
            );
        }
        assert!(!world.contains(BlockCoord::new(0, 2, 0)));
    }

    #[test]
    fn test_rejected_start_yields_nothing() {
        let mut world = World::new(EmptyPopulator);
        let blocks = FloodFill::default().collect_blocks(&mut world, BlockCoord::new(4, 4, 4), |_| false);
        assert!(blocks.is_empty());
        assert_eq!(world.block_count(), 1);
    }

    #[test]
    fn test_limit_bounds_unbounded_predicate() {
        let mut world = World::new(EmptyPopulator);
        let blocks = FloodFill::new(50).collect_blocks(&mut world, BlockCoord::default(), |_| true);
        assert_eq!(blocks.len(), 50);
        assert_eq!(world.block_count(), 50);
    }

    #[test]
    fn test_first_neighbour_is_visited_first() {
        let mut world = World::new(EmptyPopulator);
        let origin = BlockCoord::new(0, 0, 0);
        let blocks = FloodFill::default().collect_blocks(&mut world, origin, |b| chebyshev(b.coord(), origin) <= 1);
        assert_eq!(blocks[1], BlockCoord::new(-1, -1, -1));
    }
}
