//! Interactive terrain sculpting.

use glam::Vec3;
use strata_voxel::{Layer, World};

use crate::query::TerrainQuery;

/// Distance from the contact point to the edited cell, along the ray.
const SURFACE_OFFSET: f32 = 0.5;

/// Whether a brush stroke removes or adds material.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrushMode {
    /// Lowers density at the target cell.
    Dig,
    /// Raises density at the target cell.
    Build,
}

/// Edits the density at the terrain point a ray hits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainBrush {
    /// Length of the targeting ray.
    pub reach: f32,
    /// Radius of the swept sphere used for targeting.
    pub radius: f32,
    /// Density change per second of application.
    pub strength: f32,
}

impl Default for TerrainBrush {
    fn default() -> Self {
        Self {
            reach: 10.0,
            radius: 0.5,
            strength: 2.0,
        }
    }
}

impl TerrainBrush {
    /// Applies one stroke of `dt` seconds along `direction` from `origin`.
    ///
    /// The edited cell is the one half a cell past the contact point along the
    /// ray when digging, and half a cell before it when building, so a stroke
    /// always lands on the solid or the air side of the surface respectively.
    /// Its density moves by `strength * dt` and its environment is reset to
    /// zero. Returns the edited point, or `None` if the ray hits nothing within
    /// reach.
    pub fn apply(
        &self,
        query: &TerrainQuery,
        world: &mut World,
        origin: Vec3,
        direction: Vec3,
        dt: f32,
        mode: BrushMode,
    ) -> Option<Vec3> {
        let motion = direction.normalize_or_zero() * self.reach;
        if motion == Vec3::ZERO {
            return None;
        }
        let hit = query.intersect(world, origin, motion, self.radius)?;
        let step = motion.normalize_or_zero() * SURFACE_OFFSET;

        let (target, delta) = match mode {
            BrushMode::Dig => (hit.point + step, -self.strength * dt),
            BrushMode::Build => (hit.point - step, self.strength * dt),
        };
        let density = (world.value(target, Layer::Density.index()) + delta).clamp(-1.0, 1.0);
        world.set_value(target, density, Layer::Density.index());
        world.set_value(target, 0.0, Layer::Environment.index());

        tracing::debug!(
            "TerrainBrush: {:?} at {:?}, density now {:.3}",
            mode,
            target,
            density
        );
        Some(target)
    }
}

#[cfg(test)]
mod tests {
    use glam::IVec3;
    use strata_coords::BlockCoord;
    use strata_voxel::Block;

    use super::*;

    fn half_space(_: BlockCoord, block: &mut Block) {
        block.fill_with(|c| ((2.0 - (c.z as f32 + 0.5)) * 0.5, 1.0));
    }

    #[test]
    fn test_dig_lowers_density_at_hit() {
        let mut world = World::new(half_space);
        let query = TerrainQuery::default();
        let brush = TerrainBrush::default();
        let origin = Vec3::new(0.5, 0.5, 6.0);

        let target = brush
            .apply(&query, &mut world, origin, -Vec3::Z, 0.1, BrushMode::Dig)
            .expect("ray should reach the ground");
        // Contact at z = 2, edited half a cell below: the solid cell z = 1.
        assert!((target.z - 1.5).abs() < 1e-3, "target {target:?}");
        let after = world.value(target, Layer::Density.index());
        assert!((after - 0.05).abs() < 1e-5, "density {after}");
        assert_eq!(world.value(target, Layer::Environment.index()), 0.0);
    }

    #[test]
    fn test_build_raises_density_and_clamps() {
        let mut world = World::new(half_space);
        let query = TerrainQuery::default();
        let brush = TerrainBrush {
            strength: 100.0,
            ..TerrainBrush::default()
        };
        let target = brush
            .apply(&query, &mut world, Vec3::new(0.5, 0.5, 6.0), -Vec3::Z, 1.0, BrushMode::Build)
            .expect("ray should reach the ground");
        // Edits the air cell z = 2 just above the surface.
        assert!((target.z - 2.5).abs() < 1e-3, "target {target:?}");
        assert_eq!(world.value(target, Layer::Density.index()), 1.0);
    }

    fn surface_height(query: &TerrainQuery, world: &mut World) -> f32 {
        let hit = query
            .intersect(world, Vec3::new(0.5, 0.5, 6.0), Vec3::new(0.0, 0.0, -10.0), 0.0)
            .expect("column still has ground");
        hit.point.z
    }

    #[test]
    fn test_repeated_digging_sinks_surface() {
        let mut world = World::new(half_space);
        let query = TerrainQuery::default();
        let brush = TerrainBrush {
            radius: 0.0,
            ..TerrainBrush::default()
        };
        let origin = Vec3::new(0.5, 0.5, 6.0);

        let mut height = surface_height(&query, &mut world);
        assert!((height - 2.0).abs() < 1e-4);
        for _ in 0..20 {
            brush
                .apply(&query, &mut world, origin, -Vec3::Z, 0.1, BrushMode::Dig)
                .expect("ray should reach the ground");
            let next = surface_height(&query, &mut world);
            assert!(next <= height + 1e-4, "surface rose from {height} to {next}");
            height = next;
        }
        // Cells z = 1 down to z = -2 are dug through.
        assert!(height < -1.0, "surface only reached {height}");
        assert!(world.value(IVec3::new(0, 0, 1), Layer::Density.index()) < 0.0);
    }

    #[test]
    fn test_repeated_building_raises_surface() {
        let mut world = World::new(half_space);
        let query = TerrainQuery::default();
        let brush = TerrainBrush {
            radius: 0.0,
            ..TerrainBrush::default()
        };
        let origin = Vec3::new(0.5, 0.5, 6.0);
        for _ in 0..6 {
            brush.apply(&query, &mut world, origin, -Vec3::Z, 0.1, BrushMode::Build);
        }
        assert!(surface_height(&query, &mut world) > 2.5);
    }

    #[test]
    fn test_miss_edits_nothing() {
        let mut world = World::new(half_space);
        let query = TerrainQuery::default();
        let brush = TerrainBrush::default();
        let hit = brush.apply(&query, &mut world, Vec3::new(0.5, 0.5, 6.0), Vec3::Z, 1.0, BrushMode::Dig);
        assert_eq!(hit, None);
        assert_eq!(world.value(Vec3::new(0.5, 0.5, 2.5), Layer::Environment.index()), 1.0);
    }

    #[test]
    fn test_zero_direction_is_ignored() {
        let mut world = World::new(half_space);
        let brush = TerrainBrush::default();
        let hit = brush.apply(&TerrainQuery::default(), &mut world, Vec3::ZERO, Vec3::ZERO, 1.0, BrushMode::Build);
        assert_eq!(hit, None);
        assert_eq!(world.block_count(), 0);
    }
}
