//! The drawable/collidable capability shared by everything that owns a mesh.

use glam::Vec3;

use crate::buffers::MeshBuffers;
use crate::sweep::SweepHit;

/// A shape that can rebuild its triangle mesh and be queried against it.
pub trait Surface {
    /// Rebuilds the mesh if it is stale and returns the current triangle count.
    fn polygonize(&mut self) -> usize;

    /// The mesh as of the last [`Surface::polygonize`].
    fn mesh(&self) -> &MeshBuffers;

    /// Sweeps a sphere of `radius` from `origin` along `motion` against the
    /// current mesh. Does not rebuild a stale mesh.
    fn intersect(&self, origin: Vec3, motion: Vec3, radius: f32) -> Option<SweepHit> {
        self.mesh().sweep(origin, motion, radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Floor {
        mesh: MeshBuffers,
        builds: usize,
    }

    impl Surface for Floor {
        fn polygonize(&mut self) -> usize {
            if self.mesh.is_empty() {
                let n = Vec3::Z;
                let a = self.mesh.push_vertex(Vec3::new(-4.0, -4.0, 0.0), n, 0.0);
                let b = self.mesh.push_vertex(Vec3::new(4.0, -4.0, 0.0), n, 0.0);
                let c = self.mesh.push_vertex(Vec3::new(0.0, 4.0, 0.0), n, 0.0);
                self.mesh.indices.extend_from_slice(&[a, b, c]);
                self.mesh.compute_bounds();
                self.builds += 1;
            }
            self.mesh.triangle_count()
        }

        fn mesh(&self) -> &MeshBuffers {
            &self.mesh
        }
    }

    #[test]
    fn test_intersect_uses_current_mesh() {
        let mut floor = Floor {
            mesh: MeshBuffers::new(),
            builds: 0,
        };
        let down = Vec3::new(0.0, 0.0, -4.0);
        assert!(floor.intersect(Vec3::new(0.0, 0.0, 2.0), down, 0.0).is_none());

        assert_eq!(floor.polygonize(), 1);
        assert_eq!(floor.polygonize(), 1);
        assert_eq!(floor.builds, 1);

        let hit = floor
            .intersect(Vec3::new(0.0, 0.0, 2.0), down, 0.0)
            .expect("ray crosses the floor");
        assert!((hit.t - 0.5).abs() < 1e-6);
    }
}
