//! Per-block mesh buffers handed to the rendering collaborator.

use glam::Vec3;

use crate::sweep::{SweepHit, sweep_sphere_sphere, sweep_sphere_triangle};

// Positions and normals are uploaded as tightly packed float triples.
static_assertions::assert_eq_size!([f32; 3], [u32; 3]);

/// Sphere enclosing every vertex of a mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingSphere {
    /// Sphere center in world space.
    pub center: Vec3,
    /// Sphere radius.
    pub radius: f32,
}

/// The output of polygonizing one block.
///
/// All vertex attributes are parallel arrays indexed by vertex; `indices` holds
/// three entries per triangle.
#[derive(Clone, Debug, Default)]
pub struct MeshBuffers {
    /// Vertex positions in world space.
    pub positions: Vec<[f32; 3]>,
    /// Unit vertex normals.
    pub normals: Vec<[f32; 3]>,
    /// Environment scalar per vertex.
    pub environment: Vec<f32>,
    /// Triangle list.
    pub indices: Vec<u32>,
    bounds: Option<BoundingSphere>,
}

impl MeshBuffers {
    /// Creates an empty mesh.
    pub const fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            environment: Vec::new(),
            indices: Vec::new(),
            bounds: None,
        }
    }

    /// Appends a vertex and returns its index.
    pub fn push_vertex(&mut self, position: Vec3, normal: Vec3, environment: f32) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position.to_array());
        self.normals.push(normal.to_array());
        self.environment.push(environment);
        index
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns `true` if the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Positions as a flat `x, y, z, x, y, z, ...` slice.
    pub fn positions_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Normals as a flat `x, y, z, x, y, z, ...` slice.
    pub fn normals_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.normals)
    }

    /// Iterates the triangles as vertex position triples.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                Vec3::from_array(self.positions[tri[0] as usize]),
                Vec3::from_array(self.positions[tri[1] as usize]),
                Vec3::from_array(self.positions[tri[2] as usize]),
            ]
        })
    }

    /// Bounding sphere computed by [`MeshBuffers::compute_bounds`], if any.
    pub fn bounds(&self) -> Option<BoundingSphere> {
        self.bounds
    }

    /// Recomputes the bounding sphere around the axis-aligned box of all vertices.
    ///
    /// An empty mesh has no bounds.
    pub fn compute_bounds(&mut self) -> Option<BoundingSphere> {
        let mut iter = self.positions.iter().map(|p| Vec3::from_array(*p));
        self.bounds = iter.next().map(|first| {
            let (min, max) = iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
            let center = (min + max) * 0.5;
            let radius = self
                .positions
                .iter()
                .map(|p| Vec3::from_array(*p).distance_squared(center))
                .fold(0.0_f32, f32::max)
                .sqrt();
            BoundingSphere { center, radius }
        });
        self.bounds
    }

    /// Sweeps a sphere of `radius` from `origin` along `motion` against every
    /// triangle and returns the earliest contact, `t` in `[0, 1]`.
    ///
    /// Meshes whose bounding sphere can't be reached are skipped without
    /// testing individual triangles.
    pub fn sweep(&self, origin: Vec3, motion: Vec3, radius: f32) -> Option<SweepHit> {
        if self.is_empty() {
            return None;
        }
        if let Some(b) = self.bounds
            && origin.distance(b.center) > b.radius + radius
            && sweep_sphere_sphere(origin, motion, radius, b.center, b.radius).is_none()
        {
            return None;
        }

        self.triangles()
            .filter_map(|[a, b, c]| sweep_sphere_triangle(origin, motion, radius, a, b, c))
            .min_by(|x, y| x.t.total_cmp(&y.t))
    }
}
