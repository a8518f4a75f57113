//! Marching-cubes polygonization of one cell or one whole block.
//!
//! Cell `c` of a block is centred at `block_origin + c`; its eight corners sit at
//! `±0.5` around that center, so the sample stored for cell `k` is located at
//! `k + 0.5` in world space. Corner values are therefore read from cells `c - 1`
//! and `c` on every axis, which reaches one cell past the block on the low side.

use glam::{IVec3, Vec3};
use strata_coords::BLOCK_SIZE;

use crate::buffers::MeshBuffers;
use crate::interpolate::{interpolate_scalar, interpolate_vec3};
use crate::tables::{EDGE_CORNERS, EDGE_TABLE, TRI_TABLE};

/// Density layer index.
pub const DENSITY: usize = 0;
/// Environment layer index.
pub const ENVIRONMENT: usize = 1;

/// Offsets (relative to the cell) of the cells whose samples form each corner.
const CORNER_CELLS: [IVec3; 8] = [
    IVec3::new(-1, -1, -1),
    IVec3::new(0, -1, -1),
    IVec3::new(0, 0, -1),
    IVec3::new(-1, 0, -1),
    IVec3::new(-1, -1, 0),
    IVec3::new(0, -1, 0),
    IVec3::new(0, 0, 0),
    IVec3::new(-1, 0, 0),
];

/// Read access to the scalar field around a block, indexed by cell offsets
/// relative to the block's `(0, 0, 0)` cell.
///
/// Offsets may fall outside `[0, BLOCK_SIZE)`; implementations resolve them
/// against the neighbouring blocks.
pub trait CellSampler {
    /// Scalar value of `layer` at `cell`.
    fn value(&self, cell: IVec3, layer: usize) -> f32;

    /// Density gradient at `cell`, pointing toward lower density.
    fn gradient(&self, cell: IVec3) -> Vec3;
}

/// Polygonizes one cell, appending its vertices and triangles to `mesh`.
///
/// Returns the number of triangles emitted. Vertices are shared only within the
/// cell (keyed by edge); neighbouring cells emit their own copies.
pub fn polygonize_cell<S: CellSampler + ?Sized>(
    sampler: &S,
    block_origin: IVec3,
    cell: IVec3,
    level: f32,
    mesh: &mut MeshBuffers,
) -> usize {
    let center = (block_origin + cell).as_vec3();

    let mut values = [0.0_f32; 8];
    let mut config = 0usize;
    for (i, offset) in CORNER_CELLS.iter().enumerate() {
        values[i] = sampler.value(cell + *offset, DENSITY);
        if values[i] < level {
            config |= 1 << i;
        }
    }

    let edges = EDGE_TABLE[config];
    if edges == 0 {
        return 0;
    }

    let mut positions = [Vec3::ZERO; 8];
    let mut gradients = [Vec3::ZERO; 8];
    let mut environment = [0.0_f32; 8];
    for (i, offset) in CORNER_CELLS.iter().enumerate() {
        positions[i] = center + offset.as_vec3() + Vec3::splat(0.5);
        gradients[i] = sampler.gradient(cell + *offset);
        environment[i] = sampler.value(cell + *offset, ENVIRONMENT);
    }

    let mut emitted: [Option<u32>; 12] = [None; 12];
    let mut triangles = 0;
    for tri in TRI_TABLE[config].chunks_exact(3) {
        if tri[0] < 0 {
            break;
        }
        for &edge in tri {
            let edge = edge as usize;
            let index = match emitted[edge] {
                Some(index) => index,
                None => {
                    let (a, b) = EDGE_CORNERS[edge];
                    let (va, vb) = (values[a], values[b]);
                    let position = interpolate_vec3(level, positions[a], positions[b], va, vb);
                    let normal = interpolate_vec3(level, gradients[a], gradients[b], va, vb)
                        .normalize_or(Vec3::Z);
                    let env = interpolate_scalar(level, environment[a], environment[b], va, vb);
                    let index = mesh.push_vertex(position, normal, env);
                    emitted[edge] = Some(index);
                    index
                }
            };
            mesh.indices.push(index);
        }
        triangles += 1;
    }
    triangles
}

/// Polygonizes every cell of a block and computes the mesh bounds.
pub fn polygonize_block<S: CellSampler + ?Sized>(
    sampler: &S,
    block_origin: IVec3,
    level: f32,
) -> MeshBuffers {
    let mut mesh = MeshBuffers::new();
    for x in 0..BLOCK_SIZE {
        for y in 0..BLOCK_SIZE {
            for z in 0..BLOCK_SIZE {
                polygonize_cell(sampler, block_origin, IVec3::new(x, y, z), level, &mut mesh);
            }
        }
    }
    mesh.compute_bounds();
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Samples an analytic density field; environment is the cell's x coordinate.
    struct FieldSampler<F: Fn(IVec3) -> f32> {
        field: F,
    }

    impl<F: Fn(IVec3) -> f32> CellSampler for FieldSampler<F> {
        fn value(&self, cell: IVec3, layer: usize) -> f32 {
            match layer {
                DENSITY => (self.field)(cell),
                _ => cell.x as f32,
            }
        }

        fn gradient(&self, cell: IVec3) -> Vec3 {
            let v = |d: IVec3| (self.field)(cell + d);
            0.5 * Vec3::new(
                v(-IVec3::X) - v(IVec3::X),
                v(-IVec3::Y) - v(IVec3::Y),
                v(-IVec3::Z) - v(IVec3::Z),
            )
        }
    }

    fn sampler<F: Fn(IVec3) -> f32>(field: F) -> FieldSampler<F> {
        FieldSampler { field }
    }

    #[test]
    fn test_all_outside_emits_nothing() {
        let s = sampler(|_| 1.0);
        let mut mesh = MeshBuffers::new();
        assert_eq!(polygonize_cell(&s, IVec3::ZERO, IVec3::ONE, 0.0, &mut mesh), 0);
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
    }

    #[test]
    fn test_all_inside_emits_nothing() {
        let s = sampler(|_| -1.0);
        let mut mesh = MeshBuffers::new();
        assert_eq!(polygonize_cell(&s, IVec3::ZERO, IVec3::ONE, 0.0, &mut mesh), 0);
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_single_corner_below_emits_one_triangle() {
        // Corner 0 of cell (1,1,1) reads cell (0,0,0).
        let s = sampler(|c| if c == IVec3::ZERO { -1.0 } else { 1.0 });
        let mut mesh = MeshBuffers::new();
        let n = polygonize_cell(&s, IVec3::ZERO, IVec3::ONE, 0.0, &mut mesh);
        assert_eq!(n, 1);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.vertex_count(), 3);
        // Each vertex sits halfway along an edge leaving corner (0.5, 0.5, 0.5).
        for p in &mesh.positions {
            let p = Vec3::from_array(*p);
            let d = p - Vec3::splat(0.5);
            assert!((d.length() - 0.5).abs() < 1e-6, "vertex {p}");
        }
    }

    #[test]
    fn test_vertices_are_shared_within_a_cell() {
        // Corners 0 and 1 below: a quad made of two triangles over four edges.
        let s = sampler(|c| {
            if c == IVec3::ZERO || c == IVec3::new(1, 0, 0) {
                -1.0
            } else {
                1.0
            }
        });
        let mut mesh = MeshBuffers::new();
        let n = polygonize_cell(&s, IVec3::ZERO, IVec3::ONE, 0.0, &mut mesh);
        assert_eq!(n, 2);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices.len(), 6);
    }

    #[test]
    fn test_block_origin_offsets_positions() {
        let s = sampler(|c| if c == IVec3::ZERO { -1.0 } else { 1.0 });
        let mut mesh = MeshBuffers::new();
        polygonize_cell(&s, IVec3::new(16, -8, 8), IVec3::ONE, 0.0, &mut mesh);
        for p in &mesh.positions {
            let d = Vec3::from_array(*p) - Vec3::new(16.5, -7.5, 8.5);
            assert!((d.length() - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_sphere_block_has_outward_unit_normals() {
        let center = Vec3::splat(4.0);
        let radius = 2.5;
        // Sample of cell k lives at k + 0.5; positive inside the sphere.
        let s = sampler(move |c| radius - (c.as_vec3() + Vec3::splat(0.5)).distance(center));
        let mesh = polygonize_block(&s, IVec3::ZERO, 0.0);
        assert!(mesh.triangle_count() > 0);
        assert_eq!(mesh.positions.len(), mesh.normals.len());
        assert_eq!(mesh.positions.len(), mesh.environment.len());
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            let p = Vec3::from_array(*p);
            let n = Vec3::from_array(*n);
            assert!((n.length() - 1.0).abs() < 1e-4);
            assert!((p.distance(center) - radius).abs() < 0.5, "vertex {p}");
            assert!(n.dot(p - center) > 0.0, "normal {n} at {p} points inward");
        }
        let bounds = mesh.bounds().expect("sphere mesh has bounds");
        assert!((bounds.center - center).length() < 0.5);
    }

    #[test]
    fn test_environment_is_interpolated() {
        let s = sampler(|c| if c == IVec3::ZERO { -1.0 } else { 1.0 });
        let mut mesh = MeshBuffers::new();
        polygonize_cell(&s, IVec3::ZERO, IVec3::ONE, 0.0, &mut mesh);
        // Environment is the cell x; along the x edge it is halfway between 0 and 1.
        let mut env = mesh.environment.clone();
        env.sort_by(f32::total_cmp);
        assert_eq!(env, vec![0.0, 0.0, 0.5]);
    }
}
