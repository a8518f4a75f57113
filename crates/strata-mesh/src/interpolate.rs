//! Linear interpolation of the isolevel crossing along a cube edge.

use glam::Vec3;

/// Interpolates a scalar attribute at the point where the field crosses `level`
/// between two samples with values `v1` and `v2`.
///
/// Near-equal values return `p1` unchanged.
#[inline]
pub fn interpolate_scalar(level: f32, p1: f32, p2: f32, v1: f32, v2: f32) -> f32 {
    if (v1 - v2).abs() < f32::EPSILON {
        return p1;
    }
    let mu = (level - v1) / (v2 - v1);
    p1 + mu * (p2 - p1)
}

/// Interpolates a vector attribute at the isolevel crossing between two samples.
///
/// The endpoints are first put in a canonical order (greater one first, compared
/// lexicographically on x, y, z) so that the two cells sharing an edge compute
/// bit-identical results regardless of the direction they walk it. Near-equal
/// values therefore return the lexicographically greater endpoint.
#[inline]
pub fn interpolate_vec3(level: f32, mut p1: Vec3, mut p2: Vec3, mut v1: f32, mut v2: f32) -> Vec3 {
    if lexicographic_less(p1, p2) {
        std::mem::swap(&mut p1, &mut p2);
        std::mem::swap(&mut v1, &mut v2);
    }
    if (v1 - v2).abs() < f32::EPSILON {
        return p1;
    }
    let mu = (level - v1) / (v2 - v1);
    p1 + mu * (p2 - p1)
}

fn lexicographic_less(a: Vec3, b: Vec3) -> bool {
    if a.x != b.x {
        return a.x < b.x;
    }
    if a.y != b.y {
        return a.y < b.y;
    }
    a.z < b.z
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_midpoint() {
        let r = interpolate_scalar(0.0, 2.0, 4.0, -1.0, 1.0);
        assert!((r - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_scalar_equal_values_returns_first_endpoint() {
        let r = interpolate_scalar(0.0, 2.0, 4.0, 0.5, 0.5);
        assert_eq!(r, 2.0);
        assert!(r.is_finite());
    }

    #[test]
    fn test_vec3_crossing_position() {
        let p1 = Vec3::new(0.0, 0.0, 0.0);
        let p2 = Vec3::new(1.0, 0.0, 0.0);
        let r = interpolate_vec3(0.0, p1, p2, -0.25, 0.75);
        assert!((r - Vec3::new(0.25, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_vec3_is_symmetric_in_endpoint_order() {
        let p1 = Vec3::new(3.5, -1.5, 2.5);
        let p2 = Vec3::new(3.5, -0.5, 2.5);
        let a = interpolate_vec3(0.0, p1, p2, 0.3, -0.9);
        let b = interpolate_vec3(0.0, p2, p1, -0.9, 0.3);
        assert_eq!(a, b);
    }

    #[test]
    fn test_vec3_equal_values_returns_an_endpoint() {
        let p1 = Vec3::new(0.0, 0.0, 0.0);
        let p2 = Vec3::new(0.0, 1.0, 0.0);
        let r = interpolate_vec3(0.0, p1, p2, 0.2, 0.2);
        assert!(r.is_finite());
        assert!(r == p1 || r == p2);
        // Canonical order picks the lexicographically greater endpoint.
        assert_eq!(r, p2);
        assert_eq!(interpolate_vec3(0.0, p2, p1, 0.2, 0.2), p2);
    }
}
