//! Swept-sphere intersection against triangles.
//!
//! A sphere of radius `r` moves from `origin` to `origin + motion`; every test
//! reports the earliest parameter `t ∈ [0, 1]` at which the sphere touches the
//! primitive. Triangles are double-sided. A radius of zero reduces to a
//! segment-versus-triangle test.

use glam::Vec3;

const EPSILON: f32 = 1e-6;

/// Earliest contact between a swept sphere and a primitive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepHit {
    /// Fraction of the motion travelled before contact, in `[0, 1]`.
    pub t: f32,
    /// Contact point on the primitive.
    pub point: Vec3,
    /// Unit normal pointing from the contact point toward the sphere center at contact.
    pub normal: Vec3,
}

impl SweepHit {
    /// Collapses an optional hit into its motion parameter, `f32::INFINITY` when absent.
    pub fn param(hit: Option<&SweepHit>) -> f32 {
        hit.map_or(f32::INFINITY, |h| h.t)
    }
}

/// Earliest `t ∈ [0, 1]` at which a sphere of `radius` swept along `motion`
/// touches a static sphere, or `None`.
pub fn sweep_sphere_sphere(
    origin: Vec3,
    motion: Vec3,
    radius: f32,
    center: Vec3,
    other_radius: f32,
) -> Option<f32> {
    let reach = radius + other_radius;
    let rel = origin - center;
    let c = rel.length_squared() - reach * reach;
    if c <= 0.0 {
        return Some(0.0);
    }
    let a = motion.length_squared();
    let b = 2.0 * motion.dot(rel);
    lowest_root(a, b, c, 1.0)
}

/// Sweeps a sphere against triangle `(a, b, c)`.
///
/// A sphere that already cuts the triangle's plane reports a contact only
/// while it moves toward that plane, at `t = 0` if it already touches the
/// triangle. Moving along or away from the plane is free.
pub fn sweep_sphere_triangle(
    origin: Vec3,
    motion: Vec3,
    radius: f32,
    a: Vec3,
    b: Vec3,
    c: Vec3,
) -> Option<SweepHit> {
    let cross = (b - a).cross(c - a);
    if cross.length_squared() < EPSILON * EPSILON {
        return None;
    }
    let mut normal = cross.normalize();
    let mut dist = normal.dot(origin - a);
    if dist < 0.0 {
        normal = -normal;
        dist = -dist;
    }
    let approach = normal.dot(motion);
    if approach >= -EPSILON {
        // Moving along or away from the plane.
        return None;
    }

    // Face contact.
    if dist < radius {
        let point = origin - normal * dist;
        if point_in_triangle(point, a, b, c) {
            return Some(SweepHit {
                t: 0.0,
                point,
                normal,
            });
        }
    } else {
        let t0 = (radius - dist) / approach;
        if t0 > 1.0 {
            return None;
        }
        let center = origin + motion * t0;
        let point = center - normal * radius;
        if point_in_triangle(point, a, b, c) {
            return Some(SweepHit {
                t: t0,
                point,
                normal,
            });
        }
    }

    // Vertex and edge contacts.
    let mut best: Option<(f32, Vec3)> = None;
    let mut limit = 1.0_f32;
    let speed2 = motion.length_squared();
    let r2 = radius * radius;

    for p in [a, b, c] {
        let qa = speed2;
        let qb = 2.0 * motion.dot(origin - p);
        let qc = (p - origin).length_squared() - r2;
        if qc <= 0.0 {
            // Already touching the vertex.
            if qb < 0.0 {
                limit = 0.0;
                best = Some((0.0, p));
            }
            continue;
        }
        if let Some(t) = lowest_root(qa, qb, qc, limit) {
            limit = t;
            best = Some((t, p));
        }
    }

    for (p1, p2) in [(a, b), (b, c), (c, a)] {
        let edge = p2 - p1;
        let base = p1 - origin;
        let edge2 = edge.length_squared();
        let edge_dot_motion = edge.dot(motion);
        let edge_dot_base = edge.dot(base);

        // Scaled `r² - distance²` to the edge line; non-negative means touching.
        let qa = edge2 * -speed2 + edge_dot_motion * edge_dot_motion;
        let qb = edge2 * (2.0 * motion.dot(base)) - 2.0 * edge_dot_motion * edge_dot_base;
        let qc = edge2 * (r2 - base.length_squared()) + edge_dot_base * edge_dot_base;
        if qc >= 0.0 {
            let f = -edge_dot_base / edge2;
            if qb > 0.0 && (0.0..=1.0).contains(&f) && limit > 0.0 {
                limit = 0.0;
                best = Some((0.0, p1 + edge * f));
            }
            continue;
        }
        if let Some(t) = lowest_root(qa, qb, qc, limit) {
            let f = (edge_dot_motion * t - edge_dot_base) / edge2;
            if (0.0..=1.0).contains(&f) {
                limit = t;
                best = Some((t, p1 + edge * f));
            }
        }
    }

    best.map(|(t, point)| {
        let center = origin + motion * t;
        let normal = (center - point).try_normalize().unwrap_or(normal);
        SweepHit { t, point, normal }
    })
}

/// Barycentric point-in-triangle test for a point on the triangle's plane.
pub fn point_in_triangle(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> bool {
    let v0 = c - a;
    let v1 = b - a;
    let v2 = p - a;
    let d00 = v0.dot(v0);
    let d01 = v0.dot(v1);
    let d02 = v0.dot(v2);
    let d11 = v1.dot(v1);
    let d12 = v1.dot(v2);
    let denom = d00 * d11 - d01 * d01;
    if denom.abs() < EPSILON * EPSILON {
        return false;
    }
    let inv = 1.0 / denom;
    let u = (d11 * d02 - d01 * d12) * inv;
    let v = (d00 * d12 - d01 * d02) * inv;
    u >= -EPSILON && v >= -EPSILON && u + v <= 1.0 + EPSILON
}

/// Smallest root of `a t² + b t + c = 0` in `[0, max]`.
fn lowest_root(a: f32, b: f32, c: f32, max: f32) -> Option<f32> {
    if a.abs() < EPSILON {
        return None;
    }
    let det = b * b - 4.0 * a * c;
    if det < 0.0 {
        return None;
    }
    let sqrt = det.sqrt();
    let mut r1 = (-b - sqrt) / (2.0 * a);
    let mut r2 = (-b + sqrt) / (2.0 * a);
    if r1 > r2 {
        std::mem::swap(&mut r1, &mut r2);
    }
    if r1 >= 0.0 && r1 <= max {
        return Some(r1);
    }
    if r2 >= 0.0 && r2 <= max {
        return Some(r2);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor_triangle() -> (Vec3, Vec3, Vec3) {
        (
            Vec3::new(-5.0, -5.0, 0.0),
            Vec3::new(5.0, -5.0, 0.0),
            Vec3::new(0.0, 5.0, 0.0),
        )
    }

    #[test]
    fn test_face_contact_from_above() {
        let (a, b, c) = floor_triangle();
        let hit = sweep_sphere_triangle(Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, -4.0), 1.0, a, b, c)
            .expect("should hit the face");
        assert!((hit.t - 0.5).abs() < 1e-5);
        assert!((hit.normal - Vec3::Z).length() < 1e-5);
        assert!(hit.point.z.abs() < 1e-5);
    }

    #[test]
    fn test_face_contact_from_below_is_double_sided() {
        let (a, b, c) = floor_triangle();
        let hit = sweep_sphere_triangle(Vec3::new(0.0, 0.0, -3.0), Vec3::new(0.0, 0.0, 4.0), 1.0, a, b, c)
            .expect("should hit the back face");
        assert!((hit.t - 0.5).abs() < 1e-5);
        assert!((hit.normal + Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_motion_too_short_misses() {
        let (a, b, c) = floor_triangle();
        assert!(
            sweep_sphere_triangle(Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, -1.0), 1.0, a, b, c)
                .is_none()
        );
    }

    #[test]
    fn test_moving_away_misses() {
        let (a, b, c) = floor_triangle();
        assert!(
            sweep_sphere_triangle(Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, 4.0), 1.0, a, b, c)
                .is_none()
        );
    }

    #[test]
    fn test_overlapping_sphere_separates_freely() {
        let (a, b, c) = floor_triangle();
        let origin = Vec3::new(0.0, 0.0, 0.999);
        assert_eq!(sweep_sphere_triangle(origin, Vec3::Z, 1.0, a, b, c), None);
    }

    #[test]
    fn test_overlapping_sphere_slides_freely() {
        let (a, b, c) = floor_triangle();
        let origin = Vec3::new(0.0, 0.0, 0.999);
        assert_eq!(sweep_sphere_triangle(origin, Vec3::X, 1.0, a, b, c), None);
    }

    #[test]
    fn test_overlapping_sphere_pressing_in_stops_at_once() {
        let (a, b, c) = floor_triangle();
        let origin = Vec3::new(0.0, 0.0, 0.999);
        let hit = sweep_sphere_triangle(origin, Vec3::new(1.0, 0.0, -1.0), 1.0, a, b, c)
            .expect("pressing into the face");
        assert_eq!(hit.t, 0.0);
        assert!((hit.normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_overlapping_vertex_contact() {
        let (a, b, c) = floor_triangle();
        // Beyond the apex (0, 5, 0), already touching it, sinking toward the plane.
        let origin = Vec3::new(0.0, 5.5, 0.3);
        assert_eq!(sweep_sphere_triangle(origin, Vec3::new(0.0, 2.0, -0.1), 1.0, a, b, c), None);
        let hit = sweep_sphere_triangle(origin, Vec3::new(0.0, -2.0, -0.1), 1.0, a, b, c)
            .expect("closing in on the apex");
        assert_eq!(hit.t, 0.0);
        assert!((hit.point - c).length() < 1e-5);
    }

    #[test]
    fn test_overlapping_edge_contact() {
        let (a, b, c) = floor_triangle();
        // Outside the edge a-b at y = -5, already touching it, sinking toward the plane.
        let origin = Vec3::new(0.0, -5.5, 0.3);
        assert_eq!(sweep_sphere_triangle(origin, Vec3::new(0.0, -2.0, -0.1), 1.0, a, b, c), None);
        let hit = sweep_sphere_triangle(origin, Vec3::new(0.0, 2.0, -0.1), 1.0, a, b, c)
            .expect("closing in on the edge");
        assert_eq!(hit.t, 0.0);
        assert!((hit.point - Vec3::new(0.0, -5.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_vertex_contact() {
        let (a, b, c) = floor_triangle();
        // Dropping just beyond the apex (0, 5, 0).
        let hit = sweep_sphere_triangle(Vec3::new(0.0, 5.6, 3.0), Vec3::new(0.0, 0.0, -4.0), 1.0, a, b, c)
            .expect("should touch the apex");
        assert!((hit.t - 0.55).abs() < 1e-4, "t = {}", hit.t);
        assert!((hit.point - c).length() < 1e-4);
        assert!((hit.normal - Vec3::new(0.0, 0.6, 0.8)).length() < 1e-4);
    }

    #[test]
    fn test_edge_contact() {
        let (a, b, c) = floor_triangle();
        // Dropping just outside the edge a-b at y = -5.
        let hit = sweep_sphere_triangle(Vec3::new(0.0, -5.5, 3.0), Vec3::new(0.0, 0.0, -4.0), 1.0, a, b, c)
            .expect("should touch the bottom edge");
        let expected = (3.0 - 0.75_f32.sqrt()) / 4.0;
        assert!((hit.t - expected).abs() < 1e-4, "t = {}", hit.t);
        assert!((hit.point - Vec3::new(0.0, -5.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_zero_radius_segment() {
        let (a, b, c) = floor_triangle();
        let hit = sweep_sphere_triangle(Vec3::new(1.0, 0.0, 2.0), Vec3::new(0.0, 0.0, -4.0), 0.0, a, b, c)
            .expect("segment crosses the triangle");
        assert!((hit.t - 0.5).abs() < 1e-5);
        assert!((hit.point - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_degenerate_triangle_is_ignored() {
        let p = Vec3::ZERO;
        assert!(sweep_sphere_triangle(Vec3::Z, -Vec3::Z, 1.0, p, p, Vec3::X).is_none());
    }

    #[test]
    fn test_sphere_sphere() {
        let t = sweep_sphere_sphere(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 1.0, Vec3::new(6.0, 0.0, 0.0), 1.0)
            .expect("spheres meet");
        assert!((t - 0.4).abs() < 1e-5);
        assert_eq!(
            sweep_sphere_sphere(Vec3::ZERO, Vec3::X, 1.0, Vec3::new(0.5, 0.0, 0.0), 1.0),
            Some(0.0)
        );
        assert!(sweep_sphere_sphere(Vec3::ZERO, Vec3::Y, 1.0, Vec3::new(6.0, 0.0, 0.0), 1.0).is_none());
    }

    #[test]
    fn test_param_sentinel() {
        assert_eq!(SweepHit::param(None), f32::INFINITY);
        let hit = SweepHit {
            t: 0.25,
            point: Vec3::ZERO,
            normal: Vec3::Z,
        };
        assert_eq!(SweepHit::param(Some(&hit)), 0.25);
    }
}
