//! Ray intersection utilities used by the picking controller.
//!
//! All tests operate in whatever space the caller's inputs share — picking
//! transforms its ray into each mesh's local space first, so these stay
//! coordinate-system agnostic.

use glam::{Mat4, Vec3};

// ── AABB ─────────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    #[inline]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box enclosing `points`. Empty input yields a degenerate box
    /// at the origin.
    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Self {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for p in points {
            min = min.min(p);
            max = max.max(p);
        }
        if min.x > max.x {
            return Self::new(Vec3::ZERO, Vec3::ZERO);
        }
        Self { min, max }
    }

    /// Returns the box transformed by `m` (centre + rotated half-extents;
    /// Graphics Gems, Arvo 1990 — correct for rotation and non-uniform
    /// scale without visiting 8 corners).
    pub fn transform(&self, m: &Mat4) -> Self {
        let centre = (self.min + self.max) * 0.5;
        let half = (self.max - self.min) * 0.5;

        let new_centre = m.transform_point3(centre);

        let cols = m.to_cols_array_2d();
        let new_half = Vec3::new(
            half.x * cols[0][0].abs() + half.y * cols[1][0].abs() + half.z * cols[2][0].abs(),
            half.x * cols[0][1].abs() + half.y * cols[1][1].abs() + half.z * cols[2][1].abs(),
            half.x * cols[0][2].abs() + half.y * cols[1][2].abs() + half.z * cols[2][2].abs(),
        );

        Self {
            min: new_centre - new_half,
            max: new_centre + new_half,
        }
    }
}

// ── Ray ──────────────────────────────────────────────────────────────────────

/// A ray with unit (or at least caller-consistent) direction.
#[derive(Copy, Clone, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    #[inline]
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    /// Maps the ray through `m`: the origin as a point, the direction as a
    /// vector. The direction is re-normalised so returned `t` values are
    /// distances in the target space.
    pub fn transformed(&self, m: &Mat4) -> Self {
        Self {
            origin: m.transform_point3(self.origin),
            dir: m.transform_vector3(self.dir).normalize(),
        }
    }
}

/// Slab test. Returns the entry distance `t >= 0` if the ray hits `aabb`
/// (0.0 when the origin is inside), `None` otherwise.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    let mut t_min = 0.0_f32;
    let mut t_max = f32::INFINITY;

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let dir = ray.dir[axis];
        let (lo, hi) = (aabb.min[axis], aabb.max[axis]);

        if dir.abs() < 1e-8 {
            // parallel to the slab: miss unless the origin lies within it
            if origin < lo || origin > hi {
                return None;
            }
        } else {
            let inv = 1.0 / dir;
            let (t0, t1) = {
                let a = (lo - origin) * inv;
                let b = (hi - origin) * inv;
                if a <= b { (a, b) } else { (b, a) }
            };
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
    }

    Some(t_min)
}

/// Möller–Trumbore ray/triangle test. Returns the hit distance `t > 0`,
/// or `None` on miss. Back faces count as hits (picking does not care
/// about winding).
pub fn ray_triangle(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
    const EPS: f32 = 1e-7;

    let e1 = v1 - v0;
    let e2 = v2 - v0;

    let p = ray.dir.cross(e2);
    let det = e1.dot(p);
    if det.abs() < EPS {
        return None; // ray parallel to triangle plane
    }

    let inv_det = 1.0 / det;
    let s = ray.origin - v0;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(e1);
    let v = ray.dir.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = e2.dot(q) * inv_det;
    (t > EPS).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5))
    }

    #[test]
    fn ray_hits_box_head_on() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let t = ray_aabb(&ray, &unit_box()).expect("hit");
        assert!((t - 4.5).abs() < 1e-5);
    }

    #[test]
    fn ray_misses_box_to_the_side() {
        let ray = Ray::new(Vec3::new(2.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(ray_aabb(&ray, &unit_box()).is_none());
    }

    #[test]
    fn ray_from_inside_box_reports_zero() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(ray_aabb(&ray, &unit_box()), Some(0.0));
    }

    #[test]
    fn ray_behind_box_misses() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(ray_aabb(&ray, &unit_box()).is_none());
    }

    #[test]
    fn axis_parallel_ray_inside_slab_hits() {
        let ray = Ray::new(Vec3::new(0.25, 0.25, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(ray_aabb(&ray, &unit_box()).is_some());
    }

    #[test]
    fn triangle_hit_and_distance() {
        let ray = Ray::new(Vec3::new(0.25, 0.25, 1.0), Vec3::new(0.0, 0.0, -1.0));
        let t = ray_triangle(
            &ray,
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        )
        .expect("hit");
        assert!((t - 1.0).abs() < 1e-5);
    }

    #[test]
    fn triangle_miss_outside_edge() {
        let ray = Ray::new(Vec3::new(0.9, 0.9, 1.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(ray_triangle(
            &ray,
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        )
        .is_none());
    }

    #[test]
    fn triangle_behind_origin_misses() {
        let ray = Ray::new(Vec3::new(0.25, 0.25, -1.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(ray_triangle(
            &ray,
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        )
        .is_none());
    }

    #[test]
    fn transformed_ray_normalises_direction() {
        let scale = Mat4::from_scale(Vec3::splat(2.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0)).transformed(&scale);
        assert!((ray.dir.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn aabb_from_points_and_transform() {
        let aabb = Aabb::from_points([Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 2.0, 3.0)]);
        assert_eq!(aabb.min, Vec3::new(-1.0, 0.0, 0.0));
        let moved = aabb.transform(&Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)));
        assert_eq!(moved.min.x, 9.0);
        assert_eq!(moved.max.x, 11.0);
    }
}
