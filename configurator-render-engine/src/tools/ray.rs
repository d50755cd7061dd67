use bevy::prelude::*;
use bevy::render::primitives::Aabb;

/// Ray test against a mesh's local AABB under its world transform.
/// Returns the hit distance along the ray, or `None` on a miss.
pub fn ray_hits_obb(origin: Vec3, dir: Vec3, xf: &GlobalTransform, aabb: &Aabb) -> Option<f32> {
    let inv = xf.compute_matrix().inverse();
    let o_local = inv.transform_point3(origin);
    let d_local = inv.transform_vector3(dir);
    let min = Vec3::from(aabb.center - aabb.half_extents);
    let max = Vec3::from(aabb.center + aabb.half_extents);
    ray_aabb_hit_t(o_local, d_local, min, max)
}

// Slab-method ray–AABB intersection, returns Some(t) or None
pub fn ray_aabb_hit_t(ray_origin: Vec3, ray_direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let inv = Vec3::new(
        if ray_direction.x != 0.0 { 1.0 / ray_direction.x } else { f32::INFINITY },
        if ray_direction.y != 0.0 { 1.0 / ray_direction.y } else { f32::INFINITY },
        if ray_direction.z != 0.0 { 1.0 / ray_direction.z } else { f32::INFINITY },
    );

    let (mut tmin, mut tmax) = ((min.x - ray_origin.x) * inv.x, (max.x - ray_origin.x) * inv.x);
    if tmin > tmax { std::mem::swap(&mut tmin, &mut tmax); }

    let (mut tymin, mut tymax) = ((min.y - ray_origin.y) * inv.y, (max.y - ray_origin.y) * inv.y);
    if tymin > tymax { std::mem::swap(&mut tymin, &mut tymax); }

    if (tmin > tymax) || (tymin > tmax) { return None; }
    if tymin > tmin { tmin = tymin; }
    if tymax < tmax { tmax = tymax; }

    let (mut tzmin, mut tzmax) = ((min.z - ray_origin.z) * inv.z, (max.z - ray_origin.z) * inv.z);
    if tzmin > tzmax { std::mem::swap(&mut tzmin, &mut tzmax); }

    if (tmin > tzmax) || (tzmin > tmax) { return None; }
    if tzmin > tmin { tmin = tzmin; }
    if tzmax < tmax { tmax = tzmax; }

    if tmax < 0.0 { return None; }
    Some(if tmin >= 0.0 { tmin } else { tmax })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::Vec3A;

    fn unit_aabb() -> Aabb {
        Aabb {
            center: Vec3A::ZERO,
            half_extents: Vec3A::splat(0.5),
        }
    }

    #[test]
    fn ray_hits_a_box_in_front() {
        let t = ray_aabb_hit_t(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::splat(-0.5),
            Vec3::splat(0.5),
        );
        assert_eq!(t, Some(4.5));
    }

    #[test]
    fn ray_misses_a_box_to_the_side() {
        let t = ray_aabb_hit_t(
            Vec3::new(3.0, 0.0, 5.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::splat(-0.5),
            Vec3::splat(0.5),
        );
        assert_eq!(t, None);
    }

    #[test]
    fn box_behind_the_origin_does_not_hit() {
        let t = ray_aabb_hit_t(
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::splat(-0.5),
            Vec3::splat(0.5),
        );
        assert_eq!(t, None);
    }

    #[test]
    fn origin_inside_the_box_returns_the_exit_distance() {
        let t = ray_aabb_hit_t(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::splat(-0.5),
            Vec3::splat(0.5),
        )
        .unwrap();
        assert!((t - 0.5).abs() < 1e-6);
    }

    #[test]
    fn obb_test_respects_the_transform() {
        let aabb = unit_aabb();
        let at_origin = GlobalTransform::from(Transform::IDENTITY);
        let shifted = GlobalTransform::from(Transform::from_xyz(10.0, 0.0, 0.0));

        let origin = Vec3::new(0.0, 0.0, 5.0);
        let dir = Vec3::new(0.0, 0.0, -1.0);
        assert!(ray_hits_obb(origin, dir, &at_origin, &aabb).is_some());
        assert!(ray_hits_obb(origin, dir, &shifted, &aabb).is_none());

        let origin = Vec3::new(10.0, 0.0, 5.0);
        assert!(ray_hits_obb(origin, dir, &shifted, &aabb).is_some());
    }
}
