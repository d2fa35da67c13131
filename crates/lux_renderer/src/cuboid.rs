//! Axis-aligned box built from six rectangles.

use crate::hittable::{HitRecord, Hittable, HittableList};
use crate::{AaRect, Material};
use lux_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// A closed axis-aligned box. Intersection is list intersection over its faces.
pub struct Cuboid {
    min: Vec3,
    max: Vec3,
    sides: HittableList,
}

impl Cuboid {
    /// Box spanning two opposite corners, in any order.
    pub fn new(a: Vec3, b: Vec3, material: Arc<Material>) -> Self {
        let (p0, p1) = (a.min(b), a.max(b));

        let mut sides = HittableList::new();
        sides.add(AaRect::xy(p0.x, p1.x, p0.y, p1.y, p1.z, material.clone()));
        sides.add(AaRect::xy(p0.x, p1.x, p0.y, p1.y, p0.z, material.clone()));
        sides.add(AaRect::xz(p0.x, p1.x, p0.z, p1.z, p1.y, material.clone()));
        sides.add(AaRect::xz(p0.x, p1.x, p0.z, p1.z, p0.y, material.clone()));
        sides.add(AaRect::yz(p0.y, p1.y, p0.z, p1.z, p1.x, material.clone()));
        sides.add(AaRect::yz(p0.y, p1.y, p0.z, p1.z, p0.x, material));

        Self {
            min: p0,
            max: p1,
            sides,
        }
    }
}

impl Hittable for Cuboid {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        self.sides.hit(ray, ray_t, rng)
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        Some(Aabb::from_points(self.min, self.max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Lambertian;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_rng() -> StdRng {
        StdRng::seed_from_u64(0)
    }

    fn cube() -> Cuboid {
        let white: Arc<Material> = Arc::new(Lambertian::new(Vec3::splat(0.73)).into());
        Cuboid::new(Vec3::ZERO, Vec3::new(165.0, 330.0, 165.0), white)
    }

    #[test]
    fn test_cuboid_entry_and_exit() {
        let cuboid = cube();
        let ray = Ray::new(Vec3::new(80.0, 100.0, -100.0), Vec3::Z, 0.0);

        let mut rng = test_rng();

        let entry = cuboid.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng).unwrap();
        assert!((entry.t - 100.0).abs() < 1e-3);
        assert_eq!(entry.normal, -Vec3::Z);

        let exit = cuboid
            .hit(&ray, Interval::new(entry.t + 0.001, f32::INFINITY), &mut rng)
            .unwrap();
        assert!((exit.t - 265.0).abs() < 1e-3);
        // Every face reports a normal facing back along the ray
        assert!(exit.normal.dot(ray.direction()) < 0.0);
    }

    #[test]
    fn test_cuboid_box_matches_corners() {
        let bbox = cube().bounding_box(0.0, 1.0).unwrap();
        assert_eq!(bbox.min(), Vec3::ZERO);
        assert_eq!(bbox.max(), Vec3::new(165.0, 330.0, 165.0));
    }
}
