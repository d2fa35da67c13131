//! Homogeneous participating medium (smoke, fog, subsurface haze).

use crate::hittable::{HitRecord, Hittable};
use crate::sampling::gen_f32;
use crate::texture::Texture;
use crate::{Isotropic, Material, Object};
use lux_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Offset past the entry point when looking for the exit crossing.
const EXIT_SEARCH_EPSILON: f32 = 0.0001;

/// A constant-density volume filling a closed boundary shape.
///
/// Rays scatter inside it after an exponentially distributed free-flight
/// distance; the hit carries an isotropic phase function.
pub struct ConstantMedium {
    boundary: Arc<Object>,
    neg_inv_density: f32,
    phase_function: Material,
}

impl ConstantMedium {
    pub fn new(boundary: impl Into<Arc<Object>>, density: f32, albedo: impl Into<Texture>) -> Self {
        Self {
            boundary: boundary.into(),
            neg_inv_density: -1.0 / density,
            phase_function: Isotropic::new(albedo).into(),
        }
    }
}

impl Hittable for ConstantMedium {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        // First and second crossings of the boundary along the whole line
        let entry = self.boundary.hit(ray, Interval::UNIVERSE, rng)?;
        let exit = self
            .boundary
            .hit(ray, Interval::new(entry.t + EXIT_SEARCH_EPSILON, f32::INFINITY), rng)?;

        let t_enter = entry.t.max(ray_t.min);
        let t_exit = exit.t.min(ray_t.max);
        if t_enter >= t_exit {
            return None;
        }
        let t_enter = t_enter.max(0.0);

        let ray_length = ray.direction().length();
        let distance_inside_boundary = (t_exit - t_enter) * ray_length;

        // In (0, 1] so the logarithm stays finite
        let u = 1.0 - gen_f32(rng);
        let hit_distance = self.neg_inv_density * u.ln();
        if hit_distance > distance_inside_boundary {
            return None;
        }

        let t = t_enter + hit_distance / ray_length;
        Some(HitRecord {
            p: ray.at(t),
            // Arbitrary: the phase function ignores orientation
            normal: Vec3::X,
            material: &self.phase_function,
            u: 0.0,
            v: 0.0,
            t,
            front_face: true,
        })
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.boundary.bounding_box(time0, time1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Dielectric, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn any_t() -> Interval {
        Interval::new(0.001, f32::INFINITY)
    }

    fn fog(density: f32) -> ConstantMedium {
        let glass: Arc<Material> = Arc::new(Dielectric::new(1.5).into());
        let boundary = Object::from(Sphere::new(Vec3::ZERO, 1.0, glass));
        ConstantMedium::new(boundary, density, Vec3::ONE)
    }

    #[test]
    fn test_dense_medium_scatters_just_inside() {
        let medium = fog(1e6);
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0);

        let mut rng = StdRng::seed_from_u64(1);

        let rec = medium.hit(&ray, any_t(), &mut rng).unwrap();
        assert!(rec.t >= 4.0 && rec.t < 4.01);
        assert!(matches!(rec.material, Material::Isotropic(_)));
    }

    #[test]
    fn test_thin_medium_is_mostly_transparent() {
        let medium = fog(1e-6);
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0);

        let mut rng = StdRng::seed_from_u64(2);

        let hits = (0..1000)
            .filter(|_| medium.hit(&ray, any_t(), &mut rng).is_some())
            .count();
        assert!(hits < 10);
    }

    #[test]
    fn test_medium_hit_stays_inside_boundary() {
        let medium = fog(0.5);
        let ray = Ray::new(Vec3::new(0.2, -0.1, -5.0), Vec3::Z, 0.0);

        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..1000 {
            if let Some(rec) = medium.hit(&ray, any_t(), &mut rng) {
                assert!(rec.p.length() <= 1.0 + 1e-4);
            }
        }
    }

    #[test]
    fn test_medium_missed_boundary() {
        let medium = fog(10.0);
        let ray = Ray::new(Vec3::new(3.0, 0.0, -5.0), Vec3::Z, 0.0);
        let mut rng = StdRng::seed_from_u64(4);
        assert!(medium.hit(&ray, any_t(), &mut rng).is_none());
    }

    #[test]
    fn test_origin_inside_medium() {
        let medium = fog(1e6);
        let ray = Ray::new(Vec3::ZERO, Vec3::X, 0.0);

        // The entry crossing is behind the origin and gets clamped to the interval start
        let mut rng = StdRng::seed_from_u64(5);
        let rec = medium.hit(&ray, any_t(), &mut rng).unwrap();
        assert!(rec.t >= 0.001 && rec.t < 0.01);
    }

    #[test]
    fn test_scatter_distance_follows_the_callers_stream() {
        let medium = fog(0.5);
        let ray = Ray::new(Vec3::new(0.1, 0.0, -5.0), Vec3::Z, 0.0);

        let distances = |seed: u64| -> Vec<Option<f32>> {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..64)
                .map(|_| medium.hit(&ray, any_t(), &mut rng).map(|rec| rec.t))
                .collect()
        };

        assert_eq!(distances(21), distances(21));
        assert_ne!(distances(21), distances(22));
    }
}
