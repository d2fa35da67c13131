//! Sphere primitives for ray tracing.

use crate::hittable::{HitRecord, Hittable, UNIFORM_SPHERE_PDF};
use crate::sampling::{random_to_sphere, random_unit_vector};
use crate::Material;
use lux_math::{Aabb, Interval, Onb, Ray, Vec3};
use rand::RngCore;
use std::f32::consts::PI;
use std::sync::Arc;

/// Nearest root of |O + tD - C|^2 = r^2 strictly inside `ray_t`.
///
/// Returns the hit parameter and the outward unit normal.
fn intersect(center: Vec3, radius: f32, ray: &Ray, ray_t: Interval) -> Option<(f32, Vec3)> {
    let oc = center - ray.origin();
    let a = ray.direction().length_squared();
    let h = ray.direction().dot(oc);
    let c = oc.length_squared() - radius * radius;

    let discriminant = h * h - a * c;
    if discriminant < 0.0 || a == 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();

    // Find the nearest root in the acceptable range
    let mut root = (h - sqrtd) / a;
    if !ray_t.surrounds(root) {
        root = (h + sqrtd) / a;
        if !ray_t.surrounds(root) {
            return None;
        }
    }

    let outward_normal = (ray.at(root) - center) / radius;
    Some((root, outward_normal))
}

/// UV coordinates for a point on the unit sphere.
///
/// theta is the angle up from -Y, phi the angle around Y from -X.
pub fn sphere_uv(p: Vec3) -> (f32, f32) {
    let theta = (-p.y).clamp(-1.0, 1.0).acos();
    let phi = (-p.z).atan2(p.x) + PI;

    (phi / (2.0 * PI), theta / PI)
}

/// A static sphere.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<Material>,
    bbox: Aabb,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, material: Arc<Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            material,
            bbox,
        }
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval, _rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        let (t, outward_normal) = intersect(self.center, self.radius, ray, ray_t)?;
        Some(HitRecord::new(
            ray,
            t,
            outward_normal,
            sphere_uv(outward_normal),
            &self.material,
        ))
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        Some(self.bbox)
    }

    /// Uniform density over the cone of directions that see the sphere.
    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        let toward = Ray::new(origin, direction, 0.0);
        let ray_t = Interval::new(0.001, f32::INFINITY);
        if intersect(self.center, self.radius, &toward, ray_t).is_none() {
            return 0.0;
        }

        let distance_squared = (self.center - origin).length_squared();
        let radius_squared = self.radius * self.radius;
        if distance_squared <= radius_squared {
            return UNIFORM_SPHERE_PDF;
        }

        let cos_theta_max = (1.0 - radius_squared / distance_squared).sqrt();
        let solid_angle = 2.0 * PI * (1.0 - cos_theta_max);
        if solid_angle <= 0.0 {
            return 0.0;
        }
        1.0 / solid_angle
    }

    fn random_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let direction = self.center - origin;
        let distance_squared = direction.length_squared();
        if distance_squared <= self.radius * self.radius {
            return random_unit_vector(rng);
        }
        let uvw = Onb::from_w(direction);
        uvw.local(random_to_sphere(self.radius, distance_squared, rng))
    }
}

/// A sphere whose center moves linearly from `center0` at `time0` to
/// `center1` at `time1`.
pub struct MovingSphere {
    center0: Vec3,
    center1: Vec3,
    time0: f32,
    time1: f32,
    radius: f32,
    material: Arc<Material>,
}

impl MovingSphere {
    pub fn new(
        center0: Vec3,
        center1: Vec3,
        time0: f32,
        time1: f32,
        radius: f32,
        material: Arc<Material>,
    ) -> Self {
        Self {
            center0,
            center1,
            time0,
            time1,
            radius: radius.max(0.0),
            material,
        }
    }

    /// Center at the given time.
    pub fn center(&self, time: f32) -> Vec3 {
        let span = self.time1 - self.time0;
        if span == 0.0 {
            return self.center0;
        }
        self.center0 + ((time - self.time0) / span) * (self.center1 - self.center0)
    }
}

impl Hittable for MovingSphere {
    fn hit(&self, ray: &Ray, ray_t: Interval, _rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        let center = self.center(ray.time());
        let (t, outward_normal) = intersect(center, self.radius, ray, ray_t)?;
        Some(HitRecord::new(
            ray,
            t,
            outward_normal,
            sphere_uv(outward_normal),
            &self.material,
        ))
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        let rvec = Vec3::splat(self.radius);
        let (c0, c1) = (self.center(time0), self.center(time1));
        let box0 = Aabb::from_points(c0 - rvec, c0 + rvec);
        let box1 = Aabb::from_points(c1 - rvec, c1 + rvec);
        Some(Aabb::surrounding(&box0, &box1))
    }
}
