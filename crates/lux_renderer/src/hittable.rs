//! Hittable trait and HitRecord for ray-object intersection.

use crate::sampling::{gen_f32, random_unit_vector};
use crate::{Material, Object};
use lux_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;
use std::f32::consts::PI;
use std::sync::Arc;

/// Density of the uniform direction distribution over the whole sphere.
pub const UNIFORM_SPHERE_PDF: f32 = 1.0 / (4.0 * PI);

/// Record of a ray-object intersection.
#[derive(Clone)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at intersection (always points against the ray)
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a Material,
    /// Surface coordinates in [0, 1]
    pub u: f32,
    pub v: f32,
    /// Ray parameter of the intersection
    pub t: f32,
    /// Whether the geometric (outward) normal already faced the ray
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Build a record for a hit at parameter `t` with the given outward normal.
    pub fn new(
        ray: &Ray,
        t: f32,
        outward_normal: Vec3,
        (u, v): (f32, f32),
        material: &'a Material,
    ) -> Self {
        let mut rec = Self {
            p: ray.at(t),
            normal: outward_normal,
            material,
            u,
            v,
            t,
            front_face: true,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction().dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Capability interface of everything a ray can hit.
pub trait Hittable: Send + Sync {
    /// Closest intersection with a ray parameter strictly inside `ray_t`.
    ///
    /// `rng` is the caller's sample stream; volumes draw their scattering
    /// distance from it so a seeded render stays reproducible.
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'_>>;

    /// Box enclosing every point the object can report over `[time0, time1]`.
    ///
    /// Only an empty aggregate has no box.
    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb>;

    /// Solid-angle density of `random_direction` toward this object from `origin`.
    ///
    /// Objects without a light sampler report zero.
    fn pdf_value(&self, _origin: Vec3, _direction: Vec3) -> f32 {
        0.0
    }

    /// Direction from `origin` toward a random point of this object.
    fn random_direction(&self, _origin: Vec3, _rng: &mut dyn RngCore) -> Vec3 {
        Vec3::X
    }
}

/// A list of hittable objects.
#[derive(Default)]
pub struct HittableList {
    objects: Vec<Arc<Object>>,
}

impl HittableList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_objects(objects: Vec<Arc<Object>>) -> Self {
        Self { objects }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: impl Into<Object>) {
        self.objects.push(Arc::new(object.into()));
    }

    /// Add an object that is also referenced elsewhere (e.g. a registered light).
    pub fn add_shared(&mut self, object: Arc<Object>) {
        self.objects.push(object);
    }

    pub fn objects(&self) -> &[Arc<Object>] {
        &self.objects
    }

    pub fn into_objects(self) -> Vec<Arc<Object>> {
        self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        let mut closest: Option<HitRecord<'_>> = None;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if let Some(rec) = object.hit(ray, Interval::new(ray_t.min, closest_so_far), rng) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        let (first, rest) = self.objects.split_first()?;
        rest.iter().try_fold(first.bounding_box(time0, time1)?, |acc, object| {
            Some(Aabb::surrounding(&acc, &object.bounding_box(time0, time1)?))
        })
    }

    /// Average of the members' densities; an empty list is uniform.
    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        if self.objects.is_empty() {
            return UNIFORM_SPHERE_PDF;
        }
        let weight = 1.0 / self.objects.len() as f32;
        self.objects
            .iter()
            .map(|object| weight * object.pdf_value(origin, direction))
            .sum()
    }

    fn random_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        if self.objects.is_empty() {
            return random_unit_vector(rng);
        }
        let n = self.objects.len();
        let index = ((gen_f32(rng) * n as f32) as usize).min(n - 1);
        self.objects[index].random_direction(origin, rng)
    }
}
