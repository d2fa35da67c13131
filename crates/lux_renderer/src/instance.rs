//! Transform wrappers that reuse a child object in a different frame.
//!
//! None of these re-implement intersection: the incoming ray is moved into
//! the child's local space, the child is queried, and the hit is moved back.

use crate::hittable::{HitRecord, Hittable};
use crate::Object;
use lux_math::{Aabb, Axis, Interval, Mat3, Mat3Ext, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// A child object displaced by a fixed offset.
pub struct Translate {
    object: Arc<Object>,
    offset: Vec3,
}

impl Translate {
    pub fn new(object: impl Into<Arc<Object>>, offset: Vec3) -> Self {
        Self {
            object: object.into(),
            offset,
        }
    }
}

impl Hittable for Translate {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        let local_ray = ray.with_origin(ray.origin() - self.offset);
        let mut rec = self.object.hit(&local_ray, ray_t, rng)?;
        rec.p += self.offset;
        Some(rec)
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.object
            .bounding_box(time0, time1)
            .map(|bbox| bbox.translate(self.offset))
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.object.pdf_value(origin - self.offset, direction)
    }

    fn random_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.object.random_direction(origin - self.offset, rng)
    }
}

/// A child object rotated about a principal axis through the origin.
pub struct Rotate {
    object: Arc<Object>,
    /// Local to world
    rotation: Mat3,
    /// World to local
    inverse: Mat3,
}

impl Rotate {
    pub fn new(object: impl Into<Arc<Object>>, axis: Axis, degrees: f32) -> Self {
        let rotation = Mat3::from_axis_rotation(axis, degrees);
        Self {
            object: object.into(),
            rotation,
            inverse: rotation.transpose(),
        }
    }

    pub fn y(object: impl Into<Arc<Object>>, degrees: f32) -> Self {
        Self::new(object, Axis::Y, degrees)
    }
}

impl Hittable for Rotate {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        // Rotation is linear, so t is the same in both frames
        let local_ray = Ray::new(
            self.inverse * ray.origin(),
            self.inverse * ray.direction(),
            ray.time(),
        );

        let mut rec = self.object.hit(&local_ray, ray_t, rng)?;
        rec.p = self.rotation * rec.p;
        rec.normal = self.rotation * rec.normal;
        Some(rec)
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.object
            .bounding_box(time0, time1)
            .map(|bbox| self.rotation.transform_aabb(&bbox))
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.object
            .pdf_value(self.inverse * origin, self.inverse * direction)
    }

    fn random_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.rotation * self.object.random_direction(self.inverse * origin, rng)
    }
}

/// Reports the child's hits with front and back faces swapped.
///
/// Used to turn a one-sided emitter toward the other side.
pub struct FlipFace {
    object: Arc<Object>,
}

impl FlipFace {
    pub fn new(object: impl Into<Arc<Object>>) -> Self {
        Self {
            object: object.into(),
        }
    }
}

impl Hittable for FlipFace {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        let mut rec = self.object.hit(ray, ray_t, rng)?;
        rec.front_face = !rec.front_face;
        Some(rec)
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.object.bounding_box(time0, time1)
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.object.pdf_value(origin, direction)
    }

    fn random_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.object.random_direction(origin, rng)
    }
}
