//! The closed set of scene objects.
//!
//! Each variant implements [`Hittable`] on its own; `Object` dispatches by
//! match so wrappers and the BVH can own children without trait objects.

use crate::{
    AaRect, BvhNode, ConstantMedium, Cuboid, FlipFace, HitRecord, Hittable, HittableList,
    MovingSphere, Rotate, Sphere, Translate,
};
use lux_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Any intersectable node of the scene tree.
pub enum Object {
    Sphere(Sphere),
    MovingSphere(MovingSphere),
    Rect(AaRect),
    Cuboid(Cuboid),
    Translate(Translate),
    Rotate(Rotate),
    FlipFace(FlipFace),
    Medium(ConstantMedium),
    Bvh(BvhNode),
    List(HittableList),
}

impl Object {
    fn as_hittable(&self) -> &dyn Hittable {
        match self {
            Object::Sphere(o) => o,
            Object::MovingSphere(o) => o,
            Object::Rect(o) => o,
            Object::Cuboid(o) => o,
            Object::Translate(o) => o,
            Object::Rotate(o) => o,
            Object::FlipFace(o) => o,
            Object::Medium(o) => o,
            Object::Bvh(o) => o,
            Object::List(o) => o,
        }
    }
}

impl Hittable for Object {
    #[inline]
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        self.as_hittable().hit(ray, ray_t, rng)
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.as_hittable().bounding_box(time0, time1)
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.as_hittable().pdf_value(origin, direction)
    }

    fn random_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.as_hittable().random_direction(origin, rng)
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Object {
                fn from(value: $ty) -> Self {
                    Object::$variant(value)
                }
            }

            impl From<$ty> for Arc<Object> {
                fn from(value: $ty) -> Self {
                    Arc::new(Object::$variant(value))
                }
            }
        )*
    };
}

impl_from_variant! {
    Sphere => Sphere,
    MovingSphere => MovingSphere,
    Rect => AaRect,
    Cuboid => Cuboid,
    Translate => Translate,
    Rotate => Rotate,
    FlipFace => FlipFace,
    Medium => ConstantMedium,
    Bvh => BvhNode,
    List => HittableList,
}
