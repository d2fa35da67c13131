//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over scene objects. Each node owns exactly two children and
//! caches the box enclosing both, so a ray that misses the box skips the
//! whole subtree.

use crate::error::{SceneError, SceneResult};
use crate::hittable::{HitRecord, Hittable};
use crate::Object;
use lux_math::{Aabb, Axis, Interval, Ray};
use rand::{Rng, RngCore};
use std::sync::Arc;

/// Internal node of the hierarchy.
///
/// Children are either scene objects or further `BvhNode`s (wrapped in
/// [`Object::Bvh`]). A single-object tree stores that object on both sides.
pub struct BvhNode {
    left: Arc<Object>,
    right: Arc<Object>,
    bbox: Aabb,
}

impl BvhNode {
    /// Build a hierarchy over `objects` whose boxes cover `[time0, time1]`.
    ///
    /// Fails on an empty list or on any member without a bounding box.
    pub fn new(
        objects: Vec<Arc<Object>>,
        time0: f32,
        time1: f32,
        rng: &mut dyn RngCore,
    ) -> SceneResult<Self> {
        if objects.is_empty() {
            return Err(SceneError::EmptyObjectList);
        }

        let count = objects.len();
        let mut entries = objects
            .into_iter()
            .map(|object| {
                object
                    .bounding_box(time0, time1)
                    .map(|bbox| (bbox, object.clone()))
                    .ok_or(SceneError::MissingBoundingBox)
            })
            .collect::<SceneResult<Vec<_>>>()?;

        let node = Self::build(&mut entries, rng);
        log::info!(
            "Built BVH over {} objects, bounds {:?}..{:?}",
            count,
            node.bbox.min(),
            node.bbox.max()
        );
        Ok(node)
    }

    /// Recursive construction.
    ///
    /// Sorts by box minimum along a random axis and splits at the midpoint.
    fn build(entries: &mut [(Aabb, Arc<Object>)], rng: &mut dyn RngCore) -> Self {
        let bbox = entries[1..]
            .iter()
            .fold(entries[0].0, |acc, (bbox, _)| Aabb::surrounding(&acc, bbox));
        let axis = Axis::from_index(rng.gen_range(0..3));

        let (left, right) = match entries.len() {
            1 => (entries[0].1.clone(), entries[0].1.clone()),
            2 => {
                let (a, b) = (&entries[0], &entries[1]);
                if box_min(&a.0, axis) <= box_min(&b.0, axis) {
                    (a.1.clone(), b.1.clone())
                } else {
                    (b.1.clone(), a.1.clone())
                }
            }
            _ => {
                entries.sort_by(|a, b| box_min(&a.0, axis).total_cmp(&box_min(&b.0, axis)));
                let mid = entries.len() / 2;
                let (lower, upper) = entries.split_at_mut(mid);
                (
                    Arc::new(Object::from(Self::build(lower, rng))),
                    Arc::new(Object::from(Self::build(upper, rng))),
                )
            }
        };

        Self { left, right, bbox }
    }

    pub fn left(&self) -> &Object {
        &self.left
    }

    pub fn right(&self) -> &Object {
        &self.right
    }
}

#[inline]
fn box_min(bbox: &Aabb, axis: Axis) -> f32 {
    bbox.axis_interval(axis).min
}

impl Hittable for BvhNode {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        if !self.bbox.hit(ray, ray_t) {
            return None;
        }

        let hit_left = self.left.hit(ray, ray_t, rng);

        // Only check right up to closest hit
        let right_max = hit_left.as_ref().map_or(ray_t.max, |rec| rec.t);
        let hit_right = self.right.hit(ray, Interval::new(ray_t.min, right_max), rng);

        hit_right.or(hit_left)
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        Some(self.bbox)
    }
}
