//! A fully built scene: the object tree plus the lights used for sampling.

use crate::error::SceneResult;
use crate::hittable::{Hittable, HittableList};
use crate::renderer::{RenderConfig, RenderContext};
use crate::{BvhNode, Camera, Object};
use rand::RngCore;

/// Immutable after construction; shared by every render thread.
pub struct Scene {
    world: Object,
    lights: Option<Object>,
}

impl Scene {
    /// Wrap an already built root. An empty light list counts as no lights.
    pub fn new(world: impl Into<Object>, lights: HittableList) -> Self {
        Self {
            world: world.into(),
            lights: (!lights.is_empty()).then(|| lights.into()),
        }
    }

    /// Build a BVH over `objects` for the shutter interval `[time0, time1]`.
    pub fn from_objects(
        objects: HittableList,
        lights: HittableList,
        time0: f32,
        time1: f32,
        rng: &mut dyn RngCore,
    ) -> SceneResult<Self> {
        log::info!(
            "Building scene: {} top-level objects, {} lights",
            objects.len(),
            lights.len()
        );
        let bvh = BvhNode::new(objects.into_objects(), time0, time1, rng)?;
        Ok(Self::new(bvh, lights))
    }

    pub fn world(&self) -> &Object {
        &self.world
    }

    pub fn lights(&self) -> Option<&dyn Hittable> {
        self.lights.as_ref().map(|lights| lights as &dyn Hittable)
    }

    /// Borrow everything a render needs.
    pub fn context<'a>(&'a self, camera: &'a Camera, config: &'a RenderConfig) -> RenderContext<'a> {
        RenderContext {
            world: &self.world,
            lights: self.lights(),
            camera,
            config,
        }
    }
}
