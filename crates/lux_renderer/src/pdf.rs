//! Direction distributions for importance sampling.
//!
//! Every variant's `generate` draws from exactly the density its `value`
//! reports; the integrator divides by that density.

use crate::hittable::{Hittable, UNIFORM_SPHERE_PDF};
use crate::sampling::{gen_f32, random_cosine_direction, random_unit_vector};
use lux_math::{Onb, Vec3};
use rand::RngCore;
use std::f32::consts::PI;

/// A probability density over directions.
pub enum Pdf<'a> {
    /// Uniform over the whole sphere.
    Sphere,
    Cosine(CosinePdf),
    Hittable(HittablePdf<'a>),
    Mixture(MixturePdf<'a>),
}

impl<'a> Pdf<'a> {
    /// Density (per unit solid angle) of generating `direction`.
    pub fn value(&self, direction: Vec3) -> f32 {
        match self {
            Pdf::Sphere => UNIFORM_SPHERE_PDF,
            Pdf::Cosine(pdf) => pdf.value(direction),
            Pdf::Hittable(pdf) => pdf.value(direction),
            Pdf::Mixture(pdf) => pdf.value(direction),
        }
    }

    pub fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        match self {
            Pdf::Sphere => random_unit_vector(rng),
            Pdf::Cosine(pdf) => pdf.generate(rng),
            Pdf::Hittable(pdf) => pdf.generate(rng),
            Pdf::Mixture(pdf) => pdf.generate(rng),
        }
    }
}

/// Cosine-weighted hemisphere around a normal.
#[derive(Debug, Clone, Copy)]
pub struct CosinePdf {
    uvw: Onb,
}

impl CosinePdf {
    pub fn new(w: Vec3) -> Self {
        Self {
            uvw: Onb::from_w(w),
        }
    }

    fn value(&self, direction: Vec3) -> f32 {
        let cosine = direction.normalize().dot(self.uvw.w);
        cosine.max(0.0) / PI
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        self.uvw.local(random_cosine_direction(rng))
    }
}

impl From<CosinePdf> for Pdf<'_> {
    fn from(pdf: CosinePdf) -> Self {
        Pdf::Cosine(pdf)
    }
}

/// Directions from `origin` toward a target shape, weighted by the shape's
/// own sampler. With no target it is uniform over the sphere.
#[derive(Clone, Copy)]
pub struct HittablePdf<'a> {
    target: Option<&'a dyn Hittable>,
    origin: Vec3,
}

impl<'a> HittablePdf<'a> {
    pub fn new(target: Option<&'a dyn Hittable>, origin: Vec3) -> Self {
        Self { target, origin }
    }

    fn value(&self, direction: Vec3) -> f32 {
        match self.target {
            Some(target) => target.pdf_value(self.origin, direction),
            None => UNIFORM_SPHERE_PDF,
        }
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        match self.target {
            Some(target) => target.random_direction(self.origin, rng),
            None => random_unit_vector(rng),
        }
    }
}

impl<'a> From<HittablePdf<'a>> for Pdf<'a> {
    fn from(pdf: HittablePdf<'a>) -> Self {
        Pdf::Hittable(pdf)
    }
}

/// Equal-weight mixture of two densities.
pub struct MixturePdf<'a> {
    first: Box<Pdf<'a>>,
    second: Box<Pdf<'a>>,
}

impl<'a> MixturePdf<'a> {
    pub fn new(first: impl Into<Pdf<'a>>, second: impl Into<Pdf<'a>>) -> Self {
        Self {
            first: Box::new(first.into()),
            second: Box::new(second.into()),
        }
    }

    fn value(&self, direction: Vec3) -> f32 {
        0.5 * (self.first.value(direction) + self.second.value(direction))
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        if gen_f32(rng) < 0.5 {
            self.first.generate(rng)
        } else {
            self.second.generate(rng)
        }
    }
}

impl<'a> From<MixturePdf<'a>> for Pdf<'a> {
    fn from(pdf: MixturePdf<'a>) -> Self {
        Pdf::Mixture(pdf)
    }
}
