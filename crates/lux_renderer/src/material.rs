//! Surface and volume scattering models.

use crate::hittable::{HitRecord, UNIFORM_SPHERE_PDF};
use crate::pdf::{CosinePdf, Pdf};
use crate::sampling::{gen_f32, random_in_unit_sphere};
use crate::texture::Texture;
use lux_math::{Ray, Vec3};
use rand::RngCore;
use std::f32::consts::PI;

/// Color type alias (linear RGB, unbounded for emitters)
pub type Color = Vec3;

/// How a scattered ray leaves the surface.
pub enum ScatterKind {
    /// A single deterministic outgoing ray; no density is involved.
    Specular(Ray),
    /// Directions are drawn from this density.
    Sampled(Pdf<'static>),
}

/// Outcome of a successful scatter.
pub struct ScatterRecord {
    pub attenuation: Color,
    pub kind: ScatterKind,
}

impl ScatterRecord {
    pub fn specular(attenuation: Color, ray: Ray) -> Self {
        Self {
            attenuation,
            kind: ScatterKind::Specular(ray),
        }
    }

    pub fn sampled(attenuation: Color, pdf: impl Into<Pdf<'static>>) -> Self {
        Self {
            attenuation,
            kind: ScatterKind::Sampled(pdf.into()),
        }
    }

    pub fn is_specular(&self) -> bool {
        matches!(self.kind, ScatterKind::Specular(_))
    }
}

/// Every material a surface or medium can carry.
pub enum Material {
    Lambertian(Lambertian),
    Metal(Metal),
    Dielectric(Dielectric),
    DiffuseLight(DiffuseLight),
    Isotropic(Isotropic),
}

impl Material {
    /// Scatter an incoming ray, or `None` if it is absorbed.
    pub fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord<'_>,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        match self {
            Material::Lambertian(m) => Some(m.scatter(rec)),
            Material::Metal(m) => m.scatter(ray_in, rec, rng),
            Material::Dielectric(m) => Some(m.scatter(ray_in, rec, rng)),
            Material::DiffuseLight(_) => None,
            Material::Isotropic(m) => Some(m.scatter(rec)),
        }
    }

    /// Density of the material's own sampler for `scattered`.
    ///
    /// Only meaningful for non-specular scatters.
    pub fn scattering_pdf(&self, _ray_in: &Ray, rec: &HitRecord<'_>, scattered: &Ray) -> f32 {
        match self {
            Material::Lambertian(_) => {
                let cosine = rec.normal.dot(scattered.direction().normalize());
                cosine.max(0.0) / PI
            }
            Material::Isotropic(_) => UNIFORM_SPHERE_PDF,
            _ => 0.0,
        }
    }

    /// Light emitted toward the incoming ray. Black for non-emitters.
    pub fn emitted(&self, _ray_in: &Ray, rec: &HitRecord<'_>) -> Color {
        match self {
            Material::DiffuseLight(light) => light.emitted(rec),
            _ => Color::ZERO,
        }
    }
}

/// Lambertian (diffuse) material.
pub struct Lambertian {
    albedo: Texture,
}

impl Lambertian {
    pub fn new(albedo: Color) -> Self {
        Self::textured(albedo)
    }

    pub fn textured(albedo: impl Into<Texture>) -> Self {
        Self {
            albedo: albedo.into(),
        }
    }

    fn scatter(&self, rec: &HitRecord<'_>) -> ScatterRecord {
        ScatterRecord::sampled(
            self.albedo.value(rec.u, rec.v, rec.p),
            CosinePdf::new(rec.normal),
        )
    }
}

/// Metal (specular) material.
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord<'_>,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        let reflected = reflect(ray_in.direction().normalize(), rec.normal);
        let direction = reflected + self.fuzz * random_in_unit_sphere(rng);

        // Fuzz pushed the ray below the surface
        if direction.dot(rec.normal) <= 0.0 {
            return None;
        }

        Some(ScatterRecord::specular(
            self.albedo,
            Ray::new(rec.p, direction, ray_in.time()),
        ))
    }
}

/// Dielectric (glass) material.
pub struct Dielectric {
    /// Index of refraction
    ior: f32,
}

impl Dielectric {
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }

    /// Schlick's approximation for reflectance
    fn reflectance(cosine: f32, ior: f32) -> f32 {
        let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }

    fn scatter(&self, ray_in: &Ray, rec: &HitRecord<'_>, rng: &mut dyn RngCore) -> ScatterRecord {
        let refraction_ratio = if rec.front_face {
            1.0 / self.ior
        } else {
            self.ior
        };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        // Check for total internal reflection
        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction = if cannot_refract
            || Self::reflectance(cos_theta, refraction_ratio) > gen_f32(rng)
        {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, refraction_ratio)
        };

        ScatterRecord::specular(Color::ONE, Ray::new(rec.p, direction, ray_in.time()))
    }
}

/// Diffuse area light.
pub struct DiffuseLight {
    emit: Texture,
    two_sided: bool,
}

impl DiffuseLight {
    /// Emits from the front face only.
    pub fn new(emit: impl Into<Texture>) -> Self {
        Self {
            emit: emit.into(),
            two_sided: false,
        }
    }

    pub fn two_sided(emit: impl Into<Texture>) -> Self {
        Self {
            emit: emit.into(),
            two_sided: true,
        }
    }

    fn emitted(&self, rec: &HitRecord<'_>) -> Color {
        if !self.two_sided && !rec.front_face {
            return Color::ZERO;
        }
        self.emit.value(rec.u, rec.v, rec.p)
    }
}

/// Phase function of a participating medium: scatters uniformly in all directions.
pub struct Isotropic {
    albedo: Texture,
}

impl Isotropic {
    pub fn new(albedo: impl Into<Texture>) -> Self {
        Self {
            albedo: albedo.into(),
        }
    }

    fn scatter(&self, rec: &HitRecord<'_>) -> ScatterRecord {
        ScatterRecord::sampled(self.albedo.value(rec.u, rec.v, rec.p), Pdf::Sphere)
    }
}

macro_rules! impl_from_material {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Material {
                fn from(value: $variant) -> Self {
                    Material::$variant(value)
                }
            }
        )*
    };
}

impl_from_material!(Lambertian, Metal, Dielectric, DiffuseLight, Isotropic);

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface with relative index `etai_over_etat`.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}
