//! Lux Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer for physically-based rendering: analytic
//! shapes under a BVH, textured materials, and a radiance estimator that
//! mixes light sampling with material sampling.

mod aarect;
mod bucket;
mod bvh;
mod camera;
mod cuboid;
mod error;
mod hittable;
mod instance;
mod material;
mod medium;
mod object;
mod pdf;
mod perlin;
mod renderer;
mod sampling;
mod scene;
mod sphere;
mod texture;

pub use aarect::{AaRect, Plane};
pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::BvhNode;
pub use camera::Camera;
pub use cuboid::Cuboid;
pub use error::{SceneError, SceneResult, TextureError};
pub use hittable::{HitRecord, Hittable, HittableList, UNIFORM_SPHERE_PDF};
pub use instance::{FlipFace, Rotate, Translate};
pub use material::{
    reflect, refract, Color, Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal,
    ScatterKind, ScatterRecord,
};
pub use medium::ConstantMedium;
pub use object::Object;
pub use pdf::{CosinePdf, HittablePdf, MixturePdf, Pdf};
pub use perlin::Perlin;
pub use renderer::{
    color_to_rgb, linear_to_gamma, radiance, render, render_pixel, ImageBuffer, RenderConfig,
    RenderContext, PDF_EPSILON, RAY_T_MIN,
};
pub use sampling::{
    gen_f32, gen_range_f32, random_cosine_direction, random_in_unit_disk, random_in_unit_sphere,
    random_to_sphere, random_unit_vector,
};
pub use scene::Scene;
pub use sphere::{sphere_uv, MovingSphere, Sphere};
pub use texture::{CheckerTexture, ImageTexture, NoiseTexture, Texture};

/// Re-export Vec3 and common math types from lux_math
pub use lux_math::{Aabb, Axis, Interval, Ray, Vec3};
