//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive radiance estimation with a fixed depth cutoff
//! - Multiple importance sampling of lights and materials
//! - Bucketed parallel rendering with per-bucket random streams
//! - Gamma correction on output

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::hittable::Hittable;
use crate::material::ScatterKind;
use crate::pdf::{HittablePdf, MixturePdf, Pdf};
use crate::sampling::gen_f32;
use crate::{Camera, Color};
use lux_math::{Interval, Ray};
use rand::RngCore;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Hits closer than this are ignored, so a scattered ray does not
/// re-intersect the surface it left.
pub const RAY_T_MIN: f32 = 0.001;

/// Mixture densities at or below this contribute nothing.
pub const PDF_EPSILON: f32 = 1e-8;

/// Sampled directions shorter than this are replaced by the surface normal.
const DEGENERATE_DIRECTION: f32 = 1e-16;

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output width in pixels
    pub image_width: u32,
    /// Width over height
    pub aspect_ratio: f32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Radiance of rays that escape the scene
    pub background: Color,
    /// Edge length of a render bucket in pixels
    pub bucket_size: u32,
    /// Base seed of every bucket's random stream
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            image_width: 600,
            aspect_ratio: 1.0,
            samples_per_pixel: 100,
            max_depth: 50,
            background: Color::ZERO,
            bucket_size: DEFAULT_BUCKET_SIZE,
            seed: 0,
        }
    }
}

impl RenderConfig {
    /// Height derived from width and aspect ratio, at least one pixel.
    pub fn image_height(&self) -> u32 {
        ((self.image_width as f32 / self.aspect_ratio) as u32).max(1)
    }
}

/// Everything a render worker reads. Shared immutably across threads.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub world: &'a dyn Hittable,
    /// Shapes sampled directly for importance; `None` samples uniformly.
    pub lights: Option<&'a dyn Hittable>,
    pub camera: &'a Camera,
    pub config: &'a RenderConfig,
}

/// Compute the radiance carried back along a ray.
///
/// This is the core path tracing function. Diffuse bounces draw from an
/// equal mixture of the light sampler and the material's own density and
/// weight the result by the ratio of the two.
pub fn radiance(
    ray: &Ray,
    background: Color,
    world: &dyn Hittable,
    lights: Option<&dyn Hittable>,
    depth: u32,
    rng: &mut dyn RngCore,
) -> Color {
    // If we've exceeded max depth, return black (no light)
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(RAY_T_MIN, f32::INFINITY), rng) else {
        return background;
    };

    let emitted = rec.material.emitted(ray, &rec);

    let Some(scatter) = rec.material.scatter(ray, &rec, rng) else {
        return emitted;
    };

    let material_pdf = match scatter.kind {
        ScatterKind::Specular(specular) => {
            return scatter.attenuation
                * radiance(&specular, background, world, lights, depth - 1, rng);
        }
        ScatterKind::Sampled(pdf) => pdf,
    };

    let mixture = Pdf::from(MixturePdf::new(HittablePdf::new(lights, rec.p), material_pdf));

    let mut direction = mixture.generate(rng);
    if direction.length_squared() < DEGENERATE_DIRECTION {
        direction = rec.normal;
    }
    let scattered = Ray::new(rec.p, direction, ray.time());

    let pdf_value = mixture.value(direction);
    if pdf_value.is_nan() || pdf_value <= PDF_EPSILON {
        return emitted;
    }

    let scattering_pdf = rec.material.scattering_pdf(ray, &rec, &scattered);
    let incoming = radiance(&scattered, background, world, lights, depth - 1, rng);

    emitted + scatter.attenuation * scattering_pdf * incoming / pdf_value
}

/// Sum of `samples_per_pixel` radiance estimates for pixel `(x, row)`.
///
/// `row` counts from the top of the image. The sum is not normalised.
pub fn render_pixel(ctx: &RenderContext<'_>, x: u32, row: u32, rng: &mut dyn RngCore) -> Color {
    let config = ctx.config;
    let width = config.image_width;
    let height = config.image_height();
    let u_span = width.saturating_sub(1).max(1) as f32;
    let v_span = height.saturating_sub(1).max(1) as f32;
    let flipped_row = height.saturating_sub(1).saturating_sub(row);

    let mut sum = Color::ZERO;
    for _ in 0..config.samples_per_pixel {
        let u = (x as f32 + gen_f32(rng)) / u_span;
        let v = (flipped_row as f32 + gen_f32(rng)) / v_span;
        let ray = ctx.camera.get_ray(u, v, rng);
        sum += radiance(
            &ray,
            config.background,
            ctx.world,
            ctx.lights,
            config.max_depth,
            rng,
        );
    }
    sum
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a sample sum to 8-bit RGB.
///
/// Divides by the sample count, zeroes NaN channels, gamma corrects and
/// scales `[0, 0.999]` onto `0..=255`.
pub fn color_to_rgb(sum: Color, samples_per_pixel: u32) -> [u8; 3] {
    let scale = 1.0 / samples_per_pixel.max(1) as f32;
    let channel = |c: f32| {
        let c = if c.is_nan() { 0.0 } else { c * scale };
        (256.0 * linear_to_gamma(c).clamp(0.0, 0.999)) as u8
    };
    [channel(sum.x), channel(sum.y), channel(sum.z)]
}

/// Accumulation buffer of unnormalised sample sums.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub samples_per_pixel: u32,
    /// Row-major, top row first
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32, samples_per_pixel: u32) -> Self {
        Self {
            width,
            height,
            samples_per_pixel,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the accumulated sum at (x, row).
    pub fn get(&self, x: u32, row: u32) -> Color {
        self.pixels[(row * self.width + x) as usize]
    }

    /// Add a sample's color to cell (x, row).
    pub fn add_sample(&mut self, x: u32, row: u32, color: Color) {
        self.pixels[(row * self.width + x) as usize] += color;
    }

    /// Add every pixel of a rendered bucket.
    pub fn add_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (i, color) in result.pixels.iter().enumerate() {
            let i = i as u32;
            self.add_sample(bucket.x + i % bucket.width, bucket.y + i / bucket.width, *color);
        }
    }

    /// Convert to packed 8-bit RGB, top row first.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|sum| color_to_rgb(*sum, self.samples_per_pixel))
            .collect()
    }
}

/// Render the whole image in parallel buckets.
///
/// `on_bucket` is called from worker threads as each bucket finishes.
pub fn render<F>(ctx: &RenderContext<'_>, on_bucket: F) -> ImageBuffer
where
    F: Fn(&BucketResult) + Sync,
{
    let config = ctx.config;
    let (width, height) = (config.image_width, config.image_height());
    let buckets = generate_buckets(width, height, config.bucket_size);

    log::info!(
        "Rendering {}x{} at {} spp, depth {}, {} buckets on {} threads",
        width,
        height,
        config.samples_per_pixel,
        config.max_depth,
        buckets.len(),
        rayon::current_num_threads()
    );
    let start = Instant::now();

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let result = render_bucket(bucket, ctx);
            on_bucket(&result);
            result
        })
        .collect();

    let mut image = ImageBuffer::new(width, height, config.samples_per_pixel);
    for result in &results {
        image.add_bucket(result);
    }

    log::info!("Render finished in {:.2}s", start.elapsed().as_secs_f64());
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hittable::HitRecord;
    use crate::pdf::CosinePdf;
    use crate::{
        AaRect, BvhNode, ConstantMedium, DiffuseLight, FlipFace, HittableList, Lambertian,
        Material, Object, Sphere,
    };
    use lux_math::{Aabb, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-1.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 0.0001);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_color_to_rgb() {
        assert_eq!(color_to_rgb(Color::ZERO, 10), [0, 0, 0]);
        // Over-bright sums clamp just below 256
        assert_eq!(color_to_rgb(Color::splat(40.0), 10), [255, 255, 255]);
        // 10 samples of 0.25 average to 0.25, gamma 0.5
        assert_eq!(color_to_rgb(Color::splat(2.5), 10), [128, 128, 128]);
        assert_eq!(color_to_rgb(Color::new(f32::NAN, 10.0, -3.0), 10), [0, 255, 0]);
    }

    #[test]
    fn test_image_buffer_accumulates() {
        let mut image = ImageBuffer::new(4, 2, 2);
        image.add_sample(3, 1, Color::splat(0.5));
        image.add_sample(3, 1, Color::splat(0.5));

        assert_eq!(image.get(3, 1), Color::ONE);
        let rgb = image.to_rgb8();
        assert_eq!(rgb.len(), 4 * 2 * 3);
        assert_eq!(&rgb[rgb.len() - 3..], &[181, 181, 181]);
    }

    #[test]
    fn test_config_height_and_defaults_from_json() {
        let config: RenderConfig =
            serde_json::from_str(r#"{ "image_width": 400, "aspect_ratio": 2.0 }"#).unwrap();
        assert_eq!(config.image_height(), 200);
        assert_eq!(config.samples_per_pixel, RenderConfig::default().samples_per_pixel);
        assert_eq!(config.bucket_size, DEFAULT_BUCKET_SIZE);
    }

    #[test]
    fn test_empty_scene_returns_background() {
        let world = HittableList::new();
        let background = Color::new(0.7, 0.8, 1.0);
        let mut rng = StdRng::seed_from_u64(1);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.3, -0.2, 1.0), 0.0);

        for depth in 1..5 {
            assert_eq!(radiance(&ray, background, &world, None, depth, &mut rng), background);
        }
        assert_eq!(radiance(&ray, background, &world, None, 0, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_light_seen_directly() {
        let light: Arc<Material> = Arc::new(DiffuseLight::new(Color::splat(15.0)).into());
        let world = Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, light);
        let mut rng = StdRng::seed_from_u64(2);

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z, 0.0);
        let color = radiance(&ray, Color::ZERO, &world, None, 10, &mut rng);
        assert_eq!(color, Color::splat(15.0));
    }

    #[test]
    fn test_diffuse_under_light_is_lit() {
        // A white floor under a downward-facing rectangular light
        let white: Arc<Material> = Arc::new(Lambertian::new(Color::splat(0.73)).into());
        let glow: Arc<Material> = Arc::new(DiffuseLight::new(Color::splat(15.0)).into());
        let light = Arc::new(Object::from(FlipFace::new(AaRect::xz(
            -1.0, 1.0, -1.0, 1.0, 2.0, glow,
        ))));

        let mut world = HittableList::new();
        world.add(AaRect::xz(-10.0, 10.0, -10.0, 10.0, 0.0, white));
        world.add_shared(light.clone());

        let mut rng = StdRng::seed_from_u64(3);
        let ray = Ray::new(Vec3::new(0.0, 1.0, -1.0), Vec3::new(0.0, -1.0, 1.0), 0.0);

        let n = 2000;
        let lit = (0..n)
            .map(|_| radiance(&ray, Color::ZERO, &world, Some(&*light as &dyn Hittable), 5, &mut rng))
            .fold(Color::ZERO, |acc, c| acc + c)
            / n as f32;
        assert!(lit.x > 0.5, "mean = {lit}");
        assert!(lit.is_finite());
    }

    #[test]
    fn test_render_pixel_hits_sphere() {
        let grey: Arc<Material> = Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5)).into());
        let sphere = Arc::new(Object::from(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey)));
        let mut rng = StdRng::seed_from_u64(42);
        let world = BvhNode::new(vec![sphere], 0.0, 1.0, &mut rng).unwrap();

        let camera = Camera::new().with_aspect_ratio(1.0);
        let config = RenderConfig {
            image_width: 11,
            aspect_ratio: 1.0,
            samples_per_pixel: 4,
            max_depth: 5,
            background: Color::new(0.5, 0.7, 1.0),
            ..RenderConfig::default()
        };
        let ctx = RenderContext {
            world: &world,
            lights: None,
            camera: &camera,
            config: &config,
        };

        // The center pixel sees the sphere, which absorbs half of the sky
        let sum = render_pixel(&ctx, 5, 5, &mut rng);
        let mean = sum / config.samples_per_pixel as f32;
        assert!(mean.length() > 0.0);
        assert!(mean.z < config.background.z);
    }

    #[test]
    fn test_render_is_deterministic() {
        let grey: Arc<Material> = Arc::new(Lambertian::new(Color::splat(0.5)).into());
        let world = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey);
        let camera = Camera::new().with_aspect_ratio(1.0);
        let config = RenderConfig {
            image_width: 16,
            aspect_ratio: 1.0,
            samples_per_pixel: 2,
            max_depth: 4,
            background: Color::ONE,
            bucket_size: 8,
            seed: 9,
        };
        let ctx = RenderContext {
            world: &world,
            lights: None,
            camera: &camera,
            config: &config,
        };

        let finished = std::sync::atomic::AtomicUsize::new(0);
        let first = render(&ctx, |_| {
            finished.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        });
        let second = render(&ctx, |_| {});

        assert_eq!(finished.into_inner(), 4);
        assert_eq!(first.to_rgb8(), second.to_rgb8());
        assert_eq!(first.pixels.len(), 16 * 16);
    }

    #[test]
    fn test_render_with_medium_is_deterministic() {
        let boundary = Object::from(Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Arc::new(Lambertian::new(Color::ONE).into()),
        ));
        let world = ConstantMedium::new(boundary, 0.8, Color::splat(0.9));
        let camera = Camera::new().with_aspect_ratio(1.0);
        let config = RenderConfig {
            image_width: 16,
            aspect_ratio: 1.0,
            samples_per_pixel: 2,
            max_depth: 8,
            background: Color::ONE,
            bucket_size: 8,
            seed: 9,
        };
        let ctx = RenderContext {
            world: &world,
            lights: None,
            camera: &camera,
            config: &config,
        };

        let first = render(&ctx, |_| {});
        let second = render(&ctx, |_| {});

        assert_eq!(first.pixels, second.pixels);
        // The fog dims some of the sky
        assert!(first.pixels.iter().any(|c| *c != Color::splat(2.0)));
    }

    /// Light sampler that always proposes `direction` and gives it no density.
    struct DeadLight {
        direction: Vec3,
    }

    impl Hittable for DeadLight {
        fn hit(
            &self,
            _ray: &Ray,
            _ray_t: Interval,
            _rng: &mut dyn RngCore,
        ) -> Option<HitRecord<'_>> {
            None
        }

        fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
            None
        }

        fn pdf_value(&self, _origin: Vec3, _direction: Vec3) -> f32 {
            0.0
        }

        fn random_direction(&self, _origin: Vec3, _rng: &mut dyn RngCore) -> Vec3 {
            self.direction
        }
    }

    /// Grey floor at y = 0 under a white sky, seen from straight above.
    fn floor_samples(light: &DeadLight, n: usize) -> Vec<Color> {
        let grey: Arc<Material> = Arc::new(Lambertian::new(Color::splat(0.5)).into());
        let world = AaRect::xz(-10.0, 10.0, -10.0, 10.0, 0.0, grey);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), -Vec3::Y, 0.0);
        let mut rng = StdRng::seed_from_u64(12);

        (0..n)
            .map(|_| radiance(&ray, Color::ONE, &world, Some(light as &dyn Hittable), 3, &mut rng))
            .collect()
    }

    #[test]
    fn test_zero_density_direction_returns_emitted() {
        let light = DeadLight {
            direction: -Vec3::Y,
        };

        // Pointing into the floor, neither half of the mixture has any density
        let mixture = Pdf::from(MixturePdf::new(
            HittablePdf::new(Some(&light as &dyn Hittable), Vec3::ZERO),
            CosinePdf::new(Vec3::Y),
        ));
        assert_eq!(mixture.value(-Vec3::Y), 0.0);

        let n = 2000;
        let samples = floor_samples(&light, n);
        assert!(samples.iter().all(|c| c.is_finite()));

        // Light picks stop at the floor's emission, material picks see the sky
        let dark = samples.iter().filter(|c| **c == Color::ZERO).count();
        assert!(dark > n * 2 / 5 && dark < n * 3 / 5, "{dark} of {n} dark");
        for c in samples.iter().filter(|c| **c != Color::ZERO) {
            assert!((*c - Color::ONE).abs().max_element() < 1e-2, "sample = {c}");
        }
    }

    #[test]
    fn test_zero_length_direction_falls_back_to_normal() {
        let light = DeadLight {
            direction: Vec3::ZERO,
        };

        // Every estimate is attenuation * (cos / pi) / (0.5 * cos / pi) = 1
        for c in floor_samples(&light, 2000) {
            assert!(c.is_finite());
            assert!((c - Color::ONE).abs().max_element() < 1e-2, "sample = {c}");
        }
    }
}
