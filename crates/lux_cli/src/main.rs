//! Lux: render one of the built-in scenes to an image file.

mod output;
mod scenes;

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use lux_renderer::{generate_buckets, render, RenderConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use scenes::Preset;
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(author, version, about = "Monte Carlo path tracer", long_about = None)]
struct Args {
    #[arg(value_enum, default_value_t = Preset::CornellBox, help = "Scene to render")]
    scene: Preset,

    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "render.png",
        help = "Output image; a .ppm extension writes plain-text PPM"
    )]
    output: PathBuf,

    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "JSON render settings layered over the scene's defaults"
    )]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Image width in pixels")]
    width: Option<u32>,

    #[arg(short, long, help = "Samples per pixel")]
    spp: Option<u32>,

    #[arg(short = 'd', long, help = "Maximum ray depth (bounces)")]
    depth: Option<u32>,

    #[arg(long, help = "Seed for scene generation and sampling")]
    seed: Option<u64>,

    #[arg(long, value_name = "PIXELS", help = "Edge length of a render bucket")]
    bucket_size: Option<u32>,

    #[arg(short = 't', long, help = "Worker threads (default: all cores)")]
    threads: Option<usize>,

    #[arg(
        long,
        value_name = "FILE",
        default_value = "assets/earthmap.jpg",
        help = "Image used by the earth and final scenes"
    )]
    earth_texture: PathBuf,
}

impl Args {
    /// Scene defaults, then the config file, then flags.
    fn render_config(&self) -> Result<RenderConfig> {
        let mut config = self.scene.config();

        if let Some(path) = &self.config {
            config = load_config_file(config, path)?;
        }

        if let Some(width) = self.width {
            config.image_width = width;
        }
        if let Some(spp) = self.spp {
            config.samples_per_pixel = spp;
        }
        if let Some(depth) = self.depth {
            config.max_depth = depth;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(bucket_size) = self.bucket_size {
            config.bucket_size = bucket_size;
        }

        validate(&config)?;
        Ok(config)
    }
}

fn load_config_file(base: RenderConfig, path: &Path) -> Result<RenderConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    layer_json(base, &text).with_context(|| format!("Invalid config {}", path.display()))
}

/// Overlay only the fields present in `json` onto `base`.
fn layer_json(base: RenderConfig, json: &str) -> Result<RenderConfig> {
    let Value::Object(overrides) = serde_json::from_str::<Value>(json)? else {
        bail!("expected a JSON object");
    };

    let mut merged = serde_json::to_value(base)?;
    if let Value::Object(fields) = &mut merged {
        for (key, value) in overrides {
            if !fields.contains_key(&key) {
                log::warn!("Ignoring unknown config key '{}'", key);
                continue;
            }
            fields.insert(key, value);
        }
    }

    Ok(serde_json::from_value(merged)?)
}

fn validate(config: &RenderConfig) -> Result<()> {
    if config.image_width == 0 {
        bail!("image width must be at least 1");
    }
    if config.samples_per_pixel == 0 {
        bail!("samples per pixel must be at least 1");
    }
    if !(config.aspect_ratio.is_finite() && config.aspect_ratio > 0.0) {
        bail!("aspect ratio must be positive, got {}", config.aspect_ratio);
    }
    if config.max_depth == 0 {
        log::warn!("Max depth is 0, the image will be black");
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.render_config()?;
    log::info!("Scene {:?}", args.scene);

    let camera = args.scene.camera().with_aspect_ratio(config.aspect_ratio);
    let mut rng = StdRng::seed_from_u64(config.seed);
    let scene = args
        .scene
        .build(&args.earth_texture, camera.shutter(), &mut rng)?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads.unwrap_or(0))
        .build()?;

    let bucket_count =
        generate_buckets(config.image_width, config.image_height(), config.bucket_size).len();
    let progress = ProgressBar::new(bucket_count as u64).with_style(ProgressStyle::with_template(
        "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} buckets (eta {eta})",
    )?);

    let ctx = scene.context(&camera, &config);
    let image = pool.install(|| render(&ctx, |_| progress.inc(1)));
    progress.finish_and_clear();

    output::write_image(&args.output, image.width, image.height, &image.to_rgb8())
}
