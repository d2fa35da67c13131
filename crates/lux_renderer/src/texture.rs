//! Textures sampled by materials at a hit's (u, v) and position.

use crate::error::TextureError;
use crate::perlin::Perlin;
use crate::Color;
use lux_math::Vec3;
use rand::RngCore;
use std::path::Path;

/// Shown wherever an image texture has no pixel data.
const MISSING_TEXTURE_COLOR: Color = Color::new(0.0, 1.0, 1.0);

/// Octaves of turbulence used by the marble pattern.
const TURBULENCE_DEPTH: usize = 7;

/// A spatially varying color.
pub enum Texture {
    Solid(Color),
    Checker(CheckerTexture),
    Noise(NoiseTexture),
    Image(ImageTexture),
}

impl Texture {
    /// Color at surface coordinates (u, v) and world point `p`.
    pub fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        match self {
            Texture::Solid(color) => *color,
            Texture::Checker(checker) => checker.value(u, v, p),
            Texture::Noise(noise) => noise.value(p),
            Texture::Image(image) => image.value(u, v),
        }
    }
}

impl From<Color> for Texture {
    fn from(color: Color) -> Self {
        Texture::Solid(color)
    }
}

impl From<CheckerTexture> for Texture {
    fn from(checker: CheckerTexture) -> Self {
        Texture::Checker(checker)
    }
}

impl From<NoiseTexture> for Texture {
    fn from(noise: NoiseTexture) -> Self {
        Texture::Noise(noise)
    }
}

impl From<ImageTexture> for Texture {
    fn from(image: ImageTexture) -> Self {
        Texture::Image(image)
    }
}

/// 3-D checkerboard alternating two textures.
pub struct CheckerTexture {
    odd: Box<Texture>,
    even: Box<Texture>,
    frequency: f32,
}

impl CheckerTexture {
    pub const DEFAULT_FREQUENCY: f32 = 10.0;

    pub fn new(even: impl Into<Texture>, odd: impl Into<Texture>) -> Self {
        Self::with_frequency(even, odd, Self::DEFAULT_FREQUENCY)
    }

    pub fn with_frequency(even: impl Into<Texture>, odd: impl Into<Texture>, frequency: f32) -> Self {
        Self {
            odd: Box::new(odd.into()),
            even: Box::new(even.into()),
            frequency,
        }
    }

    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let k = self.frequency;
        let sines = (k * p.x).sin() * (k * p.y).sin() * (k * p.z).sin();
        if sines < 0.0 {
            self.odd.value(u, v, p)
        } else {
            self.even.value(u, v, p)
        }
    }
}

/// Marble-like pattern driven by Perlin turbulence.
pub struct NoiseTexture {
    noise: Perlin,
    scale: f32,
}

impl NoiseTexture {
    pub fn new(scale: f32, rng: &mut dyn RngCore) -> Self {
        Self {
            noise: Perlin::new(rng),
            scale,
        }
    }

    fn value(&self, p: Vec3) -> Color {
        let phase = self.scale * p.z + 10.0 * self.noise.turbulence(p, TURBULENCE_DEPTH);
        Color::ONE * 0.5 * (1.0 + phase.sin())
    }
}

/// An 8-bit RGB image mapped over (u, v).
pub struct ImageTexture {
    width: u32,
    height: u32,
    /// Row-major RGB triples, top row first
    data: Vec<u8>,
}

impl ImageTexture {
    /// Decode an image file of any format the `image` crate supports.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let rgb = image::load_from_memory(&bytes)?.to_rgb8();
        let (width, height) = rgb.dimensions();

        log::info!("Loaded texture {} ({}x{})", path.display(), width, height);

        Ok(Self {
            width,
            height,
            data: rgb.into_raw(),
        })
    }

    /// Like [`ImageTexture::load`], but a file that fails to load becomes an
    /// empty texture so the render can proceed.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|err| {
            log::warn!("Could not load texture {}: {}", path.display(), err);
            Self::empty()
        })
    }

    /// A texture with no pixels; samples as solid cyan.
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            data: Vec::new(),
        }
    }

    pub fn from_rgb8(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), (width * height * 3) as usize);
        Self {
            width,
            height,
            data,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn value(&self, u: f32, v: f32) -> Color {
        if self.data.is_empty() {
            return MISSING_TEXTURE_COLOR;
        }

        // Image rows run top to bottom, v runs bottom to top
        let u = u.clamp(0.0, 1.0);
        let v = 1.0 - v.clamp(0.0, 1.0);

        let i = ((u * self.width as f32) as u32).min(self.width - 1);
        let j = ((v * self.height as f32) as u32).min(self.height - 1);

        let offset = ((j * self.width + i) * 3) as usize;
        let pixel = &self.data[offset..offset + 3];
        Color::new(pixel[0] as f32, pixel[1] as f32, pixel[2] as f32) / 255.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_solid_ignores_coordinates() {
        let tex = Texture::from(Color::new(0.2, 0.3, 0.1));
        assert_eq!(tex.value(0.9, 0.1, Vec3::splat(100.0)), Color::new(0.2, 0.3, 0.1));
    }

    #[test]
    fn test_checker_alternates() {
        let black = Color::ZERO;
        let white = Color::ONE;
        let tex = Texture::from(CheckerTexture::new(white, black));

        // sin(10 * 0.1)^3 > 0
        let even = tex.value(0.0, 0.0, Vec3::splat(0.1));
        // Flipping one coordinate flips the sign of the product
        let odd = tex.value(0.0, 0.0, Vec3::new(-0.1, 0.1, 0.1));

        assert_eq!(even, white);
        assert_eq!(odd, black);
    }

    #[test]
    fn test_noise_is_grey_in_unit_range() {
        let tex = Texture::from(NoiseTexture::new(4.0, &mut StdRng::seed_from_u64(5)));
        for i in 0..50 {
            let c = tex.value(0.0, 0.0, Vec3::new(i as f32 * 0.3, 1.0, -2.0));
            assert!(c.x >= 0.0 && c.x <= 1.0);
            assert_eq!(c.x, c.y);
            assert_eq!(c.y, c.z);
        }
    }

    #[test]
    fn test_image_lookup_flips_v() {
        // 1x2 image: red on top, blue below
        let tex = ImageTexture::from_rgb8(1, 2, vec![255, 0, 0, 0, 0, 255]);

        assert_eq!(tex.value(0.5, 1.0), Color::new(1.0, 0.0, 0.0));
        assert_eq!(tex.value(0.5, 0.0), Color::new(0.0, 0.0, 1.0));
        // Out of range coordinates are clamped
        assert_eq!(tex.value(-3.0, 7.0), Color::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_missing_image_is_cyan() {
        let tex = ImageTexture::load_or_empty("/nonexistent/earthmap.jpg");
        assert_eq!(tex.dimensions(), (0, 0));
        assert_eq!(tex.value(0.3, 0.3), MISSING_TEXTURE_COLOR);
        assert!(matches!(
            ImageTexture::load("/nonexistent/earthmap.jpg"),
            Err(TextureError::Io(_))
        ));
    }
}
