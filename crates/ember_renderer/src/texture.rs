//! Surface color lookup for materials.
//!
//! Textures map a hit's (u, v) surface coordinates and world-space point to a
//! linear color. They are shared between materials behind `Arc<dyn Texture>`.

use std::path::Path;

use crate::error::{ConfigError, TextureResult};
use crate::perlin::{Perlin, DEFAULT_TURBULENCE_DEPTH};
use crate::renderer::inv_gamma;
use crate::Color;
use ember_math::Vec3;

/// A color source sampled at surface coordinates and a world-space point.
pub trait Texture: Send + Sync {
    fn sample(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// A single constant color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidColor {
    color: Color,
}

impl SolidColor {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Texture for SolidColor {
    fn sample(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.color
    }
}

/// Which coordinates a checker pattern tiles over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckerSpace {
    /// 2D squares over the surface (u, v) parameterization.
    Uv,
    /// 3D cells over the world-space hit point.
    Spatial,
}

/// Alternating two-color pattern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckerTexture {
    scale: f32,
    even: Color,
    odd: Color,
    space: CheckerSpace,
}

impl CheckerTexture {
    /// Checker squares of side `scale` in uv space.
    pub fn uv(scale: f32, even: Color, odd: Color) -> Self {
        Self {
            scale,
            even,
            odd,
            space: CheckerSpace::Uv,
        }
    }

    /// Checker cubes of side `scale` in world space.
    pub fn spatial(scale: f32, even: Color, odd: Color) -> Self {
        Self {
            scale,
            even,
            odd,
            space: CheckerSpace::Spatial,
        }
    }

    pub fn space(&self) -> CheckerSpace {
        self.space
    }
}

impl Texture for CheckerTexture {
    fn sample(&self, u: f32, v: f32, p: Vec3) -> Color {
        let cell = |x: f32| (x / self.scale).floor() as i64;

        let sum = match self.space {
            CheckerSpace::Uv => cell(u) + cell(v),
            CheckerSpace::Spatial => cell(p.x) + cell(p.y) + cell(p.z),
        };

        if sum.rem_euclid(2) == 0 {
            self.even
        } else {
            self.odd
        }
    }
}

/// Nearest-neighbour lookup into a decoded image.
///
/// Pixels are stored as linear color; `v = 0` addresses the first row.
#[derive(Debug, Clone)]
pub struct ImageTexture {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl ImageTexture {
    /// Build from tightly packed sRGB-ish RGB8 bytes, row-major top-down.
    pub fn from_rgb8(width: u32, height: u32, data: &[u8]) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyTexture);
        }

        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(ConfigError::TextureSizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        let pixels = data
            .chunks_exact(3)
            .map(|px| {
                let encoded = Color::new(px[0] as f32, px[1] as f32, px[2] as f32) / 255.0;
                inv_gamma(encoded)
            })
            .collect();

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Load and decode an image file (any format the `image` crate reads).
    pub fn load(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let rgb = image::open(path)?.to_rgb8();
        let (width, height) = rgb.dimensions();
        let texture = Self::from_rgb8(width, height, rgb.as_raw())?;

        log::debug!(
            "Loaded texture: {} ({}x{}, {:.1} KB)",
            path.display(),
            width,
            height,
            texture.size_bytes() as f32 / 1024.0
        );

        Ok(texture)
    }

    /// Memory held by the decoded pixels.
    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<Color>()
    }

    fn pixel(&self, x: u32, y: u32) -> Color {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        self.pixels[(y * self.width + x) as usize]
    }
}

impl Texture for ImageTexture {
    fn sample(&self, u: f32, v: f32, _p: Vec3) -> Color {
        let u = u.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);

        let x = (u * (self.width - 1) as f32).floor() as u32;
        let y = (v * (self.height - 1) as f32).floor() as u32;

        self.pixel(x, y)
    }
}

/// Marble-like pattern: a sine wave along Z perturbed by turbulence.
#[derive(Debug, Clone)]
pub struct NoiseTexture {
    scale: f32,
    noise: Perlin,
}

impl NoiseTexture {
    pub fn new(scale: f32, noise: Perlin) -> Self {
        Self { scale, noise }
    }
}

impl Texture for NoiseTexture {
    fn sample(&self, _u: f32, _v: f32, p: Vec3) -> Color {
        let s = p * self.scale;
        let value = 0.5 * (1.0 + (s.z + 10.0 * self.noise.turb(s, DEFAULT_TURBULENCE_DEPTH)).sin());
        Color::splat(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const BLACK: Color = Color::ZERO;
    const WHITE: Color = Color::ONE;

    #[test]
    fn test_solid_color() {
        let tex = SolidColor::new(Color::new(0.1, 0.2, 0.3));
        assert_eq!(tex.sample(0.7, 0.2, Vec3::splat(9.0)), Color::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_checker_uv() {
        let tex = CheckerTexture::uv(0.5, BLACK, WHITE);
        assert_eq!(tex.sample(0.1, 0.1, Vec3::ZERO), BLACK);
        assert_eq!(tex.sample(0.6, 0.1, Vec3::ZERO), WHITE);
        assert_eq!(tex.sample(0.6, 0.6, Vec3::ZERO), BLACK);
    }

    #[test]
    fn test_checker_spatial_negative_coordinates() {
        let tex = CheckerTexture::spatial(1.0, BLACK, WHITE);
        assert_eq!(tex.sample(0.0, 0.0, Vec3::new(0.5, 0.5, 0.5)), BLACK);
        assert_eq!(tex.sample(0.0, 0.0, Vec3::new(-0.5, 0.5, 0.5)), WHITE);
        assert_eq!(tex.sample(0.0, 0.0, Vec3::new(-0.5, -0.5, 0.5)), BLACK);
        assert_eq!(tex.sample(0.0, 0.0, Vec3::new(-0.5, -0.5, -0.5)), WHITE);
        assert_eq!(tex.space(), CheckerSpace::Spatial);
    }

    #[test]
    fn test_image_texture_nearest_lookup() {
        // 2x2: red, green / blue, white
        let data = [255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255];
        let tex = ImageTexture::from_rgb8(2, 2, &data).unwrap();

        assert_eq!(tex.sample(0.0, 0.0, Vec3::ZERO), Color::new(1.0, 0.0, 0.0));
        assert_eq!(tex.sample(1.0, 0.0, Vec3::ZERO), Color::new(0.0, 1.0, 0.0));
        assert_eq!(tex.sample(0.0, 1.0, Vec3::ZERO), Color::new(0.0, 0.0, 1.0));
        assert_eq!(tex.sample(1.0, 1.0, Vec3::ZERO), Color::ONE);
        // floor(0.9 * 1) = 0
        assert_eq!(tex.sample(0.9, 0.0, Vec3::ZERO), Color::new(1.0, 0.0, 0.0));
        // Out-of-range uv is clamped
        assert_eq!(tex.sample(4.0, -3.0, Vec3::ZERO), Color::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_image_texture_linearizes() {
        let tex = ImageTexture::from_rgb8(1, 1, &[128, 128, 128]).unwrap();
        let c = tex.sample(0.5, 0.5, Vec3::ZERO);
        let expected = (128.0f32 / 255.0).powf(2.2);
        assert!((c.x - expected).abs() < 1e-5);
    }

    #[test]
    fn test_image_texture_rejects_bad_input() {
        assert_eq!(
            ImageTexture::from_rgb8(0, 4, &[]).unwrap_err(),
            ConfigError::EmptyTexture
        );
        assert_eq!(
            ImageTexture::from_rgb8(2, 1, &[0; 5]).unwrap_err(),
            ConfigError::TextureSizeMismatch {
                expected: 6,
                actual: 5
            }
        );
    }

    #[test]
    fn test_image_texture_load_missing_file() {
        assert!(ImageTexture::load("/nonexistent/ember/texture.png").is_err());
    }

    #[test]
    fn test_noise_texture_in_unit_range() {
        let mut rng = StdRng::seed_from_u64(5);
        let tex = NoiseTexture::new(4.0, Perlin::new(&mut rng));

        for i in 0..100 {
            let p = Vec3::new(i as f32 * 0.21, -(i as f32) * 0.05, i as f32 * 0.11);
            let c = tex.sample(0.0, 0.0, p);
            assert!(c.x >= 0.0 && c.x <= 1.0);
            assert_eq!(c.x, c.y);
            assert_eq!(c.y, c.z);
        }
    }
}
