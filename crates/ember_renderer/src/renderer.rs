//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with configurable depth
//! - Emission added along every path vertex
//! - Gamma correction (2.2) on output
//! - Anti-aliasing via multi-sampling

use std::io::{self, Write};
use std::time::Instant;

use crate::error::ConfigError;
use crate::{Camera, Color, Hittable};
use ember_math::{Interval, Ray};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Display gamma used when encoding to 8-bit and decoding textures.
pub const GAMMA: f32 = 2.2;

/// Rays start this far along their direction to avoid re-hitting the surface
/// they left.
const SHADOW_ACNE_EPSILON: f32 = 0.001;

/// What a ray sees when it leaves the scene.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Background {
    /// Vertical gradient from white looking down to light blue overhead.
    #[default]
    Sky,
    /// A constant color in every direction.
    Solid(Color),
}

impl Background {
    /// Radiance arriving along `ray` from the background.
    pub fn color(&self, ray: &Ray) -> Color {
        match self {
            Background::Sky => sky_gradient(ray),
            Background::Solid(color) => *color,
        }
    }
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum number of bounces after the camera ray
    pub max_depth: u32,
    /// What rays see when they don't hit anything
    pub background: Background,
    /// Base seed for the per-bucket random streams
    pub seed: u64,
    /// Edge length of the square tiles rendered in parallel
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 10,
            max_depth: 10,
            background: Background::Sky,
            seed: 0,
            bucket_size: 32,
        }
    }
}

impl RenderConfig {
    /// Reject settings that would produce an empty or malformed image.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        if self.bucket_size == 0 {
            return Err(ConfigError::ZeroBucketSize);
        }
        Ok(())
    }
}

/// Compute the color seen by a ray.
///
/// This is the core path tracing function. It traces the ray through the
/// scene, bouncing off surfaces and accumulating color. `depth` is the number
/// of bounces still allowed: at 0 a hit contributes only its own emission.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    // Check if ray hits anything
    let Some(rec) = world.hit(ray, Interval::new(SHADOW_ACNE_EPSILON, f32::INFINITY), rng) else {
        return config.background.color(ray);
    };

    // Get emission from material (for lights)
    let emission = rec.material.emitted(rec.u, rec.v, rec.p);
    if depth == 0 {
        return emission;
    }

    // Try to scatter the ray
    match rec.material.scatter(ray, &rec, rng) {
        Some(scattered) => {
            let attenuation = rec.material.attenuation(rec.u, rec.v, rec.p);
            let scattered_color = ray_color(&scattered, world, depth - 1, config, rng);
            emission + attenuation * scattered_color
        }
        // Ray was absorbed - just return emission
        None => emission,
    }
}

/// Compute sky gradient background.
fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction.normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Encode linear color for display: `max(c, 0)^(1/2.2)` per channel.
#[inline]
pub fn gamma(linear: Color) -> Color {
    linear.max(Color::ZERO).powf(1.0 / GAMMA)
}

/// Decode display color back to linear: `max(c, 0)^2.2` per channel.
#[inline]
pub fn inv_gamma(encoded: Color) -> Color {
    encoded.max(Color::ZERO).powf(GAMMA)
}

/// Convert a linear color to 8-bit RGBA (gamma encoded, opaque).
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let encoded = gamma(color).clamp(Color::ZERO, Color::ONE) * 255.0;
    [
        encoded.x.round() as u8,
        encoded.y.round() as u8,
        encoded.z.round() as u8,
        255,
    ]
}

/// Render a single pixel with multi-sampling.
///
/// Returns the linear average of `samples_per_pixel` path estimates.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        // Camera.get_ray already adds random offset for anti-aliasing
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, world, config.max_depth, config, rng);
    }

    // Average the samples
    pixel_color / config.samples_per_pixel as f32
}

/// 8-bit RGBA image, row-major, top row first.
///
/// Pixels not yet written are transparent black.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    data: Vec<u8>,
}

impl ImageBuffer {
    /// Create a new, fully transparent image buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Get the RGBA bytes at (x, y).
    pub fn get_rgba(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Encode a linear color and store it at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.set_rgba(x, y, color_to_rgba(color));
    }

    /// Store already-encoded RGBA bytes at (x, y).
    pub fn set_rgba(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&rgba);
    }

    /// Raw RGBA bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Take ownership of the raw RGBA bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Write as a plain-text PPM (P3), dropping alpha.
    pub fn write_ppm<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "P3")?;
        writeln!(writer, "{} {}", self.width, self.height)?;
        writeln!(writer, "255")?;

        for px in self.data.chunks_exact(4) {
            writeln!(writer, "{} {} {}", px[0], px[1], px[2])?;
        }

        Ok(())
    }
}

/// Render the entire scene to an image buffer.
///
/// This is the single-threaded reference path; every random draw comes from
/// `rng` in scanline order. The camera must be initialized at its current
/// settings, otherwise `ConfigError::CameraNotInitialized` is returned.
pub fn render(
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Result<ImageBuffer, ConfigError> {
    config.validate()?;
    camera.check_initialized()?;

    let start = Instant::now();
    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);

    for y in 0..camera.image_height {
        for x in 0..camera.image_width {
            let color = render_pixel(camera, world, x, y, config, rng);
            image.set(x, y, color);
        }
    }

    log::info!(
        "Rendered {}x{} @ {} spp in {:.2?}",
        camera.image_width,
        camera.image_height,
        config.samples_per_pixel,
        start.elapsed()
    );

    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Dielectric, DiffuseLight, HittableList, Lambertian, Sphere};
    use ember_math::sampling::gen_f32;
    use ember_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn camera(width: u32, height: u32) -> Camera {
        let mut camera = Camera::new()
            .with_resolution(width, height)
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0);
        camera.initialize().unwrap();
        camera
    }

    fn sphere(center: Vec3, radius: f32, material: impl crate::Material + 'static) -> Box<dyn Hittable> {
        Box::new(Sphere::new(center, radius, Arc::new(material)).unwrap())
    }

    #[test]
    fn test_sky_gradient() {
        // Straight up is the light blue end, straight down is white
        let up_ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 3.0, 0.0));
        assert!((sky_gradient(&up_ray) - Color::new(0.5, 0.7, 1.0)).length() < 1e-6);

        let down_ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, -1.0, 0.0));
        assert!((sky_gradient(&down_ray) - Color::ONE).length() < 1e-6);

        let level = Ray::new_simple(Vec3::ZERO, Vec3::X);
        assert!((sky_gradient(&level) - Color::new(0.75, 0.85, 1.0)).length() < 1e-6);
    }

    #[test]
    fn test_gamma_known_values() {
        let encoded = gamma(Color::new(0.0, 0.5, 1.0));
        assert_eq!(encoded.x, 0.0);
        assert!((encoded.y - 0.7297).abs() < 1e-4);
        assert_eq!(encoded.z, 1.0);

        // Decoding mid-gray from a texture darkens it
        let decoded = inv_gamma(Color::splat(0.5));
        assert!((decoded.x - 0.2176).abs() < 1e-4);
        assert!((inv_gamma(encoded) - Color::new(0.0, 0.5, 1.0)).length() < 1e-5);
    }

    #[test]
    fn test_gamma_round_trip() {
        let mut rng = StdRng::seed_from_u64(21);
        let check = |c: Color| {
            let back = inv_gamma(gamma(c));
            assert!((back - c).abs().max_element() < 1e-5, "{:?} -> {:?}", c, back);
        };

        // Cube corners and edges, then the interior
        for corner in 0..8 {
            check(Color::new((corner & 1) as f32, ((corner >> 1) & 1) as f32, ((corner >> 2) & 1) as f32));
        }
        for _ in 0..2000 {
            check(Color::new(gen_f32(&mut rng), gen_f32(&mut rng), gen_f32(&mut rng)));
        }
    }

    #[test]
    fn test_gamma_clamps_negative() {
        assert_eq!(gamma(Color::new(-1.0, 0.0, 1.0)), Color::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_color_to_rgba() {
        assert_eq!(color_to_rgba(Color::ZERO), [0, 0, 0, 255]);
        assert_eq!(color_to_rgba(Color::ONE), [255, 255, 255, 255]);
        assert_eq!(color_to_rgba(Color::splat(7.0)), [255, 255, 255, 255]);
        // 0.5^(1/2.2) * 255 = 186.1
        assert_eq!(color_to_rgba(Color::new(0.5, 0.0, 0.0)), [186, 0, 0, 255]);
    }

    #[test]
    fn test_image_buffer() {
        let mut image = ImageBuffer::new(3, 2);
        assert_eq!(image.as_bytes().len(), 24);
        assert_eq!(image.get_rgba(2, 1), [0, 0, 0, 0]);

        image.set(2, 1, Color::ONE);
        assert_eq!(image.get_rgba(2, 1), [255, 255, 255, 255]);
        assert_eq!(&image.as_bytes()[20..24], &[255, 255, 255, 255]);

        let mut ppm = Vec::new();
        image.write_ppm(&mut ppm).unwrap();
        let text = String::from_utf8(ppm).unwrap();
        assert!(text.starts_with("P3\n3 2\n255\n"));
        assert_eq!(text.lines().count(), 3 + 6);
    }

    #[test]
    fn test_config_validation() {
        assert!(RenderConfig::default().validate().is_ok());

        let config = RenderConfig {
            samples_per_pixel: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroSamples));

        let config = RenderConfig {
            bucket_size: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroBucketSize));
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: RenderConfig =
            serde_json::from_str(r#"{"samples_per_pixel": 64, "background": {"solid": [0.1, 0.2, 0.3]}}"#)
                .unwrap();
        assert_eq!(config.samples_per_pixel, 64);
        assert_eq!(config.max_depth, 10);
        assert_eq!(config.background, Background::Solid(Color::new(0.1, 0.2, 0.3)));

        let sky: RenderConfig = serde_json::from_str(r#"{"background": "sky"}"#).unwrap();
        assert_eq!(sky, RenderConfig::default());
    }

    #[test]
    fn test_empty_scene_renders_sky() {
        let camera = camera(16, 12);
        let world = HittableList::new();
        let config = RenderConfig {
            samples_per_pixel: 3,
            ..Default::default()
        };

        let image = render(&camera, &world, &config, &mut StdRng::seed_from_u64(99)).unwrap();

        // Replay the same camera rays against the bare sky
        let mut rng = StdRng::seed_from_u64(99);
        for y in 0..camera.image_height {
            for x in 0..camera.image_width {
                let mut expected = Color::ZERO;
                for _ in 0..config.samples_per_pixel {
                    expected += sky_gradient(&camera.get_ray(x, y, &mut rng));
                }
                let expected = color_to_rgba(expected / config.samples_per_pixel as f32);
                assert_eq!(image.get_rgba(x, y), expected, "pixel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_two_spheres_show_their_albedo() {
        // Under a uniform white environment a convex diffuse object reflects
        // exactly its albedo; the other sphere occludes only a sliver of sky.
        let camera = camera(21, 21);
        let mut world = HittableList::new();
        world.add(sphere(Vec3::new(-5.0, 0.0, -10.0), 1.5, Lambertian::from_color(Color::new(0.8, 0.2, 0.2))));
        world.add(sphere(Vec3::new(5.0, 0.0, -10.0), 1.5, Lambertian::from_color(Color::new(0.2, 0.2, 0.8))));

        let config = RenderConfig {
            samples_per_pixel: 200,
            max_depth: 8,
            background: Background::Solid(Color::ONE),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(5);

        let left = render_pixel(&camera, &world, 5, 10, &config, &mut rng);
        assert!((left - Color::new(0.8, 0.2, 0.2)).abs().max_element() < 0.03, "{:?}", left);

        let right = render_pixel(&camera, &world, 15, 10, &config, &mut rng);
        assert!((right - Color::new(0.2, 0.2, 0.8)).abs().max_element() < 0.03, "{:?}", right);

        let between = render_pixel(&camera, &world, 10, 10, &config, &mut rng);
        assert_eq!(between, Color::ONE);
    }

    #[test]
    fn test_matched_glass_is_invisible() {
        let camera = camera(9, 9);
        let mut world = HittableList::new();
        world.add(sphere(Vec3::new(0.0, 0.0, -3.0), 1.0, Dielectric::new(1.0)));

        let background = Color::new(0.3, 0.6, 0.9);
        let config = RenderConfig {
            samples_per_pixel: 16,
            background: Background::Solid(background),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(6);

        let center = render_pixel(&camera, &world, 4, 4, &config, &mut rng);
        assert!((center - background).abs().max_element() < 1e-5);
    }

    #[test]
    fn test_light_emits_at_zero_depth() {
        let mut world = HittableList::new();
        world.add(sphere(Vec3::new(0.0, 0.0, -3.0), 1.0, DiffuseLight::from_color(Color::splat(4.0))));

        let config = RenderConfig {
            max_depth: 0,
            background: Background::Solid(Color::ZERO),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(7);
        let ray = Ray::new_simple(Vec3::ZERO, -Vec3::Z);

        assert_eq!(ray_color(&ray, &world, 0, &config, &mut rng), Color::splat(4.0));
    }

    #[test]
    fn test_depth_exhaustion_drops_indirect_light() {
        let mut world = HittableList::new();
        world.add(sphere(Vec3::new(0.0, 0.0, -3.0), 1.0, Lambertian::from_color(Color::splat(0.5))));

        let config = RenderConfig {
            background: Background::Solid(Color::ONE),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(8);
        let ray = Ray::new_simple(Vec3::ZERO, -Vec3::Z);

        assert_eq!(ray_color(&ray, &world, 0, &config, &mut rng), Color::ZERO);
        assert_eq!(ray_color(&ray, &world, 1, &config, &mut rng), Color::splat(0.5));
    }

    #[test]
    fn test_render_rejects_zero_samples() {
        let camera = camera(4, 4);
        let config = RenderConfig {
            samples_per_pixel: 0,
            ..Default::default()
        };
        let result = render(&camera, &HittableList::new(), &config, &mut StdRng::seed_from_u64(0));
        assert_eq!(result, Err(ConfigError::ZeroSamples));
    }

    #[test]
    fn test_render_requires_initialized_camera() {
        let world = HittableList::new();
        let config = RenderConfig::default();
        let mut rng = StdRng::seed_from_u64(0);

        let fresh = Camera::new().with_resolution(4, 4);
        assert_eq!(
            render(&fresh, &world, &config, &mut rng),
            Err(ConfigError::CameraNotInitialized)
        );

        // Resizing after initialize leaves stale pixel deltas
        let resized = camera(4, 4).with_resolution(8, 8);
        assert_eq!(
            render(&resized, &world, &config, &mut rng),
            Err(ConfigError::CameraNotInitialized)
        );
    }
}
