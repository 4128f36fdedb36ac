//! Participating media (smoke, fog) of constant density.

use crate::error::ConfigError;
use crate::hittable::{HitRecord, Hittable};
use crate::material::{Color, Isotropic};
use ember_math::sampling::gen_f32;
use ember_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// Offset past the entry point when searching for the exit point.
const EXIT_SEARCH_EPSILON: f32 = 1e-4;

/// A volume of uniform density filling a closed boundary.
///
/// A ray passing through scatters at an exponentially distributed distance;
/// if that distance lies beyond the far side of the boundary the ray passes
/// straight through.
pub struct ConstantMedium {
    boundary: Box<dyn Hittable>,
    density: f32,
    phase_function: Isotropic,
}

impl ConstantMedium {
    pub fn new(boundary: Box<dyn Hittable>, density: f32, albedo: Color) -> Result<Self, ConfigError> {
        if !density.is_finite() {
            return Err(ConfigError::NonFiniteDensity(density));
        }
        if density < 0.0 {
            return Err(ConfigError::NegativeDensity(density));
        }

        Ok(Self {
            boundary,
            density,
            phase_function: Isotropic::new(albedo),
        })
    }

    pub fn density(&self) -> f32 {
        self.density
    }
}

impl Hittable for ConstantMedium {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'a>> {
        let entry = self.boundary.hit(ray, Interval::UNIVERSE, rng)?;
        let exit = self
            .boundary
            .hit(ray, Interval::new(entry.t + EXIT_SEARCH_EPSILON, f32::INFINITY), rng)?;

        let mut t_entry = entry.t.max(ray_t.min);
        let t_exit = exit.t.min(ray_t.max);
        if t_entry >= t_exit {
            return None;
        }
        t_entry = t_entry.max(0.0);

        let ray_length = ray.direction.length();
        let distance_inside_boundary = (t_exit - t_entry) * ray_length;
        let hit_distance = -gen_f32(rng).ln() / self.density;
        if hit_distance > distance_inside_boundary {
            return None;
        }

        let t = t_entry + hit_distance / ray_length;

        // Volumetric hits have no surface; the normal and face are arbitrary
        Some(HitRecord {
            p: ray.at(t),
            normal: Vec3::X,
            material: &self.phase_function,
            u: 0.0,
            v: 0.0,
            t,
            front_face: true,
        })
    }

    fn bounding_box(&self) -> Aabb {
        self.boundary.bounding_box()
    }
}
