//! Material trait for surface scattering.

use std::sync::Arc;

use crate::hittable::HitRecord;
use crate::texture::{SolidColor, Texture};
use ember_math::optics::{reflect, reflectance, refract, total_internal_reflection};
use ember_math::sampling::{gen_f32, projected_disk, random_cosine_hemisphere, random_on_sphere};
use ember_math::{Onb, Ray, Vec3};
use rand::RngCore;

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns the outgoing ray, or None if the path terminates here.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<Ray>;

    /// Fraction of the scattered radiance carried back along the path.
    fn attenuation(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        Color::ONE
    }

    /// Get emitted light from this material.
    ///
    /// Most materials return black (no emission).
    fn emitted(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        Color::ZERO
    }
}

/// Lambertian (diffuse) material.
#[derive(Clone)]
pub struct Lambertian {
    albedo: Arc<dyn Texture>,
}

impl Lambertian {
    /// Create a new Lambertian material whose albedo comes from a texture.
    pub fn new(albedo: Arc<dyn Texture>) -> Self {
        Self { albedo }
    }

    /// Create a new Lambertian material with a constant albedo color.
    pub fn from_color(albedo: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(albedo)))
    }
}

impl Material for Lambertian {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<Ray> {
        // Cosine-weighted direction on the hemisphere around the normal
        let basis = Onb::new(rec.normal);
        let direction = basis.localize(random_cosine_hemisphere(rng));
        Some(Ray::new(rec.p, direction, ray_in.time))
    }

    fn attenuation(&self, u: f32, v: f32, p: Vec3) -> Color {
        self.albedo.sample(u, v, p)
    }
}

/// Metal (specular) material.
#[derive(Clone)]
pub struct Metal {
    albedo: Arc<dyn Texture>,
    fuzz: f32,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Arc<dyn Texture>, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    pub fn from_color(albedo: Color, fuzz: f32) -> Self {
        Self::new(Arc::new(SolidColor::new(albedo)), fuzz)
    }

    pub fn fuzz(&self) -> f32 {
        self.fuzz
    }
}

impl Material for Metal {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<Ray> {
        let reflected = reflect(ray_in.direction.normalize(), rec.normal);

        // Perturb within a cone around the mirror direction
        let basis = Onb::new(reflected);
        let direction = basis.localize(projected_disk(self.fuzz, rng));
        Some(Ray::new(rec.p, direction, ray_in.time))
    }

    fn attenuation(&self, u: f32, v: f32, p: Vec3) -> Color {
        self.albedo.sample(u, v, p)
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone, Copy)]
pub struct Dielectric {
    /// Index of refraction
    ior: f32,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }

    pub fn ior(&self) -> f32 {
        self.ior
    }
}

impl Material for Dielectric {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<Ray> {
        let eta = if rec.front_face { 1.0 / self.ior } else { self.ior };

        let unit_direction = ray_in.direction.normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);

        let direction = if total_internal_reflection(cos_theta, eta)
            || reflectance(cos_theta, eta) > gen_f32(rng)
        {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, eta)
        };

        Some(Ray::new(rec.p, direction, ray_in.time))
    }
}

/// Diffuse light emitter.
#[derive(Clone)]
pub struct DiffuseLight {
    emit: Arc<dyn Texture>,
}

impl DiffuseLight {
    pub fn new(emit: Arc<dyn Texture>) -> Self {
        Self { emit }
    }

    /// Create a new diffuse light with the given emission color.
    pub fn from_color(emit: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(emit)))
    }
}

impl Material for DiffuseLight {
    fn scatter(&self, _ray_in: &Ray, _rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<Ray> {
        // Lights don't scatter rays
        None
    }

    fn emitted(&self, u: f32, v: f32, p: Vec3) -> Color {
        self.emit.sample(u, v, p)
    }
}

/// Phase function of a constant-density medium: scatters uniformly in all
/// directions.
#[derive(Debug, Clone, Copy)]
pub struct Isotropic {
    albedo: Color,
}

impl Isotropic {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Material for Isotropic {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<Ray> {
        Some(Ray::new(rec.p, random_on_sphere(rng), ray_in.time))
    }

    fn attenuation(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.albedo
    }
}
