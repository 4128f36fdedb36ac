//! Random direction sampling.
//!
//! Every distribution takes the generator explicitly so callers control
//! seeding. Hemisphere samples are expressed in a local frame with +Z as the
//! pole; map them to world space with [`crate::Onb::localize`].

use crate::Vec3;
use rand::{Rng, RngCore};
use std::f32::consts::PI;

/// Uniform float in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniform float in [min, max).
#[inline]
pub fn gen_range(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    min + (max - min) * gen_f32(rng)
}

/// Uniformly distributed direction on the +Z hemisphere.
pub fn random_hemisphere(rng: &mut dyn RngCore) -> Vec3 {
    let u = gen_f32(rng);
    let phi = 2.0 * PI * gen_f32(rng);
    let sin_theta = (u * (2.0 - u)).sqrt();
    Vec3::new(phi.cos() * sin_theta, phi.sin() * sin_theta, 1.0 - u)
}

/// Cosine-weighted direction on the +Z hemisphere.
pub fn random_cosine_hemisphere(rng: &mut dyn RngCore) -> Vec3 {
    let u = gen_f32(rng);
    let phi = 2.0 * PI * gen_f32(rng);
    let sin_theta = u.sqrt();
    Vec3::new(phi.cos() * sin_theta, phi.sin() * sin_theta, (1.0 - u).sqrt())
}

/// A point sampled in a disk of radius `r` (clamped to [0, 1]) and lifted
/// onto the unit sphere along +Z.
///
/// `r = 0` always returns +Z; `r = 1` reproduces the cosine-weighted
/// hemisphere.
pub fn projected_disk(r: f32, rng: &mut dyn RngCore) -> Vec3 {
    let r = r.clamp(0.0, 1.0);
    let u = gen_f32(rng);
    let phi = 2.0 * PI * gen_f32(rng);
    let sin_theta = r * u.sqrt();
    Vec3::new(
        phi.cos() * sin_theta,
        phi.sin() * sin_theta,
        (1.0 - r * r * u).sqrt(),
    )
}

/// Uniformly distributed direction on the whole unit sphere.
pub fn random_on_sphere(rng: &mut dyn RngCore) -> Vec3 {
    let u = gen_f32(rng);
    let phi = 2.0 * PI * gen_f32(rng);
    let sin_theta = 2.0 * (u * (1.0 - u)).sqrt();
    Vec3::new(phi.cos() * sin_theta, phi.sin() * sin_theta, 1.0 - 2.0 * u)
}

/// Uniform point in the unit disk on the XY plane.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    let r = gen_f32(rng).sqrt();
    let theta = 2.0 * PI * gen_f32(rng);
    Vec3::new(r * theta.cos(), r * theta.sin(), 0.0)
}
