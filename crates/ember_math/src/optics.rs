//! Reflection, refraction, and Fresnel reflectance.

use crate::Vec3;

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract the unit direction `i` through a surface with unit normal `n`
/// (facing against `i`), where `eta` is the ratio of refractive indices
/// (incident over transmitted).
///
/// Callers check [`total_internal_reflection`] first; under TIR the result is NaN.
#[inline]
pub fn refract(i: Vec3, n: Vec3, eta: f32) -> Vec3 {
    let cos_i = -i.dot(n);
    let sin2_t = eta * eta * (1.0 - cos_i * cos_i);
    let cos_t = (1.0 - sin2_t).sqrt();
    eta * i + (eta * cos_i - cos_t) * n
}

/// True when light arriving at `cos_theta` cannot leave a medium with
/// index ratio `eta`.
#[inline]
pub fn total_internal_reflection(cos_theta: f32, eta: f32) -> bool {
    1.0 - 1.0 / (eta * eta) > cos_theta * cos_theta
}

/// Schlick's approximation for reflectance.
#[inline]
pub fn reflectance(cos_theta: f32, eta: f32) -> f32 {
    let r0 = ((1.0 - eta) / (1.0 + eta)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cos_theta).powi(5)
}
