// Rotation about the Y axis for instancing.
//
// Keeps the sine and cosine precomputed so the per-ray cost is a handful of
// multiplies, and provides the conservative world-space box of a rotated box.

use crate::{Aabb, Vec3};

/// A rotation about the +Y axis by a fixed angle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RotationY {
    sin_theta: f32,
    cos_theta: f32,
}

impl RotationY {
    /// Rotation by `degrees` (counter-clockwise looking down -Y).
    pub fn from_degrees(degrees: f32) -> Self {
        let (sin_theta, cos_theta) = degrees.to_radians().sin_cos();
        Self {
            sin_theta,
            cos_theta,
        }
    }

    /// Object space to world space.
    #[inline]
    pub fn rotate(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x + self.sin_theta * v.z,
            v.y,
            -self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }

    /// World space to object space.
    #[inline]
    pub fn inverse_rotate(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x - self.sin_theta * v.z,
            v.y,
            self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }

    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 rotated corners, which is looser
    /// than the rotated box itself but always contains it.
    pub fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        let mut result_min = Vec3::splat(f32::INFINITY);
        let mut result_max = Vec3::splat(f32::NEG_INFINITY);

        for corner in aabb.corners() {
            let rotated = self.rotate(corner);
            result_min = result_min.min(rotated);
            result_max = result_max.max(rotated);
        }

        Aabb::from_points(result_min, result_max)
    }
}
