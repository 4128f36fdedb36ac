// Re-export glam for convenience
pub use glam::*;

// Ember math types
mod aabb;
mod interval;
mod onb;
mod ray;
pub mod optics;
pub mod sampling;
mod transform;

pub use aabb::Aabb;
pub use interval::Interval;
pub use onb::Onb;
pub use ray::Ray;
pub use transform::RotationY;

/// Scalar triple product `a · (b × c)`, the determinant of the matrix with
/// columns `a`, `b`, `c`.
#[inline]
pub fn det(a: Vec3, b: Vec3, c: Vec3) -> f32 {
    a.dot(b.cross(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a * b, Vec3::new(4.0, 10.0, 18.0));
        assert_eq!(a.dot(b), 32.0);
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
    }

    #[test]
    fn test_vec3_lerp() {
        let a = Vec3::ZERO;
        let b = Vec3::new(2.0, 4.0, 6.0);
        assert_eq!(a.lerp(b, 0.5), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_det_unit_axes() {
        assert_eq!(det(Vec3::X, Vec3::Y, Vec3::Z), 1.0);
        assert_eq!(det(Vec3::Y, Vec3::X, Vec3::Z), -1.0);
        // Coplanar vectors have zero volume
        assert_eq!(det(Vec3::X, Vec3::Y, Vec3::new(1.0, 1.0, 0.0)), 0.0);
    }
}
