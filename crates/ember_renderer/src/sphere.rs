//! Sphere primitive for ray tracing.

use std::f32::consts::PI;
use std::sync::Arc;

use crate::error::ConfigError;
use crate::hittable::{HitRecord, Hittable};
use crate::Material;
use ember_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// A sphere primitive, optionally moving linearly between two centers over
/// the shutter interval `time ∈ [0, 1]`.
pub struct Sphere {
    center0: Vec3,
    /// Displacement from `center0` to the center at time 1
    motion: Vec3,
    radius: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new stationary sphere.
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Result<Self, ConfigError> {
        Self::moving(center, center, radius, material)
    }

    /// Create a sphere whose center moves from `center0` at time 0 to
    /// `center1` at time 1.
    pub fn moving(
        center0: Vec3,
        center1: Vec3,
        radius: f32,
        material: Arc<dyn Material>,
    ) -> Result<Self, ConfigError> {
        if radius < 0.0 {
            return Err(ConfigError::NegativeRadius(radius));
        }

        let rvec = Vec3::splat(radius);
        let box0 = Aabb::from_points(center0 - rvec, center0 + rvec);
        let box1 = Aabb::from_points(center1 - rvec, center1 + rvec);

        Ok(Self {
            center0,
            motion: center1 - center0,
            radius,
            material,
            bbox: Aabb::surrounding(&box0, &box1),
        })
    }

    /// Center of the sphere at the given time.
    #[inline]
    pub fn center(&self, time: f32) -> Vec3 {
        self.center0 + time * self.motion
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn get_sphere_uv(p: Vec3) -> (f32, f32) {
        // theta: angle down from +Y
        // phi: angle around Y axis from -X
        let theta = p.y.clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }
}

impl Hittable for Sphere {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, _rng: &mut dyn RngCore) -> Option<HitRecord<'a>> {
        if self.radius == 0.0 {
            return None;
        }

        let center = self.center(ray.time);
        let oc = center - ray.origin;
        let a = ray.direction.length_squared();
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - center) / self.radius;
        let uv = Self::get_sphere_uv(outward_normal);

        Some(HitRecord::new(ray, root, outward_normal, uv, self.material.as_ref()))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Lambertian};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::from_color(Color::splat(0.5)))
    }

    fn interval() -> Interval {
        Interval::new(0.001, f32::INFINITY)
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, gray()).unwrap();
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rng = StdRng::seed_from_u64(0);

        let rec = sphere.hit(&ray, interval(), &mut rng).unwrap();
        assert!((rec.t - 0.5).abs() < 0.001); // Should hit at t=0.5
    }

    #[test]
    fn test_sphere_hit_from_outside_axis() {
        let mut rng = StdRng::seed_from_u64(0);
        for r in [0.25, 1.0, 2.5] {
            let sphere = Sphere::new(Vec3::ZERO, r, gray()).unwrap();
            let ray = Ray::new_simple(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
            let rec = sphere.hit(&ray, interval(), &mut rng).unwrap();

            assert!((rec.t - (5.0 - r)).abs() < 1e-4);
            assert!((rec.normal.length() - 1.0).abs() < 1e-5);
            // Normal points away from the center
            assert!(rec.normal.dot(rec.p) > 0.0);
            assert!(rec.front_face);
        }
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, gray()).unwrap();
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        let mut rng = StdRng::seed_from_u64(0);

        assert!(sphere.hit(&ray, interval(), &mut rng).is_none());
    }

    #[test]
    fn test_sphere_hit_from_inside() {
        let sphere = Sphere::new(Vec3::ZERO, 2.0, gray()).unwrap();
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::X);
        let mut rng = StdRng::seed_from_u64(0);

        let rec = sphere.hit(&ray, interval(), &mut rng).unwrap();
        assert!((rec.t - 2.0).abs() < 1e-5);
        assert!(!rec.front_face);
        assert!((rec.normal - (-Vec3::X)).length() < 1e-5);
    }

    #[test]
    fn test_sphere_respects_interval() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, gray()).unwrap();
        let ray = Ray::new_simple(Vec3::ZERO, -Vec3::Z);
        let mut rng = StdRng::seed_from_u64(0);

        // Near root at 4 excluded, far root at 6 accepted
        let rec = sphere.hit(&ray, Interval::new(4.5, 10.0), &mut rng).unwrap();
        assert!((rec.t - 6.0).abs() < 1e-4);
        assert!(sphere.hit(&ray, Interval::new(0.0, 3.0), &mut rng).is_none());
    }

    #[test]
    fn test_sphere_unnormalized_direction() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -4.0), 1.0, gray()).unwrap();
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -2.0));
        let mut rng = StdRng::seed_from_u64(0);

        let rec = sphere.hit(&ray, interval(), &mut rng).unwrap();
        assert!((rec.t - 1.5).abs() < 1e-5);
        assert!((rec.p - Vec3::new(0.0, 0.0, -3.0)).length() < 1e-5);
    }

    #[test]
    fn test_sphere_uv() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, gray()).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        // Hit the +X point: phi = pi, theta = pi/2
        let ray = Ray::new_simple(Vec3::new(5.0, 0.0, 0.0), -Vec3::X);
        let rec = sphere.hit(&ray, interval(), &mut rng).unwrap();
        assert!((rec.u - 0.5).abs() < 1e-5);
        assert!((rec.v - 0.5).abs() < 1e-5);

        // Top of the sphere: theta = 0
        let ray = Ray::new_simple(Vec3::new(0.0, 5.0, 0.0), -Vec3::Y);
        let rec = sphere.hit(&ray, interval(), &mut rng).unwrap();
        assert!(rec.v.abs() < 1e-3);
    }

    #[test]
    fn test_negative_radius_rejected() {
        let err = Sphere::new(Vec3::ZERO, -1.0, gray()).err();
        assert_eq!(err, Some(ConfigError::NegativeRadius(-1.0)));
    }

    #[test]
    fn test_zero_radius_never_hits() {
        let sphere = Sphere::new(Vec3::ZERO, 0.0, gray()).unwrap();
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);
        let mut rng = StdRng::seed_from_u64(0);

        assert!(sphere.hit(&ray, Interval::UNIVERSE, &mut rng).is_none());
    }

    #[test]
    fn test_zero_direction_does_not_panic() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, gray()).unwrap();
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        let mut rng = StdRng::seed_from_u64(0);

        assert!(sphere.hit(&ray, interval(), &mut rng).is_none());
    }

    #[test]
    fn test_moving_sphere() {
        let sphere = Sphere::moving(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0), 0.5, gray()).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(sphere.center(0.5), Vec3::new(0.0, 1.0, 0.0));

        let at_start = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z, 0.0);
        let at_end = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z, 1.0);
        assert!(sphere.hit(&at_start, interval(), &mut rng).is_some());
        assert!(sphere.hit(&at_end, interval(), &mut rng).is_none());

        let bbox = sphere.bounding_box();
        assert_eq!(bbox.y.min, -0.5);
        assert_eq!(bbox.y.max, 2.5);
    }
}
