//! Instancing wrappers that move a child object without copying its geometry.
//!
//! Rays are carried into the child's local space, intersected there, and the
//! resulting hit is carried back into world space.

use crate::hittable::{HitRecord, Hittable};
use ember_math::{Aabb, Interval, Ray, RotationY, Vec3};
use rand::RngCore;

/// A child object displaced by a fixed offset.
pub struct Translate {
    object: Box<dyn Hittable>,
    offset: Vec3,
    bbox: Aabb,
}

impl Translate {
    pub fn new(object: Box<dyn Hittable>, offset: Vec3) -> Self {
        let bbox = object.bounding_box().translate(offset);
        Self {
            object,
            offset,
            bbox,
        }
    }
}

impl Hittable for Translate {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'a>> {
        let local_ray = Ray::new(ray.origin - self.offset, ray.direction, ray.time);

        let mut rec = self.object.hit(&local_ray, ray_t, rng)?;
        rec.p += self.offset;
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// A child object rotated about the world Y axis.
pub struct RotateY {
    object: Box<dyn Hittable>,
    rotation: RotationY,
    bbox: Aabb,
}

impl RotateY {
    /// Rotate `object` by `degrees` about +Y.
    pub fn new(object: Box<dyn Hittable>, degrees: f32) -> Self {
        let rotation = RotationY::from_degrees(degrees);
        let child_bbox = object.bounding_box();
        let bbox = if child_bbox == Aabb::EMPTY {
            Aabb::EMPTY
        } else {
            rotation.transform_aabb(&child_bbox)
        };

        Self {
            object,
            rotation,
            bbox,
        }
    }
}

impl Hittable for RotateY {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'a>> {
        let local_ray = Ray::new(
            self.rotation.inverse_rotate(ray.origin),
            self.rotation.inverse_rotate(ray.direction),
            ray.time,
        );

        let mut rec = self.object.hit(&local_ray, ray_t, rng)?;
        // The rotation is rigid, so the face orientation found locally still holds
        rec.p = self.rotation.rotate(rec.p);
        rec.normal = self.rotation.rotate(rec.normal);
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
