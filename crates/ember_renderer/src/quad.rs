//! Planar parallelogram primitive and the six-sided box built from it.

use std::sync::Arc;

use crate::hittable::{HitRecord, Hittable, HittableList};
use crate::Material;
use ember_math::{det, Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// Padding applied to a quad's bounding box so it never has zero thickness.
const QUAD_BOX_PADDING: f32 = 1e-4;

/// A parallelogram spanning `q`, `q + u`, `q + v` and `q + u + v`.
pub struct Quad {
    q: Vec3,
    u: Vec3,
    v: Vec3,
    normal: Vec3,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Quad {
    pub fn new(q: Vec3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        let diagonal0 = Aabb::from_points(q, q + u + v);
        let diagonal1 = Aabb::from_points(q + u, q + v);
        let bbox = Aabb::surrounding(&diagonal0, &diagonal1).pad(QUAD_BOX_PADDING);

        Self {
            q,
            u,
            v,
            normal: u.cross(v).normalize(),
            material,
            bbox,
        }
    }
}

impl Hittable for Quad {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, _rng: &mut dyn RngCore) -> Option<HitRecord<'a>> {
        // Solve q + alpha*u + beta*v = origin + t*direction with Cramer's rule.
        // A ray parallel to the plane gives a non-finite inverse determinant,
        // which fails every containment test below.
        let oq = ray.origin - self.q;
        let inv_det = 1.0 / -det(self.u, self.v, ray.direction);
        let alpha = -det(oq, self.v, ray.direction) * inv_det;
        let beta = -det(self.u, oq, ray.direction) * inv_det;
        let t = det(self.u, self.v, oq) * inv_det;

        if !ray_t.contains(t) || !Interval::UNIT.contains(alpha) || !Interval::UNIT.contains(beta) {
            return None;
        }

        Some(HitRecord::new(ray, t, self.normal, (alpha, beta), self.material.as_ref()))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// The closed axis-aligned box with opposite corners `a` and `b`, as six
/// outward-facing quads.
pub fn quad_box(a: Vec3, b: Vec3, material: Arc<dyn Material>) -> HittableList {
    let mut sides = HittableList::new();

    let min = a.min(b);
    let max = a.max(b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    let faces = [
        (Vec3::new(min.x, min.y, max.z), dx, dy),  // front
        (Vec3::new(max.x, min.y, max.z), -dz, dy), // right
        (Vec3::new(max.x, min.y, min.z), -dx, dy), // back
        (Vec3::new(min.x, min.y, min.z), dz, dy),  // left
        (Vec3::new(min.x, max.y, max.z), dx, -dz), // top
        (Vec3::new(min.x, min.y, min.z), dx, dz),  // bottom
    ];

    for (q, u, v) in faces {
        sides.add(Box::new(Quad::new(q, u, v, Arc::clone(&material))));
    }

    sides
}
