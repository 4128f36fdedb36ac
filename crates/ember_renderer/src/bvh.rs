//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over the scene's objects. Every span is sorted by the
//! minimum X of its members' bounding boxes and split at the midpoint index;
//! single objects become leaves.

use crate::hittable::{HitRecord, Hittable, HittableList};
use ember_math::{Aabb, Interval, Ray};
use rand::RngCore;

/// BVH node - either a branch with two children or a leaf with one object.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node holding a single object.
    Leaf {
        object: Box<dyn Hittable>,
        bbox: Aabb,
    },
    /// Empty node (for edge cases).
    Empty,
}

impl BvhNode {
    /// Create a BVH from a list of hittable objects.
    pub fn new(objects: Vec<Box<dyn Hittable>>) -> Self {
        if objects.is_empty() {
            return BvhNode::Empty;
        }

        let count = objects.len();
        let bvh = Self::build(objects);

        log::debug!(
            "Built BVH: {} objects, {} nodes, depth {}",
            count,
            bvh.node_count(),
            bvh.depth()
        );

        bvh
    }

    /// Build a BVH over everything in a [`HittableList`].
    pub fn from_list(list: HittableList) -> Self {
        Self::new(list.into_objects())
    }

    fn leaf(object: Box<dyn Hittable>) -> Self {
        let bbox = object.bounding_box();
        BvhNode::Leaf { object, bbox }
    }

    fn branch(left: BvhNode, right: BvhNode) -> Self {
        let bbox = Aabb::surrounding(&left.bounding_box(), &right.bounding_box());
        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox,
        }
    }

    /// Recursive BVH construction.
    fn build(mut objects: Vec<Box<dyn Hittable>>) -> Self {
        // Stable sort keeps ties in insertion order
        objects.sort_by(|a, b| a.bounding_box().x.min.total_cmp(&b.bounding_box().x.min));

        match objects.len() {
            0 => BvhNode::Empty,
            1 => {
                let object = objects.remove(0);
                Self::leaf(object)
            }
            n => {
                // Split at midpoint
                let right_objects = objects.split_off(n / 2);
                let left = Self::build(objects);
                let right = Self::build(right_objects);
                Self::branch(left, right)
            }
        }
    }

    /// Total number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    /// Length of the longest root-to-leaf path (a single leaf has depth 1).
    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'a>> {
        match self {
            BvhNode::Empty => None,

            BvhNode::Leaf { object, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }
                object.hit(ray, ray_t, rng)
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let hit_left = left.hit(ray, ray_t, rng);

                // Only check right up to closest hit
                let right_max = hit_left.as_ref().map_or(ray_t.max, |rec| rec.t);
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max), rng);

                hit_right.or(hit_left)
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}
