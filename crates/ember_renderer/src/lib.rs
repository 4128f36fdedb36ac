//! Ember - CPU Path Tracing
//!
//! A Monte Carlo path tracer: spheres, quads, instancing, constant-density
//! media and textured materials over a BVH, rendered in parallel buckets.

mod bucket;
mod bvh;
mod camera;
mod error;
mod hittable;
mod instance;
mod material;
mod medium;
mod perlin;
mod quad;
mod renderer;
mod sphere;
mod texture;

pub use bucket::{
    generate_buckets, render_bucket, render_parallel, Bucket, BucketResult, CancelToken, RenderOutput,
};
pub use bvh::BvhNode;
pub use camera::Camera;
pub use error::{ConfigError, TextureError, TextureResult};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use instance::{RotateY, Translate};
pub use material::{Color, Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal};
pub use medium::ConstantMedium;
pub use perlin::{Perlin, DEFAULT_TURBULENCE_DEPTH};
pub use quad::{quad_box, Quad};
pub use renderer::{
    color_to_rgba, gamma, inv_gamma, ray_color, render, render_pixel, Background, ImageBuffer, RenderConfig, GAMMA,
};
pub use sphere::Sphere;
pub use texture::{CheckerSpace, CheckerTexture, ImageTexture, NoiseTexture, SolidColor, Texture};

/// Re-export Vec3 and common math types from ember_math
pub use ember_math::{Aabb, Interval, Ray, Vec3};
