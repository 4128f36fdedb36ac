//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that are rendered independently
//! and in parallel using rayon. Each bucket owns a random stream seeded from
//! the render seed and its index, so the output does not depend on thread
//! scheduling.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::error::ConfigError;
use crate::renderer::{color_to_rgba, render_pixel, ImageBuffer};
use crate::{Camera, Hittable, RenderConfig};

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Generate buckets for an image, sorted in spiral order from center.
///
/// Buckets closer to the center come first, so a cancelled render still
/// holds the middle of the frame.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let mut buckets = Vec::new();
    if bucket_size == 0 {
        return buckets;
    }

    // Generate grid of buckets
    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, buckets.len()));
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_spiral(&mut buckets, width, height);

    // Update indices after sorting
    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from image center (spiral order).
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    let distance = |b: &Bucket| {
        let bx = b.x as f32 + b.width as f32 / 2.0;
        let by = b.y as f32 + b.height as f32 / 2.0;
        (bx - center_x).powi(2) + (by - center_y).powi(2)
    };

    buckets.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
}

/// Seed for a bucket's private random stream (SplitMix64 finalizer over the
/// index, mixed into the render seed).
fn bucket_seed(seed: u64, index: usize) -> u64 {
    let mut z = (index as u64).wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    seed ^ (z ^ (z >> 31))
}

/// Render a single bucket to encoded RGBA pixels.
///
/// Returns pixels in row-major order within the bucket.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
) -> Vec<[u8; 4]> {
    let mut rng = StdRng::seed_from_u64(bucket_seed(config.seed, bucket.index));
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let global_x = bucket.x + local_x;
            let global_y = bucket.y + local_y;
            let color = render_pixel(camera, world, global_x, global_y, config, &mut rng);
            pixels.push(color_to_rgba(color));
        }
    }

    log::trace!("Bucket {} done ({}x{} at {},{})", bucket.index, bucket.width, bucket.height, bucket.x, bucket.y);

    pixels
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Encoded pixels in row-major order
    pub pixels: Vec<[u8; 4]>,
}

impl BucketResult {
    /// Create a new bucket result.
    pub fn new(bucket: Bucket, pixels: Vec<[u8; 4]>) -> Self {
        Self { bucket, pixels }
    }

    /// Copy the bucket's pixels into place in the full image.
    pub fn write_into(&self, image: &mut ImageBuffer) {
        let width = self.bucket.width as usize;
        for (i, rgba) in self.pixels.iter().enumerate() {
            let x = self.bucket.x + (i % width) as u32;
            let y = self.bucket.y + (i / width) as u32;
            image.set_rgba(x, y, *rgba);
        }
    }
}

/// Cooperative cancellation flag shared between a render and its caller.
///
/// Checked once before each bucket starts; buckets already in flight finish.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that the render stop as soon as possible.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Outcome of a parallel render.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    /// The rendered image; buckets skipped after cancellation stay transparent
    pub image: ImageBuffer,
    pub buckets_done: usize,
    pub buckets_total: usize,
    pub cancelled: bool,
}

/// Render the scene across all cores, one bucket per task.
///
/// The camera must be initialized at its current settings. For a fixed
/// `config.seed` the image is identical from run to run.
pub fn render_parallel(
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
    cancel: &CancelToken,
) -> Result<RenderOutput, ConfigError> {
    config.validate()?;
    camera.check_initialized()?;

    let start = Instant::now();
    let buckets = generate_buckets(camera.image_width, camera.image_height, config.bucket_size);
    let buckets_total = buckets.len();
    let completed = AtomicUsize::new(0);

    log::info!(
        "Rendering {}x{} @ {} spp, max depth {}, {} buckets on {} threads",
        camera.image_width,
        camera.image_height,
        config.samples_per_pixel,
        config.max_depth,
        buckets_total,
        rayon::current_num_threads()
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .filter_map(|bucket| {
            if cancel.is_cancelled() {
                return None;
            }
            let pixels = render_bucket(bucket, camera, world, config);
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            log::debug!("Bucket {}/{} complete", done, buckets_total);
            Some(BucketResult::new(*bucket, pixels))
        })
        .collect();

    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);
    for result in &results {
        result.write_into(&mut image);
    }

    let buckets_done = results.len();
    let cancelled = buckets_done < buckets_total;

    if cancelled {
        log::info!(
            "Render cancelled after {}/{} buckets ({:.2?})",
            buckets_done,
            buckets_total,
            start.elapsed()
        );
    } else {
        log::info!("Render finished in {:.2?}", start.elapsed());
    }

    Ok(RenderOutput {
        image,
        buckets_done,
        buckets_total,
        cancelled,
    })
}
