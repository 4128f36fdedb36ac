//! Error types for scene and render configuration.

use thiserror::Error;

/// Invalid scene, camera, or render settings, reported at construction time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("samples per pixel must be at least 1")]
    ZeroSamples,

    #[error("image dimensions must be non-zero (got {width}x{height})")]
    ZeroDimensions { width: u32, height: u32 },

    #[error("vertical field of view must be in (0, 180) degrees (got {0})")]
    InvalidFieldOfView(f32),

    #[error("focus distance must be positive (got {0})")]
    InvalidFocusDistance(f32),

    #[error("defocus angle must be in [0, 180) degrees (got {0})")]
    InvalidDefocusAngle(f32),

    #[error("camera view is degenerate: look_from equals look_at or vup is parallel to the view direction")]
    DegenerateView,

    #[error("camera must be initialized at its current settings before rendering")]
    CameraNotInitialized,

    #[error("sphere radius must not be negative (got {0})")]
    NegativeRadius(f32),

    #[error("medium density must not be negative (got {0})")]
    NegativeDensity(f32),

    #[error("medium density must be finite (got {0})")]
    NonFiniteDensity(f32),

    #[error("bucket size must be at least 1")]
    ZeroBucketSize,

    #[error("texture has no pixels")]
    EmptyTexture,

    #[error("texture data has {actual} bytes, expected {expected}")]
    TextureSizeMismatch { expected: usize, actual: usize },
}

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid texture: {0}")]
    Config(#[from] ConfigError),
}

pub type TextureResult<T> = Result<T, TextureError>;
