//! Edge-preserving integer upscaling with selective smoothing
//!
//! The pipeline runs three pure stages over in-memory buffers:
//!
//! 1. [`edge_mask`] - classify every source pixel as "edge" or "uniform"
//!    from a directional luma gradient
//! 2. [`block_upscale`] - replicate every pixel into an `S x S` block,
//!    applied identically to the image and the mask
//! 3. [`selective_smooth`] - Gaussian-blur the uniform regions of the
//!    upscaled image while leaving edge pixels untouched
//!
//! [`upscale`] chains the three stages behind a validated
//! [`UpscaleConfig`]. No stage keeps state between calls; identical
//! inputs produce byte-identical outputs.

pub mod block;
pub mod edge_mask;
mod error;
pub mod smooth;

pub use block::block_upscale;
pub use edge_mask::edge_mask;
pub use error::UpscaleError;
pub use smooth::selective_smooth;

/// Re-export the buffer types so downstream users can name them without
/// a direct `image` dependency.
pub use image::{GrayImage, RgbImage};

use serde::{Deserialize, Serialize};

/// Parameters for one pipeline invocation.
///
/// Defaults mirror the historical UI defaults: 8x upscale, detail level
/// 0.1, smoothing threshold 85%.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpscaleConfig {
    /// Integer upscale factor (1-16).
    #[serde(default = "default_scale_factor")]
    pub scale_factor: u32,

    /// Edge-sensitivity threshold (0.1-1.0). Pixels whose directional
    /// gradient is at most this value classify as uniform.
    #[serde(default = "default_detail_level")]
    pub detail_level: f32,

    /// Mask coverage required before blur applies to a pixel (0.0-1.0).
    #[serde(default = "default_smoothing_threshold")]
    pub smoothing_threshold: f32,
}

impl Default for UpscaleConfig {
    fn default() -> Self {
        Self {
            scale_factor: default_scale_factor(),
            detail_level: default_detail_level(),
            smoothing_threshold: default_smoothing_threshold(),
        }
    }
}

/// Default scale factor for serde
fn default_scale_factor() -> u32 {
    8
}

/// Default detail level for serde
fn default_detail_level() -> f32 {
    0.1
}

/// Default smoothing threshold for serde
fn default_smoothing_threshold() -> f32 {
    0.85
}

impl UpscaleConfig {
    /// Smallest accepted upscale factor.
    pub const MIN_SCALE_FACTOR: u32 = 1;
    /// Largest accepted upscale factor.
    pub const MAX_SCALE_FACTOR: u32 = 16;
    /// Inclusive domain of `detail_level`.
    pub const DETAIL_RANGE: (f32, f32) = (0.1, 1.0);
    /// Inclusive domain of `smoothing_threshold`.
    pub const SMOOTHING_RANGE: (f32, f32) = (0.0, 1.0);

    /// Create a config with the given scale factor and default thresholds.
    pub fn with_scale_factor(scale_factor: u32) -> Self {
        Self { scale_factor, ..Default::default() }
    }

    /// Check every parameter against its documented domain.
    ///
    /// Runs before any buffer work; nothing is clamped or defaulted.
    pub fn validate(&self) -> Result<(), UpscaleError> {
        if self.scale_factor < Self::MIN_SCALE_FACTOR || self.scale_factor > Self::MAX_SCALE_FACTOR
        {
            return Err(UpscaleError::InvalidParameter {
                name: "scale_factor",
                value: f64::from(self.scale_factor),
                expected: "an integer in 1..=16",
            });
        }
        let (lo, hi) = Self::DETAIL_RANGE;
        if !(self.detail_level >= lo && self.detail_level <= hi) {
            return Err(UpscaleError::InvalidParameter {
                name: "detail_level",
                value: f64::from(self.detail_level),
                expected: "a value in 0.1..=1.0",
            });
        }
        let (lo, hi) = Self::SMOOTHING_RANGE;
        if !(self.smoothing_threshold >= lo && self.smoothing_threshold <= hi) {
            return Err(UpscaleError::InvalidParameter {
                name: "smoothing_threshold",
                value: f64::from(self.smoothing_threshold),
                expected: "a value in 0.0..=1.0",
            });
        }
        Ok(())
    }
}

/// Run the full pipeline: mask, upscale, selectively smooth.
///
/// Validates `config` before any buffer work, then feeds the source
/// through the three stages. Returns a buffer of exactly
/// `(W * scale_factor, H * scale_factor)`, or the first error; partial
/// results are never returned.
///
/// # Errors
///
/// * [`UpscaleError::InvalidParameter`] if any config field is outside
///   its domain
/// * [`UpscaleError::InvalidBuffer`] if the source image has a zero
///   dimension
pub fn upscale(image: &RgbImage, config: &UpscaleConfig) -> Result<RgbImage, UpscaleError> {
    config.validate()?;

    let mask = edge_mask(image, config.detail_level)?;
    let scaled_mask = block_upscale(&mask, config.scale_factor)?;
    let scaled_image = block_upscale(image, config.scale_factor)?;
    selective_smooth(&scaled_image, &scaled_mask, config.smoothing_threshold)
}

/// Map an out-of-range index back into `[0, len)` by reflecting about
/// the buffer edge (half-sample symmetric: `d c b a | a b c d | d c b a`).
///
/// Loops so that kernels wider than a tiny buffer still resolve.
pub(crate) fn reflect(index: isize, len: usize) -> usize {
    debug_assert!(len > 0);
    let len = len as isize;
    let mut i = index;
    while i < 0 || i >= len {
        if i < 0 {
            i = -i - 1;
        } else {
            i = 2 * len - i - 1;
        }
    }
    i as usize
}
