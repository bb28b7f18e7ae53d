//! Edge mask generation from a directional luma gradient.
//!
//! Classifies every source pixel as "edge" (0) or "uniform" (1). The
//! classifier runs on the normalized luma plane and applies the 3x3
//! Sobel operator along the horizontal axis only:
//!
//! ```text
//!   -1 0 1
//!   -2 0 2    derivative taps [-1, 0, 1] along x,
//!   -1 0 1    smoothing taps  [1, 2, 1] along y
//! ```
//!
//! The response is a signed derivative, not a gradient magnitude: a
//! pixel is uniform when its derivative is at most `detail_level`. Two
//! consequences are part of the contract and must not be "fixed":
//!
//! - a horizontal edge (gradient along y only) classifies as uniform
//! - a bright-to-dark transition has a negative derivative and also
//!   classifies as uniform
//!
//! Border pixels use reflect-extension, mirroring the edge row/column.

use image::{GrayImage, Luma, RgbImage};

use crate::upscale::{reflect, UpscaleConfig, UpscaleError};

/// Luma weights for the RGB -> brightness conversion (ITU-R BT.601).
const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// Vertical smoothing taps of the Sobel operator.
const SMOOTH_TAPS: [f32; 3] = [1.0, 2.0, 1.0];

/// Generate the binary uniformity mask for a source image.
///
/// Returns a mask with the same dimensions as `image` whose samples are
/// restricted to {0, 1}: 1 marks a uniform pixel (smoothing candidate),
/// 0 marks an edge to preserve.
///
/// # Errors
///
/// * [`UpscaleError::InvalidParameter`] if `detail_level` is outside
///   0.1..=1.0
/// * [`UpscaleError::InvalidBuffer`] if the image has a zero dimension
pub fn edge_mask(image: &RgbImage, detail_level: f32) -> Result<GrayImage, UpscaleError> {
    let (lo, hi) = UpscaleConfig::DETAIL_RANGE;
    if !(detail_level >= lo && detail_level <= hi) {
        return Err(UpscaleError::InvalidParameter {
            name: "detail_level",
            value: f64::from(detail_level),
            expected: "a value in 0.1..=1.0",
        });
    }

    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(UpscaleError::InvalidBuffer(format!(
            "source image is {width}x{height}, both dimensions must be non-zero"
        )));
    }

    let luma = luma_plane(image);
    let w = width as usize;
    let h = height as usize;

    let mut mask = GrayImage::new(width, height);
    for y in 0..h {
        for x in 0..w {
            let gradient = sobel_x(&luma, w, h, x, y);
            let uniform = u8::from(gradient <= detail_level);
            mask.put_pixel(x as u32, y as u32, Luma([uniform]));
        }
    }
    Ok(mask)
}

/// Convert to a row-major luma plane with values normalized to [0, 1].
fn luma_plane(image: &RgbImage) -> Vec<f32> {
    image
        .pixels()
        .map(|pixel| {
            let [r, g, b] = pixel.0;
            (LUMA_WEIGHTS[0] * f32::from(r)
                + LUMA_WEIGHTS[1] * f32::from(g)
                + LUMA_WEIGHTS[2] * f32::from(b))
                / 255.0
        })
        .collect()
}

/// Signed horizontal Sobel response at `(x, y)`, with reflected borders.
fn sobel_x(luma: &[f32], w: usize, h: usize, x: usize, y: usize) -> f32 {
    let left = reflect(x as isize - 1, w);
    let right = reflect(x as isize + 1, w);

    let mut sum = 0.0;
    for (i, tap) in SMOOTH_TAPS.iter().enumerate() {
        let sy = reflect(y as isize + i as isize - 1, h);
        sum += tap * (luma[sy * w + right] - luma[sy * w + left]);
    }
    sum
}
