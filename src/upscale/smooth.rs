//! Selective smoothing compositor.
//!
//! Blends the block-upscaled image with a Gaussian-blurred version of
//! itself, gated per pixel by the block-upscaled mask:
//!
//! 1. Build a candidate plane per channel: the channel value where
//!    `mask > threshold`, zero elsewhere. The explicit zeroing (rather
//!    than skipping) biases the blur toward black near mask boundaries;
//!    that bias is part of the contract.
//! 2. Gaussian-blur the candidate plane (sigma 1.0, radius 4, reflected
//!    borders; separable row pass then column pass).
//! 3. Per-pixel select: the blurred value where `mask > threshold`,
//!    otherwise the untouched block-upscaled value. Never a blend.
//!
//! The select writes back with a truncating cast: a blurred 127.9
//! stores 127. Per-pixel sums accumulate in f64 and planes store f32 so
//! that a constant candidate region survives the cast bit-exactly.
//!
//! The three channels are independent and fan out to rayon; the
//! classify/blur/select sequence within a channel is unchanged by the
//! parallelism, so results stay deterministic.

use image::{GrayImage, Rgb, RgbImage};
use rayon::prelude::*;

use crate::upscale::{reflect, UpscaleConfig, UpscaleError};

/// Standard deviation of the smoothing kernel.
const SIGMA: f64 = 1.0;

/// Kernel radius; support matches `floor(4 * sigma + 0.5)`.
const RADIUS: usize = 4;

/// Number of kernel taps.
const KERNEL_LEN: usize = 2 * RADIUS + 1;

/// Selectively smooth the uniform regions of an upscaled image.
///
/// `image` and `mask` must have identical dimensions; the mask carries
/// {0, 1} samples as produced by the mask generator and upscaler. The
/// output has exactly the input dimensions.
///
/// # Errors
///
/// * [`UpscaleError::InvalidParameter`] if `smoothing_threshold` is
///   outside 0.0..=1.0
/// * [`UpscaleError::InvalidBuffer`] if either buffer has a zero
///   dimension or the dimensions do not match
pub fn selective_smooth(
    image: &RgbImage,
    mask: &GrayImage,
    smoothing_threshold: f32,
) -> Result<RgbImage, UpscaleError> {
    let (lo, hi) = UpscaleConfig::SMOOTHING_RANGE;
    if !(smoothing_threshold >= lo && smoothing_threshold <= hi) {
        return Err(UpscaleError::InvalidParameter {
            name: "smoothing_threshold",
            value: f64::from(smoothing_threshold),
            expected: "a value in 0.0..=1.0",
        });
    }

    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(UpscaleError::InvalidBuffer(format!(
            "image is {width}x{height}, both dimensions must be non-zero"
        )));
    }
    if mask.dimensions() != (width, height) {
        return Err(UpscaleError::InvalidBuffer(format!(
            "mask is {}x{} but image is {width}x{height}",
            mask.width(),
            mask.height()
        )));
    }

    let w = width as usize;
    let h = height as usize;

    // Strict float comparison against the 0/1 mask samples: a threshold
    // of exactly 1.0 disables smoothing entirely.
    let gate: Vec<bool> =
        mask.pixels().map(|p| f32::from(p.0[0]) > smoothing_threshold).collect();

    let planes: Vec<Vec<u8>> = (0..3usize)
        .into_par_iter()
        .map(|channel| smooth_channel(image, &gate, channel, w, h))
        .collect();

    let mut output = RgbImage::new(width, height);
    for (i, pixel) in output.pixels_mut().enumerate() {
        *pixel = Rgb([planes[0][i], planes[1][i], planes[2][i]]);
    }
    Ok(output)
}

/// Classify, blur, select for a single channel.
fn smooth_channel(image: &RgbImage, gate: &[bool], channel: usize, w: usize, h: usize) -> Vec<u8> {
    let candidate: Vec<f32> = image
        .pixels()
        .zip(gate)
        .map(|(pixel, &open)| if open { f32::from(pixel.0[channel]) } else { 0.0 })
        .collect();

    let blurred = gaussian_blur_plane(&candidate, w, h);

    image
        .pixels()
        .zip(gate)
        .enumerate()
        .map(|(i, (pixel, &open))| if open { blurred[i] as u8 } else { pixel.0[channel] })
        .collect()
}

/// Normalized Gaussian taps for the fixed sigma and radius.
fn gaussian_kernel() -> [f64; KERNEL_LEN] {
    let mut kernel = [0.0f64; KERNEL_LEN];
    let mut sum = 0.0;
    for (i, tap) in kernel.iter_mut().enumerate() {
        let x = i as f64 - RADIUS as f64;
        *tap = (-0.5 * (x / SIGMA) * (x / SIGMA)).exp();
        sum += *tap;
    }
    for tap in &mut kernel {
        *tap /= sum;
    }
    kernel
}

/// Separable Gaussian blur over one row-major plane, reflected borders.
fn gaussian_blur_plane(plane: &[f32], w: usize, h: usize) -> Vec<f32> {
    let kernel = gaussian_kernel();

    // Row pass.
    let mut rows = vec![0.0f32; plane.len()];
    for y in 0..h {
        for x in 0..w {
            let mut sum = 0.0f64;
            for (k, tap) in kernel.iter().enumerate() {
                let sx = reflect(x as isize + k as isize - RADIUS as isize, w);
                sum += tap * f64::from(plane[y * w + sx]);
            }
            rows[y * w + x] = sum as f32;
        }
    }

    // Column pass.
    let mut out = vec![0.0f32; plane.len()];
    for y in 0..h {
        for x in 0..w {
            let mut sum = 0.0f64;
            for (k, tap) in kernel.iter().enumerate() {
                let sy = reflect(y as isize + k as isize - RADIUS as isize, h);
                sum += tap * f64::from(rows[sy * w + x]);
            }
            out[y * w + x] = sum as f32;
        }
    }
    out
}
