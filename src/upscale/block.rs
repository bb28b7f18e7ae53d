//! Nearest-neighbor block replication.
//!
//! Every source pixel expands into a `factor x factor` block of
//! identical value. This is the only upscaling strategy: no
//! interpolation and no anti-aliasing, so hard edges survive exactly.
//! The compositor smooths the blocky result afterwards, selectively.

use image::{ImageBuffer, Pixel};

use crate::upscale::UpscaleError;

/// Replicate every pixel of `input` into a `factor x factor` block.
///
/// Generic over the pixel type so the same path serves the 3-channel
/// image and the 1-channel mask. `factor = 1` returns a fresh copy of
/// the input.
///
/// # Errors
///
/// * [`UpscaleError::InvalidParameter`] if `factor < 1`; the value is
///   never silently clamped
/// * [`UpscaleError::InvalidBuffer`] if the input has a zero dimension
pub fn block_upscale<P: Pixel>(
    input: &ImageBuffer<P, Vec<P::Subpixel>>,
    factor: u32,
) -> Result<ImageBuffer<P, Vec<P::Subpixel>>, UpscaleError> {
    if factor < 1 {
        return Err(UpscaleError::InvalidParameter {
            name: "factor",
            value: f64::from(factor),
            expected: "an integer >= 1",
        });
    }

    let (width, height) = input.dimensions();
    if width == 0 || height == 0 {
        return Err(UpscaleError::InvalidBuffer(format!(
            "input buffer is {width}x{height}, both dimensions must be non-zero"
        )));
    }

    let mut output = ImageBuffer::new(width * factor, height * factor);
    for y in 0..height {
        for x in 0..width {
            let pixel = *input.get_pixel(x, y);
            let ox = x * factor;
            let oy = y * factor;
            for dy in 0..factor {
                for dx in 0..factor {
                    output.put_pixel(ox + dx, oy + dy, pixel);
                }
            }
        }
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    #[test]
    fn test_output_dimensions() {
        let input = RgbImage::new(3, 5);
        let output = block_upscale(&input, 4).unwrap();
        assert_eq!(output.dimensions(), (12, 20));
    }

    #[test]
    fn test_factor_one_is_identity() {
        let input = RgbImage::from_fn(4, 4, |x, y| Rgb([x as u8, y as u8, (x + y) as u8]));
        let output = block_upscale(&input, 1).unwrap();
        assert_eq!(output, input);

        let mask = GrayImage::from_fn(4, 4, |x, y| Luma([u8::from((x + y) % 2 == 0)]));
        let output = block_upscale(&mask, 1).unwrap();
        assert_eq!(output, mask);
    }

    #[test]
    fn test_each_pixel_becomes_a_block() {
        let mut input = RgbImage::new(2, 2);
        input.put_pixel(0, 0, Rgb([1, 0, 0]));
        input.put_pixel(1, 0, Rgb([0, 2, 0]));
        input.put_pixel(0, 1, Rgb([0, 0, 3]));
        input.put_pixel(1, 1, Rgb([4, 4, 4]));

        let output = block_upscale(&input, 3).unwrap();
        assert_eq!(output.dimensions(), (6, 6));

        for y in 0..6u32 {
            for x in 0..6u32 {
                let expected = *input.get_pixel(x / 3, y / 3);
                assert_eq!(*output.get_pixel(x, y), expected, "at ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_mask_replication_preserves_binary_values() {
        let mask = GrayImage::from_fn(4, 1, |x, _| Luma([u8::from(x % 2 == 0)]));
        let output = block_upscale(&mask, 4).unwrap();

        assert_eq!(output.dimensions(), (16, 4));
        assert!(output.pixels().all(|p| p.0[0] <= 1));
        // First source pixel (1) covers columns 0..4, second (0) covers 4..8
        assert_eq!(output.get_pixel(3, 3).0[0], 1);
        assert_eq!(output.get_pixel(4, 0).0[0], 0);
    }

    #[test]
    fn test_factor_zero_rejected() {
        let input = RgbImage::new(2, 2);
        let err = block_upscale(&input, 0).unwrap_err();
        assert!(matches!(err, UpscaleError::InvalidParameter { name: "factor", .. }));
    }

    #[test]
    fn test_empty_buffer_rejected() {
        let input = RgbImage::new(0, 3);
        let err = block_upscale(&input, 2).unwrap_err();
        assert!(matches!(err, UpscaleError::InvalidBuffer(_)));
    }
}
