//! Alpha compositing of synthesized masks onto source images
//!
//! The mask's alpha channel acts purely as a cut-out stencil: source RGB
//! values are never altered, only visibility changes. This matches the
//! `destination-in` canvas semantic rather than a blend of colors.

use crate::error::{CutoutError, Result};
use image::{DynamicImage, GenericImageView, RgbaImage};

/// Apply a mask to a source image, producing the subject-only image
///
/// The result keeps every source RGB value untouched and multiplies the
/// source alpha by the mask alpha at the same coordinate, so an opaque
/// source pixel under an opaque mask stays fully visible and any pixel
/// under a transparent mask disappears.
///
/// # Errors
///
/// Returns `CutoutError::DimensionMismatch` when the mask and source
/// dimensions differ.
pub fn composite(source: &DynamicImage, mask: &RgbaImage) -> Result<RgbaImage> {
    let source_dims = source.dimensions();
    let mask_dims = mask.dimensions();
    if source_dims != mask_dims {
        return Err(CutoutError::dimension_mismatch(source_dims, mask_dims));
    }

    let mut result = source.to_rgba8();
    for (result_pixel, mask_pixel) in result.pixels_mut().zip(mask.pixels()) {
        let source_alpha = u16::from(result_pixel.0[3]);
        let mask_alpha = u16::from(mask_pixel.0[3]);
        result_pixel.0[3] = ((source_alpha * mask_alpha + 127) / 255) as u8;
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_source(width: u32, height: u32, rgba: [u8; 4]) -> DynamicImage {
        let img = RgbaImage::from_pixel(width, height, image::Rgba(rgba));
        DynamicImage::ImageRgba8(img)
    }

    fn solid_mask(width: u32, height: u32, alpha: u8) -> RgbaImage {
        RgbaImage::from_pixel(width, height, image::Rgba([255, 255, 255, alpha]))
    }

    #[test]
    fn test_opaque_mask_keeps_source() {
        let source = solid_source(3, 2, [10, 20, 30, 255]);
        let mask = solid_mask(3, 2, 255);

        let result = composite(&source, &mask).unwrap();
        for pixel in result.pixels() {
            assert_eq!(pixel.0, [10, 20, 30, 255]);
        }
    }

    #[test]
    fn test_transparent_mask_hides_source() {
        let source = solid_source(3, 2, [10, 20, 30, 255]);
        let mask = solid_mask(3, 2, 0);

        let result = composite(&source, &mask).unwrap();
        for pixel in result.pixels() {
            // RGB survives; only visibility changes.
            assert_eq!(pixel.0, [10, 20, 30, 0]);
        }
    }

    #[test]
    fn test_partial_mask_scales_alpha() {
        let source = solid_source(1, 1, [200, 100, 50, 255]);
        let mask = solid_mask(1, 1, 128);

        let result = composite(&source, &mask).unwrap();
        let pixel = result.get_pixel(0, 0);
        assert_eq!(&pixel.0[0..3], &[200, 100, 50]);
        assert_eq!(pixel.0[3], 128);
    }

    #[test]
    fn test_source_alpha_is_multiplied_not_replaced() {
        // Half-transparent source under a half-transparent mask ends up
        // quarter-visible.
        let source = solid_source(1, 1, [0, 0, 0, 128]);
        let mask = solid_mask(1, 1, 128);

        let result = composite(&source, &mask).unwrap();
        assert_eq!(result.get_pixel(0, 0).0[3], 64);
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let source = solid_source(2, 2, [0, 0, 0, 255]);
        let mask = solid_mask(3, 2, 255);

        let result = composite(&source, &mask);
        assert!(matches!(
            result,
            Err(CutoutError::DimensionMismatch {
                expected: (2, 2),
                actual: (3, 2),
            })
        ));
    }

    #[test]
    fn test_two_pixel_example_composite() {
        // Mask [opaque, transparent] over a 2x1 source: pixel 0 at full
        // opacity, pixel 1 fully transparent.
        let mut source_img = RgbaImage::new(2, 1);
        source_img.put_pixel(0, 0, image::Rgba([1, 2, 3, 255]));
        source_img.put_pixel(1, 0, image::Rgba([4, 5, 6, 255]));
        let source = DynamicImage::ImageRgba8(source_img);

        let mut mask = RgbaImage::new(2, 1);
        mask.put_pixel(0, 0, image::Rgba([255, 255, 255, 255]));
        mask.put_pixel(1, 0, image::Rgba([0, 0, 0, 0]));

        let result = composite(&source, &mask).unwrap();
        assert_eq!(result.get_pixel(0, 0).0, [1, 2, 3, 255]);
        assert_eq!(result.get_pixel(1, 0).0, [4, 5, 6, 0]);
    }
}
