//! Low-level pixel kernels shared by quality assessment, pixel corrections,
//! and feature extraction.

pub mod bilateral;
pub mod clahe;
pub mod hough;

pub use bilateral::bilateral_filter;
pub use clahe::clahe;
pub use hough::{detect_line_segments, LineDetectionParams, LineSegment};

use image::{GrayImage, RgbImage};
use imageproc::filter::laplacian_filter;

/// Variance of the Laplacian (second-derivative) response over a grayscale
/// image. The standard sharpness proxy: near zero for flat or blurred
/// images, large for images with strong fine edges.
#[must_use]
pub fn laplacian_variance(gray: &GrayImage) -> f64 {
    let response = laplacian_filter(gray);
    let values = response.as_raw();
    if values.is_empty() {
        return 0.0;
    }

    let n = values.len() as f64;
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    for &v in values {
        let v = f64::from(v);
        sum += v;
        sum_sq += v * v;
    }
    let mean = sum / n;
    (sum_sq / n - mean * mean).max(0.0)
}

/// Luminance plane (as an 8-bit image) plus chroma planes (as f32, in pixel
/// order) of a BT.601 full-range YCbCr decomposition.
///
/// The chroma planes stay in f32 so a round trip through a luminance-only
/// correction loses as little color information as possible.
#[must_use]
pub fn split_luma_chroma(image: &RgbImage) -> (GrayImage, Vec<f32>, Vec<f32>) {
    let (width, height) = image.dimensions();
    let mut luma = GrayImage::new(width, height);
    let mut cb = Vec::with_capacity((width * height) as usize);
    let mut cr = Vec::with_capacity((width * height) as usize);

    for (x, y, pixel) in image.enumerate_pixels() {
        let r = f32::from(pixel[0]);
        let g = f32::from(pixel[1]);
        let b = f32::from(pixel[2]);

        let y_val = 0.299 * r + 0.587 * g + 0.114 * b;
        let cb_val = 128.0 - 0.168_736 * r - 0.331_264 * g + 0.5 * b;
        let cr_val = 128.0 + 0.5 * r - 0.418_688 * g - 0.081_312 * b;

        luma.put_pixel(x, y, image::Luma([y_val.round().clamp(0.0, 255.0) as u8]));
        cb.push(cb_val);
        cr.push(cr_val);
    }

    (luma, cb, cr)
}

/// Recombine a (possibly corrected) luminance plane with the original chroma
/// planes back into an RGB image. Output values clamp to [0,255].
#[must_use]
pub fn merge_luma_chroma(luma: &GrayImage, cb: &[f32], cr: &[f32]) -> RgbImage {
    let (width, height) = luma.dimensions();
    let mut out = RgbImage::new(width, height);

    for (x, y, pixel) in luma.enumerate_pixels() {
        let idx = (y * width + x) as usize;
        let y_val = f32::from(pixel[0]);
        let cb_val = cb.get(idx).copied().unwrap_or(128.0) - 128.0;
        let cr_val = cr.get(idx).copied().unwrap_or(128.0) - 128.0;

        let r = y_val + 1.402 * cr_val;
        let g = y_val - 0.344_136 * cb_val - 0.714_136 * cr_val;
        let b = y_val + 1.772 * cb_val;

        out.put_pixel(
            x,
            y,
            image::Rgb([
                r.round().clamp(0.0, 255.0) as u8,
                g.round().clamp(0.0, 255.0) as u8,
                b.round().clamp(0.0, 255.0) as u8,
            ]),
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma, Rgb};

    #[test]
    fn test_laplacian_variance_flat_image_is_zero() {
        let gray: GrayImage = ImageBuffer::from_pixel(64, 64, Luma([128u8]));
        assert!(laplacian_variance(&gray) < 1e-9);
    }

    #[test]
    fn test_laplacian_variance_checkerboard_is_large() {
        let gray: GrayImage = ImageBuffer::from_fn(64, 64, |x, y| {
            if (x + y) % 2 == 0 {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        });
        assert!(laplacian_variance(&gray) > 1000.0);
    }

    #[test]
    fn test_luma_chroma_round_trip_is_close() {
        let image: RgbImage = ImageBuffer::from_fn(16, 16, |x, y| {
            Rgb([(x * 16) as u8, (y * 16) as u8, 90u8])
        });

        let (luma, cb, cr) = split_luma_chroma(&image);
        let restored = merge_luma_chroma(&luma, &cb, &cr);

        assert_eq!(restored.dimensions(), image.dimensions());
        for (original, round_tripped) in image.pixels().zip(restored.pixels()) {
            for c in 0..3 {
                let diff = i32::from(original[c]) - i32::from(round_tripped[c]);
                // Only the luminance plane was quantized to u8.
                assert!(diff.abs() <= 2, "channel drifted by {diff}");
            }
        }
    }

    #[test]
    fn test_gray_input_luma_equals_intensity() {
        let image: RgbImage = ImageBuffer::from_pixel(8, 8, Rgb([200u8, 200, 200]));
        let (luma, _, _) = split_luma_chroma(&image);
        assert!(luma.pixels().all(|p| p[0] == 200));
    }
}
