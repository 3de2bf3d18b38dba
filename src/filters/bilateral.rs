//! Edge-preserving bilateral smoothing for glare regions.
//!
//! Each output pixel is a weighted average of its neighborhood, where the
//! weight combines spatial closeness with color similarity to the center
//! pixel. Flat overexposed patches get smoothed while strong edges, whose
//! neighbors differ sharply in color, are left intact.

use image::{Rgb, RgbImage};

/// Apply a bilateral filter to an RGB image.
///
/// `diameter` is the pixel neighborhood width (an odd value; the radius is
/// `diameter / 2`). `sigma_color` is the tolerance in summed per-channel
/// intensity difference; `sigma_space` is the spatial falloff in pixels.
/// Border pixels use clamped coordinates. Dimensions are preserved.
#[must_use]
pub fn bilateral_filter(
    image: &RgbImage,
    diameter: u32,
    sigma_color: f32,
    sigma_space: f32,
) -> RgbImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    let radius = (diameter / 2).max(1) as i64;
    let offsets = spatial_offsets(radius, sigma_space);
    let color_weights = color_weight_table(sigma_color);

    let mut out = RgbImage::new(width, height);
    for (x, y, center) in image.enumerate_pixels() {
        let mut weight_sum = 0.0f32;
        let mut sums = [0.0f32; 3];

        for &(dx, dy, spatial_weight) in &offsets {
            let nx = (i64::from(x) + dx).clamp(0, i64::from(width) - 1) as u32;
            let ny = (i64::from(y) + dy).clamp(0, i64::from(height) - 1) as u32;
            let neighbor = image.get_pixel(nx, ny);

            let color_distance = (i32::from(neighbor[0]) - i32::from(center[0])).unsigned_abs()
                + (i32::from(neighbor[1]) - i32::from(center[1])).unsigned_abs()
                + (i32::from(neighbor[2]) - i32::from(center[2])).unsigned_abs();
            let weight = spatial_weight * color_weights[color_distance as usize];

            weight_sum += weight;
            for c in 0..3 {
                sums[c] += weight * f32::from(neighbor[c]);
            }
        }

        let pixel = Rgb([
            (sums[0] / weight_sum).round().clamp(0.0, 255.0) as u8,
            (sums[1] / weight_sum).round().clamp(0.0, 255.0) as u8,
            (sums[2] / weight_sum).round().clamp(0.0, 255.0) as u8,
        ]);
        out.put_pixel(x, y, pixel);
    }

    out
}

/// Circular neighborhood offsets with their precomputed spatial weights.
fn spatial_offsets(radius: i64, sigma_space: f32) -> Vec<(i64, i64, f32)> {
    let gauss_coeff = -0.5 / (sigma_space * sigma_space);
    let mut offsets = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let dist_sq = (dx * dx + dy * dy) as f32;
            if dist_sq <= (radius * radius) as f32 {
                offsets.push((dx, dy, (dist_sq * gauss_coeff).exp()));
            }
        }
    }
    offsets
}

/// Gaussian weight lookup over the 0..=765 range of summed channel
/// differences.
fn color_weight_table(sigma_color: f32) -> Vec<f32> {
    let gauss_coeff = -0.5 / (sigma_color * sigma_color);
    (0..=255 * 3)
        .map(|d| {
            let d = d as f32;
            (d * d * gauss_coeff).exp()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageBuffer;

    #[test]
    fn test_preserves_dimensions_and_uniform_regions() {
        let image: RgbImage = ImageBuffer::from_pixel(32, 24, Rgb([200u8, 180, 160]));
        let out = bilateral_filter(&image, 9, 75.0, 75.0);

        assert_eq!(out.dimensions(), (32, 24));
        // A uniform image is a fixed point of the filter.
        assert!(out.pixels().all(|p| *p == Rgb([200u8, 180, 160])));
    }

    #[test]
    fn test_smooths_speckle_noise() {
        // Mid-gray field with isolated bright speckles.
        let image: RgbImage = ImageBuffer::from_fn(33, 33, |x, y| {
            if x % 8 == 4 && y % 8 == 4 {
                Rgb([180u8, 180, 180])
            } else {
                Rgb([128u8, 128, 128])
            }
        });

        let out = bilateral_filter(&image, 9, 75.0, 75.0);
        let speckle = out.get_pixel(4, 4);
        assert!(
            speckle[0] < 180,
            "speckle should be pulled toward its neighborhood, got {}",
            speckle[0]
        );
    }

    #[test]
    fn test_preserves_strong_edges() {
        // Hard black/white vertical edge.
        let image: RgbImage = ImageBuffer::from_fn(40, 40, |x, _| {
            if x < 20 {
                Rgb([0u8, 0, 0])
            } else {
                Rgb([255u8, 255, 255])
            }
        });

        let out = bilateral_filter(&image, 9, 75.0, 75.0);
        // Pixels well inside each side remain essentially unchanged, and the
        // edge stays sharp: adjacent columns across the boundary still differ
        // strongly.
        assert!(out.get_pixel(5, 20)[0] < 30);
        assert!(out.get_pixel(35, 20)[0] > 225);
        let left_of_edge = out.get_pixel(19, 20)[0];
        let right_of_edge = out.get_pixel(20, 20)[0];
        assert!(i32::from(right_of_edge) - i32::from(left_of_edge) > 100);
    }
}
