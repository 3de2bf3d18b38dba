//! Activation-map rendering: jet colormap plus alpha blending onto the
//! source image.

use crate::error::{Result, VeriscanError};
use image::{Rgb, RgbImage};
use ndarray::Array2;
use tracing::debug;

/// Render an activation map over an image.
///
/// The map is bilinearly resized to the image dimensions, mapped through the
/// jet colormap, and blended with weight `alpha` (the image keeps weight
/// `1 - alpha`). Map values are expected in `[0, 1]`; out-of-range values
/// are clamped. Empty maps and non-finite values are rejected.
pub fn overlay_heatmap(image: &RgbImage, heatmap: &Array2<f32>, alpha: f32) -> Result<RgbImage> {
    if heatmap.is_empty() {
        log::warn!("rejecting empty activation map from classifier");
        return Err(VeriscanError::processing(
            "Activation map is empty, cannot render overlay",
        ));
    }
    if heatmap.iter().any(|v| !v.is_finite()) {
        log::warn!("rejecting activation map with non-finite values");
        return Err(VeriscanError::processing(
            "Activation map contains non-finite values",
        ));
    }
    if !(0.0..=1.0).contains(&alpha) {
        return Err(VeriscanError::processing(
            "Overlay alpha must be within [0, 1]",
        ));
    }

    let (width, height) = image.dimensions();
    let resized = resize_bilinear(heatmap, width, height);

    let mut overlay = RgbImage::new(width, height);
    for (x, y, pixel) in image.enumerate_pixels() {
        let value = resized[[y as usize, x as usize]].clamp(0.0, 1.0);
        let color = jet_color(value);
        let mut blended = [0u8; 3];
        for c in 0..3 {
            let mixed = f32::from(pixel[c]) * (1.0 - alpha) + f32::from(color[c]) * alpha;
            blended[c] = mixed.round().clamp(0.0, 255.0) as u8;
        }
        overlay.put_pixel(x, y, Rgb(blended));
    }
    debug!(
        map_height = heatmap.dim().0,
        map_width = heatmap.dim().1,
        width,
        height,
        alpha,
        "heatmap overlay rendered"
    );
    Ok(overlay)
}

/// Bilinearly resize a 2D map to the given output dimensions.
fn resize_bilinear(map: &Array2<f32>, out_width: u32, out_height: u32) -> Array2<f32> {
    let (in_h, in_w) = map.dim();
    let mut out = Array2::<f32>::zeros((out_height as usize, out_width as usize));

    // Pixel-center sampling with clamped neighbors.
    let scale_x = in_w as f32 / out_width as f32;
    let scale_y = in_h as f32 / out_height as f32;
    for oy in 0..out_height as usize {
        let sy = ((oy as f32 + 0.5) * scale_y - 0.5).max(0.0);
        let y0 = (sy as usize).min(in_h - 1);
        let y1 = (y0 + 1).min(in_h - 1);
        let fy = sy - y0 as f32;
        for ox in 0..out_width as usize {
            let sx = ((ox as f32 + 0.5) * scale_x - 0.5).max(0.0);
            let x0 = (sx as usize).min(in_w - 1);
            let x1 = (x0 + 1).min(in_w - 1);
            let fx = sx - x0 as f32;

            let top = map[[y0, x0]] * (1.0 - fx) + map[[y0, x1]] * fx;
            let bottom = map[[y1, x0]] * (1.0 - fx) + map[[y1, x1]] * fx;
            out[[oy, ox]] = top * (1.0 - fy) + bottom * fy;
        }
    }
    out
}

/// Map a normalized value through the jet colormap.
///
/// Low values render blue, mid values green, high values red, following the
/// piecewise-linear ramps of the classic jet palette.
fn jet_color(value: f32) -> [u8; 3] {
    let v = value.clamp(0.0, 1.0);
    let r = jet_channel(v - 0.75);
    let g = jet_channel(v - 0.5);
    let b = jet_channel(v - 0.25);
    [r, g, b]
}

/// One jet channel: a triangular ramp centered on its offset.
fn jet_channel(centered: f32) -> u8 {
    let ramp = (1.5 - 4.0 * centered.abs()).clamp(0.0, 1.0);
    (ramp * 255.0).round() as u8
}
