//! Pixel-level enhancement stages applied between decoding and tensor
//! conversion: lighting normalization, glare reduction, and the optional
//! center crop used as a cheap product-region heuristic.

use crate::constants::{
    BILATERAL_DIAMETER, BILATERAL_SIGMA_COLOR, BILATERAL_SIGMA_SPACE, CLAHE_CLIP_LIMIT,
    CLAHE_TILE_GRID, PRODUCT_CROP_RATIO,
};
use crate::filters::{bilateral_filter, clahe, merge_luma_chroma, split_luma_chroma};
use image::RgbImage;
use tracing::debug;

/// Equalize uneven lighting with contrast-limited adaptive histogram
/// equalization on the luminance channel.
///
/// The image is split into luminance and chroma, CLAHE runs on luminance
/// alone with clip limit [`CLAHE_CLIP_LIMIT`] over a
/// [`CLAHE_TILE_GRID`]x[`CLAHE_TILE_GRID`] tile grid, and the channels are
/// recombined. Chroma is untouched, so hue shifts stay bounded by the
/// round-trip rounding error of the color-space conversion.
#[must_use]
pub fn normalize_lighting(image: &RgbImage) -> RgbImage {
    let (luma, cb, cr) = split_luma_chroma(image);
    let equalized = clahe(&luma, CLAHE_CLIP_LIMIT, CLAHE_TILE_GRID);
    let result = merge_luma_chroma(&equalized, &cb, &cr);
    debug!(
        width = result.width(),
        height = result.height(),
        "lighting normalized"
    );
    result
}

/// Soften specular highlights with an edge-preserving bilateral filter.
///
/// Runs on all three channels with neighborhood diameter
/// [`BILATERAL_DIAMETER`] and color/space sigmas [`BILATERAL_SIGMA_COLOR`] /
/// [`BILATERAL_SIGMA_SPACE`]. Smooths within bright blown-out regions while
/// leaving the edges around them intact.
#[must_use]
pub fn reduce_glare(image: &RgbImage) -> RgbImage {
    let result = bilateral_filter(
        image,
        BILATERAL_DIAMETER,
        BILATERAL_SIGMA_COLOR,
        BILATERAL_SIGMA_SPACE,
    );
    debug!(
        width = result.width(),
        height = result.height(),
        "glare reduced"
    );
    result
}

/// Crop the centered region covering [`PRODUCT_CROP_RATIO`] of each
/// dimension, on the assumption that the product dominates the frame center.
///
/// Degenerate crops (a computed extent of zero) return the input unchanged.
#[must_use]
pub fn crop_product_region(image: &RgbImage) -> RgbImage {
    let crop_w = (f64::from(image.width()) * PRODUCT_CROP_RATIO) as u32;
    let crop_h = (f64::from(image.height()) * PRODUCT_CROP_RATIO) as u32;
    if crop_w == 0 || crop_h == 0 {
        return image.clone();
    }
    let x = (image.width() - crop_w) / 2;
    let y = (image.height() - crop_h) / 2;
    let cropped = image::imageops::crop_imm(image, x, y, crop_w, crop_h).to_image();
    debug!(
        from_width = image.width(),
        from_height = image.height(),
        to_width = cropped.width(),
        to_height = cropped.height(),
        "product region cropped"
    );
    cropped
}
