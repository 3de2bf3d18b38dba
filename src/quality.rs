//! Image quality assessment: sharpness scoring and glare detection.

use crate::constants::{
    GLARE_BRIGHT_RATIO, GLARE_LUMA_THRESHOLD, GLARE_MEAN_BRIGHTNESS, GLARE_QUALITY_PENALTY,
    SHARPNESS_VARIANCE_NORM,
};
use crate::filters::laplacian_variance;
use crate::types::{DecodedImage, QualityReport};
use tracing::debug;

/// Assess the quality of a decoded image.
///
/// Sharpness is the variance of the Laplacian over the luminance channel,
/// normalized so a variance of [`SHARPNESS_VARIANCE_NORM`] or more scores
/// 1.0. Glare fires when more than [`GLARE_BRIGHT_RATIO`] of pixels exceed
/// luminance [`GLARE_LUMA_THRESHOLD`] while mean luminance exceeds
/// [`GLARE_MEAN_BRIGHTNESS`]; detected glare multiplies the quality score by
/// [`GLARE_QUALITY_PENALTY`].
///
/// Deterministic for identical pixels and never mutates the input.
#[must_use]
pub fn assess_quality(image: &DecodedImage) -> QualityReport {
    let gray = image::imageops::grayscale(&image.pixels);

    let variance = laplacian_variance(&gray);
    let blur_score = (variance / SHARPNESS_VARIANCE_NORM).min(1.0);

    let total = gray.as_raw().len().max(1) as f64;
    let mut bright = 0u64;
    let mut luma_sum = 0.0f64;
    for &value in gray.as_raw() {
        if value > GLARE_LUMA_THRESHOLD {
            bright += 1;
        }
        luma_sum += f64::from(value);
    }
    let bright_ratio = bright as f64 / total;
    let brightness = luma_sum / total;
    let has_glare = bright_ratio > GLARE_BRIGHT_RATIO && brightness > GLARE_MEAN_BRIGHTNESS;

    let mut quality_score = blur_score;
    if has_glare {
        quality_score *= GLARE_QUALITY_PENALTY;
    }

    debug!(
        laplacian_variance = variance,
        bright_ratio,
        brightness,
        has_glare,
        quality_score,
        "quality assessed"
    );

    QualityReport {
        quality_score,
        has_glare,
    }
}
