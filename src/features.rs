//! Handcrafted feature extraction over the decoded image.
//!
//! These scores feed the textual-reason rules and the reference comparison.
//! They are computed on the image as decoded, before any enhancement, so a
//! blurry or off-color photo is scored as captured rather than as cleaned up.

use crate::constants::{
    ALIGNMENT_ANGLE_TOLERANCE, CANNY_HIGH_THRESHOLD, CANNY_LOW_THRESHOLD, COLOR_VARIANCE_NORM,
    EDGE_SHARPNESS_VARIANCE_NORM, HOUGH_MAX_LINE_GAP, HOUGH_MIN_LINE_LENGTH, HOUGH_VOTE_THRESHOLD,
    NEUTRAL_ALIGNMENT_SCORE, PRINT_TEXTURE_VARIANCE_NORM,
};
use crate::filters::hough::{detect_line_segments, LineDetectionParams};
use crate::filters::laplacian_variance;
use crate::types::FeatureVector;
use image::{GrayImage, RgbImage};
use std::f64::consts::FRAC_PI_2;
use tracing::debug;

/// Extract the six authenticity features from an image.
#[must_use]
pub fn extract_features(image: &RgbImage) -> FeatureVector {
    let gray = image::imageops::grayscale(image);

    let variance = laplacian_variance(&gray);
    let edge_sharpness = ((variance / EDGE_SHARPNESS_VARIANCE_NORM).min(1.0)) as f32;
    let print_texture_score = ((variance / PRINT_TEXTURE_VARIANCE_NORM).min(1.0)) as f32;
    let text_alignment_score = text_alignment(&gray);
    let color_consistency = color_consistency(image);

    let features = FeatureVector::new(
        edge_sharpness,
        text_alignment_score,
        color_consistency,
        print_texture_score,
        edge_sharpness,
    );
    debug!(
        logo_clarity = features.logo_clarity,
        text_alignment_score = features.text_alignment_score,
        color_consistency = features.color_consistency,
        print_texture_score = features.print_texture_score,
        edge_sharpness = features.edge_sharpness,
        "features extracted"
    );
    features
}

/// Fraction of detected line segments lying within
/// [`ALIGNMENT_ANGLE_TOLERANCE`] radians of horizontal or vertical.
///
/// Returns [`NEUTRAL_ALIGNMENT_SCORE`] when no segments are found, so
/// featureless images neither support nor undercut an authenticity claim.
fn text_alignment(gray: &GrayImage) -> f32 {
    let edges = imageproc::edges::canny(gray, CANNY_LOW_THRESHOLD, CANNY_HIGH_THRESHOLD);
    let segments = detect_line_segments(
        &edges,
        &LineDetectionParams {
            vote_threshold: HOUGH_VOTE_THRESHOLD,
            min_line_length: HOUGH_MIN_LINE_LENGTH,
            max_gap: HOUGH_MAX_LINE_GAP,
        },
    );
    if segments.is_empty() {
        return NEUTRAL_ALIGNMENT_SCORE;
    }

    let aligned = segments
        .iter()
        .filter(|segment| {
            let angle = segment.angle();
            angle < ALIGNMENT_ANGLE_TOLERANCE
                || (angle - FRAC_PI_2).abs() < ALIGNMENT_ANGLE_TOLERANCE
        })
        .count();
    aligned as f32 / segments.len() as f32
}

/// Color consistency across the four quadrants of the image.
///
/// Per-channel means are taken over each quadrant; the score is one minus
/// the per-channel variance of those means, averaged over channels and
/// normalized by [`COLOR_VARIANCE_NORM`].
fn color_consistency(image: &RgbImage) -> f32 {
    let (width, height) = image.dimensions();
    let half_w = width / 2;
    let half_h = height / 2;
    if half_w == 0 || half_h == 0 {
        return 1.0;
    }

    // (x range, y range) per quadrant; odd trailing rows/columns fall into
    // the right and bottom quadrants, matching half-open splits at w/2, h/2.
    let quadrants = [
        (0..half_w, 0..half_h),
        (half_w..width, 0..half_h),
        (0..half_w, half_h..height),
        (half_w..width, half_h..height),
    ];

    let mut means = [[0.0f64; 3]; 4];
    for (q, (xs, ys)) in quadrants.into_iter().enumerate() {
        let mut sums = [0.0f64; 3];
        let count = (xs.len() * ys.len()) as f64;
        for y in ys {
            for x in xs.clone() {
                let pixel = image.get_pixel(x, y);
                for c in 0..3 {
                    sums[c] += f64::from(pixel[c]);
                }
            }
        }
        for c in 0..3 {
            means[q][c] = sums[c] / count;
        }
    }

    // Population variance of the four quadrant means, per channel.
    let mut variance_sum = 0.0f64;
    for c in 0..3 {
        let channel_mean = means.iter().map(|m| m[c]).sum::<f64>() / 4.0;
        let channel_var = means
            .iter()
            .map(|m| (m[c] - channel_mean).powi(2))
            .sum::<f64>()
            / 4.0;
        variance_sum += channel_var;
    }
    let variance = variance_sum / 3.0;

    (1.0 - (variance / COLOR_VARIANCE_NORM).min(1.0)) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{solid_rgb_image, striped_rgb_image};

    #[test]
    fn test_uniform_image_features() {
        let features = extract_features(&solid_rgb_image(224, 224, [128, 128, 128]));
        // No edges at all, so sharpness and texture bottom out, alignment is
        // neutral, and color is perfectly consistent.
        assert!(features.logo_clarity < 1e-6);
        assert!(features.print_texture_score < 1e-6);
        assert!((features.text_alignment_score - 0.5).abs() < 1e-6);
        assert!((features.color_consistency - 1.0).abs() < 1e-6);
        assert!(features.color_deviation < 1e-6);
    }

    #[test]
    fn test_logo_clarity_equals_edge_sharpness() {
        let features = extract_features(&striped_rgb_image(224, 224, 2, [0, 0, 0], [255, 255, 255]));
        assert_eq!(features.logo_clarity, features.edge_sharpness);
        assert!(features.edge_sharpness > 0.9);
    }

    #[test]
    fn test_axis_aligned_structure_scores_high_alignment() {
        // Wide horizontal bands give long horizontal Canny edges.
        let features = extract_features(&striped_rgb_image(256, 256, 32, [0, 0, 0], [255, 255, 255]));
        assert!(
            features.text_alignment_score > 0.9,
            "alignment {}",
            features.text_alignment_score
        );
    }

    #[test]
    fn test_quadrant_color_shift_lowers_consistency() {
        // Left half black, right half white: quadrant means split 0 / 255,
        // per-channel variance 127.5^2 > 5000, so consistency floors at 0.
        let image = image::RgbImage::from_fn(200, 200, |x, _| {
            if x < 100 {
                image::Rgb([0, 0, 0])
            } else {
                image::Rgb([255, 255, 255])
            }
        });
        let features = extract_features(&image);
        assert!(features.color_consistency < 1e-6);
        assert!((features.color_deviation - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_scores_bounded() {
        let image = striped_rgb_image(300, 180, 3, [250, 10, 40], [5, 245, 220]);
        let features = extract_features(&image);
        for (_, score) in features.named_scores() {
            assert!((0.0..=1.0).contains(&score), "score {score} out of range");
        }
    }

    #[test]
    fn test_deterministic() {
        let image = striped_rgb_image(128, 128, 5, [30, 60, 90], [200, 170, 140]);
        let a = extract_features(&image);
        let b = extract_features(&image);
        assert_eq!(a, b);
    }
}
