//! End-to-end pipeline tests covering the documented behavioral contract.

use std::io::Cursor;

use image::{ImageBuffer, Rgb, RgbImage};
use veriscan::{
    classify_image_bytes, ImagePipeline, Label, MockClassifier, NormalizationMethod,
    PipelineConfig,
};

fn png_bytes(image: &RgbImage) -> Vec<u8> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("in-memory PNG encoding cannot fail");
    bytes
}

fn uniform_gray(width: u32, height: u32) -> RgbImage {
    ImageBuffer::from_pixel(width, height, Rgb([128, 128, 128]))
}

fn textured(width: u32, height: u32) -> RgbImage {
    ImageBuffer::from_fn(width, height, |x, y| {
        if (x / 16 + y / 16) % 2 == 0 {
            Rgb([30, 45, 60])
        } else {
            Rgb([210, 195, 180])
        }
    })
}

#[test]
fn uniform_gray_image_scores_neutral_features() {
    let bytes = png_bytes(&uniform_gray(224, 224));
    let output = classify_image_bytes(&bytes, &MockClassifier::original()).unwrap();

    let features = output.explanation.feature_scores;
    assert!(features.logo_clarity < 1e-6);
    assert!(features.edge_sharpness < 1e-6);
    assert!(features.print_texture_score < 1e-6);
    assert!((features.text_alignment_score - 0.5).abs() < 1e-6);
    assert!((features.color_deviation - (1.0 - features.color_consistency)).abs() < 1e-6);
}

#[test]
fn quality_score_stays_in_unit_range() {
    for image in [
        uniform_gray(100, 100),
        textured(320, 240),
        ImageBuffer::from_pixel(64, 64, Rgb([255, 255, 255])),
    ] {
        let prepared = ImagePipeline::new().prepare(&png_bytes(&image)).unwrap();
        assert!((0.0..=1.0).contains(&prepared.metadata.quality_score));
    }
}

#[test]
fn tensor_is_always_target_sized() {
    for (w, h) in [(50, 50), (640, 480), (123, 457), (3000, 200)] {
        let prepared = ImagePipeline::new()
            .prepare(&png_bytes(&textured(w, h)))
            .unwrap();
        assert_eq!(prepared.tensor.dim(), (224, 224, 3));
    }
}

#[test]
fn custom_target_size_respected() {
    let config = PipelineConfig::builder().target_size(128).build().unwrap();
    let prepared = ImagePipeline::with_config(config)
        .unwrap()
        .prepare(&png_bytes(&textured(300, 300)))
        .unwrap();
    assert_eq!(prepared.tensor.dim(), (128, 128, 3));
}

#[test]
fn simple_normalization_bounds_tensor_values() {
    let prepared = ImagePipeline::new()
        .prepare(&png_bytes(&textured(256, 256)))
        .unwrap();
    for &v in prepared.tensor.iter() {
        assert!((0.0..=1.0).contains(&v));
    }
}

#[test]
fn standard_normalization_is_linear_rescale_of_simple() {
    let bytes = png_bytes(&textured(256, 256));
    let simple = ImagePipeline::new().prepare(&bytes).unwrap().tensor;
    let standard_config = PipelineConfig::builder()
        .normalization(NormalizationMethod::Standard)
        .build()
        .unwrap();
    let standard = ImagePipeline::with_config(standard_config)
        .unwrap()
        .prepare(&bytes)
        .unwrap()
        .tensor;

    // Per channel: standard = (simple - mean) / std.
    let means = [0.485f32, 0.456, 0.406];
    let stds = [0.229f32, 0.224, 0.225];
    for ((y, x, c), &s) in simple.indexed_iter() {
        let expected = (s - means[c]) / stds[c];
        assert!((standard[[y, x, c]] - expected).abs() < 1e-4);
    }
}

#[test]
fn explanation_reason_count_within_contract() {
    for classifier in [
        MockClassifier::original(),
        MockClassifier::fake(90.0),
        MockClassifier::fake(50.0),
        MockClassifier::with_prediction(Label::Original, 10.0),
    ] {
        let output = classify_image_bytes(&png_bytes(&textured(256, 256)), &classifier).unwrap();
        let count = output.explanation.textual_reasons.len();
        assert!((3..=5).contains(&count), "reason count {count}");
    }
}

#[test]
fn classification_is_deterministic() {
    let bytes = png_bytes(&textured(256, 256));
    let a = classify_image_bytes(&bytes, &MockClassifier::fake(82.0)).unwrap();
    let b = classify_image_bytes(&bytes, &MockClassifier::fake(82.0)).unwrap();

    assert_eq!(
        a.explanation.textual_reasons,
        b.explanation.textual_reasons
    );
    assert_eq!(a.explanation.feature_scores, b.explanation.feature_scores);
    assert_eq!(
        a.explanation.reference_comparison,
        b.explanation.reference_comparison
    );
}

#[test]
fn reference_similarities_within_unit_range() {
    let output =
        classify_image_bytes(&png_bytes(&textured(256, 256)), &MockClassifier::original()).unwrap();
    let comparison = output.explanation.reference_comparison.unwrap();
    assert_eq!(comparison.scores.len(), 6);
    for (name, similarity) in &comparison.scores {
        assert!(
            (0.0..=1.0).contains(similarity),
            "{name} similarity {similarity}"
        );
    }
}

#[test]
fn heatmap_overlay_matches_original_dimensions() {
    let output =
        classify_image_bytes(&png_bytes(&textured(300, 180)), &MockClassifier::fake(88.0)).unwrap();
    assert!(output.explanation.heatmap_available);
    let overlay = output.explanation.heatmap_overlay.unwrap();
    assert_eq!(overlay.dimensions(), (300, 180));
}

#[test]
fn lighting_normalization_never_escapes_byte_range() {
    // Trivially true for u8 storage; the stronger claim is that repeated
    // application converges rather than oscillating.
    let image = textured(256, 256);
    let once = veriscan::enhance::normalize_lighting(&image);
    let twice = veriscan::enhance::normalize_lighting(&once);

    let drift = |a: &RgbImage, b: &RgbImage| -> f64 {
        a.pixels()
            .zip(b.pixels())
            .map(|(p, q)| {
                (0..3)
                    .map(|c| (f64::from(p[c]) - f64::from(q[c])).abs())
                    .sum::<f64>()
            })
            .sum::<f64>()
            / (a.len() as f64)
    };
    assert!(drift(&once, &twice) <= drift(&image, &once));
}

#[test]
fn metadata_json_matches_consumer_contract() {
    let prepared = ImagePipeline::new()
        .prepare(&png_bytes(&textured(240, 180)))
        .unwrap();
    let json = serde_json::to_value(&prepared.metadata).unwrap();

    for key in [
        "original_width",
        "original_height",
        "file_format",
        "file_size_bytes",
        "quality_score",
        "has_glare",
        "preprocessing_applied",
    ] {
        assert!(json.get(key).is_some(), "missing metadata key {key}");
    }
    assert_eq!(json["original_width"], 240);
    assert_eq!(json["file_format"], "PNG");
}
