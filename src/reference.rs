//! Similarity of extracted features against reference authentic scores.

use crate::constants::{
    REFERENCE_COLOR_CONSISTENCY, REFERENCE_EDGE_SHARPNESS, REFERENCE_LOGO_CLARITY,
    REFERENCE_PRINT_TEXTURE, REFERENCE_TEXT_ALIGNMENT,
};
use crate::types::{FeatureVector, ReferenceComparison};

/// Reference scores observed on authentic product photos, keyed by feature.
const REFERENCE_SCORES: [(&str, f32); 5] = [
    ("logo_clarity", REFERENCE_LOGO_CLARITY),
    ("text_alignment_score", REFERENCE_TEXT_ALIGNMENT),
    ("color_consistency", REFERENCE_COLOR_CONSISTENCY),
    ("print_texture_score", REFERENCE_PRINT_TEXTURE),
    ("edge_sharpness", REFERENCE_EDGE_SHARPNESS),
];

/// Compare a feature vector against the authentic reference profile.
///
/// Each reference feature yields a `<name>_similarity` entry computed as
/// `max(0, 1 - |value - reference|)`, plus an `overall_similarity` entry
/// averaging the per-feature similarities. Only the five reference features
/// participate; the derived `color_deviation` has no reference value.
#[must_use]
pub fn compare_with_reference(features: &FeatureVector) -> ReferenceComparison {
    let named: std::collections::BTreeMap<&str, f32> = features.named_scores().into();
    let mut comparison = ReferenceComparison::default();

    let mut sum = 0.0f32;
    let mut count = 0u32;
    for (name, reference) in REFERENCE_SCORES {
        if let Some(&value) = named.get(name) {
            let similarity = (1.0 - (value - reference).abs()).max(0.0);
            comparison
                .scores
                .insert(format!("{name}_similarity"), similarity);
            sum += similarity;
            count += 1;
        }
    }
    if count > 0 {
        comparison
            .scores
            .insert("overall_similarity".to_owned(), sum / count as f32);
    }
    comparison
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_with_reference_profile() {
        let features = FeatureVector::new(0.75, 0.80, 0.75, 0.70, 0.65);
        let comparison = compare_with_reference(&features);
        assert_eq!(comparison.scores.len(), 6);
        for (name, similarity) in &comparison.scores {
            assert!(
                (similarity - 1.0).abs() < 1e-6,
                "{name} similarity {similarity}"
            );
        }
    }

    #[test]
    fn test_similarity_floors_at_zero() {
        // |0.0 - 0.75| = 0.75 keeps similarity positive, so push the
        // difference through distinct features and check bounds instead.
        let features = FeatureVector::new(0.0, 1.0, 0.0, 1.0, 0.0);
        let comparison = compare_with_reference(&features);
        for similarity in comparison.scores.values() {
            assert!((0.0..=1.0).contains(similarity));
        }
        let logo = comparison.scores["logo_clarity_similarity"];
        assert!((logo - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_overall_is_mean_of_feature_similarities() {
        let features = FeatureVector::new(0.5, 0.6, 0.7, 0.8, 0.9);
        let comparison = compare_with_reference(&features);
        let overall = comparison.scores["overall_similarity"];
        let mean: f32 = comparison
            .scores
            .iter()
            .filter(|(name, _)| *name != "overall_similarity")
            .map(|(_, v)| v)
            .sum::<f32>()
            / 5.0;
        assert!((overall - mean).abs() < 1e-6);
    }

    #[test]
    fn test_expected_key_set() {
        let comparison = compare_with_reference(&FeatureVector::new(0.1, 0.2, 0.3, 0.4, 0.5));
        let keys: Vec<&str> = comparison.scores.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            [
                "color_consistency_similarity",
                "edge_sharpness_similarity",
                "logo_clarity_similarity",
                "overall_similarity",
                "print_texture_score_similarity",
                "text_alignment_score_similarity",
            ]
        );
    }
}
