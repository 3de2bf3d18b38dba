//! Rule-based textual reasons for a classification verdict.

use crate::constants::{
    FAKE_COLOR_DEVIATION_MIN, FAKE_EDGE_SHARPNESS_MAX, FAKE_LOGO_CLARITY_MAX,
    FAKE_PRINT_TEXTURE_MAX, FAKE_TEXT_ALIGNMENT_MAX, HIGH_CONFIDENCE_TIER, MAX_REASONS,
    MODERATE_CONFIDENCE_TIER, ORIGINAL_COLOR_CONSISTENCY_MIN, ORIGINAL_EDGE_SHARPNESS_MIN,
    ORIGINAL_LOGO_CLARITY_MIN, ORIGINAL_PRINT_TEXTURE_MIN, ORIGINAL_TEXT_ALIGNMENT_MIN,
};
use crate::types::{FeatureVector, Label};
use tracing::debug;

const FAKE_FALLBACK_REASONS: [&str; 3] = [
    "Overall visual quality is below authentic product standards",
    "Packaging details show inconsistencies with genuine products",
    "Manufacturing quality appears lower than expected for authentic items",
];

const ORIGINAL_FALLBACK_REASONS: [&str; 3] = [
    "Overall visual quality meets authentic product standards",
    "Packaging details are consistent with genuine products",
    "Manufacturing quality appears consistent with authentic items",
];

/// Generate human-readable reasons supporting a verdict.
///
/// Rules fire in a fixed order per label, so identical inputs always yield
/// the same reason list. When fewer than `min_reasons` rules fire, the
/// label-specific fallback set is appended; the result is truncated to
/// [`MAX_REASONS`].
#[must_use]
pub fn generate_reasons(
    features: &FeatureVector,
    label: Label,
    confidence: f32,
    min_reasons: usize,
) -> Vec<String> {
    let mut reasons: Vec<&'static str> = Vec::new();

    match label {
        Label::Fake => {
            if features.logo_clarity < FAKE_LOGO_CLARITY_MAX {
                reasons
                    .push("Logo appears blurry or poorly printed compared to authentic products");
            }
            if features.text_alignment_score < FAKE_TEXT_ALIGNMENT_MAX {
                reasons.push("Text alignment is inconsistent with genuine packaging standards");
            }
            if features.color_deviation > FAKE_COLOR_DEVIATION_MIN {
                reasons.push("Color scheme differs from authentic packaging");
            }
            if features.print_texture_score < FAKE_PRINT_TEXTURE_MAX {
                reasons.push("Print quality shows signs of low-resolution reproduction");
            }
            if features.edge_sharpness < FAKE_EDGE_SHARPNESS_MAX {
                reasons.push("Packaging edges lack the crispness of genuine products");
            }
            if confidence > HIGH_CONFIDENCE_TIER {
                reasons.push("Multiple visual indicators strongly suggest counterfeit packaging");
            } else if confidence > MODERATE_CONFIDENCE_TIER {
                reasons.push("Several visual features indicate potential counterfeit");
            }
        }
        Label::Original => {
            if features.logo_clarity > ORIGINAL_LOGO_CLARITY_MIN {
                reasons.push(
                    "Logo shows clear, high-quality printing consistent with authentic products",
                );
            }
            if features.text_alignment_score > ORIGINAL_TEXT_ALIGNMENT_MIN {
                reasons.push("Text alignment matches professional packaging standards");
            }
            if features.color_consistency > ORIGINAL_COLOR_CONSISTENCY_MIN {
                reasons.push("Color scheme is consistent with authentic packaging");
            }
            if features.print_texture_score > ORIGINAL_PRINT_TEXTURE_MIN {
                reasons.push("Print quality indicates professional manufacturing");
            }
            if features.edge_sharpness > ORIGINAL_EDGE_SHARPNESS_MIN {
                reasons.push("Packaging shows sharp, clean edges typical of genuine products");
            }
            if confidence > HIGH_CONFIDENCE_TIER {
                reasons.push("All visual indicators strongly suggest authentic packaging");
            }
        }
    }

    if reasons.len() < min_reasons {
        let fallback = match label {
            Label::Fake => &FAKE_FALLBACK_REASONS,
            Label::Original => &ORIGINAL_FALLBACK_REASONS,
        };
        reasons.extend_from_slice(fallback);
    }
    reasons.truncate(MAX_REASONS);

    debug!(%label, confidence, count = reasons.len(), "reasons generated");
    reasons.into_iter().map(str::to_owned).collect()
}
