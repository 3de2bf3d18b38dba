//! Core types for the image assessment and explanation pipeline

use crate::error::{Result, VeriscanError};
use image::RgbImage;
use ndarray::Array3;
use serde::{Deserialize, Serialize};

/// Image container formats accepted by the validation gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImageFormatKind {
    Jpeg,
    Png,
    WebP,
    Bmp,
    Tiff,
    /// Header did not match any known container format.
    Unknown,
}

impl ImageFormatKind {
    /// Map a format detected by the image codec layer to a format kind.
    #[must_use]
    pub fn from_image_format(format: image::ImageFormat) -> Self {
        match format {
            image::ImageFormat::Jpeg => Self::Jpeg,
            image::ImageFormat::Png => Self::Png,
            image::ImageFormat::WebP => Self::WebP,
            image::ImageFormat::Bmp => Self::Bmp,
            image::ImageFormat::Tiff => Self::Tiff,
            _ => Self::Unknown,
        }
    }

    /// Detect the format of raw bytes, returning `Unknown` for unrecognized
    /// or truncated headers rather than an error.
    #[must_use]
    pub fn detect(bytes: &[u8]) -> Self {
        image::guess_format(bytes).map_or(Self::Unknown, Self::from_image_format)
    }
}

impl std::fmt::Display for ImageFormatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::WebP => "WEBP",
            Self::Bmp => "BMP",
            Self::Tiff => "TIFF",
            Self::Unknown => "UNKNOWN",
        };
        write!(f, "{name}")
    }
}

/// A decoded, RGB-forced pixel grid plus basic facts about the upload.
///
/// Alpha, grayscale, and paletted inputs are converted during decode; spatial
/// dimensions are preserved exactly. Owned by a single request and never
/// shared across concurrent pipeline invocations.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// 8-bit RGB pixel grid (height x width x 3).
    pub pixels: RgbImage,
    /// Container format declared by the upload's header.
    pub format: ImageFormatKind,
}

impl DecodedImage {
    #[must_use]
    pub fn new(pixels: RgbImage, format: ImageFormatKind) -> Self {
        Self { pixels, format }
    }

    /// Image width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Image height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// Outcome of image quality assessment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    /// Overall quality in [0,1], driven by sharpness and penalized for glare.
    pub quality_score: f64,
    /// Whether the glare heuristic fired.
    pub has_glare: bool,
}

/// A pixel-level preprocessing step applied before inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreprocessingStep {
    GlareReduction,
    LightingNormalization,
    ProductDetection,
    Resize,
    Normalize,
}

impl PreprocessingStep {
    /// Canonical step name as recorded in metadata.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GlareReduction => "glare_reduction",
            Self::LightingNormalization => "lighting_normalization",
            Self::ProductDetection => "product_detection",
            Self::Resize => "resize",
            Self::Normalize => "normalize",
        }
    }
}

impl std::fmt::Display for PreprocessingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered record of the preprocessing steps applied to one image.
///
/// The order matches application order; tests assert on it and downstream
/// persistence stores it verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreprocessingRecord {
    steps: Vec<PreprocessingStep>,
}

impl PreprocessingRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step to the record.
    pub fn push(&mut self, step: PreprocessingStep) {
        self.steps.push(step);
    }

    /// Steps in application order.
    #[must_use]
    pub fn steps(&self) -> &[PreprocessingStep] {
        &self.steps
    }

    /// Whether a given step was applied.
    #[must_use]
    pub fn contains(&self, step: PreprocessingStep) -> bool {
        self.steps.contains(&step)
    }

    /// Step names in application order.
    #[must_use]
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.as_str()).collect()
    }
}

/// Per-stage timing breakdown for one pipeline invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingTimings {
    /// Validation and decode of the raw upload.
    pub decode_ms: u64,
    /// Quality assessment plus pixel corrections, resize, and normalization.
    pub preprocessing_ms: u64,
    /// External classifier call.
    pub inference_ms: u64,
    /// Feature extraction, reasons, comparison, and overlay.
    pub explanation_ms: u64,
    /// Total end-to-end time.
    pub total_ms: u64,
}

/// Metadata record handed to logging/persistence collaborators.
///
/// The serialized field names are the stable contract consumed by the
/// surrounding service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageMetadata {
    /// Width of the upload before any resizing.
    pub original_width: u32,
    /// Height of the upload before any resizing.
    pub original_height: u32,
    /// Detected container format.
    pub file_format: ImageFormatKind,
    /// Size of the raw upload in bytes.
    pub file_size_bytes: u64,
    /// Quality score from the assessor, in [0,1].
    pub quality_score: f64,
    /// Whether glare was detected.
    pub has_glare: bool,
    /// Ordered list of applied preprocessing steps.
    pub preprocessing_applied: PreprocessingRecord,
    /// Timing breakdown; not part of the serialized contract.
    #[serde(skip)]
    pub timings: ProcessingTimings,
}

/// The fixed-size, value-normalized tensor consumed by the classifier.
///
/// Shape is (`target_size`, `target_size`, 3) in row-major HWC order. Owned
/// exclusively by the inference call and never mutated after creation.
pub type InferenceTensor = Array3<f32>;

/// Hand-engineered visual quality features extracted from the original
/// decoded image (never from the normalized inference tensor).
///
/// Every score is in [0,1] by construction, and
/// `color_deviation == 1 - color_consistency` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub logo_clarity: f32,
    pub text_alignment_score: f32,
    pub color_consistency: f32,
    pub print_texture_score: f32,
    pub edge_sharpness: f32,
    pub color_deviation: f32,
}

impl FeatureVector {
    /// Build a feature vector from the five independent scores; the derived
    /// `color_deviation` is filled in automatically.
    #[must_use]
    pub fn new(
        logo_clarity: f32,
        text_alignment_score: f32,
        color_consistency: f32,
        print_texture_score: f32,
        edge_sharpness: f32,
    ) -> Self {
        Self {
            logo_clarity,
            text_alignment_score,
            color_consistency,
            print_texture_score,
            edge_sharpness,
            color_deviation: 1.0 - color_consistency,
        }
    }

    /// All six scores with their canonical names, in declaration order.
    #[must_use]
    pub fn named_scores(&self) -> [(&'static str, f32); 6] {
        [
            ("logo_clarity", self.logo_clarity),
            ("text_alignment_score", self.text_alignment_score),
            ("color_consistency", self.color_consistency),
            ("print_texture_score", self.print_texture_score),
            ("edge_sharpness", self.edge_sharpness),
            ("color_deviation", self.color_deviation),
        ]
    }
}

/// Binary authenticity label produced by the external classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    Original,
    Fake,
}

impl Label {
    /// Class index used for activation map lookups (Original = 0, Fake = 1).
    #[must_use]
    pub fn class_index(self) -> usize {
        match self {
            Self::Original => 0,
            Self::Fake => 1,
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Original => write!(f, "Original"),
            Self::Fake => write!(f, "Fake"),
        }
    }
}

/// Classifier output for one inference tensor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted authenticity label.
    pub label: Label,
    /// Confidence on a 0-100 scale.
    pub confidence: f32,
    /// Softmax probabilities for [Original, Fake].
    pub class_probabilities: [f32; 2],
}

impl Prediction {
    pub fn new(label: Label, confidence: f32, class_probabilities: [f32; 2]) -> Result<Self> {
        if !(0.0..=100.0).contains(&confidence) {
            return Err(VeriscanError::inference(format!(
                "confidence {confidence} outside 0-100 scale"
            )));
        }
        Ok(Self {
            label,
            confidence,
            class_probabilities,
        })
    }
}

/// Similarity of an extracted feature vector to the fixed authentic baseline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceComparison {
    /// `{feature}_similarity` entries plus `overall_similarity`, each in [0,1].
    /// Empty when no comparable features were supplied.
    pub scores: std::collections::BTreeMap<String, f32>,
}

/// The complete explanation for one classification, created once per request
/// and never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct ExplanationResult {
    /// Label that conditioned the explanation rules.
    pub label: Label,
    /// Confidence that conditioned the summary tier, 0-100.
    pub confidence: f32,
    /// The feature vector the reasons were derived from.
    pub feature_scores: FeatureVector,
    /// 3-5 ranked human-readable reasons, in rule evaluation order.
    pub textual_reasons: Vec<String>,
    /// Similarity to the authentic reference vector, when requested.
    pub reference_comparison: Option<ReferenceComparison>,
    /// Whether the classifier supplied an activation map for the overlay.
    pub heatmap_available: bool,
    /// Activation heatmap blended onto the original image, when available.
    #[serde(skip)]
    pub heatmap_overlay: Option<RgbImage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_kind_detection() {
        // Minimal PNG signature
        let png_magic = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(ImageFormatKind::detect(&png_magic), ImageFormatKind::Png);
        assert_eq!(ImageFormatKind::detect(&[0x00, 0x01]), ImageFormatKind::Unknown);
        assert_eq!(ImageFormatKind::Jpeg.to_string(), "JPEG");
    }

    #[test]
    fn test_preprocessing_record_order() {
        let mut record = PreprocessingRecord::new();
        record.push(PreprocessingStep::GlareReduction);
        record.push(PreprocessingStep::LightingNormalization);
        record.push(PreprocessingStep::Resize);
        record.push(PreprocessingStep::Normalize);

        assert_eq!(
            record.step_names(),
            vec!["glare_reduction", "lighting_normalization", "resize", "normalize"]
        );
        assert!(record.contains(PreprocessingStep::Resize));
        assert!(!record.contains(PreprocessingStep::ProductDetection));
    }

    #[test]
    fn test_preprocessing_record_serializes_as_names() {
        let mut record = PreprocessingRecord::new();
        record.push(PreprocessingStep::Resize);
        record.push(PreprocessingStep::Normalize);

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"["resize","normalize"]"#);
    }

    #[test]
    fn test_feature_vector_derived_deviation() {
        let features = FeatureVector::new(0.8, 0.7, 0.6, 0.5, 0.4);
        assert!((features.color_deviation - 0.4).abs() < f32::EPSILON);
        assert_eq!(features.named_scores().len(), 6);
    }

    #[test]
    fn test_label_class_index() {
        assert_eq!(Label::Original.class_index(), 0);
        assert_eq!(Label::Fake.class_index(), 1);
        assert_eq!(Label::Fake.to_string(), "Fake");
    }

    #[test]
    fn test_prediction_confidence_range() {
        assert!(Prediction::new(Label::Fake, 87.5, [0.125, 0.875]).is_ok());
        assert!(Prediction::new(Label::Fake, 120.0, [0.0, 1.0]).is_err());
    }

    #[test]
    fn test_metadata_serialized_contract() {
        let metadata = ImageMetadata {
            original_width: 640,
            original_height: 480,
            file_format: ImageFormatKind::Jpeg,
            file_size_bytes: 12_345,
            quality_score: 0.82,
            has_glare: false,
            preprocessing_applied: PreprocessingRecord::new(),
            timings: ProcessingTimings::default(),
        };

        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["original_width"], 640);
        assert_eq!(json["file_format"], "JPEG");
        assert_eq!(json["preprocessing_applied"], serde_json::json!([]));
        // Timings are internal only.
        assert!(json.get("timings").is_none());
    }
}
