//! The end-to-end pipeline: raw upload bytes in, inference tensor and
//! explanation out.

use crate::classifier::Classifier;
use crate::config::PipelineConfig;
use crate::constants::DEFAULT_OVERLAY_ALPHA;
use crate::decode::decode_image;
use crate::enhance::{crop_product_region, normalize_lighting, reduce_glare};
use crate::error::Result;
use crate::features::extract_features;
use crate::heatmap::overlay_heatmap;
use crate::quality::assess_quality;
use crate::reasons::generate_reasons;
use crate::reference::compare_with_reference;
use crate::tensor::{resize_for_inference, to_tensor};
use crate::types::{
    DecodedImage, ExplanationResult, ImageMetadata, InferenceTensor, PreprocessingRecord,
    PreprocessingStep, Prediction, ProcessingTimings,
};
use crate::validation::ValidationGate;
use instant::Instant;
use tracing::{debug, info, instrument};

/// A validated, preprocessed image ready for inference.
///
/// Holds the inference tensor alongside the untouched decoded pixels; the
/// explanation path scores the image as captured, not as normalized.
#[derive(Debug, Clone)]
pub struct PreparedImage {
    /// Resized, value-normalized classifier input.
    pub tensor: InferenceTensor,
    /// Structured metadata handed to logging and persistence.
    pub metadata: ImageMetadata,
    /// The image as decoded, before enhancement.
    pub decoded: DecodedImage,
}

/// Everything produced for one classified upload.
#[derive(Debug, Clone)]
pub struct ClassificationOutput {
    /// Verdict from the injected classifier.
    pub prediction: Prediction,
    /// Feature scores, reasons, reference comparison, and overlay.
    pub explanation: ExplanationResult,
    /// Upload metadata plus the timing breakdown.
    pub metadata: ImageMetadata,
}

/// Orchestrates validation, preprocessing, inference, and explanation.
///
/// The classifier is injected per call rather than held by the pipeline, so
/// one pipeline instance can serve many backends and stays trivially
/// shareable across threads.
#[derive(Debug, Clone, Default)]
pub struct ImagePipeline {
    config: PipelineConfig,
}

impl ImagePipeline {
    /// Pipeline with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pipeline with a validated configuration.
    pub fn with_config(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Validate, decode, assess, and normalize an upload into an inference
    /// tensor.
    ///
    /// Enhancement never feeds back into the returned metadata's quality
    /// score; quality describes the upload as received.
    #[instrument(skip_all, fields(bytes = bytes.len()))]
    pub fn prepare(&self, bytes: &[u8]) -> Result<PreparedImage> {
        let total_start = Instant::now();

        let decode_start = Instant::now();
        ValidationGate::new(&self.config).validate(bytes)?;
        let decoded = decode_image(bytes)?;
        let decode_ms = decode_start.elapsed().as_millis() as u64;

        let preprocess_start = Instant::now();
        let quality = assess_quality(&decoded);
        let mut record = PreprocessingRecord::new();
        let mut working = decoded.pixels.clone();

        if self.config.apply_glare_reduction && quality.has_glare {
            working = reduce_glare(&working);
            record.push(PreprocessingStep::GlareReduction);
        }
        if self.config.apply_lighting_normalization {
            working = normalize_lighting(&working);
            record.push(PreprocessingStep::LightingNormalization);
        }
        if self.config.detect_product {
            working = crop_product_region(&working);
            record.push(PreprocessingStep::ProductDetection);
        }
        let resized = resize_for_inference(&working, self.config.target_size)?;
        record.push(PreprocessingStep::Resize);
        let tensor = to_tensor(&resized, self.config.normalization)?;
        record.push(PreprocessingStep::Normalize);
        let preprocessing_ms = preprocess_start.elapsed().as_millis() as u64;

        let metadata = ImageMetadata {
            original_width: decoded.pixels.width(),
            original_height: decoded.pixels.height(),
            file_format: decoded.format,
            file_size_bytes: bytes.len() as u64,
            quality_score: quality.quality_score,
            has_glare: quality.has_glare,
            preprocessing_applied: record,
            timings: ProcessingTimings {
                decode_ms,
                preprocessing_ms,
                total_ms: total_start.elapsed().as_millis() as u64,
                ..ProcessingTimings::default()
            },
        };
        debug!(
            width = metadata.original_width,
            height = metadata.original_height,
            quality_score = metadata.quality_score,
            has_glare = metadata.has_glare,
            steps = ?metadata.preprocessing_applied.step_names(),
            "image prepared"
        );

        Ok(PreparedImage {
            tensor,
            metadata,
            decoded,
        })
    }

    /// Run the full pipeline: prepare, classify through the injected
    /// backend, and explain the verdict.
    #[instrument(skip_all, fields(classifier = classifier.name()))]
    pub fn classify(
        &self,
        bytes: &[u8],
        classifier: &dyn Classifier,
    ) -> Result<ClassificationOutput> {
        let total_start = Instant::now();
        let prepared = self.prepare(bytes)?;
        let PreparedImage {
            tensor,
            mut metadata,
            decoded,
        } = prepared;

        let inference_start = Instant::now();
        let prediction = classifier.predict(&tensor)?;
        metadata.timings.inference_ms = inference_start.elapsed().as_millis() as u64;

        let explanation_start = Instant::now();
        let explanation = self.explain(&decoded, &tensor, &prediction, classifier)?;
        metadata.timings.explanation_ms = explanation_start.elapsed().as_millis() as u64;
        metadata.timings.total_ms = total_start.elapsed().as_millis() as u64;

        info!(
            label = %prediction.label,
            confidence = prediction.confidence,
            reasons = explanation.textual_reasons.len(),
            heatmap = explanation.heatmap_available,
            total_ms = metadata.timings.total_ms,
            "classification complete"
        );

        Ok(ClassificationOutput {
            prediction,
            explanation,
            metadata,
        })
    }

    /// Build the explanation for a prediction from the original decoded
    /// pixels.
    fn explain(
        &self,
        decoded: &DecodedImage,
        tensor: &InferenceTensor,
        prediction: &Prediction,
        classifier: &dyn Classifier,
    ) -> Result<ExplanationResult> {
        let features = extract_features(&decoded.pixels);
        let textual_reasons = generate_reasons(
            &features,
            prediction.label,
            prediction.confidence,
            self.config.min_reasons,
        );
        let reference_comparison = self
            .config
            .compare_reference
            .then(|| compare_with_reference(&features));

        let heatmap_overlay = match classifier
            .activation_map(tensor, prediction.label.class_index())?
        {
            Some(map) => Some(overlay_heatmap(
                &decoded.pixels,
                &map,
                DEFAULT_OVERLAY_ALPHA,
            )?),
            None => None,
        };

        Ok(ExplanationResult {
            label: prediction.label,
            confidence: prediction.confidence,
            feature_scores: features,
            textual_reasons,
            reference_comparison,
            heatmap_available: heatmap_overlay.is_some(),
            heatmap_overlay,
        })
    }
}
