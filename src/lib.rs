#![allow(clippy::too_many_lines)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]

//! # Veriscan
//!
//! Image-quality assessment and visual-explanation pipeline for product-photo
//! authenticity checks. The crate validates raw uploads, scores their capture
//! quality, normalizes lighting and glare, converts them into fixed-size
//! inference tensors for an external convolutional classifier, and explains
//! the classifier's verdict with feature scores, textual reasons, a
//! reference-profile comparison, and an activation-heatmap overlay.
//!
//! The classifier itself is a collaborator, not part of this crate: anything
//! implementing [`Classifier`] plugs in, and [`MockClassifier`] ships for
//! tests and model-less deployments.
//!
//! ## Quick Start
//!
//! ```rust
//! use veriscan::{ImagePipeline, MockClassifier};
//!
//! # fn example(upload_bytes: &[u8]) -> veriscan::Result<()> {
//! let pipeline = ImagePipeline::new();
//! let output = pipeline.classify(upload_bytes, &MockClassifier::original())?;
//!
//! println!("{} ({:.1}%)", output.prediction.label, output.prediction.confidence);
//! for reason in &output.explanation.textual_reasons {
//!     println!("- {reason}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! [`PipelineConfig`] controls target size, accepted formats, normalization
//! method, and which enhancement stages run:
//!
//! ```rust
//! use veriscan::{ImagePipeline, NormalizationMethod, PipelineConfig};
//!
//! # fn example() -> veriscan::Result<()> {
//! let config = PipelineConfig::builder()
//!     .target_size(224)
//!     .normalization(NormalizationMethod::Standard)
//!     .detect_product(true)
//!     .build()?;
//! let pipeline = ImagePipeline::with_config(config)?;
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod config;
pub mod constants;
pub mod decode;
pub mod enhance;
pub mod error;
pub mod features;
pub mod filters;
pub mod heatmap;
pub mod pipeline;
pub mod quality;
pub mod reasons;
pub mod reference;
pub mod tensor;
pub mod types;
pub mod validation;

#[cfg(test)]
mod test_support;

pub use classifier::{Classifier, MockClassifier};
pub use config::{NormalizationMethod, PipelineConfig, PipelineConfigBuilder};
pub use decode::decode_image;
pub use error::{Result, VeriscanError};
pub use features::extract_features;
pub use heatmap::overlay_heatmap;
pub use pipeline::{ClassificationOutput, ImagePipeline, PreparedImage};
pub use quality::assess_quality;
pub use reasons::generate_reasons;
pub use reference::compare_with_reference;
pub use types::{
    DecodedImage, ExplanationResult, FeatureVector, ImageFormatKind, ImageMetadata,
    InferenceTensor, Label, Prediction, PreprocessingRecord, PreprocessingStep, ProcessingTimings,
    QualityReport, ReferenceComparison,
};
pub use validation::ValidationGate;

use tokio::io::AsyncRead;

/// Classify an upload already held in memory with the default pipeline
/// configuration.
pub fn classify_image_bytes(
    bytes: &[u8],
    classifier: &dyn Classifier,
) -> Result<ClassificationOutput> {
    ImagePipeline::new().classify(bytes, classifier)
}

/// Read an upload to completion from an async source, then classify it.
///
/// Decoding needs the whole container in memory, so the reader is drained
/// before the pipeline runs.
pub async fn classify_image_from_reader<R: AsyncRead + Unpin>(
    mut reader: R,
    classifier: &dyn Classifier,
    config: &PipelineConfig,
) -> Result<ClassificationOutput> {
    let mut buffer = Vec::new();
    tokio::io::AsyncReadExt::read_to_end(&mut reader, &mut buffer)
        .await
        .map_err(|e| VeriscanError::processing(format!("Failed to read from stream: {}", e)))?;
    ImagePipeline::with_config(config.clone())?.classify(&buffer, classifier)
}
