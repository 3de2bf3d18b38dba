//! Configuration types for the assessment and explanation pipeline

use crate::constants;
use crate::error::{Result, VeriscanError};
use crate::types::ImageFormatKind;
use serde::{Deserialize, Serialize};

/// Pixel value normalization applied after resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizationMethod {
    /// Divide by 255, producing values in [0,1].
    Simple,
    /// Per-channel ImageNet mean/std normalization; roughly zero-mean,
    /// unit-variance, with no fixed output range.
    Standard,
}

impl Default for NormalizationMethod {
    fn default() -> Self {
        Self::Simple
    }
}

impl std::fmt::Display for NormalizationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Simple => write!(f, "simple"),
            Self::Standard => write!(f, "standard"),
        }
    }
}

/// Configuration for one pipeline instance.
///
/// Constructed once by the hosting service and shared read-only across
/// request invocations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Model input edge length; the tensor is always square.
    pub target_size: u32,

    /// Maximum accepted upload size in bytes.
    pub max_file_size_bytes: u64,

    /// Container formats accepted by the validation gate.
    pub allowed_formats: Vec<ImageFormatKind>,

    /// Classifier confidence threshold on the 0-100 scale.
    pub confidence_threshold: f32,

    /// Minimum number of textual reasons per explanation (1-5).
    pub min_reasons: usize,

    /// Pixel normalization method for the inference tensor.
    pub normalization: NormalizationMethod,

    /// Apply contrast-limited lighting normalization (default on).
    pub apply_lighting_normalization: bool,

    /// Apply glare reduction when glare is detected (default on).
    pub apply_glare_reduction: bool,

    /// Center-crop to the primary product region (opt-in).
    pub detect_product: bool,

    /// Compare extracted features against the authentic reference vector.
    pub compare_reference: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_size: constants::DEFAULT_TARGET_SIZE,
            max_file_size_bytes: constants::DEFAULT_MAX_FILE_SIZE_BYTES,
            allowed_formats: vec![
                ImageFormatKind::Jpeg,
                ImageFormatKind::Png,
                ImageFormatKind::WebP,
            ],
            confidence_threshold: constants::DEFAULT_CONFIDENCE_THRESHOLD,
            min_reasons: constants::DEFAULT_MIN_REASONS,
            normalization: NormalizationMethod::default(),
            apply_lighting_normalization: true,
            apply_glare_reduction: true,
            detect_product: false,
            compare_reference: true,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder for fluent construction.
    #[must_use]
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::new()
    }

    /// Validate all configuration parameters.
    ///
    /// # Errors
    /// - `target_size` outside the accepted dimension range
    /// - `confidence_threshold` outside 0-100
    /// - `min_reasons` outside 1-5
    /// - empty `allowed_formats` or zero `max_file_size_bytes`
    pub fn validate(&self) -> Result<()> {
        if self.target_size < constants::MIN_DIMENSION
            || self.target_size > constants::MAX_DIMENSION
        {
            return Err(VeriscanError::config_value_error(
                "target_size",
                self.target_size,
                "50-10000",
            ));
        }
        if !(0.0..=100.0).contains(&self.confidence_threshold) {
            return Err(VeriscanError::config_value_error(
                "confidence_threshold",
                self.confidence_threshold,
                "0-100",
            ));
        }
        if self.min_reasons == 0 || self.min_reasons > constants::MAX_REASONS {
            return Err(VeriscanError::config_value_error(
                "min_reasons",
                self.min_reasons,
                "1-5",
            ));
        }
        if self.allowed_formats.is_empty() {
            return Err(VeriscanError::invalid_config(
                "allowed_formats must not be empty",
            ));
        }
        if self.max_file_size_bytes == 0 {
            return Err(VeriscanError::invalid_config(
                "max_file_size_bytes must be positive",
            ));
        }
        Ok(())
    }
}

/// Builder for [`PipelineConfig`]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }

    #[must_use]
    pub fn target_size(mut self, size: u32) -> Self {
        self.config.target_size = size;
        self
    }

    #[must_use]
    pub fn max_file_size_bytes(mut self, bytes: u64) -> Self {
        self.config.max_file_size_bytes = bytes;
        self
    }

    #[must_use]
    pub fn allowed_formats(mut self, formats: Vec<ImageFormatKind>) -> Self {
        self.config.allowed_formats = formats;
        self
    }

    #[must_use]
    pub fn confidence_threshold(mut self, threshold: f32) -> Self {
        self.config.confidence_threshold = threshold;
        self
    }

    #[must_use]
    pub fn min_reasons(mut self, count: usize) -> Self {
        self.config.min_reasons = count;
        self
    }

    #[must_use]
    pub fn normalization(mut self, method: NormalizationMethod) -> Self {
        self.config.normalization = method;
        self
    }

    #[must_use]
    pub fn apply_lighting_normalization(mut self, apply: bool) -> Self {
        self.config.apply_lighting_normalization = apply;
        self
    }

    #[must_use]
    pub fn apply_glare_reduction(mut self, apply: bool) -> Self {
        self.config.apply_glare_reduction = apply;
        self
    }

    #[must_use]
    pub fn detect_product(mut self, detect: bool) -> Self {
        self.config.detect_product = detect;
        self
    }

    #[must_use]
    pub fn compare_reference(mut self, compare: bool) -> Self {
        self.config.compare_reference = compare;
        self
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    /// Returns `VeriscanError::InvalidConfig` when any parameter is out of
    /// range; see [`PipelineConfig::validate`].
    pub fn build(self) -> Result<PipelineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for PipelineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
