//! Error types for the image assessment and explanation pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, VeriscanError>;

/// Error taxonomy for the pipeline.
///
/// `Validation` and `Decode` are the only errors an ordinary malformed upload
/// can produce; every quality, feature, and reason computation is total over
/// well-formed decoded images. `Processing` covers failures on collaborator
/// output (e.g. a malformed activation heatmap), which are caller errors
/// rather than input errors.
#[derive(Error, Debug)]
pub enum VeriscanError {
    /// Input rejected by the validation gate (oversize, bad format, corrupt,
    /// out-of-range dimensions). Carries a human-readable cause.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Decoding failed even though validation passed (defensive double-check)
    #[error("Decode error: {0}")]
    Decode(String),

    /// Failure while transforming well-formed data (malformed collaborator
    /// heatmaps, tensor conversion problems)
    #[error("Processing error: {0}")]
    Processing(String),

    /// Classifier collaborator reported a failure
    #[error("Inference error: {0}")]
    Inference(String),

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Input/output errors (stream reads, file access)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors bubbled up from the image codec layer
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),
}

impl VeriscanError {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new decode error
    pub fn decode<S: Into<String>>(msg: S) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a new processing error
    pub fn processing<S: Into<String>>(msg: S) -> Self {
        Self::Processing(msg.into())
    }

    /// Create a new inference error
    pub fn inference<S: Into<String>>(msg: S) -> Self {
        Self::Inference(msg.into())
    }

    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create configuration error with valid ranges
    pub fn config_value_error<T: std::fmt::Display>(
        parameter: &str,
        value: T,
        valid_range: &str,
    ) -> Self {
        Self::InvalidConfig(format!(
            "Invalid {parameter}: {value} (valid range: {valid_range})"
        ))
    }

    /// Create processing error with stage context
    pub fn processing_stage_error(stage: &str, details: &str, input_info: Option<&str>) -> Self {
        let input_context = match input_info {
            Some(info) => format!(" (input: {info})"),
            None => String::new(),
        };

        Self::Processing(format!(
            "Processing failed at stage '{stage}'{input_context}: {details}"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = VeriscanError::validation("image file is empty");
        assert!(matches!(err, VeriscanError::Validation(_)));

        let err = VeriscanError::invalid_config("bad target size");
        assert!(matches!(err, VeriscanError::InvalidConfig(_)));
    }

    #[test]
    fn test_error_display() {
        let err = VeriscanError::validation("image file is empty");
        assert_eq!(err.to_string(), "Validation error: image file is empty");

        let err = VeriscanError::decode("truncated scanline");
        assert_eq!(err.to_string(), "Decode error: truncated scanline");
    }

    #[test]
    fn test_config_value_error() {
        let err = VeriscanError::config_value_error("confidence_threshold", 150, "0-100");
        let text = err.to_string();
        assert!(text.contains("confidence_threshold"));
        assert!(text.contains("150"));
        assert!(text.contains("0-100"));
    }

    #[test]
    fn test_processing_stage_error() {
        let err = VeriscanError::processing_stage_error(
            "heatmap_overlay",
            "heatmap contains NaN values",
            Some("7x7 activation map"),
        );
        let text = err.to_string();
        assert!(text.contains("heatmap_overlay"));
        assert!(text.contains("7x7 activation map"));
    }
}
