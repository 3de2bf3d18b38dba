//! Upload validation gate.
//!
//! Runs a fixed sequence of checks over the raw bytes of an upload and fails
//! with a structured, human-readable reason on the first violation. Ordinary
//! malformed input never panics; it always surfaces as
//! [`VeriscanError::Validation`].

use crate::config::PipelineConfig;
use crate::constants::{MAX_DIMENSION, MIN_DIMENSION};
use crate::error::{Result, VeriscanError};
use crate::types::ImageFormatKind;
use image::ColorType;
use tracing::debug;

/// Validates raw image bytes against format, size, and dimension limits.
pub struct ValidationGate<'a> {
    config: &'a PipelineConfig,
}

impl<'a> ValidationGate<'a> {
    #[must_use]
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self { config }
    }

    /// Run all checks in order, short-circuiting on the first failure.
    ///
    /// Check order: non-empty, size cap, recognized and allowed header
    /// format, full decode, dimension bounds, RGB-convertible color mode.
    ///
    /// # Errors
    /// `VeriscanError::Validation` with a specific reason string.
    pub fn validate(&self, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Err(VeriscanError::validation("Image file is empty"));
        }

        if bytes.len() as u64 > self.config.max_file_size_bytes {
            let max_mb = self.config.max_file_size_bytes as f64 / (1024.0 * 1024.0);
            log::warn!(
                "rejecting oversize upload: {} bytes against a {} byte cap",
                bytes.len(),
                self.config.max_file_size_bytes
            );
            return Err(VeriscanError::validation(format!(
                "Image file exceeds {max_mb:.0}MB limit"
            )));
        }

        let format = ImageFormatKind::detect(bytes);
        if !self.config.allowed_formats.contains(&format) {
            let allowed = self
                .config
                .allowed_formats
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(VeriscanError::validation(format!(
                "Unsupported file format: {format}. Allowed formats: {allowed}"
            )));
        }

        // Full decode proves the file is not corrupt past its header.
        let decoded = image::load_from_memory(bytes).map_err(|e| {
            VeriscanError::validation(format!("Unable to decode image file: {e}"))
        })?;

        let (width, height) = (decoded.width(), decoded.height());
        if width < MIN_DIMENSION || height < MIN_DIMENSION {
            return Err(VeriscanError::validation(format!(
                "Image dimensions too small (minimum {MIN_DIMENSION}x{MIN_DIMENSION} pixels)"
            )));
        }
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(VeriscanError::validation(format!(
                "Image dimensions too large (maximum {MAX_DIMENSION}x{MAX_DIMENSION} pixels)"
            )));
        }

        if !is_rgb_convertible(decoded.color()) {
            return Err(VeriscanError::validation(format!(
                "Unsupported image color mode: {:?}",
                decoded.color()
            )));
        }

        debug!(format = %format, width, height, "upload passed validation");
        Ok(())
    }
}

/// Color modes the decoder converts to RGB: grayscale, paletted (surfaced as
/// one of these by the codec), and alpha variants are all accepted.
fn is_rgb_convertible(color: ColorType) -> bool {
    matches!(
        color,
        ColorType::L8
            | ColorType::La8
            | ColorType::Rgb8
            | ColorType::Rgba8
            | ColorType::L16
            | ColorType::La16
            | ColorType::Rgb16
            | ColorType::Rgba16
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{encode_png, solid_rgb_image};

    fn gate_config() -> PipelineConfig {
        PipelineConfig::default()
    }

    #[test]
    fn test_empty_buffer_rejected() {
        let config = gate_config();
        let gate = ValidationGate::new(&config);
        let err = gate.validate(&[]).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_oversize_buffer_rejected() {
        let config = PipelineConfig::builder()
            .max_file_size_bytes(16)
            .build()
            .unwrap();
        let gate = ValidationGate::new(&config);
        let err = gate.validate(&[0u8; 64]).unwrap_err();
        assert!(err.to_string().contains("limit"));
    }

    #[test]
    fn test_unknown_format_rejected() {
        let config = gate_config();
        let gate = ValidationGate::new(&config);
        let err = gate.validate(&[0x42u8; 512]).unwrap_err();
        assert!(err.to_string().contains("Unsupported file format"));
    }

    #[test]
    fn test_disallowed_format_rejected() {
        let config = PipelineConfig::builder()
            .allowed_formats(vec![ImageFormatKind::Jpeg])
            .build()
            .unwrap();
        let gate = ValidationGate::new(&config);

        let png_bytes = encode_png(&solid_rgb_image(60, 60, [10, 20, 30]));
        let err = gate.validate(&png_bytes).unwrap_err();
        assert!(err.to_string().contains("PNG"));
    }

    #[test]
    fn test_corrupt_body_rejected() {
        let config = gate_config();
        let gate = ValidationGate::new(&config);

        let mut png_bytes = encode_png(&solid_rgb_image(60, 60, [10, 20, 30]));
        // Keep the header intact, destroy the body.
        png_bytes.truncate(24);
        let err = gate.validate(&png_bytes).unwrap_err();
        assert!(err.to_string().contains("Unable to decode"));
    }

    #[test]
    fn test_too_small_dimensions_rejected() {
        let config = gate_config();
        let gate = ValidationGate::new(&config);

        let png_bytes = encode_png(&solid_rgb_image(30, 30, [10, 20, 30]));
        let err = gate.validate(&png_bytes).unwrap_err();
        assert!(err.to_string().contains("too small"));
    }

    #[test]
    fn test_valid_png_accepted() {
        let config = gate_config();
        let gate = ValidationGate::new(&config);

        let png_bytes = encode_png(&solid_rgb_image(64, 48, [10, 20, 30]));
        assert!(gate.validate(&png_bytes).is_ok());
    }
}
