//! Decoder: validated bytes to an in-memory RGB pixel grid.

use crate::error::{Result, VeriscanError};
use crate::types::{DecodedImage, ImageFormatKind};
use tracing::debug;

/// Decode raw bytes into a [`DecodedImage`], forcing RGB.
///
/// Alpha is dropped; grayscale and paletted inputs are expanded to three
/// channels. Spatial dimensions are preserved exactly. Inputs are expected
/// to have passed the validation gate already; a failure here is the
/// defensive double-check case and maps to [`VeriscanError::Decode`].
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage> {
    let format = ImageFormatKind::detect(bytes);
    let dynamic = image::load_from_memory(bytes)
        .map_err(|e| VeriscanError::decode(format!("Failed to decode image: {e}")))?;

    let pixels = dynamic.to_rgb8();
    debug!(
        format = %format,
        width = pixels.width(),
        height = pixels.height(),
        "decoded upload to RGB"
    );

    Ok(DecodedImage::new(pixels, format))
}
