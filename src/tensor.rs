//! Resizing and tensor conversion for the inference input.

use crate::config::NormalizationMethod;
use crate::constants::{IMAGENET_MEAN, IMAGENET_STD};
use crate::error::{Result, VeriscanError};
use crate::types::InferenceTensor;
use image::imageops::FilterType;
use image::RgbImage;
use ndarray::Array3;
use tracing::debug;

/// Resize an image to a square of `target_size` pixels with Lanczos3
/// resampling, ignoring the source aspect ratio.
pub fn resize_for_inference(image: &RgbImage, target_size: u32) -> Result<RgbImage> {
    if target_size == 0 {
        return Err(VeriscanError::processing(
            "Target size for resize must be positive",
        ));
    }
    if image.dimensions() == (target_size, target_size) {
        return Ok(image.clone());
    }
    let resized = image::imageops::resize(image, target_size, target_size, FilterType::Lanczos3);
    debug!(
        from_width = image.width(),
        from_height = image.height(),
        target_size,
        "resized for inference"
    );
    Ok(resized)
}

/// Convert a resized image into a `(height, width, 3)` float tensor.
///
/// [`NormalizationMethod::Simple`] scales channels to `[0, 1]`;
/// [`NormalizationMethod::Standard`] additionally centers them with the
/// ImageNet per-channel mean and standard deviation.
pub fn to_tensor(image: &RgbImage, method: NormalizationMethod) -> Result<InferenceTensor> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(VeriscanError::processing(
            "Cannot build a tensor from an empty image",
        ));
    }

    let mut tensor = Array3::<f32>::zeros((height as usize, width as usize, 3));
    for (x, y, pixel) in image.enumerate_pixels() {
        for c in 0..3 {
            let scaled = f32::from(pixel[c]) / 255.0;
            tensor[[y as usize, x as usize, c]] = match method {
                NormalizationMethod::Simple => scaled,
                NormalizationMethod::Standard => (scaled - IMAGENET_MEAN[c]) / IMAGENET_STD[c],
            };
        }
    }
    Ok(tensor)
}
