//! Shared fixtures for unit tests.

use image::{ImageBuffer, Rgb, RgbImage};
use std::io::Cursor;

/// Uniform RGB image of the given size.
pub fn solid_rgb_image(width: u32, height: u32, rgb: [u8; 3]) -> RgbImage {
    ImageBuffer::from_pixel(width, height, Rgb(rgb))
}

/// Alternating horizontal stripes of two colors, `stripe` pixels tall.
pub fn striped_rgb_image(
    width: u32,
    height: u32,
    stripe: u32,
    a: [u8; 3],
    b: [u8; 3],
) -> RgbImage {
    ImageBuffer::from_fn(width, height, |_, y| {
        if (y / stripe) % 2 == 0 {
            Rgb(a)
        } else {
            Rgb(b)
        }
    })
}

/// Encode an RGB image as PNG bytes.
pub fn encode_png(image: &RgbImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("in-memory PNG encoding cannot fail");
    bytes
}

/// Encode an RGB image as JPEG bytes.
pub fn encode_jpeg(image: &RgbImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Jpeg)
        .expect("in-memory JPEG encoding cannot fail");
    bytes
}
