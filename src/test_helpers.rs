//! Shared test utilities for the vice test suite.
//!
//! Synthetic images are generated in memory so tests never depend on fixture
//! files. Every helper panics on failure; they are only for tests.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;

// =========================================================================
// Synthetic pixels
// =========================================================================

/// A deterministic gradient so resampled output is not uniform.
pub fn gradient_rgba(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    })
}

// =========================================================================
// Encoded images
// =========================================================================

/// Encode a `width` x `height` gradient as PNG.
pub fn encode_test_png(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    gradient_rgba(width, height)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

/// Encode a `width` x `height` gradient as JPEG.
pub fn encode_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    let rgb = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, 90)
        .encode_image(&rgb)
        .unwrap();
    bytes
}

/// Encode a `width` x `height` gradient as PNG carrying an EXIF orientation tag.
///
/// `orientation` is the raw tag value (1-8); 6 means "rotate 90° clockwise to
/// display", so the displayed size is `height` x `width`.
pub fn encode_test_png_oriented(width: u32, height: u32, orientation: u16) -> Vec<u8> {
    let img = gradient_rgba(width, height);
    let mut bytes = Vec::new();
    let mut encoder = PngEncoder::new(&mut bytes);
    encoder.set_exif_metadata(exif_orientation(orientation)).unwrap();
    encoder
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgba8)
        .unwrap();
    bytes
}

/// A minimal big-endian TIFF block with a single Orientation (0x0112) entry.
fn exif_orientation(orientation: u16) -> Vec<u8> {
    let mut exif = Vec::new();
    exif.extend_from_slice(b"MM\x00\x2a");
    exif.extend_from_slice(&8u32.to_be_bytes()); // first IFD offset
    exif.extend_from_slice(&1u16.to_be_bytes()); // entry count
    exif.extend_from_slice(&0x0112u16.to_be_bytes()); // tag
    exif.extend_from_slice(&3u16.to_be_bytes()); // type SHORT
    exif.extend_from_slice(&1u32.to_be_bytes()); // count
    exif.extend_from_slice(&orientation.to_be_bytes());
    exif.extend_from_slice(&[0, 0]); // value padding
    exif.extend_from_slice(&0u32.to_be_bytes()); // no next IFD
    exif
}
