//! Serializing a [`PixelBuffer`] to PNG bytes.
//!
//! PNG is the one output format: lossless, single frame, straight RGBA8.

use super::backend::ResizeError;
use super::buffer::{ChannelLayout, PixelBuffer};
use super::params::PngCompression;
use image::codecs::png::{FilterType as PngFilter, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};

/// Encode a buffer as a PNG in memory.
pub(crate) fn encode_png(
    buffer: &PixelBuffer,
    compression: PngCompression,
) -> Result<Vec<u8>, ResizeError> {
    let color = match buffer.layout() {
        ChannelLayout::PremultipliedRgba8 => ExtendedColorType::Rgba8,
    };
    let straight = buffer.to_straight();

    let mut bytes = Vec::new();
    PngEncoder::new_with_quality(
        &mut bytes,
        compression.to_png_compression(),
        PngFilter::Adaptive,
    )
    .write_image(straight.as_raw(), straight.width(), straight.height(), color)
    .map_err(|e| ResizeError::EncodingFailure(format!("PNG encode failed: {e}")))?;
    Ok(bytes)
}
