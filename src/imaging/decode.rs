//! Decoding encoded bytes into [`PixelBuffer`]s.
//!
//! Both entry points honour the EXIF orientation tag, so a phone photo stored
//! sideways is measured (and classified portrait or landscape) the way it is
//! displayed.

use super::backend::ResizeError;
use super::buffer::PixelBuffer;
use super::calculations::calculate_fit_dimensions;
use super::params::SourceImage;
use image::error::{LimitError, LimitErrorKind};
use image::{DynamicImage, ImageDecoder, ImageError, ImageReader, Limits};
use std::io::Cursor;

/// Decode `bytes` into an oriented image, refusing allocations above `max_alloc`.
fn decode_oriented(bytes: &[u8], max_alloc: u64) -> Result<DynamicImage, ImageError> {
    let mut reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    let mut limits = Limits::default();
    limits.max_alloc = Some(max_alloc);
    reader.limits(limits);

    let mut decoder = reader.into_decoder()?;
    if decoder.total_bytes() > max_alloc {
        return Err(ImageError::Limits(LimitError::from_kind(
            LimitErrorKind::InsufficientMemory,
        )));
    }
    let orientation = decoder.orientation()?;
    let mut image = DynamicImage::from_decoder(decoder)?;
    image.apply_orientation(orientation);
    Ok(image)
}

/// Decode the whole image at native resolution.
pub(crate) fn decode_full(source: &SourceImage, max_alloc: u64) -> Result<PixelBuffer, ResizeError> {
    let image = decode_oriented(source.bytes(), max_alloc).map_err(|e| match e {
        ImageError::Limits(limit) => ResizeError::RenderFailure(format!(
            "decoding {} exceeds memory limit: {limit}",
            source.origin().display()
        )),
        other => ResizeError::MissingImage {
            path: source.origin().to_path_buf(),
            reason: other.to_string(),
        },
    })?;
    if image.width() == 0 || image.height() == 0 {
        return Err(ResizeError::MissingImage {
            path: source.origin().to_path_buf(),
            reason: "image has no pixels".to_string(),
        });
    }
    Ok(PixelBuffer::from_straight(image.into_rgba8()))
}

/// Decode a box-sampled thumbnail whose longer side is at most `max_dimension`.
///
/// The source is decoded at native size and then reduced with a box filter,
/// which for small targets costs far less than a convolution filter over the
/// full image. Images that already fit are returned at native size;
/// thumbnails never upscale.
pub(crate) fn decode_thumbnail(
    source: &SourceImage,
    max_dimension: u32,
    max_alloc: u64,
) -> Result<PixelBuffer, ResizeError> {
    if max_dimension == 0 {
        return Err(ResizeError::RenderFailure(
            "thumbnail size must be positive".to_string(),
        ));
    }
    let image = decode_oriented(source.bytes(), max_alloc).map_err(|e| {
        ResizeError::RenderFailure(format!(
            "cannot decode thumbnail of {}: {e}",
            source.origin().display()
        ))
    })?;

    let full = PixelBuffer::from_straight(image.into_rgba8());
    let (src_w, src_h): (u32, u32) = full.dimensions().into();
    if src_w == 0 || src_h == 0 {
        return Err(ResizeError::RenderFailure(format!(
            "{} has no pixels",
            source.origin().display()
        )));
    }
    if src_w <= max_dimension && src_h <= max_dimension {
        return Ok(full);
    }

    let (width, height) = calculate_fit_dimensions((src_w, src_h), (max_dimension, max_dimension));
    if width == 0 || height == 0 {
        return Err(ResizeError::RenderFailure(format!(
            "{src_w}x{src_h} collapses to nothing at {max_dimension}px"
        )));
    }
    let thumb = image::imageops::thumbnail(full.premultiplied(), width, height);
    Ok(PixelBuffer::from_premultiplied(thumb))
}
