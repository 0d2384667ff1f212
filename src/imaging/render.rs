//! Redrawing a decoded buffer at a new size.

use super::backend::{Dimensions, ResizeError};
use super::buffer::PixelBuffer;
use super::params::ResampleFilter;

/// Bytes per premultiplied RGBA8 pixel.
const BYTES_PER_PIXEL: u64 = 4;

/// Draw `source` scaled to fill a new buffer of exactly `target`.
///
/// The aspect ratio of `target` is taken as given; callers that want the
/// original proportions resolve the size first. Surfaces above `max_pixels`
/// or beyond addressable memory are refused before anything is allocated.
pub(crate) fn render(
    source: &PixelBuffer,
    target: Dimensions,
    filter: ResampleFilter,
    max_pixels: u64,
) -> Result<PixelBuffer, ResizeError> {
    if target.is_empty() {
        return Err(ResizeError::InvalidSize {
            width: target.width.into(),
            height: target.height.into(),
        });
    }

    let pixels = u64::from(target.width) * u64::from(target.height);
    if pixels > max_pixels {
        return Err(ResizeError::RenderFailure(format!(
            "{target} surface has {pixels} pixels, limit is {max_pixels}"
        )));
    }
    pixels
        .checked_mul(BYTES_PER_PIXEL)
        .and_then(|bytes| usize::try_from(bytes).ok())
        .ok_or_else(|| ResizeError::RenderFailure(format!("{target} surface is not addressable")))?;

    if source.dimensions() == target {
        return Ok(source.clone());
    }

    let drawn = image::imageops::resize(
        source.premultiplied(),
        target.width,
        target.height,
        filter.to_image_filter(),
    );
    if drawn.dimensions() != (target.width, target.height) {
        return Err(ResizeError::RenderFailure(format!(
            "surface finalized at {}x{} instead of {target}",
            drawn.width(),
            drawn.height()
        )));
    }
    Ok(PixelBuffer::from_premultiplied(drawn))
}
