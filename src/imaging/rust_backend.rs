//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP, GIF, BMP) | `image::ImageReader` + EXIF orientation |
//! | Thumbnail decode | `image::imageops::thumbnail` (box sampling) |
//! | Render | `image::imageops::resize` with the configured filter |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |

use super::backend::{Dimensions, ImageBackend, ResizeError};
use super::buffer::PixelBuffer;
use super::params::{PngCompression, ResampleFilter, SourceImage};
use super::{decode, encode, render};
use crate::config::ViceConfig;

/// Largest surface rendered by default: 16384 x 16384.
pub const DEFAULT_MAX_PIXELS: u64 = 16384 * 16384;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RustBackend {
    pub filter: ResampleFilter,
    pub compression: PngCompression,
    /// Upper bound on decoded and rendered surfaces, in pixels.
    pub max_pixels: u64,
}

impl RustBackend {
    pub fn new() -> Self {
        Self {
            filter: ResampleFilter::default(),
            compression: PngCompression::default(),
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }

    pub fn from_config(config: &ViceConfig) -> Self {
        Self {
            filter: config.resize.filter,
            compression: config.output.compression,
            max_pixels: config.limits.max_pixels,
        }
    }

    /// Decoder allocation budget matching `max_pixels` of RGBA8.
    fn max_alloc(&self) -> u64 {
        self.max_pixels.saturating_mul(4)
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn load_full(&self, source: &SourceImage) -> Result<PixelBuffer, ResizeError> {
        decode::decode_full(source, self.max_alloc())
    }

    fn load_thumbnail(
        &self,
        source: &SourceImage,
        max_dimension: u32,
    ) -> Result<PixelBuffer, ResizeError> {
        decode::decode_thumbnail(source, max_dimension, self.max_alloc())
    }

    fn render(
        &self,
        source: &PixelBuffer,
        target: Dimensions,
    ) -> Result<PixelBuffer, ResizeError> {
        render::render(source, target, self.filter, self.max_pixels)
    }

    fn encode(&self, buffer: &PixelBuffer) -> Result<Vec<u8>, ResizeError> {
        encode::encode_png(buffer, self.compression)
    }
}
