//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the four pixel operations a resize is
//! built from: full decode, thumbnail decode, render and encode.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend) is pure Rust, built on the
//! `image` crate. Tests swap in a recording mock so the pipeline's decisions
//! can be checked without touching pixels.

use super::buffer::PixelBuffer;
use super::params::SourceImage;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Every way a single resize can fail. Each variant is terminal.
#[derive(Error, Debug)]
pub enum ResizeError {
    #[error("Cannot find image at '{}': {reason}", path.display())]
    MissingImage { path: PathBuf, reason: String },
    #[error("Invalid target size {width}x{height}: both sides must be positive")]
    InvalidSize { width: i64, height: i64 },
    #[error("Failed to render image: {0}")]
    RenderFailure(String),
    #[error("Failed to encode image: {0}")]
    EncodingFailure(String),
    #[error("Failed to write '{}': {source}", path.display())]
    PersistenceFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Tag of a [`ResizeError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingImage,
    InvalidSize,
    RenderFailure,
    EncodingFailure,
    PersistenceFailure,
}

impl ResizeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResizeError::MissingImage { .. } => ErrorKind::MissingImage,
            ResizeError::InvalidSize { .. } => ErrorKind::InvalidSize,
            ResizeError::RenderFailure(_) => ErrorKind::RenderFailure,
            ResizeError::EncodingFailure(_) => ErrorKind::EncodingFailure,
            ResizeError::PersistenceFailure { .. } => ErrorKind::PersistenceFailure,
        }
    }
}

/// Pixel dimensions of an image or a resize target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<Dimensions> for (u32, u32) {
    fn from(d: Dimensions) -> Self {
        (d.width, d.height)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Trait for image processing backends.
///
/// Implementations must be `Sync`: the render step may run on a worker
/// thread while the caller waits.
pub trait ImageBackend: Sync {
    /// Decode the whole image at native resolution.
    ///
    /// Fails with [`ResizeError::MissingImage`] when the bytes are not a
    /// decodable image.
    fn load_full(&self, source: &SourceImage) -> Result<PixelBuffer, ResizeError>;

    /// Decode a box-sampled image whose longer side is at most `max_dimension`.
    ///
    /// Fails with [`ResizeError::RenderFailure`] when no thumbnail can be
    /// produced.
    fn load_thumbnail(
        &self,
        source: &SourceImage,
        max_dimension: u32,
    ) -> Result<PixelBuffer, ResizeError>;

    /// Draw `source` scaled into a new buffer of exactly `target`.
    fn render(&self, source: &PixelBuffer, target: Dimensions)
    -> Result<PixelBuffer, ResizeError>;

    /// Serialize a buffer into the output file format.
    fn encode(&self, buffer: &PixelBuffer) -> Result<Vec<u8>, ResizeError>;
}
