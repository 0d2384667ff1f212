//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the caller (CLI or library user), the
//! [`operations`](super::operations) pipeline and the
//! [`backend`](super::backend) that does the pixel work.
//!
//! ## Types
//!
//! - [`ResizeRequest`]: One resize: where the image comes from, the bounding box, the aspect flag.
//! - [`ImageSource`]: A file path or bytes already in memory.
//! - [`SourceImage`]: Encoded bytes plus the path they were read from, as handed to a backend.
//! - [`ResampleFilter`]: Interpolation filter used by the renderer.
//! - [`PngCompression`]: Effort spent by the PNG encoder.

use super::backend::{Dimensions, ResizeError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Origin label used for in-memory sources in error messages.
pub const IN_MEMORY_ORIGIN: &str = "<in-memory>";

/// Where the image to resize comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// A single resize operation. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeRequest {
    source: ImageSource,
    target: Dimensions,
    maintain_aspect: bool,
}

impl ResizeRequest {
    /// Build a request, rejecting non-positive or oversized target sides.
    pub fn new(
        source: ImageSource,
        width: i64,
        height: i64,
        maintain_aspect: bool,
    ) -> Result<Self, ResizeError> {
        let invalid = || ResizeError::InvalidSize { width, height };
        if width <= 0 || height <= 0 {
            return Err(invalid());
        }
        let target = Dimensions {
            width: u32::try_from(width).map_err(|_| invalid())?,
            height: u32::try_from(height).map_err(|_| invalid())?,
        };
        Ok(Self {
            source,
            target,
            maintain_aspect,
        })
    }

    pub fn for_path(
        path: impl Into<PathBuf>,
        width: i64,
        height: i64,
        maintain_aspect: bool,
    ) -> Result<Self, ResizeError> {
        Self::new(ImageSource::Path(path.into()), width, height, maintain_aspect)
    }

    pub fn for_bytes(
        bytes: Vec<u8>,
        width: i64,
        height: i64,
        maintain_aspect: bool,
    ) -> Result<Self, ResizeError> {
        Self::new(ImageSource::Bytes(bytes), width, height, maintain_aspect)
    }

    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    /// The requested bounding box, before aspect resolution.
    pub fn target(&self) -> Dimensions {
        self.target
    }

    pub fn maintain_aspect(&self) -> bool {
        self.maintain_aspect
    }

    /// The file this request reads from, if any.
    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            ImageSource::Path(path) => Some(path),
            ImageSource::Bytes(_) => None,
        }
    }
}

/// Encoded image bytes as read from storage, tagged with where they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    origin: PathBuf,
    bytes: Vec<u8>,
}

impl SourceImage {
    pub fn new(origin: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        Self {
            origin: origin.into(),
            bytes,
        }
    }

    pub fn in_memory(bytes: Vec<u8>) -> Self {
        Self::new(IN_MEMORY_ORIGIN, bytes)
    }

    pub fn origin(&self) -> &Path {
        &self.origin
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Interpolation filter for the render step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResampleFilter {
    /// Nearest neighbor (fastest, blocky).
    Nearest,
    /// Bilinear.
    Triangle,
    /// Bicubic Catmull-Rom.
    CatmullRom,
    Gaussian,
    /// Lanczos with window 3 (slowest, sharpest).
    #[default]
    Lanczos3,
}

impl ResampleFilter {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        use image::imageops::FilterType;
        match self {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// PNG compression effort. Output is lossless at every level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PngCompression {
    Fast,
    #[default]
    Default,
    Best,
}

impl PngCompression {
    pub fn to_png_compression(self) -> image::codecs::png::CompressionType {
        use image::codecs::png::CompressionType;
        match self {
            PngCompression::Fast => CompressionType::Fast,
            PngCompression::Default => CompressionType::Default,
            PngCompression::Best => CompressionType::Best,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::ErrorKind;

    #[test]
    fn request_keeps_its_fields() {
        let request = ResizeRequest::for_path("/img/cat.png", 200, 300, true).unwrap();
        assert_eq!(request.target(), Dimensions::new(200, 300));
        assert!(request.maintain_aspect());
        assert_eq!(request.path(), Some(Path::new("/img/cat.png")));
    }

    #[test]
    fn zero_width_is_invalid() {
        let err = ResizeRequest::for_path("/img/cat.png", 0, 300, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSize);
    }

    #[test]
    fn negative_height_is_invalid() {
        let err = ResizeRequest::for_bytes(Vec::new(), 10, -1, true).unwrap_err();
        assert!(matches!(
            err,
            ResizeError::InvalidSize {
                width: 10,
                height: -1
            }
        ));
    }

    #[test]
    fn oversized_side_is_invalid() {
        let err = ResizeRequest::for_bytes(Vec::new(), i64::from(u32::MAX) + 1, 10, false)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSize);
    }

    #[test]
    fn byte_requests_have_no_path() {
        let request = ResizeRequest::for_bytes(vec![1, 2, 3], 10, 10, false).unwrap();
        assert_eq!(request.path(), None);
        assert_eq!(request.source(), &ImageSource::Bytes(vec![1, 2, 3]));
    }

    #[test]
    fn in_memory_source_has_placeholder_origin() {
        let source = SourceImage::in_memory(vec![9]);
        assert_eq!(source.origin(), Path::new(IN_MEMORY_ORIGIN));
        assert_eq!(source.bytes(), &[9]);
    }

    #[test]
    fn filter_parses_kebab_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            filter: ResampleFilter,
        }
        let parsed: Wrapper = toml::from_str(r#"filter = "catmull-rom""#).unwrap();
        assert_eq!(parsed.filter, ResampleFilter::CatmullRom);
        assert_eq!(ResampleFilter::default(), ResampleFilter::Lanczos3);
    }

    #[test]
    fn compression_default_is_default() {
        assert_eq!(PngCompression::default(), PngCompression::Default);
    }
}
