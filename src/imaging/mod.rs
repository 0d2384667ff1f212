//! Image resizing: pure Rust, statically linked.
//!
//! | Stage | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` + EXIF orientation |
//! | **Thumbnail decode** | `image::ImageReader` + `image::imageops::thumbnail` (box filter) |
//! | **Render** | `image::imageops::resize` |
//! | **Encode → PNG** | `image::codecs::png::PngEncoder` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math and strategy choice (unit testable)
//! - **Parameters**: Requests, sources and tuning knobs
//! - **Buffer**: The premultiplied RGBA8 [`PixelBuffer`] passed between stages
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: The resize pipeline combining calculations, backend and storage

pub mod backend;
mod buffer;
mod calculations;
mod decode;
mod encode;
pub mod operations;
mod params;
mod render;
pub mod rust_backend;

pub use backend::{Dimensions, ErrorKind, ImageBackend, ResizeError};
pub use buffer::{ChannelLayout, PixelBuffer};
pub use calculations::{
    DEFAULT_THUMBNAIL_THRESHOLD, ResizeStrategy, calculate_fit_dimensions, resolve_target_size,
    select_strategy,
};
pub use operations::{RenderMode, ResizeOptions, ResizeOutcome, resize, resize_in_place};
pub use params::{
    IN_MEMORY_ORIGIN, ImageSource, PngCompression, ResampleFilter, ResizeRequest, SourceImage,
};
pub use rust_backend::{DEFAULT_MAX_PIXELS, RustBackend};
