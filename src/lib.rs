//! # Vice
//!
//! Resize a single raster image in place, optionally preserving its aspect
//! ratio. The result is always written back as a PNG over the original file.
//!
//! # Pipeline
//!
//! Every resize runs the same stages, and the first failure ends it:
//!
//! ```text
//! read → decode → resolve size → thumbnail decode | render → encode PNG → atomic write
//! ```
//!
//! Nothing touches the source file until encoding has succeeded, so a failed
//! resize leaves it exactly as it was.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Size math, strategy choice, the [`ImageBackend`](imaging::ImageBackend) trait and the resize pipeline |
//! | [`storage`] | [`ImageStore`](storage::ImageStore) trait; locked reads and atomic replace on disk |
//! | [`config`] | `vice.toml` loading, merging over stock defaults, validation |
//! | [`logging`] | `tracing` subscriber setup for diagnostics on stderr |
//! | [`output`] | CLI output formatting, human-readable and JSON |
//!
//! # Design Decisions
//!
//! ## Two Rendering Paths
//!
//! Small portrait targets are produced by re-reading the source and reducing
//! it with a box filter, which for small outputs is cheaper than running the
//! configured convolution filter over the full image. Everything else is
//! redrawn from the decoded image with the configured filter.
//! [`imaging::select_strategy`] makes the choice.
//!
//! ## Premultiplied Pixels
//!
//! Buffers passed between stages hold premultiplied RGBA8, so filtering never
//! bleeds the colour of transparent pixels into their neighbours. Conversion
//! back to straight alpha happens once, right before encoding.
//!
//! ## Backend and Store Seams
//!
//! Pixel work and file access sit behind traits. The pipeline's decisions
//! are tested against a recording mock backend and an in-memory store; the
//! production pair is [`imaging::RustBackend`] and [`storage::FileStore`].

pub mod config;
pub mod imaging;
pub mod logging;
pub mod output;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_helpers;

use imaging::{ResizeError, ResizeOptions, ResizeOutcome, ResizeRequest, RustBackend};
use std::path::Path;
use storage::FileStore;

/// Resize the image at `path` to `width` x `height` and overwrite it with a PNG.
///
/// With `maintain_aspect` the image is scaled to fit inside the target box
/// instead of being stretched to fill it. Uses the stock settings; see
/// [`imaging::resize_in_place`] for full control.
///
/// ```no_run
/// let outcome = vice::resize_file("photo.jpg", 500, 500, true)?;
/// println!("now {}", outcome.output);
/// # Ok::<(), vice::imaging::ResizeError>(())
/// ```
pub fn resize_file(
    path: impl AsRef<Path>,
    width: i64,
    height: i64,
    maintain_aspect: bool,
) -> Result<ResizeOutcome, ResizeError> {
    let request = ResizeRequest::for_path(path.as_ref(), width, height, maintain_aspect)?;
    imaging::resize_in_place(
        &RustBackend::new(),
        &FileStore::new(),
        &request,
        &ResizeOptions::default(),
    )
}
