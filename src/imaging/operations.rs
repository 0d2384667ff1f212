//! High-level resize operations.
//!
//! These functions combine calculations with backend and storage calls. A
//! resize always moves through the same stages, and any failure ends it:
//!
//! ```text
//! Start → Decoded → SizeResolved → ThumbnailPath | RenderPath → Encoded → Persisted → Done
//! ```
//!
//! Nothing is written to storage until encoding has succeeded.

use super::backend::{Dimensions, ImageBackend, ResizeError};
use super::buffer::PixelBuffer;
use super::calculations::{
    DEFAULT_THUMBNAIL_THRESHOLD, ResizeStrategy, resolve_target_size, select_strategy,
};
use super::params::{ImageSource, ResizeRequest, SourceImage};
use crate::config::ViceConfig;
use crate::storage::ImageStore;
use std::path::PathBuf;
use std::sync::mpsc;
use tracing::{debug, info};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, ResizeError>;

/// Where the render step runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// On the caller's thread.
    #[default]
    Inline,
    /// As a task on the rayon pool; the caller blocks on its result.
    Offloaded,
}

/// Knobs for a resize that are not part of the request itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeOptions {
    pub thumbnail_threshold: u32,
    pub render_mode: RenderMode,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            thumbnail_threshold: DEFAULT_THUMBNAIL_THRESHOLD,
            render_mode: RenderMode::Inline,
        }
    }
}

impl ResizeOptions {
    pub fn from_config(config: &ViceConfig) -> Self {
        Self {
            thumbnail_threshold: config.resize.thumbnail_threshold,
            render_mode: if config.processing.offload_render {
                RenderMode::Offloaded
            } else {
                RenderMode::Inline
            },
        }
    }
}

/// A finished resize.
#[derive(Debug, Clone)]
pub struct ResizeOutcome {
    /// Size of the decoded source.
    pub original: Dimensions,
    /// Size of the produced image.
    pub output: Dimensions,
    pub strategy: ResizeStrategy,
    pub buffer: PixelBuffer,
    /// The encoded output file.
    pub encoded: Vec<u8>,
    /// Set once the encoded bytes have been written back.
    pub persisted_to: Option<PathBuf>,
}

/// Resize without writing anything back.
///
/// Path sources are read through `store`; byte sources are used as given.
pub fn resize(
    backend: &impl ImageBackend,
    store: &impl ImageStore,
    request: &ResizeRequest,
    options: &ResizeOptions,
) -> Result<ResizeOutcome> {
    let source = load_source(store, request)?;
    run_pipeline(backend, &source, request, options)
}

/// Resize a file and overwrite it with the result.
///
/// Requests built from bytes have nowhere to be written back to and behave
/// like [`resize`].
pub fn resize_in_place(
    backend: &impl ImageBackend,
    store: &impl ImageStore,
    request: &ResizeRequest,
    options: &ResizeOptions,
) -> Result<ResizeOutcome> {
    let mut outcome = resize(backend, store, request, options)?;

    if let Some(path) = request.path() {
        store
            .write(path, &outcome.encoded)
            .map_err(|source| ResizeError::PersistenceFailure {
                path: path.to_path_buf(),
                source,
            })?;
        info!(path = %path.display(), bytes = outcome.encoded.len(), "wrote resized image");
        outcome.persisted_to = Some(path.to_path_buf());
    }

    Ok(outcome)
}

fn load_source(store: &impl ImageStore, request: &ResizeRequest) -> Result<SourceImage> {
    match request.source() {
        ImageSource::Path(path) => {
            // Errors name the file as resolved against the working directory
            let resolved = std::path::absolute(path).unwrap_or_else(|_| path.clone());
            let bytes = store.read(path).map_err(|e| ResizeError::MissingImage {
                path: resolved.clone(),
                reason: e.to_string(),
            })?;
            Ok(SourceImage::new(resolved, bytes))
        }
        ImageSource::Bytes(bytes) => Ok(SourceImage::in_memory(bytes.clone())),
    }
}

fn run_pipeline(
    backend: &impl ImageBackend,
    source: &SourceImage,
    request: &ResizeRequest,
    options: &ResizeOptions,
) -> Result<ResizeOutcome> {
    let decoded = backend.load_full(source)?;
    let original = decoded.dimensions();
    debug!(source = %source.origin().display(), %original, "decoded");

    let resolved = resolve_target_size(original, request.target(), request.maintain_aspect());
    if resolved.is_empty() {
        return Err(ResizeError::InvalidSize {
            width: resolved.width.into(),
            height: resolved.height.into(),
        });
    }
    debug!(
        requested = %request.target(),
        %resolved,
        maintain_aspect = request.maintain_aspect(),
        "size resolved"
    );

    let strategy = select_strategy(original, resolved, options.thumbnail_threshold);
    debug!(strategy = strategy.label(), "strategy selected");

    let buffer = match strategy {
        ResizeStrategy::ThumbnailDecode => {
            drop(decoded);
            let max_dimension = resolved.width.max(resolved.height);
            let thumb = backend.load_thumbnail(source, max_dimension)?;
            if thumb.dimensions() == resolved {
                thumb
            } else {
                // Distorting targets and off-by-one rounding land here
                render_step(backend, &thumb, resolved, options.render_mode)?
            }
        }
        ResizeStrategy::FullRender => {
            render_step(backend, &decoded, resolved, options.render_mode)?
        }
    };

    let encoded = backend.encode(&buffer)?;
    info!(
        %original,
        output = %resolved,
        strategy = strategy.label(),
        bytes = encoded.len(),
        "resized"
    );

    Ok(ResizeOutcome {
        original,
        output: buffer.dimensions(),
        strategy,
        buffer,
        encoded,
        persisted_to: None,
    })
}

fn render_step(
    backend: &impl ImageBackend,
    source: &PixelBuffer,
    target: Dimensions,
    mode: RenderMode,
) -> Result<PixelBuffer> {
    match mode {
        RenderMode::Inline => backend.render(source, target),
        RenderMode::Offloaded => render_offloaded(backend, source, target),
    }
}

/// Submit the render to the rayon pool and wait for its single result.
fn render_offloaded(
    backend: &impl ImageBackend,
    source: &PixelBuffer,
    target: Dimensions,
) -> Result<PixelBuffer> {
    let (tx, rx) = mpsc::sync_channel(1);
    rayon::scope(|scope| {
        scope.spawn(move |_| {
            // The receiver outlives the scope, so the send cannot fail
            let _ = tx.send(backend.render(source, target));
        });
    });
    rx.recv().map_err(|_| {
        ResizeError::RenderFailure("render worker finished without a result".to_string())
    })?
}
