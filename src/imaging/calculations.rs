//! Pure calculation functions for image dimensions and strategy choice.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! ## Rounding
//!
//! Fitted sizes are converted to whole pixels with [`f64::round`], which
//! rounds to the nearest integer and resolves ties away from zero. The
//! limiting axis of an aspect fit never goes through rounding at all: it takes
//! the bounding-box value verbatim.

use super::backend::Dimensions;
use serde::Serialize;

/// Resolved sides below this many pixels count as thumbnail-sized.
pub const DEFAULT_THUMBNAIL_THRESHOLD: u32 = 401;

/// Compute the final output dimensions for a resize.
///
/// Without `maintain_aspect` the target is returned unchanged, even when that
/// distorts the image. With it, the result is the largest rectangle with the
/// original's aspect ratio that fits inside `target`.
///
/// # Examples
/// ```
/// # use vice::imaging::{Dimensions, resolve_target_size};
/// let original = Dimensions::new(1000, 788);
/// let target = Dimensions::new(500, 900);
/// assert_eq!(resolve_target_size(original, target, true), Dimensions::new(500, 394));
/// assert_eq!(resolve_target_size(original, target, false), target);
/// ```
pub fn resolve_target_size(
    original: Dimensions,
    target: Dimensions,
    maintain_aspect: bool,
) -> Dimensions {
    if !maintain_aspect {
        return target;
    }
    let (width, height) = calculate_fit_dimensions(original.into(), target.into());
    Dimensions { width, height }
}

/// Calculate the aspect-preserving fit of `source` inside `bounds`.
///
/// `scale = min(bw / sw, bh / sh)`. The axis that limits the scale takes the
/// bound exactly, so the fit is always tight on that axis; the other axis is
/// rounded and clamped to its bound.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height), both non-zero
/// * `bounds` - Bounding box (width, height)
///
/// # Returns
/// * `(width, height)` - Fitted dimensions, never exceeding `bounds`
pub fn calculate_fit_dimensions(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (max_w, max_h) = bounds;

    let scale_w = max_w as f64 / src_w as f64;
    let scale_h = max_h as f64 / src_h as f64;

    if scale_w <= scale_h {
        // Width limits: height follows the source ratio
        let h = (src_h as f64 * scale_w).round() as u32;
        (max_w, h.min(max_h))
    } else {
        // Height limits: width follows the source ratio
        let w = (src_w as f64 * scale_h).round() as u32;
        (w.min(max_w), max_h)
    }
}

/// How the resized pixels get produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeStrategy {
    /// Re-read the source and box-sample it down to the target.
    ThumbnailDecode,
    /// Decode at native size and redraw into a new surface.
    FullRender,
}

impl ResizeStrategy {
    pub fn label(self) -> &'static str {
        match self {
            ResizeStrategy::ThumbnailDecode => "thumbnail decode",
            ResizeStrategy::FullRender => "full render",
        }
    }
}

/// Pick the rendering path for a resize.
///
/// The thumbnail path is only taken for portrait originals (`height > width`)
/// going to a target with at least one side below `threshold`.
pub fn select_strategy(
    original: Dimensions,
    resolved: Dimensions,
    threshold: u32,
) -> ResizeStrategy {
    let portrait = original.height > original.width;
    let thumbnail_sized = resolved.width < threshold || resolved.height < threshold;

    if portrait && thumbnail_sized {
        ResizeStrategy::ThumbnailDecode
    } else {
        ResizeStrategy::FullRender
    }
}
