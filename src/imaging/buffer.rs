//! Owned pixel storage shared by every stage of a resize.
//!
//! A [`PixelBuffer`] always holds 8-bit RGBA with the color channels
//! premultiplied by alpha. Filtering premultiplied samples keeps fully
//! transparent pixels from bleeding their (invisible) color into neighbours,
//! so decode premultiplies once on the way in and encode undoes it once on the
//! way out.

use super::backend::Dimensions;
use image::{Rgba, RgbaImage};

/// Channel layout of a [`PixelBuffer`]. There is exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    PremultipliedRgba8,
}

/// An immutable, exclusively owned grid of premultiplied RGBA8 pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    pixels: RgbaImage,
}

impl PixelBuffer {
    /// Wrap straight (non-premultiplied) RGBA pixels, premultiplying them.
    pub fn from_straight(mut pixels: RgbaImage) -> Self {
        pixels.pixels_mut().for_each(premultiply);
        Self { pixels }
    }

    /// Wrap pixels that are already premultiplied.
    pub(crate) fn from_premultiplied(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn dimensions(&self) -> Dimensions {
        let (width, height) = self.pixels.dimensions();
        Dimensions { width, height }
    }

    pub fn layout(&self) -> ChannelLayout {
        ChannelLayout::PremultipliedRgba8
    }

    /// Borrow the premultiplied pixels.
    pub fn premultiplied(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Copy out straight-alpha pixels, as image files store them.
    pub fn to_straight(&self) -> RgbaImage {
        let mut straight = self.pixels.clone();
        straight.pixels_mut().for_each(unpremultiply);
        straight
    }
}

fn premultiply(px: &mut Rgba<u8>) {
    let alpha = px[3] as u32;
    if alpha == 255 {
        return;
    }
    for channel in &mut px.0[..3] {
        *channel = ((*channel as u32 * alpha + 127) / 255) as u8;
    }
}

fn unpremultiply(px: &mut Rgba<u8>) {
    let alpha = px[3] as u32;
    match alpha {
        255 => {}
        0 => px.0 = [0, 0, 0, 0],
        _ => {
            for channel in &mut px.0[..3] {
                *channel = ((*channel as u32 * 255 + alpha / 2) / alpha).min(255) as u8;
            }
        }
    }
}
