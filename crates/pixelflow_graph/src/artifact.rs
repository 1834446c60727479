// SPDX-License-Identifier: MIT OR Apache-2.0
//! Artifacts: the values produced on output pins.
//!
//! The cache only needs an artifact to be cloneable, to know when it is
//! empty, and to report its size. [`Image`] is the concrete artifact used by
//! the processing units: a thin owned wrapper around [`image::RgbaImage`].
//! Cloning copies the pixel buffer, so every cache handoff is a private copy.

use image::{Rgba, RgbaImage};

/// A value that can be stored in the artifact cache
pub trait Artifact: Clone {
    /// Whether this value represents "nothing produced"
    fn is_empty(&self) -> bool;

    /// Approximate heap size in bytes
    fn byte_size(&self) -> usize;
}

/// RGBA8 image artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pixels: RgbaImage,
}

impl Image {
    /// Create a transparent black image
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
        }
    }

    /// Create an image filled with a single color
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, Rgba(rgba)),
        }
    }

    /// Build an opaque image from a row-major single-channel buffer.
    ///
    /// Missing samples read as black.
    pub fn from_luma(width: u32, height: u32, luma: &[u8]) -> Self {
        let pixels = RgbaImage::from_fn(width, height, |x, y| {
            let v = luma.get((y * width + x) as usize).copied().unwrap_or(0);
            Rgba([v, v, v, 255])
        });
        Self { pixels }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Get one pixel, `None` when out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixels.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Borrow the underlying buffer
    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Mutably borrow the underlying buffer
    pub fn as_rgba_mut(&mut self) -> &mut RgbaImage {
        &mut self.pixels
    }

    /// Rec. 601 luma of every pixel, row-major
    pub fn to_luma(&self) -> Vec<u8> {
        self.pixels.pixels().map(|p| luma(p.0)).collect()
    }

    /// 256-bin histogram of the luma values
    pub fn luma_histogram(&self) -> [u32; 256] {
        let mut bins = [0u32; 256];
        for p in self.pixels.pixels() {
            bins[luma(p.0) as usize] += 1;
        }
        bins
    }

    /// Apply `f` to each pixel's color channels, keeping alpha
    pub fn map_rgb(&self, mut f: impl FnMut(u8) -> u8) -> Self {
        let mut out = self.pixels.clone();
        for p in out.pixels_mut() {
            p.0[0] = f(p.0[0]);
            p.0[1] = f(p.0[1]);
            p.0[2] = f(p.0[2]);
        }
        Self { pixels: out }
    }
}

impl From<RgbaImage> for Image {
    fn from(pixels: RgbaImage) -> Self {
        Self { pixels }
    }
}

impl Artifact for Image {
    fn is_empty(&self) -> bool {
        self.pixels.width() == 0 || self.pixels.height() == 0
    }

    fn byte_size(&self) -> usize {
        self.pixels.as_raw().len()
    }
}

/// Rec. 601 luma of one RGBA pixel
pub(crate) fn luma(rgba: [u8; 4]) -> u8 {
    let [r, g, b, _] = rgba;
    let y = 0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b);
    y.round().clamp(0.0, 255.0) as u8
}
