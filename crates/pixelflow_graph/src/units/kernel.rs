// SPDX-License-Identifier: MIT OR Apache-2.0
//! Square convolution kernels shared by the filter units.

use crate::artifact::Image;
use image::RgbaImage;

/// A square, odd-sized convolution kernel
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Kernel {
    size: usize,
    weights: Vec<f32>,
}

impl Kernel {
    /// Build a kernel from row-major weights. `None` unless `size` is odd and
    /// `weights` has `size * size` entries.
    pub(crate) fn new(size: usize, weights: Vec<f32>) -> Option<Self> {
        (size % 2 == 1 && weights.len() == size * size).then_some(Self { size, weights })
    }

    /// 3x3 kernel from row-major weights
    pub(crate) fn square3(weights: [f32; 9]) -> Self {
        Self {
            size: 3,
            weights: weights.to_vec(),
        }
    }

    /// Motion blur along `angle_deg`, falling off with distance from the
    /// line and from the center
    pub(crate) fn directional(radius: u32, angle_deg: f32, strength: f32) -> Self {
        let size = radius as usize * 2 + 1;
        let center = radius as f32;
        let (dir_y, dir_x) = angle_deg.to_radians().sin_cos();
        let spread = 2.0 * strength.max(f32::EPSILON);
        let falloff = 2.0 * (radius as f32).powi(2).max(f32::EPSILON);

        let mut weights = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                let dx = x as f32 - center;
                let dy = y as f32 - center;
                let off_line = (dir_x * dy - dir_y * dx).abs();
                let along = dx * dx + dy * dy;
                weights.push((-(off_line * off_line) / spread).exp() * (-along / falloff).exp());
            }
        }
        Self { size, weights }.normalized()
    }

    /// Scale weights to sum to one (left as is when the sum is zero)
    pub(crate) fn normalized(mut self) -> Self {
        let sum: f32 = self.weights.iter().sum();
        if sum.abs() > f32::EPSILON {
            for w in &mut self.weights {
                *w /= sum;
            }
        }
        self
    }

    /// Convolve a single-channel plane with edge replication
    pub(crate) fn apply_plane(&self, plane: &[f32], width: usize, height: usize) -> Vec<f32> {
        let r = (self.size / 2) as isize;
        let mut out = vec![0.0; plane.len()];
        for y in 0..height {
            for x in 0..width {
                let mut acc = 0.0;
                for ky in 0..self.size {
                    let sy = clamp_index(y as isize + ky as isize - r, height);
                    for kx in 0..self.size {
                        let sx = clamp_index(x as isize + kx as isize - r, width);
                        acc += self.weights[ky * self.size + kx] * plane[sy * width + sx];
                    }
                }
                out[y * width + x] = acc;
            }
        }
        out
    }

    /// Convolve the color channels of an image, keeping alpha
    pub(crate) fn apply(&self, image: &Image) -> Image {
        let (w, h) = (image.width() as usize, image.height() as usize);
        let src = image.as_rgba();
        let channel = |c: usize| -> Vec<f32> { src.pixels().map(|p| f32::from(p.0[c])).collect() };
        let filtered: Vec<Vec<f32>> = (0..3).map(|c| self.apply_plane(&channel(c), w, h)).collect();

        let mut out: RgbaImage = src.clone();
        for (i, p) in out.pixels_mut().enumerate() {
            for (c, plane) in filtered.iter().enumerate() {
                p.0[c] = saturate(plane[i]);
            }
        }
        Image::from(out)
    }
}

fn clamp_index(i: isize, len: usize) -> usize {
    i.clamp(0, len as isize - 1) as usize
}

/// Round and clamp to the u8 range
pub(crate) fn saturate(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
