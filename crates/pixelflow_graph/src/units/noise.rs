// SPDX-License-Identifier: MIT OR Apache-2.0
//! Noise generation: a source node producing uniform or Gaussian noise.

use crate::artifact::Image;
use crate::evaluation::ProcessContext;
use crate::node::NodeBuilder;
use crate::pin::PinType;
use image::{Rgba, RgbaImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Largest edge a noise image may have
pub const MAX_NOISE_EDGE: u32 = 4096;

/// Sample distribution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoiseKind {
    /// Every value in 0..=255 equally likely
    #[default]
    Uniform,
    /// Normal distribution around `mean`
    Gaussian,
}

/// Noise parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Noise {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Distribution
    pub kind: NoiseKind,
    /// Independent samples per channel instead of gray noise
    pub color: bool,
    /// Gaussian mean
    pub mean: f64,
    /// Gaussian standard deviation
    pub std_dev: f64,
    /// RNG seed. The same seed gives the same image.
    pub seed: u64,
}

impl Default for Noise {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            kind: NoiseKind::Uniform,
            color: false,
            mean: 128.0,
            std_dev: 50.0,
            seed: 0,
        }
    }
}

impl Noise {
    pub(crate) fn declare_pins(builder: &mut NodeBuilder) {
        builder.add_output_pin("Noise", PinType::Image);
    }

    fn sample(&self, rng: &mut StdRng) -> u8 {
        match self.kind {
            NoiseKind::Uniform => rng.gen_range(0..=255),
            NoiseKind::Gaussian => {
                // Box-Muller
                let u1: f64 = 1.0 - rng.gen::<f64>();
                let u2: f64 = rng.gen();
                let z = (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos();
                (self.mean + z * self.std_dev).round().clamp(0.0, 255.0) as u8
            }
        }
    }

    /// Generate the noise image
    pub fn generate(&self) -> Image {
        let w = self.width.clamp(1, MAX_NOISE_EDGE);
        let h = self.height.clamp(1, MAX_NOISE_EDGE);
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut out = RgbaImage::new(w, h);
        for p in out.pixels_mut() {
            *p = if self.color {
                Rgba([self.sample(&mut rng), self.sample(&mut rng), self.sample(&mut rng), 255])
            } else {
                let v = self.sample(&mut rng);
                Rgba([v, v, v, 255])
            };
        }
        Image::from(out)
    }

    pub(crate) fn process(&mut self, ctx: &mut ProcessContext<'_>) {
        ctx.set_output(0, Some(self.generate()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_image() {
        let noise = Noise {
            width: 16,
            height: 8,
            seed: 42,
            ..Default::default()
        };
        let a = noise.generate();
        assert_eq!((a.width(), a.height()), (16, 8));
        assert_eq!(a, noise.generate());

        let other = Noise { seed: 43, ..noise }.generate();
        assert_ne!(a, other);
    }

    #[test]
    fn test_gray_noise_is_gray() {
        let img = Noise {
            width: 8,
            height: 8,
            ..Default::default()
        }
        .generate();
        assert!(img.as_rgba().pixels().all(|p| p.0[0] == p.0[1] && p.0[1] == p.0[2] && p.0[3] == 255));
    }

    #[test]
    fn test_gaussian_centers_on_mean() {
        let img = Noise {
            width: 64,
            height: 64,
            kind: NoiseKind::Gaussian,
            mean: 100.0,
            std_dev: 10.0,
            ..Default::default()
        }
        .generate();
        let luma = img.to_luma();
        let avg = luma.iter().map(|&v| f64::from(v)).sum::<f64>() / luma.len() as f64;
        assert!((avg - 100.0).abs() < 2.0, "mean was {avg}");
    }

    #[test]
    fn test_size_is_clamped() {
        let img = Noise {
            width: 0,
            height: 3,
            ..Default::default()
        }
        .generate();
        assert_eq!((img.width(), img.height()), (1, 3));
    }
}
