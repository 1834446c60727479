// SPDX-License-Identifier: MIT OR Apache-2.0
//! Threshold: binary, adaptive (local mean) or Otsu.
//!
//! Every mode works on luma and produces an opaque black and white image.
//! The luma histogram of the last input is kept for display.

use super::kernel::Kernel;
use crate::artifact::Image;
use crate::evaluation::ProcessContext;
use crate::node::NodeBuilder;
use crate::pin::PinType;
use serde::{Deserialize, Serialize};

/// How the cut-off is chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThresholdMode {
    /// Fixed global value
    #[default]
    Binary,
    /// Mean of a square neighbourhood minus `constant`
    Adaptive,
    /// Global value that best separates the histogram
    Otsu,
}

/// Threshold parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Threshold {
    /// Mode
    pub mode: ThresholdMode,
    /// Cut-off for binary mode
    pub value: u8,
    /// Neighbourhood width for adaptive mode. Clamped to 3..=99 and forced odd.
    pub block_size: u32,
    /// Subtracted from the local mean in adaptive mode
    pub constant: f32,
    /// Swap black and white
    pub invert: bool,
    #[serde(skip)]
    histogram: Vec<u32>,
    #[serde(skip)]
    last_cutoff: Option<u8>,
}

impl Default for Threshold {
    fn default() -> Self {
        Self {
            mode: ThresholdMode::Binary,
            value: 128,
            block_size: 11,
            constant: 2.0,
            invert: false,
            histogram: Vec::new(),
            last_cutoff: None,
        }
    }
}

impl Threshold {
    pub(crate) fn declare_pins(builder: &mut NodeBuilder) {
        builder.add_input_pin("Image", PinType::Image);
        builder.add_output_pin("Image", PinType::Image);
    }

    /// Luma histogram of the last processed input
    pub fn histogram(&self) -> Option<&[u32]> {
        (!self.histogram.is_empty()).then_some(self.histogram.as_slice())
    }

    /// Global cut-off used by the last run (binary and Otsu modes)
    pub fn last_cutoff(&self) -> Option<u8> {
        self.last_cutoff
    }

    fn block_size(&self) -> usize {
        (self.block_size.clamp(3, 99) | 1) as usize
    }

    /// Threshold `image`, recording its histogram
    pub fn apply(&mut self, image: &Image) -> Image {
        let (w, h) = (image.width(), image.height());
        let luma = image.to_luma();
        let hist = image.luma_histogram();
        self.histogram = hist.to_vec();

        let (on, off) = if self.invert { (0, 255) } else { (255, 0) };
        let bits: Vec<u8> = match self.mode {
            ThresholdMode::Binary | ThresholdMode::Otsu => {
                let cutoff = match self.mode {
                    ThresholdMode::Otsu => otsu_level(&hist),
                    _ => self.value,
                };
                self.last_cutoff = Some(cutoff);
                luma.iter().map(|&v| if v > cutoff { on } else { off }).collect()
            }
            ThresholdMode::Adaptive => {
                self.last_cutoff = None;
                let b = self.block_size();
                let Some(mean) = Kernel::new(b, vec![1.0; b * b]) else {
                    return Image::new(w, h);
                };
                let plane: Vec<f32> = luma.iter().map(|&v| f32::from(v)).collect();
                let local = mean.normalized().apply_plane(&plane, w as usize, h as usize);
                plane
                    .iter()
                    .zip(local)
                    .map(|(&v, m)| if v > m - self.constant { on } else { off })
                    .collect()
            }
        };
        Image::from_luma(w, h, &bits)
    }

    pub(crate) fn process(&mut self, ctx: &mut ProcessContext<'_>) {
        let out = ctx.input(0).map(|img| self.apply(&img));
        ctx.set_output(0, out);
    }
}

/// Level maximising the between-class variance of `hist`
pub(crate) fn otsu_level(hist: &[u32; 256]) -> u8 {
    let total: f64 = hist.iter().map(|&c| f64::from(c)).sum();
    if total == 0.0 {
        return 0;
    }
    let weighted_sum: f64 = hist.iter().enumerate().map(|(i, &c)| i as f64 * f64::from(c)).sum();

    let mut best = (0u8, -1.0f64);
    let mut below = 0.0;
    let mut below_sum = 0.0;
    for (level, &count) in hist.iter().enumerate() {
        below += f64::from(count);
        below_sum += level as f64 * f64::from(count);
        let above = total - below;
        if below == 0.0 || above == 0.0 {
            continue;
        }
        let mean_below = below_sum / below;
        let mean_above = (weighted_sum - below_sum) / above;
        let variance = below * above * (mean_below - mean_above).powi(2);
        if variance > best.1 {
            best = (level as u8, variance);
        }
    }
    best.0
}
