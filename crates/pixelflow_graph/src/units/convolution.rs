// SPDX-License-Identifier: MIT OR Apache-2.0
//! Convolution filter with a user-editable 3x3 or 5x5 kernel.

use super::kernel::Kernel;
use crate::evaluation::ProcessContext;
use crate::node::NodeBuilder;
use crate::pin::PinType;
use serde::{Deserialize, Serialize};

/// Ready-made kernels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConvolutionPreset {
    /// Passes the image through
    Identity,
    /// Boost the center against its neighbours
    Sharpen,
    /// Directional relief
    Emboss,
    /// Horizontal difference
    EdgeEnhance,
}

/// Convolution parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Convolution {
    /// Kernel width, 3 or 5
    pub size: usize,
    /// Row-major kernel weights, `size * size` of them
    pub weights: Vec<f32>,
}

impl Default for Convolution {
    fn default() -> Self {
        Self::with_preset(3, ConvolutionPreset::Identity)
    }
}

impl Convolution {
    pub(crate) fn declare_pins(builder: &mut NodeBuilder) {
        builder.add_input_pin("Image", PinType::Image);
        builder.add_output_pin("Image", PinType::Image);
    }

    /// Kernel of `size` loaded with `preset`
    pub fn with_preset(size: usize, preset: ConvolutionPreset) -> Self {
        let mut conv = Self {
            size,
            weights: Vec::new(),
        };
        conv.apply_preset(preset);
        conv
    }

    /// Change the kernel size and reset to identity
    pub fn resize(&mut self, size: usize) {
        self.size = supported_size(size);
        self.apply_preset(ConvolutionPreset::Identity);
    }

    /// Replace the weights with a preset for the current size.
    ///
    /// Presets with no 5x5 form fall back to identity.
    pub fn apply_preset(&mut self, preset: ConvolutionPreset) {
        self.size = supported_size(self.size);
        let n = self.size * self.size;
        self.weights = match (self.size, preset) {
            (3, ConvolutionPreset::Sharpen) => vec![0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0],
            (3, ConvolutionPreset::Emboss) => vec![-2.0, -1.0, 0.0, -1.0, 1.0, 1.0, 0.0, 1.0, 2.0],
            (3, ConvolutionPreset::EdgeEnhance) => vec![0.0, 0.0, 0.0, -1.0, 1.0, 0.0, 0.0, 0.0, 0.0],
            (5, ConvolutionPreset::Sharpen) => {
                let mut w = vec![-1.0; n];
                w[n / 2] = 25.0;
                w
            }
            _ => {
                let mut w = vec![0.0; n];
                w[n / 2] = 1.0;
                w
            }
        };
    }

    pub(crate) fn process(&mut self, ctx: &mut ProcessContext<'_>) {
        let Some(input) = ctx.input(0) else {
            ctx.set_output(0, None);
            return;
        };
        let size = supported_size(self.size);
        let kernel = match Kernel::new(size, self.weights.clone()) {
            Some(kernel) => kernel,
            None => {
                tracing::warn!(
                    "{}: {} weights do not fit a {}x{} kernel",
                    ctx.node_id(),
                    self.weights.len(),
                    size,
                    size
                );
                ctx.set_output(0, None);
                return;
            }
        };
        ctx.set_output(0, Some(kernel.apply(&input)));
    }
}

/// Snap a requested kernel width to 3 or 5
fn supported_size(size: usize) -> usize {
    if size >= 5 {
        5
    } else {
        3
    }
}
