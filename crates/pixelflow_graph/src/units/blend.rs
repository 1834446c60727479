// SPDX-License-Identifier: MIT OR Apache-2.0
//! Blend: composites a blend image over a base image.

use super::kernel::saturate;
use crate::artifact::Image;
use crate::evaluation::ProcessContext;
use crate::node::NodeBuilder;
use crate::pin::PinType;
use image::imageops::{self, FilterType};
use serde::{Deserialize, Serialize};

/// Per-channel blend function
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlendMode {
    /// Blend image replaces base
    #[default]
    Normal,
    /// Darkens: `base * blend`
    Multiply,
    /// Lightens: inverse of multiplying the inverses
    Screen,
    /// Multiply in shadows, screen in highlights
    Overlay,
    /// `|base - blend|`
    Difference,
    /// Per-channel maximum
    Lighten,
    /// Per-channel minimum
    Darken,
}

impl BlendMode {
    /// Every mode, in menu order
    pub const ALL: [BlendMode; 7] = [
        BlendMode::Normal,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::Difference,
        BlendMode::Lighten,
        BlendMode::Darken,
    ];

    /// Combine one channel value from each image
    pub fn apply(self, base: f32, blend: f32) -> f32 {
        match self {
            Self::Normal => blend,
            Self::Multiply => base * blend / 255.0,
            Self::Screen => 255.0 - (255.0 - base) * (255.0 - blend) / 255.0,
            Self::Overlay => {
                if base < 128.0 {
                    2.0 * base * blend / 255.0
                } else {
                    255.0 - 2.0 * (255.0 - base) * (255.0 - blend) / 255.0
                }
            }
            Self::Difference => (base - blend).abs(),
            Self::Lighten => base.max(blend),
            Self::Darken => base.min(blend),
        }
    }
}

/// Blend parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Blend {
    /// Mode
    pub mode: BlendMode,
    /// Mix between base (0) and the blended result (1)
    pub opacity: f32,
}

impl Default for Blend {
    fn default() -> Self {
        Self {
            mode: BlendMode::Normal,
            opacity: 1.0,
        }
    }
}

impl Blend {
    pub(crate) fn declare_pins(builder: &mut NodeBuilder) {
        builder.add_input_pin("Base Image", PinType::Image);
        builder.add_input_pin("Blend Image", PinType::Image);
        builder.add_output_pin("Result", PinType::Image);
    }

    /// Blend `top` over `base`. `top` is resized to the base size first and
    /// the base alpha is kept.
    pub fn apply(&self, base: &Image, top: &Image) -> Image {
        let (w, h) = (base.width(), base.height());
        let resized;
        let top = if (top.width(), top.height()) == (w, h) {
            top.as_rgba()
        } else {
            resized = imageops::resize(top.as_rgba(), w, h, FilterType::Triangle);
            &resized
        };

        let opacity = self.opacity.clamp(0.0, 1.0);
        let mut out = base.as_rgba().clone();
        for (p, t) in out.pixels_mut().zip(top.pixels()) {
            for c in 0..3 {
                let b = f32::from(p.0[c]);
                let mixed = self.mode.apply(b, f32::from(t.0[c]));
                p.0[c] = saturate(b * (1.0 - opacity) + mixed * opacity);
            }
        }
        Image::from(out)
    }

    pub(crate) fn process(&mut self, ctx: &mut ProcessContext<'_>) {
        let out = match (ctx.input(0), ctx.input(1)) {
            (Some(base), Some(top)) => Some(self.apply(&base, &top)),
            _ => None,
        };
        ctx.set_output(0, out);
    }
}
