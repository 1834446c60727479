// SPDX-License-Identifier: MIT OR Apache-2.0
//! Blur: isotropic Gaussian or directional (motion) blur.

use super::kernel::Kernel;
use crate::artifact::Image;
use crate::evaluation::ProcessContext;
use crate::node::NodeBuilder;
use crate::pin::PinType;
use serde::{Deserialize, Serialize};

/// Blur variant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlurMode {
    /// Same spread in every direction
    #[default]
    Gaussian,
    /// Smear along `angle`
    Directional,
}

/// Blur parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Blur {
    /// Variant
    pub mode: BlurMode,
    /// Kernel radius, 1 to 20. The kernel is `2 * radius + 1` wide.
    pub radius: u32,
    /// Direction in degrees (directional only)
    pub angle: f32,
    /// How tightly weights hug the direction line, 1 to 10 (directional only)
    pub strength: f32,
}

impl Default for Blur {
    fn default() -> Self {
        Self {
            mode: BlurMode::Gaussian,
            radius: 5,
            angle: 0.0,
            strength: 5.0,
        }
    }
}

impl Blur {
    pub(crate) fn declare_pins(builder: &mut NodeBuilder) {
        builder.add_input_pin("Image", PinType::Image);
        builder.add_output_pin("Image", PinType::Image);
    }

    fn radius(&self) -> u32 {
        self.radius.clamp(1, 20)
    }

    /// Sigma matching a `2r + 1` Gaussian window
    fn sigma(&self) -> f32 {
        0.3 * (self.radius() as f32 - 1.0) + 0.8
    }

    /// Blur `image` with the current parameters
    pub fn apply(&self, image: &Image) -> Image {
        match self.mode {
            BlurMode::Gaussian => Image::from(image::imageops::blur(image.as_rgba(), self.sigma())),
            BlurMode::Directional => {
                Kernel::directional(self.radius(), self.angle, self.strength.clamp(1.0, 10.0)).apply(image)
            }
        }
    }

    pub(crate) fn process(&mut self, ctx: &mut ProcessContext<'_>) {
        let out = ctx.input(0).map(|img| self.apply(&img));
        ctx.set_output(0, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_image_survives_both_modes() {
        let img = Image::solid(8, 8, [90, 90, 90, 255]);
        for mode in [BlurMode::Gaussian, BlurMode::Directional] {
            let blur = Blur {
                mode,
                radius: 2,
                ..Default::default()
            };
            let out = blur.apply(&img);
            assert_eq!((out.width(), out.height()), (8, 8));
            let [r, _, _, _] = out.pixel(4, 4).unwrap();
            assert!(r.abs_diff(90) <= 1, "{mode:?} gave {r}");
        }
    }

    #[test]
    fn test_horizontal_blur_spreads_sideways() {
        let mut img = Image::solid(9, 9, [0, 0, 0, 255]);
        img.as_rgba_mut().put_pixel(4, 4, image::Rgba([255, 255, 255, 255]));
        let blur = Blur {
            mode: BlurMode::Directional,
            radius: 3,
            angle: 0.0,
            strength: 1.0,
        };
        let out = blur.apply(&img);
        let side = out.pixel(6, 4).unwrap()[0];
        let above = out.pixel(4, 6).unwrap()[0];
        assert!(side > above);
    }
}
