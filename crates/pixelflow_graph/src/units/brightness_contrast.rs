// SPDX-License-Identifier: MIT OR Apache-2.0
//! Brightness/contrast: `out = contrast * in + brightness` per color channel.

use super::kernel::saturate;
use crate::evaluation::ProcessContext;
use crate::node::NodeBuilder;
use crate::pin::PinType;
use serde::{Deserialize, Serialize};

/// Linear color adjustment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrightnessContrast {
    /// Offset added to each channel, -100 to 100
    pub brightness: f32,
    /// Gain applied to each channel, 0 to 3
    pub contrast: f32,
}

impl Default for BrightnessContrast {
    fn default() -> Self {
        Self {
            brightness: 0.0,
            contrast: 1.0,
        }
    }
}

impl BrightnessContrast {
    pub(crate) fn declare_pins(builder: &mut NodeBuilder) {
        builder.add_input_pin("Image", PinType::Image);
        builder.add_output_pin("Image", PinType::Image);
    }

    /// Restore the neutral brightness
    pub fn reset_brightness(&mut self) {
        self.brightness = 0.0;
    }

    /// Restore the neutral contrast
    pub fn reset_contrast(&mut self) {
        self.contrast = 1.0;
    }

    pub(crate) fn process(&mut self, ctx: &mut ProcessContext<'_>) {
        let alpha = self.contrast.clamp(0.0, 3.0);
        let beta = self.brightness.clamp(-100.0, 100.0).trunc();
        let out = ctx
            .input(0)
            .map(|img| img.map_rgb(|v| saturate(alpha * f32::from(v) + beta)));
        ctx.set_output(0, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::Image;
    use crate::graph::Graph;
    use crate::node::NodeKind;
    use crate::units::ProcessingUnit;

    fn adjust(unit: BrightnessContrast, rgba: [u8; 4]) -> Option<[u8; 4]> {
        let mut graph = Graph::new("adjust");
        let src = graph.add_node(NodeKind::ImageInput);
        let node = graph.add_unit(ProcessingUnit::BrightnessContrast(unit));
        let out = graph.find_node(src).unwrap().output(0).unwrap().id;
        let inp = graph.find_node(node).unwrap().input(0).unwrap().id;
        graph.create_link(out, inp).unwrap();
        graph
            .update_node_parameters(src, |unit| {
                if let ProcessingUnit::ImageInput(input) = unit {
                    input.set_image(Some(Image::solid(1, 1, rgba)));
                }
            })
            .unwrap();
        graph.run_evaluation_pass().unwrap();
        let result = graph.find_node(node).unwrap().output(0).unwrap().id;
        graph.output_artifact(result).and_then(|img| img.pixel(0, 0))
    }

    #[test]
    fn test_defaults_are_identity() {
        assert_eq!(adjust(BrightnessContrast::default(), [1, 128, 254, 90]), Some([1, 128, 254, 90]));
    }

    #[test]
    fn test_parameters_are_clamped() {
        let unit = BrightnessContrast {
            brightness: -500.0,
            contrast: 10.0,
        };
        // contrast 3, brightness -100
        assert_eq!(adjust(unit, [20, 50, 100, 255]), Some([0, 50, 200, 255]));

        let fractional = BrightnessContrast {
            brightness: 9.9,
            contrast: 1.0,
        };
        assert_eq!(adjust(fractional, [0, 0, 0, 255]), Some([9, 9, 9, 255]));
    }

    #[test]
    fn test_resets() {
        let mut unit = BrightnessContrast {
            brightness: 40.0,
            contrast: 0.5,
        };
        unit.reset_brightness();
        unit.reset_contrast();
        assert_eq!(unit, BrightnessContrast::default());
    }
}
