// SPDX-License-Identifier: MIT OR Apache-2.0
//! Color channel splitter: one output per RGBA channel.

use crate::artifact::Image;
use crate::evaluation::ProcessContext;
use crate::node::NodeBuilder;
use crate::pin::PinType;
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

/// Splits an image into red, green, blue and alpha images
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelSplitter {
    /// Emit each channel as a gray image instead of a tinted one
    pub grayscale: bool,
}

impl Default for ChannelSplitter {
    fn default() -> Self {
        Self { grayscale: true }
    }
}

impl ChannelSplitter {
    pub(crate) fn declare_pins(builder: &mut NodeBuilder) {
        builder.add_input_pin("Image", PinType::Image);
        builder.add_output_pin("Red", PinType::Image);
        builder.add_output_pin("Green", PinType::Image);
        builder.add_output_pin("Blue", PinType::Image);
        builder.add_output_pin("Alpha", PinType::Image);
    }

    fn extract(&self, src: &RgbaImage, channel: usize) -> Image {
        let tinted = !self.grayscale && channel < 3;
        let out = RgbaImage::from_fn(src.width(), src.height(), |x, y| {
            let v = src.get_pixel(x, y).0[channel];
            if tinted {
                let mut rgb = [0, 0, 0, 255];
                rgb[channel] = v;
                Rgba(rgb)
            } else {
                Rgba([v, v, v, 255])
            }
        });
        Image::from(out)
    }

    pub(crate) fn process(&mut self, ctx: &mut ProcessContext<'_>) {
        let input = ctx.input(0);
        for channel in 0..4 {
            let out = input.as_ref().map(|img| self.extract(img.as_rgba(), channel));
            ctx.set_output(channel, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::node::NodeKind;
    use crate::units::ProcessingUnit;

    fn split(splitter: ChannelSplitter, rgba: [u8; 4]) -> Vec<Option<[u8; 4]>> {
        let mut graph = Graph::new("split");
        let src = graph.add_node(NodeKind::ImageInput);
        let node = graph.add_unit(ProcessingUnit::ChannelSplitter(splitter));
        let out = graph.find_node(src).unwrap().output(0).unwrap().id;
        let inp = graph.find_node(node).unwrap().input(0).unwrap().id;
        graph.create_link(out, inp).unwrap();
        graph
            .update_node_parameters(src, |unit| {
                if let ProcessingUnit::ImageInput(input) = unit {
                    input.set_image(Some(Image::solid(2, 2, rgba)));
                }
            })
            .unwrap();
        graph.run_evaluation_pass().unwrap();

        let outputs: Vec<_> = graph.find_node(node).unwrap().outputs().iter().map(|p| p.id).collect();
        outputs
            .into_iter()
            .map(|pin| graph.output_artifact(pin).and_then(|img| img.pixel(1, 1)))
            .collect()
    }

    #[test]
    fn test_grayscale_channels() {
        let pixels = split(ChannelSplitter::default(), [10, 20, 30, 40]);
        assert_eq!(
            pixels,
            vec![
                Some([10, 10, 10, 255]),
                Some([20, 20, 20, 255]),
                Some([30, 30, 30, 255]),
                Some([40, 40, 40, 255]),
            ]
        );
    }

    #[test]
    fn test_tinted_channels() {
        let pixels = split(ChannelSplitter { grayscale: false }, [10, 20, 30, 40]);
        assert_eq!(pixels[0], Some([10, 0, 0, 255]));
        assert_eq!(pixels[1], Some([0, 20, 0, 255]));
        assert_eq!(pixels[2], Some([0, 0, 30, 255]));
        // alpha stays gray
        assert_eq!(pixels[3], Some([40, 40, 40, 255]));
    }
}
