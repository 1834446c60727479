// SPDX-License-Identifier: MIT OR Apache-2.0
//! Processing units: the per-kind behaviour behind every node.
//!
//! [`ProcessingUnit`] is a closed enum with one parameter struct per
//! [`NodeKind`]. Each unit declares its own pin layout and implements
//! `process` against a [`ProcessContext`]. [`NodeFactory`] turns a kind or a
//! tag into a fully built [`Node`].

mod blend;
mod blur;
mod brightness_contrast;
mod channel_splitter;
mod convolution;
mod edge_detection;
mod input;
pub(crate) mod kernel;
mod noise;
mod output;
mod threshold;

pub use blend::{Blend, BlendMode};
pub use blur::{Blur, BlurMode};
pub use brightness_contrast::BrightnessContrast;
pub use channel_splitter::ChannelSplitter;
pub use convolution::{Convolution, ConvolutionPreset};
pub use edge_detection::{EdgeDetection, EdgeMethod};
pub use input::ImageInput;
pub use noise::{Noise, NoiseKind, MAX_NOISE_EDGE};
pub use output::Output;
pub use threshold::{Threshold, ThresholdMode};

use crate::config::EngineConfig;
use crate::error::GraphError;
use crate::evaluation::ProcessContext;
use crate::ident::NodeId;
use crate::node::{Node, NodeBuilder, NodeKind};
use serde::{Deserialize, Serialize};

/// A node's processing behaviour and parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProcessingUnit {
    /// Host-supplied image
    ImageInput(ImageInput),
    /// Final sink
    Output(Output),
    /// Brightness/contrast
    BrightnessContrast(BrightnessContrast),
    /// Channel splitter
    ChannelSplitter(ChannelSplitter),
    /// Blur
    Blur(Blur),
    /// Threshold
    Threshold(Threshold),
    /// Edge detection
    EdgeDetection(EdgeDetection),
    /// Blend
    Blend(Blend),
    /// Noise generation
    Noise(Noise),
    /// Convolution filter
    Convolution(Convolution),
}

impl ProcessingUnit {
    /// Kind tag of this unit
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::ImageInput(_) => NodeKind::ImageInput,
            Self::Output(_) => NodeKind::Output,
            Self::BrightnessContrast(_) => NodeKind::BrightnessContrast,
            Self::ChannelSplitter(_) => NodeKind::ChannelSplitter,
            Self::Blur(_) => NodeKind::Blur,
            Self::Threshold(_) => NodeKind::Threshold,
            Self::EdgeDetection(_) => NodeKind::EdgeDetection,
            Self::Blend(_) => NodeKind::Blend,
            Self::Noise(_) => NodeKind::Noise,
            Self::Convolution(_) => NodeKind::Convolution,
        }
    }

    fn declare_pins(&self, builder: &mut NodeBuilder) {
        match self {
            Self::ImageInput(_) => ImageInput::declare_pins(builder),
            Self::Output(_) => Output::declare_pins(builder),
            Self::BrightnessContrast(_) => BrightnessContrast::declare_pins(builder),
            Self::ChannelSplitter(_) => ChannelSplitter::declare_pins(builder),
            Self::Blur(_) => Blur::declare_pins(builder),
            Self::Threshold(_) => Threshold::declare_pins(builder),
            Self::EdgeDetection(_) => EdgeDetection::declare_pins(builder),
            Self::Blend(_) => Blend::declare_pins(builder),
            Self::Noise(_) => Noise::declare_pins(builder),
            Self::Convolution(_) => Convolution::declare_pins(builder),
        }
    }

    /// Read inputs from the context and publish outputs to it
    pub fn process(&mut self, ctx: &mut ProcessContext<'_>) {
        match self {
            Self::ImageInput(unit) => unit.process(ctx),
            Self::Output(unit) => unit.process(ctx),
            Self::BrightnessContrast(unit) => unit.process(ctx),
            Self::ChannelSplitter(unit) => unit.process(ctx),
            Self::Blur(unit) => unit.process(ctx),
            Self::Threshold(unit) => unit.process(ctx),
            Self::EdgeDetection(unit) => unit.process(ctx),
            Self::Blend(unit) => unit.process(ctx),
            Self::Noise(unit) => unit.process(ctx),
            Self::Convolution(unit) => unit.process(ctx),
        }
    }
}

/// Builds nodes from kinds or tags.
///
/// Holds the defaults that some units take from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeFactory {
    /// Size of newly created noise images
    pub canvas: (u32, u32),
    /// Seed for newly created noise units
    pub noise_seed: u64,
}

impl Default for NodeFactory {
    fn default() -> Self {
        Self {
            canvas: (256, 256),
            noise_seed: 0,
        }
    }
}

impl NodeFactory {
    /// Factory using the configured defaults
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            canvas: config.default_canvas,
            noise_seed: config.noise_seed,
        }
    }

    /// Default unit for `kind`
    pub fn default_unit(&self, kind: NodeKind) -> ProcessingUnit {
        match kind {
            NodeKind::ImageInput => ProcessingUnit::ImageInput(ImageInput::default()),
            NodeKind::Output => ProcessingUnit::Output(Output::default()),
            NodeKind::BrightnessContrast => ProcessingUnit::BrightnessContrast(BrightnessContrast::default()),
            NodeKind::ChannelSplitter => ProcessingUnit::ChannelSplitter(ChannelSplitter::default()),
            NodeKind::Blur => ProcessingUnit::Blur(Blur::default()),
            NodeKind::Threshold => ProcessingUnit::Threshold(Threshold::default()),
            NodeKind::EdgeDetection => ProcessingUnit::EdgeDetection(EdgeDetection::default()),
            NodeKind::Blend => ProcessingUnit::Blend(Blend::default()),
            NodeKind::Noise => ProcessingUnit::Noise(Noise {
                width: self.canvas.0,
                height: self.canvas.1,
                seed: self.noise_seed,
                ..Default::default()
            }),
            NodeKind::Convolution => ProcessingUnit::Convolution(Convolution::default()),
        }
    }

    /// Build a node from a kind tag such as `"blur"`
    pub fn create(&self, tag: &str, id: NodeId) -> Result<Node, GraphError> {
        let kind: NodeKind = tag.parse()?;
        Ok(self.create_kind(kind, id))
    }

    /// Build a node of `kind` with default parameters
    pub fn create_kind(&self, kind: NodeKind, id: NodeId) -> Node {
        self.create_with_unit(self.default_unit(kind), id)
    }

    /// Build a node around an existing unit
    pub fn create_with_unit(&self, unit: ProcessingUnit, id: NodeId) -> Node {
        let descriptor = unit.kind().descriptor();
        let mut builder = NodeBuilder::new(id, descriptor.name).with_color(descriptor.color);
        unit.declare_pins(&mut builder);
        builder.build(unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pin::PinType;

    #[test]
    fn test_every_kind_builds() {
        let factory = NodeFactory::default();
        for (i, kind) in NodeKind::ALL.into_iter().enumerate() {
            let node = factory.create_kind(kind, NodeId(i as u64 + 1));
            assert_eq!(node.kind(), kind);
            assert_eq!(node.name, kind.descriptor().name);
            assert!(node.is_dirty());
            assert!(node.pins().all(|p| p.pin_type == PinType::Image));
        }
    }

    #[test]
    fn test_pin_layouts() {
        let factory = NodeFactory::default();
        let layout = |kind| {
            let node = factory.create_kind(kind, NodeId(1));
            let names = |pins: &[crate::pin::Pin]| pins.iter().map(|p| p.name.clone()).collect::<Vec<_>>();
            (names(node.inputs()), names(node.outputs()))
        };

        assert_eq!(layout(NodeKind::ImageInput), (vec![], vec!["Image".to_string()]));
        assert_eq!(layout(NodeKind::Output), (vec!["Image".to_string()], vec![]));
        assert_eq!(
            layout(NodeKind::Blend),
            (
                vec!["Base Image".to_string(), "Blend Image".to_string()],
                vec!["Result".to_string()]
            )
        );
        assert_eq!(layout(NodeKind::ChannelSplitter).1, vec!["Red", "Green", "Blue", "Alpha"]);
        assert_eq!(layout(NodeKind::Noise), (vec![], vec!["Noise".to_string()]));
    }

    #[test]
    fn test_create_by_tag() {
        let factory = NodeFactory::default();
        let node = factory.create("threshold", NodeId(7)).unwrap();
        assert_eq!(node.kind(), NodeKind::Threshold);
        assert!(matches!(
            factory.create("sepia", NodeId(8)),
            Err(GraphError::UnknownNodeKind(tag)) if tag == "sepia"
        ));
    }

    #[test]
    fn test_noise_takes_factory_defaults() {
        let factory = NodeFactory {
            canvas: (32, 16),
            noise_seed: 9,
        };
        match factory.default_unit(NodeKind::Noise) {
            ProcessingUnit::Noise(noise) => {
                assert_eq!((noise.width, noise.height, noise.seed), (32, 16, 9));
            }
            other => panic!("unexpected unit {other:?}"),
        }
    }
}
