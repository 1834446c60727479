// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the graph engine.

use crate::cache::ArtifactCache;
use crate::error::GraphError;
use crate::evaluation::ProcessContext;
use crate::ident::NodeId;
use crate::pin::{Pin, PinId, PinKind, PinType};
use crate::units::ProcessingUnit;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Node storage keyed by id, in creation order
pub type NodeMap = IndexMap<NodeId, Node>;

/// Node type category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeCategory {
    /// Produces images without inputs
    Source,
    /// Consumes images for display or export
    Sink,
    /// Per-pixel color adjustments
    Adjustment,
    /// Neighbourhood filters
    Filter,
    /// Combines or separates images
    Composite,
}

/// The closed set of processing unit kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Image supplied by the host
    ImageInput,
    /// Final image sink
    Output,
    /// Linear brightness/contrast adjustment
    BrightnessContrast,
    /// Splits an image into per-channel images
    ChannelSplitter,
    /// Gaussian or directional blur
    Blur,
    /// Binary, adaptive or Otsu threshold
    Threshold,
    /// Sobel, Canny or Laplacian edges
    EdgeDetection,
    /// Blends two images
    Blend,
    /// Generated noise image
    Noise,
    /// User-defined convolution kernel
    Convolution,
}

/// Static description of a node kind (for palettes and menus)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeDescriptor {
    /// Stable tag used by the factory and recipes
    pub tag: &'static str,
    /// Display name
    pub name: &'static str,
    /// Category
    pub category: NodeCategory,
    /// Description
    pub description: &'static str,
    /// Header color
    pub color: [u8; 3],
}

impl NodeKind {
    /// Every kind, in palette order
    pub const ALL: [NodeKind; 10] = [
        NodeKind::ImageInput,
        NodeKind::Output,
        NodeKind::BrightnessContrast,
        NodeKind::ChannelSplitter,
        NodeKind::Blur,
        NodeKind::Threshold,
        NodeKind::EdgeDetection,
        NodeKind::Blend,
        NodeKind::Noise,
        NodeKind::Convolution,
    ];

    /// Static description of this kind
    pub fn descriptor(self) -> NodeDescriptor {
        use NodeCategory::{Adjustment, Composite, Filter, Sink, Source};
        let (tag, name, category, description, color) = match self {
            Self::ImageInput => ("image_input", "Image Input", Source, "Image supplied by the host", [255, 128, 128]),
            Self::Output => ("output", "Output", Sink, "Final image result", [128, 195, 248]),
            Self::BrightnessContrast => (
                "brightness_contrast",
                "Brightness/Contrast",
                Adjustment,
                "Scale and offset color values",
                [218, 112, 214],
            ),
            Self::ChannelSplitter => (
                "channel_splitter",
                "Color Channel Splitter",
                Composite,
                "Separate red, green, blue and alpha",
                [255, 180, 50],
            ),
            Self::Blur => ("blur", "Blur", Filter, "Gaussian or directional blur", [100, 150, 250]),
            Self::Threshold => ("threshold", "Threshold", Adjustment, "Binary, adaptive or Otsu threshold", [128, 230, 150]),
            Self::EdgeDetection => (
                "edge_detection",
                "Edge Detection",
                Filter,
                "Sobel, Canny or Laplacian edges",
                [200, 150, 100],
            ),
            Self::Blend => ("blend", "Blend", Composite, "Blend two images with a blend mode", [65, 105, 225]),
            Self::Noise => ("noise", "Noise Generation", Source, "Uniform or Gaussian noise", [180, 180, 50]),
            Self::Convolution => ("convolution", "Convolution Filter", Filter, "Apply a custom kernel", [150, 150, 150]),
        };
        NodeDescriptor {
            tag,
            name,
            category,
            description,
            color,
        }
    }

    /// Stable tag of this kind
    pub fn tag(self) -> &'static str {
        self.descriptor().tag
    }

    /// Kinds in a category
    pub fn in_category(category: NodeCategory) -> impl Iterator<Item = NodeKind> {
        Self::ALL
            .into_iter()
            .filter(move |k| k.descriptor().category == category)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for NodeKind {
    type Err = GraphError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.tag() == tag)
            .ok_or_else(|| GraphError::UnknownNodeKind(tag.to_string()))
    }
}

/// Collects a node's pin layout during construction.
///
/// Pins can only be added here, so a built [`Node`] has a fixed layout.
#[derive(Debug)]
pub struct NodeBuilder {
    id: NodeId,
    name: String,
    color: [u8; 3],
    inputs: Vec<Pin>,
    outputs: Vec<Pin>,
}

impl NodeBuilder {
    /// Start building node `id`
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: [255, 255, 255],
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Set the header color
    pub fn with_color(mut self, color: [u8; 3]) -> Self {
        self.color = color;
        self
    }

    /// Append an input pin
    pub fn add_input_pin(&mut self, name: &str, pin_type: PinType) -> PinId {
        let pin = Pin::new(self.id, self.inputs.len(), name, pin_type, PinKind::Input);
        let id = pin.id;
        self.inputs.push(pin);
        id
    }

    /// Append an output pin
    pub fn add_output_pin(&mut self, name: &str, pin_type: PinType) -> PinId {
        let pin = Pin::new(self.id, self.outputs.len(), name, pin_type, PinKind::Output);
        let id = pin.id;
        self.outputs.push(pin);
        id
    }

    /// Finish the node around its processing unit
    pub fn build(self, unit: ProcessingUnit) -> Node {
        Node {
            id: self.id,
            name: self.name,
            color: self.color,
            inputs: self.inputs,
            outputs: self.outputs,
            dirty: true,
            unit,
        }
    }
}

/// A node instance in the graph
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    /// Display name (can be customized)
    pub name: String,
    /// Header color
    pub color: [u8; 3],
    inputs: Vec<Pin>,
    outputs: Vec<Pin>,
    dirty: bool,
    unit: ProcessingUnit,
}

impl Node {
    /// Node ID
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Kind of processing unit this node runs
    pub fn kind(&self) -> NodeKind {
        self.unit.kind()
    }

    /// Input pins in slot order
    pub fn inputs(&self) -> &[Pin] {
        &self.inputs
    }

    /// Output pins in slot order
    pub fn outputs(&self) -> &[Pin] {
        &self.outputs
    }

    /// Get an input pin by index
    pub fn input(&self, index: usize) -> Option<&Pin> {
        self.inputs.get(index)
    }

    /// Get an output pin by index
    pub fn output(&self, index: usize) -> Option<&Pin> {
        self.outputs.get(index)
    }

    /// Get a pin by ID
    pub fn find_pin(&self, pin_id: PinId) -> Option<&Pin> {
        self.inputs
            .iter()
            .find(|p| p.id == pin_id)
            .or_else(|| self.outputs.iter().find(|p| p.id == pin_id))
    }

    /// Get all pins
    pub fn pins(&self) -> impl Iterator<Item = &Pin> {
        self.inputs.iter().chain(self.outputs.iter())
    }

    /// Whether the cached outputs of this node are stale
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Flag the node for re-evaluation
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// The node's processing unit and its parameters
    pub fn unit(&self) -> &ProcessingUnit {
        &self.unit
    }

    /// Edit the unit's parameters and mark the node dirty.
    ///
    /// The pin layout belongs to the kind, so an edit that swaps the unit for
    /// another kind is undone and reported as [`GraphError::KindChanged`].
    pub fn update_parameters<R>(
        &mut self,
        edit: impl FnOnce(&mut ProcessingUnit) -> R,
    ) -> Result<R, GraphError> {
        let kind = self.kind();
        let previous = self.unit.clone();
        let result = edit(&mut self.unit);

        let found = self.unit.kind();
        if found != kind {
            self.unit = previous;
            return Err(GraphError::KindChanged {
                node: self.id,
                expected: kind,
                found,
            });
        }
        self.dirty = true;
        Ok(result)
    }

    /// Run the unit against the cache
    pub(crate) fn process(&mut self, cache: &mut ArtifactCache) {
        let mut ctx = ProcessContext::new(self.id, &self.inputs, &self.outputs, cache);
        self.unit.process(&mut ctx);
    }
}
