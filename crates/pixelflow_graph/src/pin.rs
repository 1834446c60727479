// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pin definitions for node inputs/outputs.

use crate::ident::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

const INDEX_BITS: u32 = 15;
const KIND_SHIFT: u32 = INDEX_BITS;
const NODE_SHIFT: u32 = INDEX_BITS + 1;
const INDEX_MASK: u64 = (1 << INDEX_BITS) - 1;

/// Maximum number of pins on either side of a node
pub const MAX_PINS_PER_SIDE: usize = 1 << INDEX_BITS;

/// Unique identifier for a pin.
///
/// Derived from the owning node, the pin direction and its slot index, so
/// ids are unique across the graph and can be decoded without a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PinId(u64);

impl PinId {
    /// Derive the id of slot `index` on the given side of `node`
    pub fn derive(node: NodeId, kind: PinKind, index: usize) -> Self {
        debug_assert!(index < MAX_PINS_PER_SIDE, "pin index {index} out of range");
        let kind_bit = match kind {
            PinKind::Input => 0,
            PinKind::Output => 1,
        };
        Self((node.raw() << NODE_SHIFT) | (kind_bit << KIND_SHIFT) | (index as u64 & INDEX_MASK))
    }

    /// Node this pin belongs to
    pub fn node(self) -> NodeId {
        NodeId(self.0 >> NODE_SHIFT)
    }

    /// Pin direction
    pub fn kind(self) -> PinKind {
        if (self.0 >> KIND_SHIFT) & 1 == 0 {
            PinKind::Input
        } else {
            PinKind::Output
        }
    }

    /// Slot index within the node's input or output list
    pub fn index(self) -> usize {
        (self.0 & INDEX_MASK) as usize
    }

    /// Get the raw id value
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self.kind() {
            PinKind::Input => "in",
            PinKind::Output => "out",
        };
        write!(f, "{}.{side}{}", self.node(), self.index())
    }
}

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinKind {
    /// Input pin
    Input,
    /// Output pin
    Output,
}

/// Data type that can flow through pins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinType {
    /// Image data
    Image,
    /// Integer parameter
    Int,
    /// Floating point parameter
    Float,
    /// Boolean parameter
    Bool,
    /// String parameter
    String,
    /// Color parameter
    Color,
    /// Single color channel
    Channel,
}

impl PinType {
    /// Get the color for this pin type (for UI)
    pub fn color(self) -> [u8; 3] {
        match self {
            Self::Image => [255, 128, 128],
            Self::Int => [68, 201, 156],
            Self::Float => [147, 226, 74],
            Self::Bool => [220, 48, 48],
            Self::String => [124, 21, 153],
            Self::Color => [51, 150, 215],
            Self::Channel => [218, 0, 183],
        }
    }
}

/// A pin on a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pin {
    /// Unique pin ID
    pub id: PinId,
    /// Owning node (lookup only)
    pub node: NodeId,
    /// Pin name
    pub name: String,
    /// Data type
    pub pin_type: PinType,
    /// Pin direction
    pub kind: PinKind,
}

impl Pin {
    /// Create the pin for slot `index` on the given side of `node`
    pub(crate) fn new(
        node: NodeId,
        index: usize,
        name: impl Into<String>,
        pin_type: PinType,
        kind: PinKind,
    ) -> Self {
        Self {
            id: PinId::derive(node, kind, index),
            node,
            name: name.into(),
            pin_type,
            kind,
        }
    }

    /// Whether this is an input pin
    pub fn is_input(&self) -> bool {
        self.kind == PinKind::Input
    }

    /// Whether this is an output pin
    pub fn is_output(&self) -> bool {
        self.kind == PinKind::Output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_pin_id_decodes() {
        let id = PinId::derive(NodeId(42), PinKind::Output, 3);
        assert_eq!(id.node(), NodeId(42));
        assert_eq!(id.kind(), PinKind::Output);
        assert_eq!(id.index(), 3);
        assert_eq!(id.to_string(), "node#42.out3");
    }

    #[test]
    fn test_pin_ids_never_collide() {
        let mut seen = HashSet::new();
        for node in 1..50 {
            for index in 0..8 {
                for kind in [PinKind::Input, PinKind::Output] {
                    assert!(seen.insert(PinId::derive(NodeId(node), kind, index)));
                }
            }
        }
    }

    #[test]
    fn test_pin_direction_helpers() {
        let pin = Pin::new(NodeId(1), 0, "Image", PinType::Image, PinKind::Input);
        assert!(pin.is_input());
        assert!(!pin.is_output());
        assert_eq!(pin.id.node(), pin.node);
    }
}
