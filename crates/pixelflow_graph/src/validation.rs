// SPDX-License-Identifier: MIT OR Apache-2.0
//! Local legality checks for a candidate link.
//!
//! Cycles are not checked here; the scheduler finds them when it orders the
//! graph.

use crate::link::LinkStore;
use crate::node::NodeMap;
use crate::pin::{Pin, PinId, PinType};

/// Why a candidate link was refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// A pin does not exist
    #[error("Pin not found: {0}")]
    PinNotFound(PinId),

    /// Both ends are the same pin
    #[error("Cannot link a pin to itself")]
    SamePin,

    /// Both pins are inputs or both are outputs
    #[error("Pins have the same direction")]
    SameDirection,

    /// Pin types differ
    #[error("Type mismatch: {output:?} output cannot feed {input:?} input")]
    TypeMismatch {
        /// Type of the output pin
        output: PinType,
        /// Type of the input pin
        input: PinType,
    },

    /// Both pins are on the same node
    #[error("Cannot link a node to itself")]
    SameNode,

    /// The input pin already has an incoming link
    #[error("Input already linked: {0}")]
    InputAlreadyLinked(PinId),
}

/// A pair that passed validation, normalised to (output, input)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidLink {
    /// Output side
    pub output: PinId,
    /// Input side
    pub input: PinId,
}

/// Read-only view that decides whether two pins may be linked
pub struct ConnectionValidator<'a> {
    nodes: &'a NodeMap,
    links: &'a LinkStore,
}

impl<'a> ConnectionValidator<'a> {
    /// Validate against the given nodes and links
    pub fn new(nodes: &'a NodeMap, links: &'a LinkStore) -> Self {
        Self { nodes, links }
    }

    fn resolve(&self, pin_id: PinId) -> Result<&'a Pin, Rejection> {
        self.nodes
            .get(&pin_id.node())
            .and_then(|node| node.find_pin(pin_id))
            .ok_or(Rejection::PinNotFound(pin_id))
    }

    /// Check a candidate pair, given in either order
    pub fn check(&self, a: PinId, b: PinId) -> Result<ValidLink, Rejection> {
        let a = self.resolve(a)?;
        let b = self.resolve(b)?;

        if a.id == b.id {
            return Err(Rejection::SamePin);
        }
        if a.kind == b.kind {
            return Err(Rejection::SameDirection);
        }
        let (output, input) = if a.is_output() { (a, b) } else { (b, a) };

        if output.pin_type != input.pin_type {
            return Err(Rejection::TypeMismatch {
                output: output.pin_type,
                input: input.pin_type,
            });
        }
        if output.node == input.node {
            return Err(Rejection::SameNode);
        }
        if self.links.incoming(input.id).is_some() {
            return Err(Rejection::InputAlreadyLinked(input.id));
        }

        Ok(ValidLink {
            output: output.id,
            input: input.id,
        })
    }

    /// Whether the pair may be linked
    pub fn is_valid(&self, a: PinId, b: PinId) -> bool {
        self.check(a, b).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ident::{LinkId, NodeId};
    use crate::link::Link;
    use crate::node::{NodeBuilder, NodeKind};
    use crate::pin::PinKind;
    use crate::units::{NodeFactory, Output, ProcessingUnit};

    fn fixture() -> (NodeMap, LinkStore) {
        let factory = NodeFactory::default();
        let mut nodes = NodeMap::new();
        for (id, kind) in [
            (1, NodeKind::ImageInput),
            (2, NodeKind::Blur),
            (3, NodeKind::Blend),
        ] {
            nodes.insert(NodeId(id), factory.create_kind(kind, NodeId(id)));
        }
        let mut scalar = NodeBuilder::new(NodeId(4), "Scalar");
        scalar.add_output_pin("Value", PinType::Float);
        nodes.insert(NodeId(4), scalar.build(ProcessingUnit::Output(Output::default())));
        (nodes, LinkStore::new())
    }

    fn out(node: u64, i: usize) -> PinId {
        PinId::derive(NodeId(node), PinKind::Output, i)
    }

    fn inp(node: u64, i: usize) -> PinId {
        PinId::derive(NodeId(node), PinKind::Input, i)
    }

    #[test]
    fn test_accepts_either_order() {
        let (nodes, links) = fixture();
        let v = ConnectionValidator::new(&nodes, &links);
        let expected = ValidLink {
            output: out(1, 0),
            input: inp(2, 0),
        };
        assert_eq!(v.check(out(1, 0), inp(2, 0)), Ok(expected));
        assert_eq!(v.check(inp(2, 0), out(1, 0)), Ok(expected));
    }

    #[test]
    fn test_rejections() {
        let (nodes, mut links) = fixture();
        links.insert(Link {
            id: LinkId(10),
            output: out(1, 0),
            input: inp(3, 0),
        });
        let v = ConnectionValidator::new(&nodes, &links);

        assert_eq!(v.check(out(9, 0), inp(2, 0)), Err(Rejection::PinNotFound(out(9, 0))));
        assert_eq!(v.check(out(1, 0), inp(2, 5)), Err(Rejection::PinNotFound(inp(2, 5))));
        assert_eq!(v.check(out(1, 0), out(1, 0)), Err(Rejection::SamePin));
        assert_eq!(v.check(out(1, 0), out(2, 0)), Err(Rejection::SameDirection));
        assert_eq!(v.check(inp(2, 0), inp(3, 1)), Err(Rejection::SameDirection));
        assert_eq!(
            v.check(out(4, 0), inp(2, 0)),
            Err(Rejection::TypeMismatch {
                output: PinType::Float,
                input: PinType::Image,
            })
        );
        assert_eq!(v.check(out(2, 0), inp(2, 0)), Err(Rejection::SameNode));
        assert_eq!(
            v.check(out(2, 0), inp(3, 0)),
            Err(Rejection::InputAlreadyLinked(inp(3, 0)))
        );
        assert!(v.is_valid(out(2, 0), inp(3, 1)));
    }

    #[test]
    fn test_accepted_pairs_satisfy_local_rules() {
        let (nodes, links) = fixture();
        let v = ConnectionValidator::new(&nodes, &links);
        let all: Vec<PinId> = nodes.values().flat_map(|n| n.pins().map(|p| p.id)).collect();

        for &a in &all {
            for &b in &all {
                if let Ok(ok) = v.check(a, b) {
                    let o = v.resolve(ok.output).unwrap();
                    let i = v.resolve(ok.input).unwrap();
                    assert_ne!(o.kind, i.kind);
                    assert_eq!(o.pin_type, i.pin_type);
                    assert_ne!(o.node, i.node);
                }
            }
        }
    }
}
