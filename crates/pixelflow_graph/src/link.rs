// SPDX-License-Identifier: MIT OR Apache-2.0
//! Link (edge) definitions and the authoritative link table.

use crate::ident::{LinkId, NodeId};
use crate::pin::PinId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A directed link from an output pin to an input pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    /// Unique link ID
    pub id: LinkId,
    /// Source (output) pin
    pub output: PinId,
    /// Target (input) pin
    pub input: PinId,
}

impl Link {
    /// Node on the output side
    pub fn from_node(&self) -> NodeId {
        self.output.node()
    }

    /// Node on the input side
    pub fn to_node(&self) -> NodeId {
        self.input.node()
    }

    /// Check if this link involves a specific node
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.from_node() == node_id || self.to_node() == node_id
    }

    /// Check if this link involves a specific pin
    pub fn involves_pin(&self, pin_id: PinId) -> bool {
        self.output == pin_id || self.input == pin_id
    }
}

/// All links of a graph, in creation order.
///
/// Stores records only. Validation and dirty-marking happen in
/// [`Graph`](crate::graph::Graph), which owns the nodes.
#[derive(Debug, Clone, Default)]
pub struct LinkStore {
    links: IndexMap<LinkId, Link>,
}

impl LinkStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an already validated link
    pub(crate) fn insert(&mut self, link: Link) {
        self.links.insert(link.id, link);
    }

    /// Remove a link, returning it if it existed
    pub(crate) fn remove(&mut self, link_id: LinkId) -> Option<Link> {
        self.links.shift_remove(&link_id)
    }

    /// Get a link by ID
    pub fn get(&self, link_id: LinkId) -> Option<&Link> {
        self.links.get(&link_id)
    }

    /// Iterate all links in creation order
    pub fn iter(&self) -> impl Iterator<Item = &Link> {
        self.links.values()
    }

    /// Number of links
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Whether there are no links
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// IDs of every link touching `pin_id`
    pub fn links_for_pin(&self, pin_id: PinId) -> Vec<LinkId> {
        self.links
            .values()
            .filter(|l| l.involves_pin(pin_id))
            .map(|l| l.id)
            .collect()
    }

    /// Whether any link touches `pin_id`
    pub fn is_pin_linked(&self, pin_id: PinId) -> bool {
        self.links.values().any(|l| l.involves_pin(pin_id))
    }

    /// The link feeding an input pin, if any
    pub fn incoming(&self, input_pin: PinId) -> Option<&Link> {
        self.links.values().find(|l| l.input == input_pin)
    }

    /// Links leaving an output pin
    pub fn outgoing(&self, output_pin: PinId) -> impl Iterator<Item = &Link> {
        self.links.values().filter(move |l| l.output == output_pin)
    }

    /// IDs of every link touching `node_id`
    pub fn links_for_node(&self, node_id: NodeId) -> Vec<LinkId> {
        self.links
            .values()
            .filter(|l| l.involves_node(node_id))
            .map(|l| l.id)
            .collect()
    }

    pub(crate) fn clear(&mut self) {
        self.links.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pin::PinKind;

    fn link(id: u64, from: u64, to: u64) -> Link {
        Link {
            id: LinkId(id),
            output: PinId::derive(NodeId(from), PinKind::Output, 0),
            input: PinId::derive(NodeId(to), PinKind::Input, 0),
        }
    }

    #[test]
    fn test_involves() {
        let l = link(10, 1, 2);
        assert!(l.involves_node(NodeId(1)));
        assert!(l.involves_node(NodeId(2)));
        assert!(!l.involves_node(NodeId(3)));
        assert_eq!(l.from_node(), NodeId(1));
        assert_eq!(l.to_node(), NodeId(2));
    }

    #[test]
    fn test_pin_queries() {
        let mut store = LinkStore::new();
        store.insert(link(10, 1, 2));
        store.insert(link(11, 1, 3));

        let out = PinId::derive(NodeId(1), PinKind::Output, 0);
        assert_eq!(store.links_for_pin(out), vec![LinkId(10), LinkId(11)]);
        assert_eq!(store.outgoing(out).count(), 2);
        assert!(store.is_pin_linked(out));

        let inp = PinId::derive(NodeId(3), PinKind::Input, 0);
        assert_eq!(store.incoming(inp).map(|l| l.id), Some(LinkId(11)));

        let lonely = PinId::derive(NodeId(4), PinKind::Input, 0);
        assert!(!store.is_pin_linked(lonely));
        assert!(store.links_for_pin(lonely).is_empty());
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut store = LinkStore::new();
        store.insert(link(10, 1, 2));
        store.insert(link(11, 2, 3));
        store.insert(link(12, 3, 4));

        assert!(store.remove(LinkId(11)).is_some());
        assert!(store.remove(LinkId(11)).is_none());
        let ids: Vec<_> = store.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![LinkId(10), LinkId(12)]);
    }
}
