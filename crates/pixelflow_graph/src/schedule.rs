// SPDX-License-Identifier: MIT OR Apache-2.0
//! Evaluation ordering.
//!
//! Roots are source nodes (no linked input). From each root a depth-first
//! walk follows output links downstream; a node is pushed to the front of the
//! order once everything downstream of it has been placed, which puts every
//! node before its dependents. Nodes no root reaches are appended at the end.
//! A back-edge aborts the whole attempt.

use crate::ident::NodeId;
use crate::link::LinkStore;
use crate::node::{Node, NodeMap};
use std::collections::{HashSet, VecDeque};

/// Why no evaluation order could be produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    /// Every node has at least one linked input. A non-empty graph with no
    /// sources always contains a cycle.
    #[error("Graph has no source nodes, so it contains a cycle")]
    NoSourceNodes,

    /// A cycle was found while walking downstream
    #[error("Graph contains a cycle through {node}")]
    CycleDetected {
        /// Node at which the back-edge was found
        node: NodeId,
    },
}

/// Computes evaluation orders over a node map and its links
pub struct Scheduler<'a> {
    nodes: &'a NodeMap,
    links: &'a LinkStore,
}

impl<'a> Scheduler<'a> {
    /// Schedule the given nodes and links
    pub fn new(nodes: &'a NodeMap, links: &'a LinkStore) -> Self {
        Self { nodes, links }
    }

    /// Whether none of `node`'s inputs is linked
    pub fn is_source(&self, node: &Node) -> bool {
        node.inputs().iter().all(|pin| !self.links.is_pin_linked(pin.id))
    }

    /// Source nodes in creation order
    pub fn source_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .values()
            .filter(|n| self.is_source(n))
            .map(Node::id)
            .collect()
    }

    /// Nodes fed directly by `node`'s outputs, in link order
    fn dependents(&self, node: &Node) -> Vec<NodeId> {
        node.outputs()
            .iter()
            .flat_map(|pin| self.links.outgoing(pin.id))
            .map(|link| link.to_node())
            .filter(|id| self.nodes.contains_key(id))
            .collect()
    }

    /// Compute a dependencies-first order over every node
    pub fn compute_order(&self) -> Result<Vec<NodeId>, ScheduleError> {
        if self.nodes.is_empty() {
            return Ok(Vec::new());
        }

        let sources = self.source_nodes();
        if sources.is_empty() {
            return Err(ScheduleError::NoSourceNodes);
        }

        let mut walk = Walk::default();
        for source in sources {
            self.visit(source, &mut walk)?;
        }

        let mut order: Vec<NodeId> = walk.order.into_iter().collect();
        order.extend(self.nodes.keys().copied().filter(|id| !walk.visited.contains(id)));
        Ok(order)
    }

    fn visit(&self, id: NodeId, walk: &mut Walk) -> Result<(), ScheduleError> {
        if walk.on_stack.contains(&id) {
            return Err(ScheduleError::CycleDetected { node: id });
        }
        if walk.visited.contains(&id) {
            return Ok(());
        }
        let Some(node) = self.nodes.get(&id) else {
            return Ok(());
        };

        walk.on_stack.insert(id);
        for next in self.dependents(node) {
            self.visit(next, walk)?;
        }
        walk.on_stack.remove(&id);

        walk.visited.insert(id);
        walk.order.push_front(id);
        Ok(())
    }
}

#[derive(Default)]
struct Walk {
    visited: HashSet<NodeId>,
    on_stack: HashSet<NodeId>,
    order: VecDeque<NodeId>,
}
