// SPDX-License-Identifier: MIT OR Apache-2.0
//! Identifier allocation for nodes and links.
//!
//! Nodes and links draw from a single monotonically increasing counter per
//! graph. Values are never handed out twice, so a handle to a deleted entity
//! fails lookups instead of aliasing a newer one. Pins derive their ids from
//! their owning node (see [`PinId`](crate::pin::PinId)) and need no allocator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub(crate) u64);

impl NodeId {
    /// Get the raw id value
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Unique identifier for a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LinkId(pub(crate) u64);

impl LinkId {
    /// Get the raw id value
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "link#{}", self.0)
    }
}

/// Session-scoped id counter.
///
/// Starts at 1 so that 0 never denotes a live entity.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// Create a fresh allocator
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Hand out the next unused id
    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Allocate a node id
    pub fn next_node_id(&mut self) -> NodeId {
        NodeId(self.next_id())
    }

    /// Allocate a link id
    pub fn next_link_id(&mut self) -> LinkId {
        LinkId(self.next_id())
    }

    /// Peek at the value the next call will return
    pub fn peek(&self) -> u64 {
        self.next
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_monotonic_and_shared() {
        let mut ids = IdAllocator::new();
        let a = ids.next_node_id();
        let l = ids.next_link_id();
        let b = ids.next_node_id();

        assert_eq!(a.raw(), 1);
        assert_eq!(l.raw(), 2);
        assert_eq!(b.raw(), 3);
        assert_eq!(ids.peek(), 4);
    }

    #[test]
    fn test_display() {
        assert_eq!(NodeId(7).to_string(), "node#7");
        assert_eq!(LinkId(9).to_string(), "link#9");
    }
}
