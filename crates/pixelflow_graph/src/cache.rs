// SPDX-License-Identifier: MIT OR Apache-2.0
//! Artifact cache: what each output pin last produced, and what each input
//! pin currently sees.
//!
//! Values are keyed by output pin. Inputs resolve through a connection map
//! that is rebuilt wholesale from the link store before every evaluation
//! pass, never patched incrementally. Both `set` and `get` copy, so nothing
//! outside the cache can alias a cached value.

use crate::artifact::{Artifact, Image};
use crate::link::Link;
use crate::pin::PinId;
use std::collections::HashMap;

/// Cached artifacts and the input→output connection map
#[derive(Debug, Clone)]
pub struct ArtifactCache<A: Artifact = Image> {
    /// Most recent value per output pin
    values: HashMap<PinId, A>,
    /// Upstream output pin per connected input pin
    connections: HashMap<PinId, PinId>,
}

impl<A: Artifact> ArtifactCache<A> {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
            connections: HashMap::new(),
        }
    }

    /// Store a private copy of `value` for `output_pin`.
    ///
    /// `None` or an empty value evicts the existing entry instead.
    pub fn set(&mut self, output_pin: PinId, value: Option<&A>) {
        match value {
            Some(v) if !v.is_empty() => {
                self.values.insert(output_pin, v.clone());
            }
            _ => {
                self.values.remove(&output_pin);
            }
        }
    }

    /// Take ownership of a freshly produced value for `output_pin`.
    ///
    /// Same eviction rule as [`set`](Self::set). The value is already
    /// private to the cache, so no copy is made.
    pub fn store(&mut self, output_pin: PinId, value: Option<A>) {
        match value {
            Some(v) if !v.is_empty() => {
                self.values.insert(output_pin, v);
            }
            _ => {
                self.values.remove(&output_pin);
            }
        }
    }

    /// Copy of the value currently visible on `input_pin`
    pub fn get(&self, input_pin: PinId) -> Option<A> {
        let upstream = self.connections.get(&input_pin)?;
        self.values.get(upstream).cloned()
    }

    /// Borrow what an output pin last produced
    pub fn peek_output(&self, output_pin: PinId) -> Option<&A> {
        self.values.get(&output_pin)
    }

    /// Output pin currently feeding `input_pin`
    pub fn upstream_of(&self, input_pin: PinId) -> Option<PinId> {
        self.connections.get(&input_pin).copied()
    }

    /// Replace the connection map from a link snapshot
    pub fn rebuild_connections<'a>(&mut self, links: impl IntoIterator<Item = &'a Link>) {
        self.connections.clear();
        for link in links {
            self.connections.insert(link.input, link.output);
        }
    }

    /// Drop the cached values of the given output pins
    pub fn evict_outputs(&mut self, output_pins: impl IntoIterator<Item = PinId>) {
        for pin in output_pins {
            self.values.remove(&pin);
        }
    }

    /// Drop all values and connections
    pub fn clear(&mut self) {
        self.values.clear();
        self.connections.clear();
    }

    /// Number of cached values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing is cached
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sum of the cached values' sizes
    pub fn total_bytes(&self) -> usize {
        self.values.values().map(Artifact::byte_size).sum()
    }
}

impl<A: Artifact> Default for ArtifactCache<A> {
    fn default() -> Self {
        Self::new()
    }
}
