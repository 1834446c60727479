// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure and the host-facing engine operations.

use crate::artifact::Image;
use crate::cache::ArtifactCache;
use crate::config::EngineConfig;
use crate::error::{GraphError, Result};
use crate::evaluation::EvaluationReport;
use crate::ident::{IdAllocator, LinkId, NodeId};
use crate::link::{Link, LinkStore};
use crate::node::{Node, NodeKind, NodeMap};
use crate::pin::{Pin, PinId};
use crate::schedule::{ScheduleError, Scheduler};
use crate::units::{NodeFactory, ProcessingUnit};
use crate::validation::{ConnectionValidator, Rejection};

/// A processing graph: nodes, links and the artifacts flowing between them
#[derive(Debug, Clone)]
pub struct Graph {
    /// Graph name
    pub name: String,
    ids: IdAllocator,
    nodes: NodeMap,
    links: LinkStore,
    cache: ArtifactCache,
    factory: NodeFactory,
    warn_cache_bytes: Option<usize>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, &EngineConfig::default())
    }

    /// Create a new empty graph using `config` for node defaults
    pub fn with_config(name: impl Into<String>, config: &EngineConfig) -> Self {
        Self {
            name: name.into(),
            ids: IdAllocator::new(),
            nodes: NodeMap::new(),
            links: LinkStore::new(),
            cache: ArtifactCache::new(),
            factory: NodeFactory::from_config(config),
            warn_cache_bytes: config.warn_cache_bytes,
        }
    }

    /// Factory used for new nodes
    pub fn factory(&self) -> &NodeFactory {
        &self.factory
    }

    // ---- nodes ----

    /// Create a node from a kind tag such as `"blur"`
    pub fn create_node(&mut self, tag: &str) -> Result<NodeId> {
        let kind: NodeKind = tag.parse()?;
        Ok(self.add_node(kind))
    }

    /// Create a node of `kind` with default parameters
    pub fn add_node(&mut self, kind: NodeKind) -> NodeId {
        let unit = self.factory.default_unit(kind);
        self.add_unit(unit)
    }

    /// Create a node around an already configured unit
    pub fn add_unit(&mut self, unit: ProcessingUnit) -> NodeId {
        let id = self.ids.next_node_id();
        let node = self.factory.create_with_unit(unit, id);
        tracing::debug!("Created {} ({})", id, node.kind());
        self.nodes.insert(id, node);
        id
    }

    /// Remove a node, every link touching it and its cached outputs
    pub fn delete_node(&mut self, node_id: NodeId) -> Option<Node> {
        if !self.nodes.contains_key(&node_id) {
            return None;
        }
        for link_id in self.links.links_for_node(node_id) {
            self.delete_link(link_id);
        }
        let node = self.nodes.shift_remove(&node_id)?;
        self.cache.evict_outputs(node.outputs().iter().map(|p| p.id));
        tracing::debug!("Deleted {} ({})", node_id, node.kind());
        Some(node)
    }

    /// Get a node by ID
    pub fn find_node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get a mutable node by ID
    pub fn find_node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// Get all nodes, in creation order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get all node IDs, in creation order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Edit a node's unit parameters. The node is marked dirty.
    ///
    /// Replacing the unit with one of another kind is refused and leaves the
    /// node untouched.
    pub fn update_node_parameters<R>(
        &mut self,
        node_id: NodeId,
        edit: impl FnOnce(&mut ProcessingUnit) -> R,
    ) -> Result<R> {
        let node = self
            .nodes
            .get_mut(&node_id)
            .ok_or(GraphError::NodeNotFound(node_id))?;
        node.update_parameters(edit)
    }

    // ---- pins ----

    /// Resolve a pin through its owning node
    pub fn find_pin(&self, pin_id: PinId) -> Option<&Pin> {
        self.nodes.get(&pin_id.node())?.find_pin(pin_id)
    }

    /// Whether any link ends on `pin_id`
    pub fn is_pin_linked(&self, pin_id: PinId) -> bool {
        self.links.is_pin_linked(pin_id)
    }

    /// IDs of the links ending on `pin_id`
    pub fn links_for_pin(&self, pin_id: PinId) -> Vec<LinkId> {
        self.links.links_for_pin(pin_id)
    }

    // ---- links ----

    /// Link two pins, in either order.
    ///
    /// Both endpoint nodes are marked dirty on success.
    pub fn create_link(&mut self, a: PinId, b: PinId) -> std::result::Result<LinkId, Rejection> {
        let valid = self.validator().check(a, b)?;
        let link = Link {
            id: self.ids.next_link_id(),
            output: valid.output,
            input: valid.input,
        };
        self.mark_endpoints_dirty(&link);
        self.links.insert(link);
        tracing::debug!("Created {}: {} -> {}", link.id, link.output, link.input);
        Ok(link.id)
    }

    /// Remove a link. Returns whether it existed.
    pub fn delete_link(&mut self, link_id: LinkId) -> bool {
        match self.links.remove(link_id) {
            Some(link) => {
                self.mark_endpoints_dirty(&link);
                tracing::debug!("Deleted {}", link_id);
                true
            }
            None => false,
        }
    }

    fn mark_endpoints_dirty(&mut self, link: &Link) {
        for node_id in [link.from_node(), link.to_node()] {
            if let Some(node) = self.nodes.get_mut(&node_id) {
                node.mark_dirty();
            }
        }
    }

    /// Get a link by ID
    pub fn link(&self, link_id: LinkId) -> Option<&Link> {
        self.links.get(link_id)
    }

    /// The link store
    pub fn links(&self) -> &LinkStore {
        &self.links
    }

    /// Validator over the current nodes and links
    pub fn validator(&self) -> ConnectionValidator<'_> {
        ConnectionValidator::new(&self.nodes, &self.links)
    }

    // ---- evaluation ----

    /// Compute the evaluation order without running anything
    pub fn compute_order(&self) -> std::result::Result<Vec<NodeId>, ScheduleError> {
        Scheduler::new(&self.nodes, &self.links).compute_order()
    }

    /// Run every dirty node in dependency order.
    ///
    /// Clean nodes are skipped even if something upstream of them ran. On a
    /// scheduling error nothing runs and the graph is left as is.
    pub fn run_evaluation_pass(&mut self) -> std::result::Result<EvaluationReport, ScheduleError> {
        let order = match self.compute_order() {
            Ok(order) => order,
            Err(e) => {
                tracing::warn!("Skipping evaluation of '{}': {}", self.name, e);
                return Err(e);
            }
        };

        self.cache.rebuild_connections(self.links.iter());

        let mut evaluated = Vec::new();
        for node_id in &order {
            let Some(node) = self.nodes.get_mut(node_id) else {
                continue;
            };
            if !node.is_dirty() {
                continue;
            }
            tracing::trace!("Processing {} ({})", node_id, node.kind());
            node.process(&mut self.cache);
            node.clear_dirty();
            evaluated.push(*node_id);
        }

        let report = EvaluationReport {
            order,
            evaluated,
            cached_artifacts: self.cache.len(),
            cached_bytes: self.cache.total_bytes(),
        };
        tracing::info!(
            "Evaluated {} of {} nodes in '{}' ({} artifacts, {} bytes cached)",
            report.evaluated.len(),
            report.order.len(),
            self.name,
            report.cached_artifacts,
            report.cached_bytes
        );
        if let Some(limit) = self.warn_cache_bytes {
            if report.cached_bytes > limit {
                tracing::warn!("Artifact cache holds {} bytes, over the {} byte threshold", report.cached_bytes, limit);
            }
        }
        Ok(report)
    }

    /// Artifact currently cached on an output pin
    pub fn output_artifact(&self, output_pin: PinId) -> Option<&Image> {
        self.cache.peek_output(output_pin)
    }

    /// The artifact cache
    pub fn cache(&self) -> &ArtifactCache {
        &self.cache
    }

    /// Remove all nodes, links and cached artifacts.
    ///
    /// Ids are not reset, so handles from before the clear stay dead.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.links.clear();
        self.cache.clear();
        tracing::debug!("Cleared '{}'", self.name);
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
