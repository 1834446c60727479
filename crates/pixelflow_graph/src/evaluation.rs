// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph evaluation and execution.

use crate::artifact::Image;
use crate::cache::ArtifactCache;
use crate::ident::NodeId;
use crate::pin::Pin;

/// What a processing unit can see while it runs.
///
/// Exposes the node's own pins against the artifact cache and nothing else,
/// so a unit cannot touch links, ids or other nodes.
pub struct ProcessContext<'a> {
    node: NodeId,
    inputs: &'a [Pin],
    outputs: &'a [Pin],
    cache: &'a mut ArtifactCache,
}

impl<'a> ProcessContext<'a> {
    pub(crate) fn new(
        node: NodeId,
        inputs: &'a [Pin],
        outputs: &'a [Pin],
        cache: &'a mut ArtifactCache,
    ) -> Self {
        Self {
            node,
            inputs,
            outputs,
            cache,
        }
    }

    /// Node being processed
    pub fn node_id(&self) -> NodeId {
        self.node
    }

    /// Number of input pins
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Number of output pins
    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Copy of the artifact visible on input slot `index`
    pub fn input(&self, index: usize) -> Option<Image> {
        let pin = self.inputs.get(index)?;
        self.cache.get(pin.id)
    }

    /// Publish `value` on output slot `index`. `None` clears the slot.
    pub fn set_output(&mut self, index: usize, value: Option<Image>) {
        match self.outputs.get(index) {
            Some(pin) => self.cache.store(pin.id, value),
            None => tracing::warn!("{} has no output slot {}", self.node, index),
        }
    }
}

/// Outcome of one evaluation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationReport {
    /// Full evaluation order
    pub order: Vec<NodeId>,
    /// Nodes that were dirty and ran, in order
    pub evaluated: Vec<NodeId>,
    /// Number of cached artifacts after the pass
    pub cached_artifacts: usize,
    /// Total size of cached artifacts after the pass
    pub cached_bytes: usize,
}

impl EvaluationReport {
    /// Whether `node` ran during this pass
    pub fn ran(&self, node: NodeId) -> bool {
        self.evaluated.contains(&node)
    }

    /// Number of nodes that were clean and skipped
    pub fn skipped(&self) -> usize {
        self.order.len() - self.evaluated.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ident::LinkId;
    use crate::link::Link;
    use crate::pin::{PinKind, PinType};

    #[test]
    fn test_context_reads_and_writes_through_cache() {
        let up = NodeId(1);
        let me = NodeId(2);
        let upstream_out = Pin::new(up, 0, "Image", PinType::Image, PinKind::Output);
        let inputs = vec![Pin::new(me, 0, "Image", PinType::Image, PinKind::Input)];
        let outputs = vec![Pin::new(me, 0, "Image", PinType::Image, PinKind::Output)];

        let mut cache = ArtifactCache::new();
        cache.rebuild_connections(&[Link {
            id: LinkId(9),
            output: upstream_out.id,
            input: inputs[0].id,
        }]);
        cache.store(upstream_out.id, Some(Image::solid(1, 1, [5, 5, 5, 255])));

        let mut ctx = ProcessContext::new(me, &inputs, &outputs, &mut cache);
        assert_eq!(ctx.node_id(), me);
        assert_eq!((ctx.input_count(), ctx.output_count()), (1, 1));
        let seen = ctx.input(0).unwrap();
        assert!(ctx.input(1).is_none());

        ctx.set_output(0, Some(seen.clone()));
        ctx.set_output(3, Some(seen.clone()));
        assert_eq!(cache.peek_output(outputs[0].id), Some(&seen));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_report_counts() {
        let report = EvaluationReport {
            order: vec![NodeId(1), NodeId(2), NodeId(3)],
            evaluated: vec![NodeId(2)],
            ..Default::default()
        };
        assert!(report.ran(NodeId(2)));
        assert!(!report.ran(NodeId(1)));
        assert_eq!(report.skipped(), 2);
    }
}
