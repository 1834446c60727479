// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph recipes: the structure and parameters of a graph as RON.
//!
//! A recipe lists nodes (unit plus optional custom name) and links addressed
//! by node position and pin slot. Ids are not stored; building a graph from
//! a recipe allocates fresh ones. Cached artifacts and input images are not
//! part of a recipe.

use crate::config::EngineConfig;
use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::ident::NodeId;
use crate::pin::PinId;
use crate::units::ProcessingUnit;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// One node in a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecipe {
    /// Display name, when it differs from the kind's name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Unit and its parameters
    pub unit: ProcessingUnit,
}

/// One link in a recipe, by node position and pin slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecipe {
    /// Position of the upstream node in `nodes`
    pub from_node: usize,
    /// Output slot on the upstream node
    pub from_output: usize,
    /// Position of the downstream node in `nodes`
    pub to_node: usize,
    /// Input slot on the downstream node
    pub to_input: usize,
}

/// Serializable description of a graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphRecipe {
    /// Graph name
    #[serde(default)]
    pub name: String,
    /// Nodes, in creation order
    #[serde(default)]
    pub nodes: Vec<NodeRecipe>,
    /// Links, in creation order
    #[serde(default)]
    pub links: Vec<LinkRecipe>,
}

impl GraphRecipe {
    /// Deserialize from RON format
    pub fn from_ron(s: &str) -> Result<Self> {
        Ok(ron::from_str(s)?)
    }

    /// Serialize to RON format
    pub fn to_ron(&self) -> Result<String> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Load a recipe file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GraphError::InvalidRecipe(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_ron(&content)
    }

    /// Save to a recipe file
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_ron()?).map_err(|e| {
            GraphError::InvalidRecipe(format!("cannot write {}: {}", path.display(), e))
        })
    }
}

impl Graph {
    /// Build a graph from a recipe
    pub fn from_recipe(recipe: &GraphRecipe, config: &EngineConfig) -> Result<Self> {
        let mut graph = Graph::with_config(recipe.name.clone(), config);

        let mut ids = Vec::with_capacity(recipe.nodes.len());
        for node in &recipe.nodes {
            let id = graph.add_unit(node.unit.clone());
            if let (Some(name), Some(built)) = (&node.name, graph.find_node_mut(id)) {
                built.name = name.clone();
            }
            ids.push(id);
        }

        for (i, link) in recipe.links.iter().enumerate() {
            let output = graph.recipe_pin(&ids, i, link.from_node, link.from_output, false)?;
            let input = graph.recipe_pin(&ids, i, link.to_node, link.to_input, true)?;
            graph.create_link(output, input)?;
        }

        tracing::debug!(
            "Built '{}' from recipe: {} nodes, {} links",
            graph.name,
            graph.node_count(),
            graph.links().len()
        );
        Ok(graph)
    }

    fn recipe_pin(&self, ids: &[NodeId], link: usize, node: usize, slot: usize, input: bool) -> Result<PinId> {
        let node_id = ids.get(node).copied().ok_or_else(|| {
            GraphError::InvalidRecipe(format!("link {link} refers to missing node {node}"))
        })?;
        let node_ref = self.find_node(node_id).ok_or(GraphError::NodeNotFound(node_id))?;
        let pin = if input { node_ref.input(slot) } else { node_ref.output(slot) };
        pin.map(|p| p.id).ok_or_else(|| {
            let side = if input { "input" } else { "output" };
            GraphError::InvalidRecipe(format!("link {link}: node {node} has no {side} {slot}"))
        })
    }

    /// Capture this graph's structure as a recipe
    pub fn to_recipe(&self) -> GraphRecipe {
        let position: HashMap<NodeId, usize> = self.node_ids().enumerate().map(|(i, id)| (id, i)).collect();

        let nodes = self
            .nodes()
            .map(|node| NodeRecipe {
                name: (node.name != node.kind().descriptor().name).then(|| node.name.clone()),
                unit: node.unit().clone(),
            })
            .collect();

        let links = self
            .links()
            .iter()
            .filter_map(|link| {
                Some(LinkRecipe {
                    from_node: *position.get(&link.from_node())?,
                    from_output: link.output.index(),
                    to_node: *position.get(&link.to_node())?,
                    to_input: link.input.index(),
                })
            })
            .collect();

        GraphRecipe {
            name: self.name.clone(),
            nodes,
            links,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;
    use crate::units::{Blur, BlurMode, Output};
    use crate::validation::Rejection;

    fn sample() -> GraphRecipe {
        GraphRecipe {
            name: "sample".to_string(),
            nodes: vec![
                NodeRecipe {
                    name: Some("Grain".to_string()),
                    unit: ProcessingUnit::Noise(Default::default()),
                },
                NodeRecipe {
                    name: None,
                    unit: ProcessingUnit::Blur(Blur {
                        mode: BlurMode::Directional,
                        radius: 3,
                        angle: 45.0,
                        strength: 2.0,
                    }),
                },
                NodeRecipe {
                    name: None,
                    unit: ProcessingUnit::Output(Output::default()),
                },
            ],
            links: vec![
                LinkRecipe {
                    from_node: 0,
                    from_output: 0,
                    to_node: 1,
                    to_input: 0,
                },
                LinkRecipe {
                    from_node: 1,
                    from_output: 0,
                    to_node: 2,
                    to_input: 0,
                },
            ],
        }
    }

    #[test]
    fn test_serialization() {
        let recipe = sample();
        let ron_str = recipe.to_ron().unwrap();
        let loaded = GraphRecipe::from_ron(&ron_str).unwrap();
        assert_eq!(loaded, recipe);
    }

    #[test]
    fn test_graph_round_trip() {
        let recipe = sample();
        let graph = Graph::from_recipe(&recipe, &EngineConfig::default()).unwrap();
        assert_eq!(graph.name, "sample");
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.links().len(), 2);

        let first = graph.nodes().next().unwrap();
        assert_eq!(first.name, "Grain");
        assert_eq!(first.kind(), NodeKind::Noise);

        assert_eq!(graph.to_recipe(), recipe);
    }

    #[test]
    fn test_parses_hand_written_ron() {
        let text = r#"(
            name: "hand",
            nodes: [
                (unit: Noise((width: 8, height: 8, seed: 3))),
                (unit: Threshold((mode: Otsu))),
            ],
            links: [(from_node: 0, from_output: 0, to_node: 1, to_input: 0)],
        )"#;
        let recipe = GraphRecipe::from_ron(text).unwrap();
        let mut graph = Graph::from_recipe(&recipe, &EngineConfig::default()).unwrap();
        let report = graph.run_evaluation_pass().unwrap();
        assert_eq!(report.evaluated.len(), 2);
        assert_eq!(report.cached_artifacts, 2);
    }

    #[test]
    fn test_demo_recipe_builds() {
        let recipe = GraphRecipe::from_ron(include_str!("../../../demos/edges.ron")).unwrap();
        let mut graph = Graph::from_recipe(&recipe, &EngineConfig::default()).unwrap();
        assert_eq!(graph.links().len(), 7);

        // no input image yet: everything runs, nothing downstream of the blend is cached
        let report = graph.run_evaluation_pass().unwrap();
        assert_eq!(report.evaluated.len(), 8);
        assert_eq!(report.cached_artifacts, 1);
    }

    #[test]
    fn test_missing_node_is_invalid() {
        let mut recipe = sample();
        recipe.links[0].to_node = 7;
        assert!(matches!(
            Graph::from_recipe(&recipe, &EngineConfig::default()),
            Err(GraphError::InvalidRecipe(_))
        ));
    }

    #[test]
    fn test_missing_slot_is_invalid() {
        let mut recipe = sample();
        recipe.links[1].from_output = 4;
        assert!(matches!(
            Graph::from_recipe(&recipe, &EngineConfig::default()),
            Err(GraphError::InvalidRecipe(_))
        ));
    }

    #[test]
    fn test_fan_in_is_rejected() {
        let mut recipe = sample();
        recipe.links.push(LinkRecipe {
            from_node: 0,
            from_output: 0,
            to_node: 2,
            to_input: 0,
        });
        assert!(matches!(
            Graph::from_recipe(&recipe, &EngineConfig::default()),
            Err(GraphError::Rejected(Rejection::InputAlreadyLinked(_)))
        ));
    }
}
