// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for graph operations.

use crate::config::ConfigError;
use crate::ident::NodeId;
use crate::node::NodeKind;
use crate::schedule::ScheduleError;
use crate::validation::Rejection;

/// Errors returned by [`Graph`](crate::graph::Graph) operations
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// No processing unit is registered under this tag
    #[error("Unknown node kind: {0}")]
    UnknownNodeKind(String),

    /// Node not found
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// A parameter edit tried to turn a node into another kind
    #[error("{node} is {expected}, an edit cannot make it {found}")]
    KindChanged {
        /// Edited node
        node: NodeId,
        /// The node's kind
        expected: NodeKind,
        /// Kind the edit produced
        found: NodeKind,
    },

    /// Connection refused by the validator
    #[error("Connection rejected: {0}")]
    Rejected(#[from] Rejection),

    /// No evaluation order could be computed
    #[error("Scheduling failed: {0}")]
    Schedule(#[from] ScheduleError),

    /// Recipe refers to something that does not exist
    #[error("Invalid recipe: {0}")]
    InvalidRecipe(String),

    /// RON parse error
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    /// RON serialization error
    #[error("RON serialization error: {0}")]
    RonSerialize(#[from] ron::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result alias for graph operations
pub type Result<T> = std::result::Result<T, GraphError>;
