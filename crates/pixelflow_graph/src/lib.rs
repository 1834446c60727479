// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dataflow graph engine for node-based image processing.
//!
//! Nodes wrap processing units (blur, threshold, blend, ...) and expose typed
//! pins. Links connect one output pin to one input pin. An evaluation pass
//! orders the graph, runs every dirty node, and moves results between nodes
//! through an artifact cache keyed by pin.
//!
//! ## Architecture
//!
//! - [`ident`] and [`pin`]: node, link and pin identity
//! - [`node`] and [`units`]: nodes, their pin layouts and processing units
//! - [`link`] and [`validation`]: the link table and connection rules
//! - [`schedule`]: evaluation order and cycle detection
//! - [`cache`] and [`evaluation`]: artifact storage and the unit contract
//! - [`graph`]: the host-facing facade tying it together
//! - [`recipe`] and [`config`]: RON descriptions of graphs and engine settings

pub mod artifact;
pub mod cache;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod graph;
pub mod ident;
pub mod link;
pub mod node;
pub mod pin;
pub mod recipe;
pub mod schedule;
pub mod units;
pub mod validation;

pub use artifact::{Artifact, Image};
pub use cache::ArtifactCache;
pub use config::{ConfigError, EngineConfig};
pub use error::{GraphError, Result};
pub use evaluation::{EvaluationReport, ProcessContext};
pub use graph::Graph;
pub use ident::{LinkId, NodeId};
pub use link::{Link, LinkStore};
pub use node::{Node, NodeBuilder, NodeCategory, NodeDescriptor, NodeKind};
pub use pin::{Pin, PinId, PinKind, PinType};
pub use recipe::{GraphRecipe, LinkRecipe, NodeRecipe};
pub use schedule::{ScheduleError, Scheduler};
pub use units::{NodeFactory, ProcessingUnit};
pub use validation::{ConnectionValidator, Rejection, ValidLink};
