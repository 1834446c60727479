// SPDX-License-Identifier: MIT OR Apache-2.0
//! `pixelflow` - headless host for the pixelflow graph engine.
//!
//! Loads a graph recipe, fills image input nodes with solid colors given on
//! the command line, runs the configured number of evaluation passes and
//! reports what reached each output node.

mod args;

use args::{Cli, InputSpec};
use clap::Parser;
use pixelflow_graph::{
    Artifact, ConfigError, EngineConfig, Graph, GraphError, GraphRecipe, NodeKind, ProcessingUnit,
    ScheduleError,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Errors that end the run
#[derive(Debug, thiserror::Error)]
enum AppError {
    /// Engine config could not be loaded
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Recipe could not be loaded or built
    #[error("{0}")]
    Graph(#[from] GraphError),

    /// Graph could not be scheduled
    #[error("Evaluation failed: {0}")]
    Schedule(#[from] ScheduleError),

    /// `--input` points past the recipe's nodes
    #[error("--input {index}: recipe has no node at that position")]
    NoSuchNode {
        /// Requested position
        index: usize,
    },

    /// `--input` points at a node that takes no image
    #[error("--input {index}: node is {kind}, not image_input")]
    NotAnInput {
        /// Requested position
        index: usize,
        /// Actual kind
        kind: NodeKind,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match EngineConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("pixelflow: {}", AppError::from(e));
            std::process::exit(1);
        }
    };

    // RUST_LOG wins over the configured filter
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting pixelflow v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&cli, &config) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli, config: &EngineConfig) -> Result<(), AppError> {
    let recipe = GraphRecipe::load(&cli.recipe)?;
    let mut graph = Graph::from_recipe(&recipe, config)?;
    tracing::info!(
        "Loaded '{}' from {}: {} nodes, {} links",
        graph.name,
        cli.recipe.display(),
        graph.node_count(),
        graph.links().len()
    );

    for input in &cli.inputs {
        fill_input(&mut graph, input)?;
    }

    for pass in 1..=config.max_passes_per_frame.max(1) {
        let report = graph.run_evaluation_pass()?;
        tracing::info!(
            "Pass {}: ran {} node(s), skipped {}",
            pass,
            report.evaluated.len(),
            report.skipped()
        );
    }

    report_outputs(&graph);
    Ok(())
}

fn fill_input(graph: &mut Graph, input: &InputSpec) -> Result<(), AppError> {
    let node_id = graph
        .node_ids()
        .nth(input.node)
        .ok_or(AppError::NoSuchNode { index: input.node })?;

    let filled = graph.update_node_parameters(node_id, |unit| match unit {
        ProcessingUnit::ImageInput(image_input) => {
            image_input.set_image(Some(input.image()));
            Ok((image_input.dimensions(), image_input.size_bytes()))
        }
        other => Err(other.kind()),
    })?;

    match filled {
        Ok((Some((width, height)), bytes)) => {
            tracing::debug!("Filled {} with {}x{} {:?}, {} bytes", node_id, width, height, input.rgba, bytes);
            Ok(())
        }
        Ok((None, _)) => Ok(()),
        Err(kind) => Err(AppError::NotAnInput {
            index: input.node,
            kind,
        }),
    }
}

fn report_outputs(graph: &Graph) {
    for node in graph.nodes() {
        let ProcessingUnit::Output(output) = node.unit() else {
            continue;
        };
        match output.received() {
            Some(image) => tracing::info!(
                "{} '{}': {}x{} image, {} bytes",
                node.id(),
                node.name,
                image.width(),
                image.height(),
                image.byte_size()
            ),
            None => tracing::warn!("{} '{}' received no image", node.id(), node.name),
        }
    }
}
