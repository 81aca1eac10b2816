//! `depan roots` — list the roots of the configured hierarchy.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use depan_core::hierarchy::TreeModel;
use depan_core::model::GraphNode;
use serde::Serialize;

use crate::config::DepanConfig;
use crate::document::load_graph;
use crate::output::{OutputMode, render};

/// Arguments for `depan roots`.
#[derive(Args, Debug)]
pub struct RootsArgs {
    /// Graph document (JSON).
    pub graph: PathBuf,
}

#[derive(Debug, Serialize)]
struct RootsReport {
    roots: Vec<GraphNode>,
    tree_nodes: usize,
    interior_nodes: usize,
}

pub fn run_roots(args: &RootsArgs, config: &DepanConfig, output: OutputMode) -> Result<()> {
    let graph = load_graph(&args.graph)?;
    let tree = super::build_tree(&graph, &config.hierarchy);

    let report = RootsReport {
        roots: tree.compute_roots(graph.nodes()),
        tree_nodes: tree.tree_node_count(),
        interior_nodes: tree.interior_node_count(),
    };

    render(output, &report, |report, w| {
        for root in &report.roots {
            writeln!(w, "{root}")?;
        }
        Ok(())
    })
}
