//! `depan collapse` — collapse a graph and print the groups and the exposed
//! graph.
//!
//! - `depan collapse g.json` — bulk-collapse the configured hierarchy
//! - `depan collapse g.json --group A=B,C` — apply explicit groups in order

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use depan_core::collapse::{CollapseData, CollapseTreeModel, CollapseTreeNode, Collapser};
use depan_core::model::GraphNode;
use serde::Serialize;
use tracing::info;

use crate::config::DepanConfig;
use crate::document::{GraphDocument, load_graph};
use crate::output::{OutputMode, render};

/// Arguments for `depan collapse`.
#[derive(Args, Debug)]
pub struct CollapseArgs {
    /// Graph document (JSON).
    pub graph: PathBuf,

    /// Explicit group as `MASTER=NODE,NODE,...`. The master is always a
    /// member of its own group. Repeatable; applied in order.
    #[arg(long = "group", value_name = "MASTER=NODES")]
    pub groups: Vec<String>,

    /// Replace an existing group under the same master instead of nesting it.
    #[arg(long)]
    pub erase: bool,
}

/// One collapse group, listed in pre-order under its parent group.
#[derive(Debug, Serialize)]
struct GroupRow {
    master: GraphNode,
    depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent: Option<GraphNode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    members: Vec<GraphNode>,
}

#[derive(Debug, Serialize)]
struct CollapseReport {
    groups: Vec<GroupRow>,
    exposed: GraphDocument,
}

pub fn run_collapse(args: &CollapseArgs, config: &DepanConfig, output: OutputMode) -> Result<()> {
    let graph = load_graph(&args.graph)?;
    let mut collapser = Collapser::new();

    if args.groups.is_empty() {
        let tree = super::build_tree(&graph, &config.hierarchy);
        let created = collapser
            .collapse_tree(&graph, &tree)
            .context("Failed to collapse hierarchy")?;
        info!(created, "collapsed hierarchy");
    } else {
        for raw in &args.groups {
            let (master, picked) = parse_group(raw)?;
            collapser
                .collapse(master, picked, args.erase)
                .with_context(|| format!("Failed to apply group `{raw}`"))?;
        }
    }

    let model = CollapseTreeModel::new(&collapser);
    let report = CollapseReport {
        groups: group_rows(&model),
        exposed: GraphDocument::from_model(&collapser.build_exposed_graph(&graph)),
    };

    render(output, &report, write_report)
}

/// Parse `MASTER=NODE,NODE,...` into the master and its picked set.
fn parse_group(raw: &str) -> Result<(GraphNode, Vec<GraphNode>)> {
    let Some((master, members)) = raw.split_once('=') else {
        bail!("group `{raw}` must look like MASTER=NODE,NODE");
    };
    let master = master.trim();
    if master.is_empty() {
        bail!("group `{raw}` has an empty master");
    }

    let master = GraphNode::from(master);
    let mut picked = vec![master.clone()];
    picked.extend(
        members
            .split(',')
            .map(str::trim)
            .filter(|member| !member.is_empty())
            .map(GraphNode::from),
    );
    Ok((master, picked))
}

/// Flatten the collapse forest into pre-order rows with an explicit stack,
/// so nesting depth is bounded by memory rather than the call stack.
fn group_rows(model: &CollapseTreeModel<'_>) -> Vec<GroupRow> {
    let mut rows = Vec::new();
    let mut pending: Vec<(&CollapseData, usize, Option<&GraphNode>)> = model
        .roots()
        .into_iter()
        .rev()
        .map(|data| (data, 0, None))
        .collect();

    while let Some((data, depth, parent)) = pending.pop() {
        let mut members = Vec::new();
        let mut nested = Vec::new();
        for child in model.children(data) {
            match child {
                CollapseTreeNode::Group(group) => nested.push(group),
                CollapseTreeNode::Member(node) => members.push(node.clone()),
            }
        }
        pending.extend(
            nested
                .into_iter()
                .rev()
                .map(|group| (group, depth + 1, Some(data.master_node()))),
        );
        rows.push(GroupRow {
            master: data.master_node().clone(),
            depth,
            parent: parent.cloned(),
            members,
        });
    }
    rows
}

fn write_report(report: &CollapseReport, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "groups:")?;
    for group in &report.groups {
        write_group(w, group)?;
    }
    writeln!(w, "exposed nodes:")?;
    for node in &report.exposed.nodes {
        writeln!(w, "  {node}")?;
    }
    writeln!(w, "exposed edges:")?;
    for edge in &report.exposed.edges {
        writeln!(w, "  {edge}")?;
    }
    Ok(())
}

fn write_group(w: &mut dyn Write, group: &GroupRow) -> io::Result<()> {
    let pad = (group.depth + 1) * 2;
    writeln!(w, "{:pad$}[{}]", "", group.master)?;
    for member in &group.members {
        writeln!(w, "{:pad$}  {member}", "")?;
    }
    Ok(())
}
