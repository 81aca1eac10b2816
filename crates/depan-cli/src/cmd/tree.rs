//! `depan tree` — print the configured hierarchy as an indented forest.
//!
//! JSON output is a flat pre-order list of `{node, depth, parent}` rows.

use std::collections::HashSet;
use std::io::{self, Write};
use std::path::PathBuf;
use std::vec;

use anyhow::Result;
use clap::Args;
use depan_core::hierarchy::TreeModel;
use depan_core::model::GraphNode;
use serde::Serialize;

use crate::config::DepanConfig;
use crate::document::load_graph;
use crate::output::{OutputMode, render};

/// Arguments for `depan tree`.
#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Graph document (JSON).
    pub graph: PathBuf,

    /// Levels to print below the roots (default: unlimited).
    #[arg(long)]
    pub depth: Option<usize>,
}

/// One printed line of the forest.
#[derive(Debug, Serialize)]
struct TreeRow {
    node: GraphNode,
    depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent: Option<GraphNode>,
    /// Set when `node` already appears on the path from the root.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    cycle: bool,
}

pub fn run_tree(args: &TreeArgs, config: &DepanConfig, output: OutputMode) -> Result<()> {
    let graph = load_graph(&args.graph)?;
    let tree = super::build_tree(&graph, &config.hierarchy);

    let roots = tree.compute_roots(graph.nodes());
    let rows = ForestWalk::new(&tree, args.depth).run(roots);

    render(output, &rows, |rows, w| {
        for row in rows {
            write_row(w, row)?;
        }
        Ok(())
    })
}

struct Frame {
    node: GraphNode,
    children: vec::IntoIter<GraphNode>,
}

/// Pre-order walk of the forest with an explicit frame stack, so hierarchy
/// depth is bounded by memory rather than the call stack.
struct ForestWalk<'t, T: TreeModel> {
    tree: &'t T,
    max_depth: Option<usize>,
    rows: Vec<TreeRow>,
    stack: Vec<Frame>,
    on_path: HashSet<GraphNode>,
}

impl<'t, T: TreeModel> ForestWalk<'t, T> {
    fn new(tree: &'t T, max_depth: Option<usize>) -> Self {
        Self {
            tree,
            max_depth,
            rows: Vec::new(),
            stack: Vec::new(),
            on_path: HashSet::new(),
        }
    }

    fn run(mut self, roots: Vec<GraphNode>) -> Vec<TreeRow> {
        for root in roots {
            self.enter(root, None);
            while let Some(frame) = self.stack.last_mut() {
                if let Some(child) = frame.children.next() {
                    let parent = frame.node.clone();
                    self.enter(child, Some(parent));
                } else if let Some(done) = self.stack.pop() {
                    self.on_path.remove(&done.node);
                }
            }
        }
        self.rows
    }

    fn enter(&mut self, node: GraphNode, parent: Option<GraphNode>) {
        let depth = self.stack.len();
        let cycle = self.on_path.contains(&node);
        let expand = !cycle && self.max_depth.is_none_or(|limit| depth < limit);

        self.rows.push(TreeRow {
            node: node.clone(),
            depth,
            parent,
            cycle,
        });
        if expand {
            self.on_path.insert(node.clone());
            let children = self.tree.successor_nodes(&node).into_iter();
            self.stack.push(Frame { node, children });
        }
    }
}

fn write_row(w: &mut dyn Write, row: &TreeRow) -> io::Result<()> {
    let marker = if row.cycle { " (cycle)" } else { "" };
    writeln!(w, "{:indent$}{}{marker}", "", row.node, indent = row.depth * 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use depan_core::hierarchy::{SuccessorsMap, HierarchicalTreeModel};
    use depan_core::model::GraphEdge;

    fn tree(edges: &[(&str, &str)]) -> HierarchicalTreeModel {
        let mut map = SuccessorsMap::new();
        for (head, tail) in edges {
            map.add_forward_edge(GraphEdge::new("contains", *head, *tail));
        }
        HierarchicalTreeModel::new(map)
    }

    fn lines(rows: &[TreeRow]) -> Vec<String> {
        rows.iter()
            .map(|row| {
                let mut out = Vec::new();
                write_row(&mut out, row).expect("write to vec");
                String::from_utf8(out).expect("utf-8")
            })
            .collect()
    }

    #[test]
    fn rows_are_in_pre_order_with_depths() {
        let model = tree(&[("r", "a"), ("a", "x"), ("r", "b")]);
        let rows = ForestWalk::new(&model, None).run(vec!["r".into()]);
        assert_eq!(lines(&rows), vec!["r\n", "  a\n", "    x\n", "  b\n"]);
        assert_eq!(rows[2].parent, Some(GraphNode::from("a")));
    }

    #[test]
    fn depth_limit_counts_levels_below_roots() {
        let model = tree(&[("r", "a"), ("a", "x")]);
        let rows = ForestWalk::new(&model, Some(1)).run(vec!["r".into()]);
        assert_eq!(lines(&rows), vec!["r\n", "  a\n"]);
    }

    #[test]
    fn repeated_node_on_path_is_marked_and_not_expanded() {
        let model = tree(&[("a", "b"), ("b", "a")]);
        let rows = ForestWalk::new(&model, None).run(vec!["a".into()]);
        assert_eq!(lines(&rows), vec!["a\n", "  b\n", "    a (cycle)\n"]);
    }

    #[test]
    fn shared_child_off_the_path_is_not_a_cycle() {
        let model = tree(&[("r", "a"), ("r", "b"), ("a", "s"), ("b", "s")]);
        let rows = ForestWalk::new(&model, None).run(vec!["r".into()]);
        assert!(rows.iter().all(|row| !row.cycle));
        assert_eq!(rows.iter().filter(|row| row.node.as_str() == "s").count(), 2);
    }

    #[test]
    fn long_chain_is_walked_without_recursion() {
        let ids: Vec<String> = (0..100_000).map(|i| format!("n{i}")).collect();
        let mut map = SuccessorsMap::new();
        for pair in ids.windows(2) {
            map.add_forward_edge(GraphEdge::new("contains", pair[0].as_str(), pair[1].as_str()));
        }
        let model = HierarchicalTreeModel::new(map);

        let rows = ForestWalk::new(&model, None).run(vec!["n0".into()]);
        assert_eq!(rows.len(), ids.len());
        assert_eq!(rows.last().map(|row| row.depth), Some(ids.len() - 1));
    }
}
