//! Directed multigraph of opaque nodes and relation-labelled edges.
//!
//! # Overview
//!
//! [`GraphModel`] is the read-only input of every algorithm in this crate.
//! It is backed by a petgraph [`DiGraph`] so node and edge iteration follow
//! insertion order. Several algorithms break ties by iteration order (the
//! spanning hierarchy picks the first matching edge, DFS assigns the first
//! claiming predecessor), so insertion order is part of the contract.
//!
//! ## Edge Direction
//!
//! An edge runs from its `head` to its `tail`: `A → B` is stored as
//! `GraphEdge { head: A, tail: B, .. }`. Self-loops and parallel edges
//! between the same pair are allowed.

#![allow(clippy::module_name_repetitions)]

use std::collections::{HashMap, HashSet};
use std::fmt;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::error::GraphError;

// ---------------------------------------------------------------------------
// Node / Relation / Edge
// ---------------------------------------------------------------------------

/// Stable node identity. Two nodes are the same node iff their ids match.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GraphNode(String);

impl GraphNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GraphNode {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for GraphNode {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Edge label, e.g. `contains` or `calls`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Relation(String);

impl Relation {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Relation {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A directed, labelled edge `head → tail`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    pub relation: Relation,
    pub head: GraphNode,
    pub tail: GraphNode,
}

impl GraphEdge {
    pub fn new(relation: impl Into<Relation>, head: impl Into<GraphNode>, tail: impl Into<GraphNode>) -> Self {
        Self {
            relation: relation.into(),
            head: head.into(),
            tail: tail.into(),
        }
    }

    /// `true` when head and tail are the same node.
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.head == self.tail
    }
}

impl fmt::Display for GraphEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -[{}]-> {}", self.head, self.relation, self.tail)
    }
}

// ---------------------------------------------------------------------------
// GraphModel
// ---------------------------------------------------------------------------

/// Insertion-ordered directed multigraph.
///
/// Nodes are deduplicated by identity; edges are not (parallel edges are
/// kept as distinct entries).
#[derive(Debug, Clone, Default)]
pub struct GraphModel {
    graph: DiGraph<GraphNode, Relation>,
    node_map: HashMap<GraphNode, NodeIndex>,
}

impl GraphModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a node list and an edge list.
    ///
    /// Edge endpoints missing from `nodes` are added in first-appearance
    /// order after the listed nodes.
    pub fn from_parts(
        nodes: impl IntoIterator<Item = GraphNode>,
        edges: impl IntoIterator<Item = GraphEdge>,
    ) -> Self {
        let mut model = Self::new();
        for node in nodes {
            model.add_node(node);
        }
        for edge in edges {
            model.add_edge(edge);
        }
        model
    }

    /// Add `node` if not already present. Returns `true` when it was new.
    pub fn add_node(&mut self, node: GraphNode) -> bool {
        if self.node_map.contains_key(&node) {
            return false;
        }
        let idx = self.graph.add_node(node.clone());
        self.node_map.insert(node, idx);
        true
    }

    /// Add an edge, adding either endpoint if it is not yet a node.
    pub fn add_edge(&mut self, edge: GraphEdge) {
        let head = self.index_or_insert(edge.head);
        let tail = self.index_or_insert(edge.tail);
        self.graph.add_edge(head, tail, edge.relation);
    }

    /// Add an edge whose endpoints must already be nodes of this graph.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] naming the first endpoint that
    /// is not a node. The graph is left unchanged.
    pub fn add_edge_strict(&mut self, edge: GraphEdge) -> Result<(), GraphError> {
        let head = self.node_index(&edge.head).ok_or_else(|| GraphError::UnknownNode {
            node: edge.head.clone(),
        })?;
        let tail = self.node_index(&edge.tail).ok_or_else(|| GraphError::UnknownNode {
            node: edge.tail.clone(),
        })?;
        self.graph.add_edge(head, tail, edge.relation);
        Ok(())
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> + '_ {
        self.graph.node_weights()
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = GraphEdge> + '_ {
        self.graph.edge_references().map(|edge| GraphEdge {
            relation: edge.weight().clone(),
            head: self.graph[edge.source()].clone(),
            tail: self.graph[edge.target()].clone(),
        })
    }

    /// Fresh set of every node in the graph.
    #[must_use]
    pub fn node_set(&self) -> HashSet<GraphNode> {
        self.nodes().cloned().collect()
    }

    #[must_use]
    pub fn contains_node(&self, node: &GraphNode) -> bool {
        self.node_map.contains_key(node)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    fn node_index(&self, node: &GraphNode) -> Option<NodeIndex> {
        self.node_map.get(node).copied()
    }

    fn index_or_insert(&mut self, node: GraphNode) -> NodeIndex {
        if let Some(idx) = self.node_index(&node) {
            return idx;
        }
        let idx = self.graph.add_node(node.clone());
        self.node_map.insert(node, idx);
        idx
    }
}

impl PartialEq for GraphModel {
    /// Graphs are equal when they list the same nodes and edges in the
    /// same order.
    fn eq(&self, other: &Self) -> bool {
        self.nodes().eq(other.nodes()) && self.edges().eq(other.edges())
    }
}

impl Eq for GraphModel {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nodes_are_deduplicated_in_insertion_order() {
        let mut graph = GraphModel::new();
        assert!(graph.add_node("b".into()));
        assert!(graph.add_node("a".into()));
        assert!(!graph.add_node("b".into()));

        let ids: Vec<&str> = graph.nodes().map(GraphNode::as_str).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn lenient_edge_adds_missing_endpoints() {
        let mut graph = GraphModel::new();
        graph.add_node("a".into());
        graph.add_edge(GraphEdge::new("calls", "a", "z"));

        assert_eq!(graph.node_count(), 2);
        assert!(graph.contains_node(&"z".into()));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn strict_edge_rejects_unknown_endpoint() {
        let mut graph = GraphModel::new();
        graph.add_node("a".into());

        let err = graph
            .add_edge_strict(GraphEdge::new("calls", "a", "ghost"))
            .expect_err("ghost is not a node");
        assert!(err.to_string().contains("ghost"));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn parallel_edges_and_self_loops_are_kept() {
        let graph = GraphModel::from_parts(
            vec!["a".into(), "b".into()],
            vec![
                GraphEdge::new("calls", "a", "b"),
                GraphEdge::new("calls", "a", "b"),
                GraphEdge::new("calls", "a", "a"),
            ],
        );
        assert_eq!(graph.edge_count(), 3);
        let edges: Vec<GraphEdge> = graph.edges().collect();
        assert!(edges[2].is_self_loop());
        assert_eq!(edges[0], edges[1]);
    }

    #[test]
    fn equality_is_order_sensitive() {
        let ab = GraphModel::from_parts(vec!["a".into(), "b".into()], Vec::new());
        let ba = GraphModel::from_parts(vec!["b".into(), "a".into()], Vec::new());
        assert_eq!(ab, ab.clone());
        assert_ne!(ab, ba);
    }

    #[test]
    fn edge_serializes_with_plain_strings() {
        let edge = GraphEdge::new("contains", "pkg", "class");
        let json = serde_json::to_string(&edge).expect("serialize");
        assert_eq!(json, r#"{"relation":"contains","head":"pkg","tail":"class"}"#);
    }
}
