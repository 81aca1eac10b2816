//! Per-node successor adjacency.
//!
//! A [`SuccessorsMap`] records, for each node, the edges that make other
//! nodes its successors under some direction policy:
//!
//! - **forward** edges, where the node is the edge's `head` and the
//!   successor is the `tail`;
//! - **reverse** edges, where the node is the edge's `tail` and the
//!   successor is the `head`.
//!
//! The map is mutable while a hierarchy is being built and is handed by
//! value to a [`HierarchicalTreeModel`](super::tree::HierarchicalTreeModel)
//! afterwards, at which point it is read-only.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use crate::model::{GraphEdge, GraphNode};

static NO_SUCCESSORS: SuccessorEdges = SuccessorEdges::new();

/// Successor edges of a single node.
///
/// Edge lists allocate on first insertion, so leaf-heavy graphs pay
/// nothing for nodes that never gain a successor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuccessorEdges {
    forward: Vec<GraphEdge>,
    reverse: Vec<GraphEdge>,
}

impl SuccessorEdges {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            forward: Vec::new(),
            reverse: Vec::new(),
        }
    }

    pub fn add_forward_edge(&mut self, edge: GraphEdge) {
        self.forward.push(edge);
    }

    pub fn add_reverse_edge(&mut self, edge: GraphEdge) {
        self.reverse.push(edge);
    }

    #[must_use]
    pub fn forward_edges(&self) -> &[GraphEdge] {
        &self.forward
    }

    #[must_use]
    pub fn reverse_edges(&self) -> &[GraphEdge] {
        &self.reverse
    }

    /// Cheap existence check that avoids materializing the node list.
    #[must_use]
    pub fn has_successors(&self) -> bool {
        !self.forward.is_empty() || !self.reverse.is_empty()
    }

    /// Tails of the forward edges followed by heads of the reverse edges.
    ///
    /// Order is forward-then-reverse, each in insertion order. Parallel
    /// edges yield repeated successors.
    #[must_use]
    pub fn compute_successor_nodes(&self) -> Vec<GraphNode> {
        self.forward
            .iter()
            .map(|edge| edge.tail.clone())
            .chain(self.reverse.iter().map(|edge| edge.head.clone()))
            .collect()
    }
}

/// Successor edges for every node that has at least one.
#[derive(Debug, Clone, Default)]
pub struct SuccessorsMap {
    index: HashMap<GraphNode, SuccessorEdges>,
}

impl SuccessorsMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `edge` as a forward successor link of its head.
    pub fn add_forward_edge(&mut self, edge: GraphEdge) {
        self.index
            .entry(edge.head.clone())
            .or_default()
            .add_forward_edge(edge);
    }

    /// Record `edge` as a reverse successor link of its tail.
    pub fn add_reverse_edge(&mut self, edge: GraphEdge) {
        self.index
            .entry(edge.tail.clone())
            .or_default()
            .add_reverse_edge(edge);
    }

    /// Successor edges of `node`. Nodes absent from the index get a shared
    /// empty value, never `None`.
    #[must_use]
    pub fn successor_edges(&self, node: &GraphNode) -> &SuccessorEdges {
        self.index.get(node).unwrap_or(&NO_SUCCESSORS)
    }

    #[must_use]
    pub fn has_successor_nodes(&self, node: &GraphNode) -> bool {
        self.successor_edges(node).has_successors()
    }

    #[must_use]
    pub fn successor_nodes(&self, node: &GraphNode) -> Vec<GraphNode> {
        self.successor_edges(node).compute_successor_nodes()
    }

    /// Nodes with at least one successor edge.
    pub fn parents(&self) -> impl Iterator<Item = &GraphNode> + '_ {
        self.index
            .iter()
            .filter(|(_, edges)| edges.has_successors())
            .map(|(node, _)| node)
    }

    /// Every recorded `(parent, edges)` pair.
    pub fn iter(&self) -> impl Iterator<Item = (&GraphNode, &SuccessorEdges)> + '_ {
        self.index.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_node_has_empty_successors() {
        let map = SuccessorsMap::new();
        let ghost = GraphNode::from("ghost");
        assert!(!map.has_successor_nodes(&ghost));
        assert!(map.successor_nodes(&ghost).is_empty());
        assert!(map.successor_edges(&ghost).forward_edges().is_empty());
    }

    #[test]
    fn forward_edges_key_on_head_and_reverse_on_tail() {
        let mut map = SuccessorsMap::new();
        map.add_forward_edge(GraphEdge::new("contains", "pkg", "cls"));
        map.add_reverse_edge(GraphEdge::new("extends", "sub", "base"));

        assert_eq!(map.successor_nodes(&"pkg".into()), vec![GraphNode::from("cls")]);
        assert_eq!(map.successor_nodes(&"base".into()), vec![GraphNode::from("sub")]);
        assert!(!map.has_successor_nodes(&"cls".into()));
        assert!(!map.has_successor_nodes(&"sub".into()));
    }

    #[test]
    fn successors_list_forward_before_reverse() {
        let mut edges = SuccessorEdges::new();
        edges.add_reverse_edge(GraphEdge::new("extends", "r1", "n"));
        edges.add_forward_edge(GraphEdge::new("contains", "n", "f1"));
        edges.add_forward_edge(GraphEdge::new("contains", "n", "f2"));

        let names: Vec<String> = edges
            .compute_successor_nodes()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(names, vec!["f1", "f2", "r1"]);
        assert!(edges.has_successors());
    }
}
