//! Read-only successor views over a set of nodes.
//!
//! [`TreeModel`] answers the questions a hierarchy display asks: does a node
//! have children, what are they, and which nodes are roots. Three models are
//! provided:
//!
//! - [`HierarchicalTreeModel`]: backed by a [`SuccessorsMap`].
//! - [`FlatTreeModel`]: a fixed root list with no hierarchy, for nodes that
//!   belong to no tree (e.g. solitary nodes).
//! - [`EmptyTreeModel`]: no nodes at all.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashSet;

use super::dfs::DfsState;
use super::successors::SuccessorsMap;
use crate::model::GraphNode;

/// Successor-based view over a subset of nodes.
pub trait TreeModel {
    fn has_successor_nodes(&self, node: &GraphNode) -> bool;

    /// Children of `node`, in successor order. Empty for leaves and for
    /// nodes outside the model.
    fn successor_nodes(&self, node: &GraphNode) -> Vec<GraphNode>;

    /// Every node that appears as a parent or as a successor.
    fn compute_tree_nodes(&self) -> HashSet<GraphNode>;

    /// Nodes of `universe` that no node claims as a successor.
    ///
    /// Runs a DFS over the whole universe; see [`DfsState::extract_roots`]
    /// for the exact rule. The result is a fresh list in discovery order.
    fn compute_roots<'a, I>(&self, universe: I) -> Vec<GraphNode>
    where
        Self: Sized,
        I: IntoIterator<Item = &'a GraphNode>,
    {
        let mut state = DfsState::new(self);
        state.visit_all(universe);
        state.extract_roots()
    }

    fn tree_node_count(&self) -> usize {
        self.compute_tree_nodes().len()
    }

    /// Number of tree nodes with at least one successor.
    fn interior_node_count(&self) -> usize {
        self.compute_tree_nodes()
            .iter()
            .filter(|node| self.has_successor_nodes(node))
            .count()
    }
}

// ---------------------------------------------------------------------------
// HierarchicalTreeModel
// ---------------------------------------------------------------------------

/// Tree model over a frozen [`SuccessorsMap`].
#[derive(Debug, Clone, Default)]
pub struct HierarchicalTreeModel {
    successors: SuccessorsMap,
}

impl HierarchicalTreeModel {
    #[must_use]
    pub const fn new(successors: SuccessorsMap) -> Self {
        Self { successors }
    }

    #[must_use]
    pub const fn successors(&self) -> &SuccessorsMap {
        &self.successors
    }
}

impl TreeModel for HierarchicalTreeModel {
    fn has_successor_nodes(&self, node: &GraphNode) -> bool {
        self.successors.has_successor_nodes(node)
    }

    fn successor_nodes(&self, node: &GraphNode) -> Vec<GraphNode> {
        self.successors.successor_nodes(node)
    }

    fn compute_tree_nodes(&self) -> HashSet<GraphNode> {
        let mut result = HashSet::new();
        for (parent, edges) in self.successors.iter() {
            if !edges.has_successors() {
                continue;
            }
            result.insert(parent.clone());
            result.extend(edges.compute_successor_nodes());
        }
        result
    }

    fn interior_node_count(&self) -> usize {
        self.successors.parents().count()
    }
}

// ---------------------------------------------------------------------------
// FlatTreeModel / EmptyTreeModel
// ---------------------------------------------------------------------------

/// A fixed list of roots without children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatTreeModel {
    roots: Vec<GraphNode>,
}

impl FlatTreeModel {
    pub fn new(roots: impl IntoIterator<Item = GraphNode>) -> Self {
        Self {
            roots: roots.into_iter().collect(),
        }
    }
}

impl TreeModel for FlatTreeModel {
    fn has_successor_nodes(&self, _node: &GraphNode) -> bool {
        false
    }

    fn successor_nodes(&self, _node: &GraphNode) -> Vec<GraphNode> {
        Vec::new()
    }

    fn compute_tree_nodes(&self) -> HashSet<GraphNode> {
        self.roots.iter().cloned().collect()
    }

    /// The configured roots, regardless of `universe`.
    fn compute_roots<'a, I>(&self, _universe: I) -> Vec<GraphNode>
    where
        I: IntoIterator<Item = &'a GraphNode>,
    {
        self.roots.clone()
    }

    fn interior_node_count(&self) -> usize {
        0
    }
}

/// Tree model with no nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyTreeModel;

impl TreeModel for EmptyTreeModel {
    fn has_successor_nodes(&self, _node: &GraphNode) -> bool {
        false
    }

    fn successor_nodes(&self, _node: &GraphNode) -> Vec<GraphNode> {
        Vec::new()
    }

    fn compute_tree_nodes(&self) -> HashSet<GraphNode> {
        HashSet::new()
    }

    fn compute_roots<'a, I>(&self, _universe: I) -> Vec<GraphNode>
    where
        I: IntoIterator<Item = &'a GraphNode>,
    {
        Vec::new()
    }

    fn interior_node_count(&self) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GraphEdge;

    fn nodes(ids: &[&str]) -> Vec<GraphNode> {
        ids.iter().map(|id| GraphNode::from(*id)).collect()
    }

    fn chain_model() -> HierarchicalTreeModel {
        let mut map = SuccessorsMap::new();
        map.add_forward_edge(GraphEdge::new("contains", "a", "b"));
        map.add_forward_edge(GraphEdge::new("contains", "b", "c"));
        map.add_forward_edge(GraphEdge::new("contains", "a", "d"));
        HierarchicalTreeModel::new(map)
    }

    #[test]
    fn hierarchical_counts_tree_and_interior_nodes() {
        let model = chain_model();
        assert_eq!(model.tree_node_count(), 4);
        assert_eq!(model.interior_node_count(), 2);
        assert!(model.has_successor_nodes(&"a".into()));
        assert!(!model.has_successor_nodes(&"c".into()));
    }

    #[test]
    fn hierarchical_roots_exclude_claimed_nodes() {
        let model = chain_model();
        let universe = nodes(&["c", "b", "a", "d", "solo"]);
        let roots = model.compute_roots(&universe);
        assert_eq!(roots, nodes(&["a", "solo"]));
    }

    #[test]
    fn flat_model_reports_fixed_roots() {
        let model = FlatTreeModel::new(nodes(&["x", "y"]));
        let universe = nodes(&["z"]);
        assert_eq!(model.compute_roots(&universe), nodes(&["x", "y"]));
        assert_eq!(model.tree_node_count(), 2);
        assert_eq!(model.interior_node_count(), 0);
        assert!(model.successor_nodes(&"x".into()).is_empty());
    }

    #[test]
    fn empty_model_has_nothing() {
        let universe = nodes(&["a"]);
        assert!(EmptyTreeModel.compute_roots(&universe).is_empty());
        assert_eq!(EmptyTreeModel.tree_node_count(), 0);
    }
}
