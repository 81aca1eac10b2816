//! Hierarchy construction from a [`GraphModel`] and an [`EdgeMatcher`].
//!
//! # Variants
//!
//! - [`compute_successor_hierarchy`] admits every matched edge. The result
//!   may contain cycles and nodes with several parents.
//! - [`compute_spanning_hierarchy`] admits an edge only if its far endpoint
//!   has not been claimed yet, producing a forest where every node has at
//!   most one parent.
//!
//! ## Tie-breaks
//!
//! Both variants walk edges in the graph's insertion order. For the spanning
//! variant the first matching edge that reaches a node wins, so reordering
//! the input edges can produce a different (equally valid) forest. A forward
//! match takes precedence over a reverse match on the same edge; the reverse
//! match is only tried when the forward claim is refused.

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument};

use super::successors::SuccessorsMap;
use super::tree::HierarchicalTreeModel;
use crate::matcher::EdgeMatcher;
use crate::model::{GraphModel, GraphNode};

/// Add every matched edge: forward matches under the head, reverse matches
/// under the tail.
#[instrument(skip_all, fields(edges = graph.edge_count()))]
pub fn compute_successor_hierarchy<M>(graph: &GraphModel, matcher: &M) -> SuccessorsMap
where
    M: EdgeMatcher + ?Sized,
{
    let mut result = SuccessorsMap::new();
    let mut admitted = 0_usize;

    for edge in graph.edges() {
        let forward = matcher.edge_forward(&edge);
        let reverse = matcher.edge_reverse(&edge);
        match (forward, reverse) {
            (true, true) => {
                result.add_forward_edge(edge.clone());
                result.add_reverse_edge(edge);
                admitted += 2;
            }
            (true, false) => {
                result.add_forward_edge(edge);
                admitted += 1;
            }
            (false, true) => {
                result.add_reverse_edge(edge);
                admitted += 1;
            }
            (false, false) => {}
        }
    }

    debug!(admitted, parents = result.len(), "successor hierarchy built");
    result
}

/// Build a spanning forest: each node is claimed as a successor at most
/// once, self-loops are never admitted, and an edge that would make a node
/// its own ancestor is skipped.
#[instrument(skip_all, fields(edges = graph.edge_count()))]
pub fn compute_spanning_hierarchy<M>(graph: &GraphModel, matcher: &M) -> SuccessorsMap
where
    M: EdgeMatcher + ?Sized,
{
    let mut result = SuccessorsMap::new();
    let mut forest = ClaimForest::default();

    for edge in graph.edges() {
        if edge.is_self_loop() {
            continue;
        }

        if matcher.edge_forward(&edge) && forest.claim(&edge.head, &edge.tail) {
            result.add_forward_edge(edge);
        } else if matcher.edge_reverse(&edge) && forest.claim(&edge.tail, &edge.head) {
            result.add_reverse_edge(edge);
        }
    }

    debug!(claimed = forest.claimed(), parents = result.len(), "spanning hierarchy built");
    result
}

/// Claimed nodes plus a union-find over tree roots.
///
/// A node that has not been claimed yet is the root of its own tree, so it
/// is an ancestor of `parent` exactly when it is the root of `parent`'s tree.
/// Path compression keeps that lookup near constant, which keeps the whole
/// build linear in the number of edges.
#[derive(Debug, Default)]
struct ClaimForest {
    claimed: HashSet<GraphNode>,
    root_link: HashMap<GraphNode, GraphNode>,
}

impl ClaimForest {
    /// Record `parent` as the parent of `child` unless `child` already has
    /// one or is an ancestor of `parent`.
    fn claim(&mut self, parent: &GraphNode, child: &GraphNode) -> bool {
        if self.claimed.contains(child) {
            return false;
        }
        let root = self.find_root(parent);
        if root == *child {
            return false;
        }

        self.claimed.insert(child.clone());
        self.root_link.insert(child.clone(), root);
        true
    }

    fn claimed(&self) -> usize {
        self.claimed.len()
    }

    fn find_root(&mut self, node: &GraphNode) -> GraphNode {
        let mut root = node;
        while let Some(next) = self.root_link.get(root) {
            root = next;
        }
        let root = root.clone();

        let mut cursor = node.clone();
        while let Some(next) = self.root_link.get(&cursor).cloned() {
            if next == root {
                break;
            }
            self.root_link.insert(cursor, root.clone());
            cursor = next;
        }
        root
    }
}

/// Tree model over [`compute_successor_hierarchy`].
pub fn successor_tree<M>(graph: &GraphModel, matcher: &M) -> HierarchicalTreeModel
where
    M: EdgeMatcher + ?Sized,
{
    HierarchicalTreeModel::new(compute_successor_hierarchy(graph, matcher))
}

/// Tree model over [`compute_spanning_hierarchy`].
pub fn spanning_tree<M>(graph: &GraphModel, matcher: &M) -> HierarchicalTreeModel
where
    M: EdgeMatcher + ?Sized,
{
    HierarchicalTreeModel::new(compute_spanning_hierarchy(graph, matcher))
}
