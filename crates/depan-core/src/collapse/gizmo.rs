//! Exposed node and edge computation for a hidden-node snapshot.
//!
//! # Edge Rules
//!
//! Each endpoint of a candidate edge is resolved through the hidden map
//! (a hidden node resolves to its master, anything else to itself):
//!
//! 1. Neither endpoint hidden: the edge is kept unchanged.
//! 2. Both endpoints resolve to the same node: the edge is internal to one
//!    collapse group and is dropped.
//! 3. Resolution leaves the endpoints as they were: the edge is kept.
//! 4. Otherwise a synthetic edge between the resolved endpoints is emitted,
//!    carrying the original relation. Identical synthetic edges are emitted
//!    once.

use std::collections::{HashMap, HashSet};

use crate::model::{GraphEdge, GraphNode};

/// Stateless helper over a `hidden node → master` snapshot.
#[derive(Debug, Clone, Copy)]
pub struct HiddenNodesGizmo<'h> {
    hidden: &'h HashMap<GraphNode, GraphNode>,
}

impl<'h> HiddenNodesGizmo<'h> {
    #[must_use]
    pub const fn new(hidden: &'h HashMap<GraphNode, GraphNode>) -> Self {
        Self { hidden }
    }

    #[must_use]
    pub fn is_hidden(&self, node: &GraphNode) -> bool {
        self.hidden.contains_key(node)
    }

    /// The node `node` is displayed as: its master if hidden, else itself.
    #[must_use]
    pub fn resolve<'n>(&self, node: &'n GraphNode) -> &'n GraphNode
    where
        'h: 'n,
    {
        self.hidden.get(node).unwrap_or(node)
    }

    /// Push every candidate that is not hidden onto `result`.
    pub fn add_exposed_nodes<'a, I>(&self, result: &mut Vec<GraphNode>, candidates: I)
    where
        I: IntoIterator<Item = &'a GraphNode>,
    {
        result.extend(
            candidates
                .into_iter()
                .filter(|node| !self.is_hidden(node))
                .cloned(),
        );
    }

    /// Push the exposed form of every candidate edge onto `result`.
    pub fn add_exposed_edges<I>(&self, result: &mut Vec<GraphEdge>, candidates: I)
    where
        I: IntoIterator<Item = GraphEdge>,
    {
        let mut synthesized: HashSet<GraphEdge> = HashSet::new();
        for edge in candidates {
            match self.expose_edge(edge) {
                ExposedEdge::Kept(edge) => result.push(edge),
                ExposedEdge::Synthetic(edge) => {
                    if synthesized.insert(edge.clone()) {
                        result.push(edge);
                    }
                }
                ExposedEdge::Internal => {}
            }
        }
    }

    #[must_use]
    pub fn exposed_edges<I>(&self, candidates: I) -> Vec<GraphEdge>
    where
        I: IntoIterator<Item = GraphEdge>,
    {
        let mut result = Vec::new();
        self.add_exposed_edges(&mut result, candidates);
        result
    }

    fn expose_edge(&self, edge: GraphEdge) -> ExposedEdge {
        let head_master = self.hidden.get(&edge.head);
        let tail_master = self.hidden.get(&edge.tail);
        if head_master.is_none() && tail_master.is_none() {
            return ExposedEdge::Kept(edge);
        }

        let head = head_master.unwrap_or(&edge.head);
        let tail = tail_master.unwrap_or(&edge.tail);
        if head == tail {
            return ExposedEdge::Internal;
        }
        if *head == edge.head && *tail == edge.tail {
            return ExposedEdge::Kept(edge);
        }

        ExposedEdge::Synthetic(GraphEdge {
            relation: edge.relation.clone(),
            head: head.clone(),
            tail: tail.clone(),
        })
    }
}

enum ExposedEdge {
    Kept(GraphEdge),
    Synthetic(GraphEdge),
    Internal,
}
