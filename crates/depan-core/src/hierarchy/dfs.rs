//! Depth-first traversal bookkeeping and topological ordering.
//!
//! # Node States
//!
//! Each node moves through three colors during a traversal:
//!
//! ```text
//! White (undiscovered) → Grey (on the stack) → Black (explored)
//! ```
//!
//! One tick counter is shared by every node of a [`DfsState`]; discovery and
//! exploration each consume a tick, so ticks are strictly increasing and a
//! zero tick means "not yet".
//!
//! # Predecessors
//!
//! A node's predecessor is the *first* node that lists it as a successor,
//! whether or not the node had already been visited at that point. This
//! departs from textbook DFS trees on purpose: predecessor assignment is
//! independent of visitation order, so a root is exactly a node that no
//! visited node claims as a successor.
//!
//! The traversal uses an explicit frame stack, so deep hierarchies do not
//! risk overflowing the call stack.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;
use std::vec;

use tracing::trace;

use super::tree::TreeModel;
use crate::model::GraphNode;

/// Traversal color of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeColor {
    /// Not yet discovered.
    White,
    /// Discovered, successors still being explored.
    Grey,
    /// All successors explored.
    Black,
}

#[derive(Debug, Clone, Default)]
struct NodeState {
    discovered: u64,
    explored: u64,
    parent: Option<GraphNode>,
}

struct Frame {
    node: GraphNode,
    children: vec::IntoIter<GraphNode>,
}

// ---------------------------------------------------------------------------
// DfsState
// ---------------------------------------------------------------------------

/// DFS bookkeeping over the successors of a [`TreeModel`].
pub struct DfsState<'t, T: TreeModel + ?Sized> {
    tree: &'t T,
    tick: u64,
    states: HashMap<GraphNode, NodeState>,
    discovery_order: Vec<GraphNode>,
}

impl<'t, T: TreeModel + ?Sized> DfsState<'t, T> {
    #[must_use]
    pub fn new(tree: &'t T) -> Self {
        Self {
            tree,
            tick: 0,
            states: HashMap::new(),
            discovery_order: Vec::new(),
        }
    }

    #[must_use]
    pub fn color(&self, node: &GraphNode) -> NodeColor {
        match self.states.get(node) {
            None => NodeColor::White,
            Some(state) if state.discovered == 0 => NodeColor::White,
            Some(state) if state.explored == 0 => NodeColor::Grey,
            Some(_) => NodeColor::Black,
        }
    }

    /// Tick at which `node` was discovered, if it has been.
    #[must_use]
    pub fn discovered(&self, node: &GraphNode) -> Option<u64> {
        self.states
            .get(node)
            .map(|state| state.discovered)
            .filter(|tick| *tick > 0)
    }

    /// Tick at which `node` finished, if it has.
    #[must_use]
    pub fn explored(&self, node: &GraphNode) -> Option<u64> {
        self.states
            .get(node)
            .map(|state| state.explored)
            .filter(|tick| *tick > 0)
    }

    /// First node that claimed `node` as a successor.
    #[must_use]
    pub fn predecessor(&self, node: &GraphNode) -> Option<&GraphNode> {
        self.states.get(node).and_then(|state| state.parent.as_ref())
    }

    /// Nodes in the order they were discovered.
    #[must_use]
    pub fn discovery_order(&self) -> &[GraphNode] {
        &self.discovery_order
    }

    /// Visit `node` and everything reachable from it that is still white.
    pub fn visit_node(&mut self, node: &GraphNode) {
        self.traverse(node, &mut |_| {});
    }

    /// Visit every still-white node of `universe`, in iteration order.
    pub fn visit_all<'a, I>(&mut self, universe: I)
    where
        I: IntoIterator<Item = &'a GraphNode>,
    {
        for node in universe {
            self.visit_node(node);
        }
    }

    /// Every visited node without a predecessor, in discovery order.
    #[must_use]
    pub fn extract_roots(&self) -> Vec<GraphNode> {
        self.discovery_order
            .iter()
            .filter(|node| self.predecessor(node).is_none())
            .cloned()
            .collect()
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn discover(&mut self, node: &GraphNode) {
        let tick = self.next_tick();
        self.states.entry(node.clone()).or_default().discovered = tick;
        self.discovery_order.push(node.clone());
    }

    fn finish(&mut self, node: &GraphNode) {
        let tick = self.next_tick();
        self.states.entry(node.clone()).or_default().explored = tick;
    }

    fn open_frame(&mut self, node: GraphNode) -> Frame {
        self.discover(&node);
        let children = self.tree.successor_nodes(&node).into_iter();
        Frame { node, children }
    }

    /// Core traversal. `on_explored` fires as each node turns black.
    fn traverse(&mut self, start: &GraphNode, on_explored: &mut dyn FnMut(&GraphNode)) {
        if self.color(start) != NodeColor::White {
            return;
        }

        let mut stack = vec![self.open_frame(start.clone())];

        while let Some(frame) = stack.last_mut() {
            if let Some(child) = frame.children.next() {
                if child == frame.node {
                    continue;
                }
                let parent = frame.node.clone();
                let state = self.states.entry(child.clone()).or_default();
                if state.parent.is_none() {
                    trace!(node = %child, parent = %parent, "predecessor assigned");
                    state.parent = Some(parent);
                }
                if state.discovered == 0 {
                    let next = self.open_frame(child);
                    stack.push(next);
                }
            } else {
                let node = frame.node.clone();
                stack.pop();
                self.finish(&node);
                on_explored(&node);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// TopoSortState
// ---------------------------------------------------------------------------

/// DFS that records interior nodes in finish order.
///
/// Descendants finish before their ancestors, so the order is bottom-up:
/// children before parents. Leaves (nodes without successors) are left out.
pub struct TopoSortState<'t, T: TreeModel + ?Sized> {
    dfs: DfsState<'t, T>,
    order: Vec<GraphNode>,
}

impl<'t, T: TreeModel + ?Sized> TopoSortState<'t, T> {
    #[must_use]
    pub fn new(tree: &'t T) -> Self {
        Self {
            dfs: DfsState::new(tree),
            order: Vec::new(),
        }
    }

    /// Visit every unvisited node of `universe` and return the interior
    /// nodes in finish order.
    pub fn topo_sort<'a, I>(&mut self, universe: I) -> Vec<GraphNode>
    where
        I: IntoIterator<Item = &'a GraphNode>,
    {
        let tree = self.dfs.tree;
        for node in universe {
            let order = &mut self.order;
            self.dfs.traverse(node, &mut |explored| {
                if tree.has_successor_nodes(explored) {
                    order.push(explored.clone());
                }
            });
        }
        self.order.clone()
    }

    /// Underlying traversal state.
    #[must_use]
    pub const fn dfs(&self) -> &DfsState<'t, T> {
        &self.dfs
    }

    #[must_use]
    pub fn into_order(self) -> Vec<GraphNode> {
        self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::successors::SuccessorsMap;
    use crate::hierarchy::tree::HierarchicalTreeModel;
    use crate::model::GraphEdge;

    fn tree(edges: &[(&str, &str)]) -> HierarchicalTreeModel {
        let mut map = SuccessorsMap::new();
        for (head, tail) in edges {
            map.add_forward_edge(GraphEdge::new("contains", *head, *tail));
        }
        HierarchicalTreeModel::new(map)
    }

    fn node(id: &str) -> GraphNode {
        GraphNode::from(id)
    }

    fn position(order: &[GraphNode], id: &str) -> usize {
        order
            .iter()
            .position(|n| n.as_str() == id)
            .unwrap_or_else(|| panic!("{id} missing from {order:?}"))
    }

    #[test]
    fn colors_follow_white_grey_black() {
        let model = tree(&[("a", "b")]);
        let mut state = DfsState::new(&model);
        assert_eq!(state.color(&node("a")), NodeColor::White);

        state.visit_node(&node("a"));
        assert_eq!(state.color(&node("a")), NodeColor::Black);
        assert_eq!(state.color(&node("b")), NodeColor::Black);
        assert_eq!(state.color(&node("zzz")), NodeColor::White);
    }

    #[test]
    fn ticks_nest_child_inside_parent() {
        let model = tree(&[("a", "b")]);
        let mut state = DfsState::new(&model);
        state.visit_node(&node("a"));

        let a_in = state.discovered(&node("a")).expect("a discovered");
        let a_out = state.explored(&node("a")).expect("a explored");
        let b_in = state.discovered(&node("b")).expect("b discovered");
        let b_out = state.explored(&node("b")).expect("b explored");
        assert!(a_in < b_in && b_in < b_out && b_out < a_out);
        assert_eq!(state.predecessor(&node("b")), Some(&node("a")));
    }

    #[test]
    fn predecessor_assigned_even_when_already_visited() {
        // b is visited first as its own root; a claims it later.
        let model = tree(&[("a", "b")]);
        let mut state = DfsState::new(&model);
        state.visit_all(&[node("b"), node("a")]);

        assert_eq!(state.predecessor(&node("b")), Some(&node("a")));
        assert_eq!(state.extract_roots(), vec![node("a")]);
    }

    #[test]
    fn first_claim_wins() {
        let model = tree(&[("a", "c"), ("b", "c")]);
        let mut state = DfsState::new(&model);
        state.visit_all(&[node("b"), node("a")]);
        assert_eq!(state.predecessor(&node("c")), Some(&node("b")));
    }

    #[test]
    fn self_loops_are_ignored() {
        let model = tree(&[("a", "a"), ("a", "b")]);
        let mut state = DfsState::new(&model);
        state.visit_node(&node("a"));
        assert_eq!(state.predecessor(&node("a")), None);
        assert_eq!(state.extract_roots(), vec![node("a")]);
    }

    #[test]
    fn cycles_terminate_without_roots() {
        let model = tree(&[("a", "b"), ("b", "a")]);
        let mut state = DfsState::new(&model);
        state.visit_node(&node("a"));
        assert_eq!(state.color(&node("b")), NodeColor::Black);
        assert!(state.extract_roots().is_empty());
    }

    #[test]
    fn topo_sort_puts_children_first_and_skips_leaves() {
        let model = tree(&[("a", "b"), ("b", "c"), ("a", "d"), ("d", "e")]);
        let universe = vec![node("a"), node("b"), node("c"), node("d"), node("e")];
        let mut sorter = TopoSortState::new(&model);
        let order = sorter.topo_sort(&universe);

        assert_eq!(order.len(), 3, "only interior nodes: {order:?}");
        assert!(position(&order, "b") < position(&order, "a"));
        assert!(position(&order, "d") < position(&order, "a"));
        assert!(!order.contains(&node("c")));
    }

    #[test]
    fn deep_chain_does_not_overflow() {
        let ids: Vec<String> = (0..50_000).map(|i| format!("n{i}")).collect();
        let mut map = SuccessorsMap::new();
        for pair in ids.windows(2) {
            map.add_forward_edge(GraphEdge::new("contains", pair[0].as_str(), pair[1].as_str()));
        }
        let model = HierarchicalTreeModel::new(map);
        let universe: Vec<GraphNode> = ids.iter().map(|id| GraphNode::from(id.as_str())).collect();

        let order = TopoSortState::new(&model).topo_sort(&universe);
        assert_eq!(order.len(), ids.len() - 1);
        assert_eq!(order.last(), Some(&node("n0")));
    }
}
