//! The mutable collapse engine.
//!
//! # Overview
//!
//! A [`Collapser`] owns the current top-level collapse groups, keyed by
//! master node. Collapsing a set of nodes creates a new group; any picked
//! node that is itself a current master has its group moved (not copied)
//! out of the top-level map and nested under the new group. Uncollapsing
//! reverses one level of that nesting.
//!
//! ```text
//! collapse(B, {B, C})          collapse(A, {A, B})         uncollapse(A)
//!   B: {B, C}            →       A: {A, B}            →      B: {B, C}
//!                                  └─ B: {B, C}
//! ```
//!
//! ## Exposed view
//!
//! [`Collapser::build_hidden_node_map`] maps every node hidden by a group
//! to the group's top-level master. [`Collapser::build_exposed_graph`] uses
//! that snapshot to replace each group with its master and reroute or drop
//! edges (see [`HiddenNodesGizmo`]).
//!
//! ## Concurrency
//!
//! Operations are synchronous and need `&mut self` to change state; callers
//! embedding a collapser in a multi-threaded host wrap it in their own lock.

#![allow(clippy::module_name_repetitions)]

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, instrument, trace, warn};

use super::data::CollapseData;
use super::gizmo::HiddenNodesGizmo;
use crate::error::CollapseError;
use crate::hierarchy::dfs::TopoSortState;
use crate::hierarchy::tree::TreeModel;
use crate::model::{GraphModel, GraphNode};

/// Collapse state for one view of a graph.
#[derive(Debug, Clone, Default)]
pub struct Collapser {
    collapsed: BTreeMap<GraphNode, CollapseData>,
}

impl Collapser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_master(&self, node: &GraphNode) -> bool {
        self.collapsed.contains_key(node)
    }

    /// Top-level group mastered by `node`, or `None` if `node` is not
    /// currently collapsed.
    #[must_use]
    pub fn collapse_data(&self, node: &GraphNode) -> Option<&CollapseData> {
        self.collapsed.get(node)
    }

    /// Current top-level master nodes, sorted.
    #[must_use]
    pub fn master_nodes(&self) -> Vec<GraphNode> {
        self.collapsed.keys().cloned().collect()
    }

    /// Current top-level groups, sorted by master.
    #[must_use]
    pub fn compute_roots(&self) -> Vec<&CollapseData> {
        self.collapsed.values().collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.collapsed.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.collapsed.len()
    }

    /// Drop every group.
    pub fn clear(&mut self) {
        self.collapsed.clear();
    }

    /// Group `picked` under `master`.
    ///
    /// Every picked node that currently masters a group contributes that
    /// group as a nested child of the new one. An existing group under
    /// `master` itself is either nested too (`erase == false`) or
    /// uncollapsed first, so its own nested groups return to the top level
    /// and are absorbed only if picked (`erase == true`).
    ///
    /// # Errors
    ///
    /// Returns [`CollapseError::EmptyPickedSet`] if `picked` is empty. The
    /// collapser is left unchanged.
    #[instrument(skip(self, picked), fields(master = %master))]
    pub fn collapse<I>(
        &mut self,
        master: GraphNode,
        picked: I,
        erase: bool,
    ) -> Result<&CollapseData, CollapseError>
    where
        I: IntoIterator<Item = GraphNode>,
    {
        let picked: Vec<GraphNode> = picked.into_iter().collect();
        if picked.is_empty() {
            return Err(CollapseError::EmptyPickedSet { master });
        }

        if erase {
            while self.uncollapse(&master) {}
        }

        let mut nested: Vec<CollapseData> = picked
            .iter()
            .filter_map(|node| self.collapsed.remove(node))
            .collect();
        if let Some(existing) = self.collapsed.remove(&master) {
            nested.push(existing);
        }

        debug!(
            picked = picked.len(),
            nested = nested.len(),
            erase,
            "collapsing nodes"
        );

        let data = CollapseData::new(master.clone(), picked, nested);
        Ok(self.collapsed.entry(master).or_insert(data))
    }

    /// Remove the group mastered by `master` and promote its direct nested
    /// groups back to the top level. Deeper nesting stays inside the
    /// promoted groups.
    ///
    /// Returns `false` (and changes nothing) if `master` is not a current
    /// master.
    #[instrument(skip(self), fields(master = %master))]
    pub fn uncollapse(&mut self, master: &GraphNode) -> bool {
        let Some(data) = self.collapsed.remove(master) else {
            trace!("not a master; nothing to uncollapse");
            return false;
        };

        let promoted = data.into_children_collapse();
        debug!(promoted = promoted.len(), "uncollapsed group");
        for child in promoted {
            self.promote(child);
        }
        true
    }

    fn promote(&mut self, child: CollapseData) {
        let key = child.master_node().clone();
        let Some(existing) = self.collapsed.remove(&key) else {
            self.collapsed.insert(key, child);
            return;
        };

        // A group with the same master was created while `child` was nested.
        warn!(master = %key, "promoted group collides with a top-level group; nesting it");
        let (members, mut nested) = existing.into_children();
        nested.push(child);
        let merged = CollapseData::new(key.clone(), members, nested);
        self.collapsed.insert(key, merged);
    }

    /// Map every hidden node to the top-level master that hides it.
    ///
    /// Members are flattened through every nesting level. Top-level masters
    /// are never keys.
    #[must_use]
    pub fn build_hidden_node_map(&self) -> HashMap<GraphNode, GraphNode> {
        let mut result = HashMap::new();
        for (master, data) in &self.collapsed {
            for member in data.member_nodes() {
                result.insert(member, master.clone());
            }
        }
        for master in self.collapsed.keys() {
            result.remove(master);
        }
        result
    }

    /// Masters plus every node of `universe` that is not hidden.
    #[must_use]
    pub fn exposed_node_set<'a, I>(&self, universe: I) -> HashSet<GraphNode>
    where
        I: IntoIterator<Item = &'a GraphNode>,
    {
        let hidden = self.build_hidden_node_map();
        let gizmo = HiddenNodesGizmo::new(&hidden);
        let mut exposed = Vec::new();
        gizmo.add_exposed_nodes(&mut exposed, universe);

        let mut result: HashSet<GraphNode> = exposed.into_iter().collect();
        result.extend(self.collapsed.keys().cloned());
        result
    }

    /// The graph as seen with every group replaced by its master.
    ///
    /// Returns `graph` itself when nothing is collapsed.
    #[instrument(skip_all, fields(groups = self.collapsed.len()))]
    pub fn build_exposed_graph<'g>(&self, graph: &'g GraphModel) -> Cow<'g, GraphModel> {
        if self.collapsed.is_empty() {
            return Cow::Borrowed(graph);
        }

        let hidden = self.build_hidden_node_map();
        let gizmo = HiddenNodesGizmo::new(&hidden);

        let mut nodes = Vec::with_capacity(graph.node_count());
        gizmo.add_exposed_nodes(&mut nodes, graph.nodes());
        nodes.extend(self.collapsed.keys().cloned());

        let edges = gizmo.exposed_edges(graph.edges());

        let exposed = GraphModel::from_parts(nodes, edges);
        debug!(
            hidden = hidden.len(),
            nodes = exposed.node_count(),
            edges = exposed.edge_count(),
            "exposed graph built"
        );
        Cow::Owned(exposed)
    }

    /// Collapse every interior node of `tree` over its exposed descendants.
    ///
    /// Interior nodes are processed in topological order (children before
    /// parents), so each node absorbs the groups already built for its
    /// children. Returns the number of groups created.
    ///
    /// The hidden-node snapshot is rebuilt for every interior node, which
    /// is quadratic in the worst case.
    ///
    /// # Errors
    ///
    /// Propagates [`CollapseError`] from [`Collapser::collapse`].
    #[instrument(skip_all, fields(nodes = graph.node_count()))]
    pub fn collapse_tree<T>(&mut self, graph: &GraphModel, tree: &T) -> Result<usize, CollapseError>
    where
        T: TreeModel + ?Sized,
    {
        let order = TopoSortState::new(tree).topo_sort(graph.nodes());
        debug!(interior = order.len(), "collapsing tree bottom-up");

        for top in &order {
            let hidden = self.build_hidden_node_map();
            let picked = self.exposed_descendants(tree, top, &hidden);
            trace!(master = %top, picked = picked.len(), "collapsing interior node");
            self.collapse(top.clone(), picked, false)?;
        }

        Ok(order.len())
    }

    /// `top` followed by every exposed node reachable through `tree`.
    /// Descent stops at (but includes) nodes that already master a group.
    fn exposed_descendants<T>(
        &self,
        tree: &T,
        top: &GraphNode,
        hidden: &HashMap<GraphNode, GraphNode>,
    ) -> Vec<GraphNode>
    where
        T: TreeModel + ?Sized,
    {
        let mut picked = vec![top.clone()];
        let mut seen: HashSet<GraphNode> = HashSet::from([top.clone()]);
        let mut stack = vec![top.clone()];

        while let Some(node) = stack.pop() {
            for child in tree.successor_nodes(&node) {
                if hidden.contains_key(&child) || !seen.insert(child.clone()) {
                    continue;
                }
                picked.push(child.clone());
                if !self.is_master(&child) {
                    stack.push(child);
                }
            }
        }

        picked
    }
}
