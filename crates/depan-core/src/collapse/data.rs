//! A single collapse group.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashSet;

use crate::model::GraphNode;

/// One master node, the nodes it directly hides, and nested groups that
/// were absorbed when it was created.
///
/// Membership is frozen at construction: the constructor takes ownership of
/// its inputs and nothing mutates them afterwards. A group is only changed
/// by replacing it in the [`Collapser`](super::Collapser).
///
/// Nesting can be arbitrarily deep, so walking, comparing and dropping a
/// group all use explicit work stacks rather than recursion.
#[derive(Debug)]
pub struct CollapseData {
    master: GraphNode,
    children_nodes: Vec<GraphNode>,
    children_collapse: Vec<CollapseData>,
}

impl CollapseData {
    /// Build a group. Duplicate child nodes are dropped, keeping the first
    /// occurrence.
    pub fn new(
        master: GraphNode,
        children_nodes: impl IntoIterator<Item = GraphNode>,
        children_collapse: Vec<Self>,
    ) -> Self {
        let mut seen = HashSet::new();
        let children_nodes = children_nodes
            .into_iter()
            .filter(|node| seen.insert(node.clone()))
            .collect();
        Self {
            master,
            children_nodes,
            children_collapse,
        }
    }

    #[must_use]
    pub const fn master_node(&self) -> &GraphNode {
        &self.master
    }

    /// Nodes picked for this group. Usually includes the master itself.
    #[must_use]
    pub fn children_nodes(&self) -> &[GraphNode] {
        &self.children_nodes
    }

    #[must_use]
    pub fn children_collapse(&self) -> &[Self] {
        &self.children_collapse
    }

    /// Nested group (one level down) whose master is `node`.
    #[must_use]
    pub fn collapse_data(&self, node: &GraphNode) -> Option<&Self> {
        self.children_collapse
            .iter()
            .find(|nested| nested.master == *node)
    }

    /// Add every node hidden by this group to `result`.
    ///
    /// That is the direct children plus, for each nested group at any
    /// depth, its master and its children. This group's own master is
    /// skipped unless it also turns up as a member of a nested group.
    pub fn add_member_nodes(&self, result: &mut HashSet<GraphNode>) {
        result.extend(self.direct_members().cloned());
        let mut pending: Vec<&Self> = self.children_collapse.iter().collect();
        while let Some(nested) = pending.pop() {
            result.insert(nested.master.clone());
            result.extend(nested.direct_members().cloned());
            pending.extend(&nested.children_collapse);
        }
    }

    /// Fresh set of [`add_member_nodes`](Self::add_member_nodes).
    #[must_use]
    pub fn member_nodes(&self) -> HashSet<GraphNode> {
        let mut result = HashSet::new();
        self.add_member_nodes(&mut result);
        result
    }

    /// Consume the group, handing back its nested groups.
    #[must_use]
    pub fn into_children_collapse(mut self) -> Vec<Self> {
        std::mem::take(&mut self.children_collapse)
    }

    /// Consume the group, handing back its child nodes and nested groups.
    #[must_use]
    pub fn into_children(mut self) -> (Vec<GraphNode>, Vec<Self>) {
        (
            std::mem::take(&mut self.children_nodes),
            std::mem::take(&mut self.children_collapse),
        )
    }

    /// Copy of this group over `reversed_nested`, which lists the already
    /// copied nested groups last-first.
    fn shallow_copy(&self, mut reversed_nested: Vec<Self>) -> Self {
        reversed_nested.reverse();
        Self {
            master: self.master.clone(),
            children_nodes: self.children_nodes.clone(),
            children_collapse: reversed_nested,
        }
    }

    fn direct_members(&self) -> impl Iterator<Item = &GraphNode> + '_ {
        self.children_nodes
            .iter()
            .filter(move |node| **node != self.master)
    }
}

impl Clone for CollapseData {
    fn clone(&self) -> Self {
        // Breadth-first listing: a group's nested groups sit after it, in
        // order, so rebuilding back to front sees children before parents.
        let mut order: Vec<(&Self, usize)> = vec![(self, 0)];
        let mut cursor = 0;
        while let Some(&(group, _)) = order.get(cursor) {
            order.extend(group.children_collapse.iter().map(|nested| (nested, cursor)));
            cursor += 1;
        }

        let mut built: Vec<Vec<Self>> = order.iter().map(|_| Vec::new()).collect();
        for index in (1..order.len()).rev() {
            let (group, parent) = order[index];
            let copy = group.shallow_copy(std::mem::take(&mut built[index]));
            built[parent].push(copy);
        }
        self.shallow_copy(std::mem::take(&mut built[0]))
    }
}

impl PartialEq for CollapseData {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((left, right)) = pending.pop() {
            if left.master != right.master
                || left.children_nodes != right.children_nodes
                || left.children_collapse.len() != right.children_collapse.len()
            {
                return false;
            }
            pending.extend(left.children_collapse.iter().zip(&right.children_collapse));
        }
        true
    }
}

impl Eq for CollapseData {}

impl Drop for CollapseData {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children_collapse);
        while let Some(mut nested) = pending.pop() {
            pending.append(&mut nested.children_collapse);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(ids: &[&str]) -> Vec<GraphNode> {
        ids.iter().map(|id| GraphNode::from(*id)).collect()
    }

    fn set(ids: &[&str]) -> HashSet<GraphNode> {
        nodes(ids).into_iter().collect()
    }

    #[test]
    fn members_skip_own_master() {
        let group = CollapseData::new("a".into(), nodes(&["a", "b", "c"]), Vec::new());
        assert_eq!(group.member_nodes(), set(&["b", "c"]));
    }

    #[test]
    fn members_flatten_nested_groups_including_their_masters() {
        let inner = CollapseData::new("c".into(), nodes(&["c", "d"]), Vec::new());
        let middle = CollapseData::new("b".into(), nodes(&["b", "e"]), vec![inner]);
        let outer = CollapseData::new("a".into(), nodes(&["a"]), vec![middle]);

        assert_eq!(outer.member_nodes(), set(&["b", "c", "d", "e"]));
    }

    #[test]
    fn nested_lookup_is_one_level_deep() {
        let inner = CollapseData::new("c".into(), nodes(&["c"]), Vec::new());
        let middle = CollapseData::new("b".into(), nodes(&["b"]), vec![inner]);
        let outer = CollapseData::new("a".into(), nodes(&["a"]), vec![middle]);

        assert!(outer.collapse_data(&"b".into()).is_some());
        assert!(outer.collapse_data(&"c".into()).is_none());
        assert!(outer.collapse_data(&"a".into()).is_none());
    }

    fn chain(depth: usize) -> CollapseData {
        let mut group = CollapseData::new("n0".into(), nodes(&["n0"]), Vec::new());
        for i in 1..depth {
            let master = GraphNode::new(format!("n{i}"));
            group = CollapseData::new(master.clone(), vec![master], vec![group]);
        }
        group
    }

    #[test]
    fn deep_nesting_is_walked_compared_and_dropped_iteratively() {
        let left = chain(200_000);
        let right = chain(200_000);
        assert_eq!(left.member_nodes().len(), 199_999);
        assert!(left == right);
        assert!(left != chain(199_999));
        assert!(left.clone() == right);
        drop(left);
        drop(right);
    }

    #[test]
    fn into_children_hands_back_both_lists() {
        let inner = CollapseData::new("c".into(), nodes(&["c"]), Vec::new());
        let outer = CollapseData::new("a".into(), nodes(&["a", "b"]), vec![inner.clone()]);
        let (children, nested) = outer.into_children();
        assert_eq!(children, nodes(&["a", "b"]));
        assert_eq!(nested, vec![inner]);
    }

    #[test]
    fn clone_keeps_nested_order() {
        let b = CollapseData::new("b".into(), nodes(&["b", "x"]), Vec::new());
        let c = CollapseData::new("c".into(), nodes(&["c"]), Vec::new());
        let d = CollapseData::new("d".into(), nodes(&["d"]), vec![c]);
        let outer = CollapseData::new("a".into(), nodes(&["a"]), vec![b, d]);

        let copy = outer.clone();
        assert_eq!(copy, outer);
        let masters: Vec<&str> = copy
            .children_collapse()
            .iter()
            .map(|group| group.master_node().as_str())
            .collect();
        assert_eq!(masters, vec!["b", "d"]);
        assert!(copy.children_collapse()[1].collapse_data(&"c".into()).is_some());
    }

    #[test]
    fn children_are_deduplicated_in_order() {
        let group = CollapseData::new("a".into(), nodes(&["b", "a", "b", "c"]), Vec::new());
        assert_eq!(group.children_nodes(), nodes(&["b", "a", "c"]).as_slice());
    }
}
