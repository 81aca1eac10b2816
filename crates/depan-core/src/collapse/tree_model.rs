//! Read-only facade over a [`Collapser`] for tree displays.

#![allow(clippy::module_name_repetitions)]

use super::collapser::Collapser;
use super::data::CollapseData;
use crate::model::GraphNode;

/// One child row under a collapse group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollapseTreeNode<'c> {
    /// A nested collapse group.
    Group(&'c CollapseData),
    /// A plain member node.
    Member(&'c GraphNode),
}

/// Presents a collapser's groups as a tree: top-level groups are the roots,
/// nested groups and member nodes are children.
#[derive(Debug, Clone, Copy)]
pub struct CollapseTreeModel<'c> {
    collapser: &'c Collapser,
}

impl<'c> CollapseTreeModel<'c> {
    #[must_use]
    pub const fn new(collapser: &'c Collapser) -> Self {
        Self { collapser }
    }

    /// Top-level groups, sorted by master.
    #[must_use]
    pub fn roots(&self) -> Vec<&'c CollapseData> {
        self.collapser.compute_roots()
    }

    #[must_use]
    pub fn collapse_data(&self, node: &GraphNode) -> Option<&'c CollapseData> {
        self.collapser.collapse_data(node)
    }

    /// Nested groups first, then member nodes that are neither the group's
    /// master nor the master of a nested group.
    #[must_use]
    pub fn children(&self, data: &'c CollapseData) -> Vec<CollapseTreeNode<'c>> {
        let nested = data.children_collapse();
        let mut result: Vec<CollapseTreeNode<'c>> =
            nested.iter().map(CollapseTreeNode::Group).collect();
        result.extend(
            data.children_nodes()
                .iter()
                .filter(|node| *node != data.master_node())
                .filter(|node| nested.iter().all(|group| group.master_node() != *node))
                .map(CollapseTreeNode::Member),
        );
        result
    }

    #[must_use]
    pub fn has_children(&self, data: &CollapseData) -> bool {
        !data.children_collapse().is_empty()
            || data
                .children_nodes()
                .iter()
                .any(|node| node != data.master_node())
    }
}
