//! Hierarchy views over a dependency graph.
//!
//! # Overview
//!
//! A hierarchy is a successor relation derived from a [`GraphModel`] by an
//! [`EdgeMatcher`]. It feeds display trees and the bulk collapse performed
//! by [`Collapser::collapse_tree`].
//!
//! ## Pipeline
//!
//! ```text
//! GraphModel + EdgeMatcher
//!        ↓  trees::compute_successor_hierarchy / compute_spanning_hierarchy
//! SuccessorsMap
//!        ↓  HierarchicalTreeModel::new
//! TreeModel
//!   ├─ compute_roots()        (DfsState)
//!   └─ topological order      (TopoSortState, children before parents)
//! ```
//!
//! [`GraphModel`]: crate::model::GraphModel
//! [`EdgeMatcher`]: crate::matcher::EdgeMatcher
//! [`Collapser::collapse_tree`]: crate::collapse::Collapser::collapse_tree

pub mod dfs;
pub mod successors;
pub mod tree;
pub mod trees;

pub use dfs::{DfsState, NodeColor, TopoSortState};
pub use successors::{SuccessorEdges, SuccessorsMap};
pub use tree::{EmptyTreeModel, FlatTreeModel, HierarchicalTreeModel, TreeModel};
pub use trees::{compute_spanning_hierarchy, compute_successor_hierarchy, spanning_tree, successor_tree};
