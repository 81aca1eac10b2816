//! Node collapsing: grouping nodes behind a master and deriving the
//! exposed graph.

pub mod collapser;
pub mod data;
pub mod gizmo;
pub mod tree_model;

pub use collapser::Collapser;
pub use data::CollapseData;
pub use gizmo::HiddenNodesGizmo;
pub use tree_model::{CollapseTreeModel, CollapseTreeNode};
