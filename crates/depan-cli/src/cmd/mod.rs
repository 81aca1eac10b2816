pub mod collapse;
pub mod roots;
pub mod tree;

use depan_core::hierarchy::{HierarchicalTreeModel, spanning_tree, successor_tree};
use depan_core::model::GraphModel;
use tracing::debug;

use crate::config::HierarchyConfig;

/// Build the hierarchy selected by `[hierarchy]` in the config.
pub fn build_tree(graph: &GraphModel, config: &HierarchyConfig) -> HierarchicalTreeModel {
    let matcher = config.matcher();
    debug!(spanning = config.spanning, "building hierarchy");
    if config.spanning {
        spanning_tree(graph, &matcher)
    } else {
        successor_tree(graph, &matcher)
    }
}
