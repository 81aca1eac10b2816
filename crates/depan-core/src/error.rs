use crate::model::GraphNode;

/// Errors raised while assembling a [`GraphModel`](crate::model::GraphModel).
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// An edge endpoint is not a node of the graph.
    #[error("edge endpoint `{node}` is not a node of the graph")]
    UnknownNode { node: GraphNode },
}

/// Contract violations rejected by the [`Collapser`](crate::collapse::Collapser).
#[derive(Debug, thiserror::Error)]
pub enum CollapseError {
    /// `collapse` was called with nothing to group.
    #[error("cannot collapse an empty node set under master `{master}`")]
    EmptyPickedSet { master: GraphNode },
}
