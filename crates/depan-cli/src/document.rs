//! JSON graph documents.
//!
//! ```json
//! { "nodes": ["A", "B"], "edges": [{ "relation": "contains", "head": "A", "tail": "B" }] }
//! ```
//!
//! Edges may name nodes missing from `nodes`; those are appended in first
//! appearance order.

use anyhow::{Context, Result};
use depan_core::model::{GraphEdge, GraphModel, GraphNode};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

impl GraphDocument {
    #[must_use]
    pub fn from_model(graph: &GraphModel) -> Self {
        Self {
            nodes: graph.nodes().cloned().collect(),
            edges: graph.edges().collect(),
        }
    }

    #[must_use]
    pub fn into_model(self) -> GraphModel {
        GraphModel::from_parts(self.nodes, self.edges)
    }
}

/// Read and parse a graph document.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid document.
pub fn load_graph(path: &Path) -> Result<GraphModel> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read graph {}", path.display()))?;
    let document: GraphDocument = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse graph {}", path.display()))?;
    Ok(document.into_model())
}
