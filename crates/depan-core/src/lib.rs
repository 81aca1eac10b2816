#![forbid(unsafe_code)]
//! depan-core library.
//!
//! Builds hierarchies over a dependency graph and collapses groups of nodes
//! behind master nodes.
//!
//! # Conventions
//!
//! - **Errors**: Use `thiserror` enums from [`error`]; absence is `Option`.
//! - **Logging**: Use `tracing` macros (`debug!`, `trace!`, `warn!`).
//!
//! # Typical Usage
//!
//! ```rust
//! use depan_core::collapse::Collapser;
//! use depan_core::hierarchy::spanning_tree;
//! use depan_core::matcher::AllForward;
//! use depan_core::model::{GraphEdge, GraphModel};
//!
//! let graph = GraphModel::from_parts(
//!     Vec::new(),
//!     vec![GraphEdge::new("contains", "pkg", "a"), GraphEdge::new("contains", "pkg", "b")],
//! );
//! let tree = spanning_tree(&graph, &AllForward);
//!
//! let mut collapser = Collapser::new();
//! collapser.collapse_tree(&graph, &tree)?;
//! let exposed = collapser.build_exposed_graph(&graph);
//! assert_eq!(exposed.node_count(), 1);
//! # Ok::<(), depan_core::error::CollapseError>(())
//! ```

pub mod collapse;
pub mod error;
pub mod hierarchy;
pub mod matcher;
pub mod model;
