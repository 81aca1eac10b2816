//! Edge direction policies used to derive hierarchies.
//!
//! An [`EdgeMatcher`] classifies an edge's relation as a forward successor
//! link (`head` is the parent of `tail`), a reverse successor link (`tail` is
//! the parent of `head`), both, or neither.

#![allow(clippy::module_name_repetitions)]

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::{GraphEdge, Relation};

/// Direction policy consulted by the hierarchy builders.
pub trait EdgeMatcher {
    /// `true` if edges with `relation` make the tail a successor of the head.
    fn relation_forward(&self, relation: &Relation) -> bool;

    /// `true` if edges with `relation` make the head a successor of the tail.
    fn relation_reverse(&self, relation: &Relation) -> bool;

    fn edge_forward(&self, edge: &GraphEdge) -> bool {
        self.relation_forward(&edge.relation)
    }

    fn edge_reverse(&self, edge: &GraphEdge) -> bool {
        self.relation_reverse(&edge.relation)
    }
}

/// Matcher backed by two explicit relation sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationSetMatcher {
    #[serde(default)]
    pub forward: BTreeSet<Relation>,
    #[serde(default)]
    pub reverse: BTreeSet<Relation>,
}

impl RelationSetMatcher {
    pub fn new(
        forward: impl IntoIterator<Item = Relation>,
        reverse: impl IntoIterator<Item = Relation>,
    ) -> Self {
        Self {
            forward: forward.into_iter().collect(),
            reverse: reverse.into_iter().collect(),
        }
    }

    /// Matcher that treats every listed relation as a forward link.
    pub fn forward_only(relations: impl IntoIterator<Item = Relation>) -> Self {
        Self::new(relations, std::iter::empty())
    }
}

impl EdgeMatcher for RelationSetMatcher {
    fn relation_forward(&self, relation: &Relation) -> bool {
        self.forward.contains(relation)
    }

    fn relation_reverse(&self, relation: &Relation) -> bool {
        self.reverse.contains(relation)
    }
}

/// Matches every relation in the forward direction.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllForward;

impl EdgeMatcher for AllForward {
    fn relation_forward(&self, _relation: &Relation) -> bool {
        true
    }

    fn relation_reverse(&self, _relation: &Relation) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_sets_classify_direction() {
        let matcher = RelationSetMatcher::new(
            vec![Relation::from("contains")],
            vec![Relation::from("extends")],
        );

        let contains = GraphEdge::new("contains", "pkg", "cls");
        let extends = GraphEdge::new("extends", "sub", "base");
        let calls = GraphEdge::new("calls", "a", "b");

        assert!(matcher.edge_forward(&contains));
        assert!(!matcher.edge_reverse(&contains));
        assert!(matcher.edge_reverse(&extends));
        assert!(!matcher.edge_forward(&calls));
        assert!(!matcher.edge_reverse(&calls));
    }

    #[test]
    fn deserializes_with_missing_sections() {
        let matcher: RelationSetMatcher =
            serde_json::from_str(r#"{"forward":["contains"]}"#).expect("parse");
        assert!(matcher.relation_forward(&"contains".into()));
        assert!(matcher.reverse.is_empty());
    }
}
