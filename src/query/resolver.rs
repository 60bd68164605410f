//! Maps a free-text identifier onto exactly one graph node.
//!
//! Two phases: an exact, case-sensitive key hit wins outright; only when no
//! key matches does the resolver compare the identifier case-insensitively
//! against each node's attribute values (label-like fields first) and its
//! key.

use indexmap::IndexSet;
use serde::Serialize;

use crate::error::{PlantgraphError, Result};
use crate::graph::RelationGraph;

/// Outcome of resolving one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "nodes", rename_all = "snake_case")]
pub enum Resolution {
    Resolved(String),
    Ambiguous(Vec<String>),
    NotFound,
}

impl Resolution {
    /// Convert into a node key, mapping the two failure outcomes to errors.
    pub fn into_key(self, identifier: &str) -> Result<String> {
        match self {
            Self::Resolved(key) => Ok(key),
            Self::Ambiguous(candidates) => Err(PlantgraphError::AmbiguousIdentifier {
                identifier: identifier.trim().to_string(),
                candidates,
            }),
            Self::NotFound => Err(PlantgraphError::NotFound(format!(
                "no node matches '{}'",
                identifier.trim()
            ))),
        }
    }
}

/// Resolve `identifier` against the nodes of `graph`.
pub fn resolve(graph: &RelationGraph, identifier: &str) -> Resolution {
    let wanted = identifier.trim();
    if graph.contains_node(wanted) {
        return Resolution::Resolved(wanted.to_string());
    }

    let wanted_lower = wanted.to_lowercase();
    let same = |value: &str| value.trim().to_lowercase() == wanted_lower;

    let mut candidates: IndexSet<String> = IndexSet::new();
    for node in graph.nodes() {
        let hit = node.attribute_values().iter().any(|v| same(v.as_str())) || same(node.key.as_str());
        if hit {
            candidates.insert(node.key.clone());
        }
    }

    match candidates.len() {
        0 => Resolution::NotFound,
        1 => Resolution::Resolved(candidates.into_iter().next().unwrap_or_default()),
        _ => Resolution::Ambiguous(candidates.into_iter().collect()),
    }
}

/// Resolve and convert to a key in one step.
pub fn resolve_key(graph: &RelationGraph, identifier: &str) -> Result<String> {
    resolve(graph, identifier).into_key(identifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeKind;

    fn graph() -> RelationGraph {
        let mut g = RelationGraph::new();
        g.upsert_node("LIMA", NodeKind::District);
        g.upsert_node("ICA", NodeKind::District);
        g.upsert_node("PALTA", NodeKind::Species);
        g.add_contains_edge("LIMA", "PALTA");
        g.add_contains_edge("ICA", "PALTA");
        g
    }

    #[test]
    fn test_exact_key_resolves() {
        assert_eq!(resolve(&graph(), "LIMA"), Resolution::Resolved("LIMA".to_string()));
        assert_eq!(resolve(&graph(), "  LIMA "), Resolution::Resolved("LIMA".to_string()));
    }

    #[test]
    fn test_lowercase_resolves_via_fuzzy_phase() {
        assert_eq!(resolve(&graph(), "lima"), Resolution::Resolved("LIMA".to_string()));
    }

    #[test]
    fn test_display_title_resolves() {
        assert_eq!(
            resolve(&graph(), "species: palta"),
            Resolution::Resolved("PALTA".to_string())
        );
    }

    #[test]
    fn test_attribute_collision_is_ambiguous() {
        // Both districts carry kind "District" and group "1".
        let expected = Resolution::Ambiguous(vec!["LIMA".to_string(), "ICA".to_string()]);
        assert_eq!(resolve(&graph(), "district"), expected);
        assert_eq!(resolve(&graph(), "1"), expected);
    }

    #[test]
    fn test_exact_key_beats_attribute_collision() {
        let mut g = graph();
        // A node whose key collides with the shared kind attribute.
        g.upsert_node("District", NodeKind::Species);
        assert_eq!(resolve(&g, "District"), Resolution::Resolved("District".to_string()));
        match resolve(&g, "district") {
            Resolution::Ambiguous(c) => assert_eq!(c, vec!["LIMA", "ICA", "District"]),
            other => panic!("expected ambiguity, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_is_not_found() {
        assert_eq!(resolve(&graph(), "cusco"), Resolution::NotFound);
        assert_eq!(resolve(&graph(), ""), Resolution::NotFound);
    }

    #[test]
    fn test_into_key_errors() {
        let err = resolve_key(&graph(), "district").unwrap_err();
        match err {
            PlantgraphError::AmbiguousIdentifier { identifier, candidates } => {
                assert_eq!(identifier, "district");
                assert_eq!(candidates.len(), 2);
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert!(matches!(
            resolve_key(&graph(), "cusco"),
            Err(PlantgraphError::NotFound(_))
        ));
    }
}
