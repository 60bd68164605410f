//! Species lookup: matching records plus the node/edge subset to highlight.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::graph::RelationGraph;
use crate::model::{NodeKind, PlantingRecord};
use crate::normalize::normalize;
use crate::store::RecordStore;

/// Result of a species search.
///
/// An empty result is the non-fatal "not found" outcome; the caller decides
/// how to present it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpeciesSearchResult {
    /// Normalized species key that was searched.
    pub species: String,
    pub nodes_to_highlight: BTreeSet<String>,
    /// `(species_key, district_key)` pairs.
    pub edges_to_highlight: BTreeSet<(String, String)>,
    pub matched_records: Vec<PlantingRecord>,
    /// Districts referenced by a matched record but missing from the graph.
    /// Always empty for a graph and store built in the same pass.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped_districts: Vec<String>,
}

impl SpeciesSearchResult {
    pub fn is_empty(&self) -> bool {
        self.matched_records.is_empty()
    }
}

/// Run a species search against one graph/store pair.
pub fn execute(graph: &RelationGraph, store: &RecordStore, query: &str) -> SpeciesSearchResult {
    let species = normalize(query);
    let matched = store.lookup_by_species(&species);
    if matched.is_empty() {
        log::debug!("No records for species '{}'", species);
        return SpeciesSearchResult {
            species,
            ..Default::default()
        };
    }

    let districts: BTreeSet<&str> = matched.iter().map(|r| r.district.as_str()).collect();

    let mut nodes = BTreeSet::from([species.clone()]);
    let mut edges = BTreeSet::new();
    let mut skipped = Vec::new();
    for district in districts {
        if graph.contains_node(district) {
            nodes.insert(district.to_string());
            edges.insert((species.clone(), district.to_string()));
        } else {
            log::warn!(
                "Internal consistency: record district '{}' for species '{}' has no graph node",
                district,
                species
            );
            skipped.push(district.to_string());
        }
    }

    log::debug!(
        "Species '{}': {} records across {} districts",
        species,
        matched.len(),
        edges.len()
    );

    SpeciesSearchResult {
        species,
        nodes_to_highlight: nodes,
        edges_to_highlight: edges,
        matched_records: matched,
        skipped_districts: skipped,
    }
}

/// Species node keys containing the normalized query, in graph order.
pub fn species_suggestions(graph: &RelationGraph, query: &str) -> Vec<String> {
    let wanted = normalize(query);
    if wanted.is_empty() {
        return Vec::new();
    }
    graph
        .nodes()
        .filter(|n| n.kind == NodeKind::Species && n.key.contains(&wanted))
        .map(|n| n.key.clone())
        .collect()
}
