//! Connected components of the relation graph, via union-find.

use indexmap::IndexMap;
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use serde::Serialize;

use super::RelationGraph;

/// Number of component sizes reported in a summary by default.
pub const DEFAULT_SIZES_SAMPLE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentSummary {
    pub count: usize,
    pub largest_size: usize,
    /// Sizes of the first components found, in discovery order.
    pub sizes_sample: Vec<usize>,
}

/// Partition the nodes into maximal connected subsets.
///
/// Components are ordered by their first node in insertion order, and the
/// members of each component keep insertion order too.
pub fn connected_components(graph: &RelationGraph) -> Vec<Vec<String>> {
    let topology = graph.topology();
    let mut sets = UnionFind::<usize>::new(topology.node_count());
    for edge in topology.edge_references() {
        sets.union(edge.source().index(), edge.target().index());
    }

    let mut components: IndexMap<usize, Vec<String>> = IndexMap::new();
    for idx in topology.node_indices() {
        components
            .entry(sets.find(idx.index()))
            .or_default()
            .push(topology[idx].clone());
    }
    components.into_values().collect()
}

pub fn summarize_components(graph: &RelationGraph, sample: usize) -> ComponentSummary {
    let sizes: Vec<usize> = connected_components(graph).iter().map(Vec::len).collect();
    ComponentSummary {
        count: sizes.len(),
        largest_size: sizes.iter().copied().max().unwrap_or(0),
        sizes_sample: sizes.into_iter().take(sample).collect(),
    }
}
