//! Relation graph module: District-Species graph, its builder and the
//! traversal, shortest-path and component algorithms that run over it.
//!
//! The graph is undirected and bipartite. Node identity is the normalized
//! label; every edge joins one District node and one Species node and
//! carries the `contains` relation.

mod builder;
pub mod components;
pub mod paths;
pub mod traversal;

pub use builder::{build, AREA_COLUMNS, DISTRICT_COLUMNS, SPECIES_COLUMNS, TITLEHOLDER_COLUMNS};
pub use components::{
    connected_components, summarize_components, ComponentSummary, DEFAULT_SIZES_SAMPLE,
};
pub use paths::{shortest_path, shortest_path_between, PathDistance, PathResult};
pub use traversal::{bounded_traversal, traverse_from, TraversalOrder, DEFAULT_TRAVERSAL_LIMIT};

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use petgraph::graph::{NodeIndex, UnGraph};

use crate::model::{Edge, Node, NodeKind, CONTAINS};

/// Undirected topology handed to the petgraph algorithms. Node weights are
/// keys, edge weights are the explicit edge weight if any.
pub(crate) type Topology = UnGraph<String, Option<f64>>;

/// In-memory District-Species graph.
///
/// Nodes, adjacency lists and edges all keep insertion order, so every
/// algorithm over a given graph visits nodes in a reproducible order. The
/// petgraph topology mirrors the same nodes and edges; node indices follow
/// insertion order because nodes are never removed.
#[derive(Debug, Clone, Default)]
pub struct RelationGraph {
    nodes: IndexMap<String, Node>,
    adjacency: IndexMap<String, IndexSet<String>>,
    /// Keyed by `(district, species)` as first inserted. A later edge over
    /// the same pair in the other orientation merges into it.
    edges: IndexMap<(String, String), Edge>,
    topology: Topology,
    indices: HashMap<String, NodeIndex>,
}

impl PartialEq for RelationGraph {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes && self.edges == other.edges
    }
}

impl RelationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit key-existence check against the node index.
    pub fn contains_node(&self, key: &str) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn node(&self, key: &str) -> Option<&Node> {
        self.nodes.get(key)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn count_kind(&self, kind: NodeKind) -> usize {
        self.nodes.values().filter(|n| n.kind == kind).count()
    }

    /// Neighbors of `key` in insertion order; empty for an unknown key.
    pub fn neighbors<'a>(&'a self, key: &str) -> impl Iterator<Item = &'a String> + 'a {
        self.adjacency.get(key).into_iter().flatten()
    }

    /// The edge joining `a` and `b`, in either orientation.
    pub fn edge_between(&self, a: &str, b: &str) -> Option<&Edge> {
        self.edge_key(a, b).and_then(|key| self.edges.get(&key))
    }

    /// True when at least one edge carries an explicit weight.
    pub fn has_weights(&self) -> bool {
        self.edges.values().any(|e| e.weight.is_some())
    }

    pub(crate) fn topology(&self) -> &Topology {
        &self.topology
    }

    pub(crate) fn index_of(&self, key: &str) -> Option<NodeIndex> {
        self.indices.get(key).copied()
    }

    /// Stored key of the edge over `{a, b}`, whichever orientation it has.
    fn edge_key(&self, a: &str, b: &str) -> Option<(String, String)> {
        let forward = (a.to_string(), b.to_string());
        if self.edges.contains_key(&forward) {
            return Some(forward);
        }
        let backward = (b.to_string(), a.to_string());
        self.edges.contains_key(&backward).then_some(backward)
    }

    /// Create the node if absent; otherwise a no-op.
    ///
    /// Returns `true` when a node was created. A key that already exists
    /// with the other kind keeps its first kind.
    pub fn upsert_node(&mut self, key: &str, kind: NodeKind) -> bool {
        if let Some(existing) = self.nodes.get(key) {
            if existing.kind != kind {
                log::warn!(
                    "Node {} already exists as {}, not re-typing it as {}",
                    key,
                    existing.kind.as_str(),
                    kind.as_str()
                );
            }
            return false;
        }
        self.insert_node(Node::new(key, kind));
        true
    }

    /// Add the `contains` edge for one record, merging into an existing edge
    /// over the same pair of nodes in either orientation.
    ///
    /// Both endpoints must already be present.
    pub fn add_contains_edge(&mut self, district: &str, species: &str) {
        if let Some(key) = self.edge_key(district, species) {
            if let Some(edge) = self.edges.get_mut(&key) {
                edge.records += 1;
            }
            return;
        }
        self.insert_edge(Edge {
            district: district.to_string(),
            species: species.to_string(),
            relation: CONTAINS.to_string(),
            weight: None,
            records: 1,
        });
    }

    /// Insert a fully-formed node, replacing any node with the same key.
    pub(crate) fn insert_node(&mut self, node: Node) {
        self.adjacency.entry(node.key.clone()).or_default();
        if !self.indices.contains_key(&node.key) {
            let idx = self.topology.add_node(node.key.clone());
            self.indices.insert(node.key.clone(), idx);
        }
        self.nodes.insert(node.key.clone(), node);
    }

    /// Insert a fully-formed edge and link both endpoints, replacing any
    /// edge over the same pair. Edges to unknown nodes are dropped.
    pub(crate) fn insert_edge(&mut self, edge: Edge) {
        let (Some(a), Some(b)) = (self.index_of(&edge.district), self.index_of(&edge.species)) else {
            log::warn!(
                "Dropping edge {} - {}: endpoint not in graph",
                edge.district,
                edge.species
            );
            return;
        };
        self.topology.update_edge(a, b, edge.weight);
        self.adjacency
            .entry(edge.district.clone())
            .or_default()
            .insert(edge.species.clone());
        self.adjacency
            .entry(edge.species.clone())
            .or_default()
            .insert(edge.district.clone());
        match self.edge_key(&edge.district, &edge.species) {
            Some(key) => {
                if let Some(slot) = self.edges.get_mut(&key) {
                    *slot = edge;
                }
            }
            None => {
                self.edges
                    .insert((edge.district.clone(), edge.species.clone()), edge);
            }
        }
    }
}
