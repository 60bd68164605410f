//! Explicit graph handle owned by the service layer.
//!
//! A snapshot pairs the graph with the record store built in the same pass.
//! Readers clone an `Arc` to the current snapshot; a rebuild publishes a new
//! snapshot with a single swap, so a reader sees either the old pair or the
//! new pair in full.

use std::sync::{Arc, RwLock};

use chrono::Utc;
use serde::Serialize;

use crate::analysis::{analyze, AnalysisDefaults, AnalysisReport, AnalysisRequest};
use crate::error::Result;
use crate::graph::{build, RelationGraph};
use crate::ingest::Table;
use crate::model::{Edge, Node, NodeKind};
use crate::query::{resolve, species_search, species_suggestions, Resolution, SpeciesSearchResult};
use crate::store::RecordStore;

/// Provenance of one build pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SnapshotMeta {
    /// SHA-256 of the source file, when the build came from a file.
    pub source_hash: Option<String>,
    /// RFC3339 build time.
    pub built_at: Option<String>,
}

/// Graph and record store from one ingestion pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphSnapshot {
    pub graph: RelationGraph,
    pub store: RecordStore,
    pub meta: SnapshotMeta,
}

impl GraphSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a snapshot from a table; nothing is produced on failure.
    pub fn build(table: &Table, source_hash: Option<String>) -> Result<Self> {
        let (graph, store) = build(table)?;
        Ok(Self {
            graph,
            store,
            meta: SnapshotMeta {
                source_hash,
                built_at: Some(Utc::now().to_rfc3339()),
            },
        })
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            num_nodes: self.graph.node_count(),
            num_edges: self.graph.edge_count(),
            num_records: self.store.len(),
            num_districts: self.graph.count_kind(NodeKind::District),
            num_species: self.graph.count_kind(NodeKind::Species),
        }
    }

    pub fn export(&self) -> GraphExport {
        GraphExport {
            nodes: self.graph.nodes().cloned().collect(),
            edges: self.graph.edges().cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub num_nodes: usize,
    pub num_edges: usize,
    pub num_records: usize,
    pub num_districts: usize,
    pub num_species: usize,
}

/// Plain node/edge listing for presentation layers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphExport {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// Shared handle to the snapshot currently in service.
pub struct GraphHandle {
    current: RwLock<Arc<GraphSnapshot>>,
    defaults: AnalysisDefaults,
}

impl GraphHandle {
    pub fn new(snapshot: GraphSnapshot, defaults: AnalysisDefaults) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
            defaults,
        }
    }

    /// The snapshot in service. Do not hold it across a rebuild you depend on.
    pub fn current(&self) -> Arc<GraphSnapshot> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Replace the snapshot in service.
    pub fn publish(&self, snapshot: GraphSnapshot) {
        let next = Arc::new(snapshot);
        match self.current.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }

    /// Build from `table` and publish on success. On failure the previous
    /// snapshot stays in service and the error is returned once.
    pub fn rebuild(&self, table: &Table, source_hash: Option<String>) -> Result<GraphStats> {
        let snapshot = GraphSnapshot::build(table, source_hash).map_err(|e| {
            log::error!("Rebuild failed, keeping previous graph: {}", e);
            e
        })?;
        let stats = snapshot.stats();
        self.publish(snapshot);
        log::info!(
            "Published graph: {} nodes, {} edges, {} records",
            stats.num_nodes,
            stats.num_edges,
            stats.num_records
        );
        Ok(stats)
    }

    pub fn species_search(&self, text: &str) -> SpeciesSearchResult {
        let snapshot = self.current();
        species_search(&snapshot.graph, &snapshot.store, text)
    }

    pub fn species_suggestions(&self, text: &str) -> Vec<String> {
        species_suggestions(&self.current().graph, text)
    }

    pub fn resolve_identifier(&self, text: &str) -> Resolution {
        resolve(&self.current().graph, text)
    }

    pub fn analysis(&self, request: &AnalysisRequest) -> Result<AnalysisReport> {
        analyze(&self.current().graph, request, self.defaults)
    }

    pub fn stats(&self) -> GraphStats {
        self.current().stats()
    }

    pub fn export(&self) -> GraphExport {
        self.current().export()
    }
}

impl Default for GraphHandle {
    fn default() -> Self {
        Self::new(GraphSnapshot::empty(), AnalysisDefaults::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisKind, AnalysisOutput};
    use crate::error::PlantgraphError;
    use std::thread;

    fn table(rows: &[[&str; 4]]) -> Table {
        Table {
            headers: ["DISTRITO", "ESPECIE", "TITULAR", "SUPERFICIE_PLANTACION"]
                .map(String::from)
                .to_vec(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_empty_handle_answers_queries() {
        let handle = GraphHandle::default();
        assert!(handle.species_search("palta").is_empty());
        assert_eq!(handle.resolve_identifier("lima"), Resolution::NotFound);
        assert_eq!(handle.stats().num_nodes, 0);
    }

    #[test]
    fn test_rebuild_publishes_new_snapshot() {
        let handle = GraphHandle::default();
        let stats = handle
            .rebuild(&table(&[["Lima ", "palta", "X", "1.0"], ["LIMA", "PALTA", "Y", "2.0"]]), None)
            .unwrap();
        assert_eq!(stats.num_nodes, 2);
        assert_eq!(stats.num_edges, 1);
        assert_eq!(stats.num_records, 2);
        assert_eq!(stats.num_districts, 1);
        assert_eq!(stats.num_species, 1);

        let result = handle.species_search("palta");
        assert_eq!(result.matched_records.len(), 2);
        assert_eq!(handle.resolve_identifier("lima"), Resolution::Resolved("LIMA".to_string()));
        assert!(handle.current().meta.built_at.is_some());
    }

    #[test]
    fn test_failed_rebuild_keeps_previous_snapshot() {
        let handle = GraphHandle::default();
        handle.rebuild(&table(&[["Lima", "palta", "X", "1"]]), None).unwrap();
        let before = handle.current();

        let broken = Table {
            headers: vec!["DISTRITO".to_string()],
            rows: vec![vec!["Ica".to_string()]],
        };
        assert!(matches!(
            handle.rebuild(&broken, None),
            Err(PlantgraphError::Validation { .. })
        ));
        assert!(Arc::ptr_eq(&before, &handle.current()));
        assert_eq!(handle.species_search("palta").matched_records.len(), 1);
    }

    #[test]
    fn test_reader_keeps_old_pair_across_swap() {
        let handle = GraphHandle::default();
        handle.rebuild(&table(&[["Lima", "palta", "X", "1"]]), None).unwrap();
        let old = handle.current();
        handle.rebuild(&table(&[["Ica", "uva", "Y", "2"]]), None).unwrap();

        assert!(old.graph.contains_node("LIMA"));
        assert_eq!(old.store.get(1).unwrap().district, "LIMA");
        let new = handle.current();
        assert!(new.graph.contains_node("ICA"));
        assert!(!new.graph.contains_node("LIMA"));
        assert_eq!(new.store.get(1).unwrap().district, "ICA");
    }

    #[test]
    fn test_concurrent_readers_see_whole_pairs() {
        let handle = Arc::new(GraphHandle::default());
        handle.rebuild(&table(&[["Lima", "palta", "X", "1"]]), None).unwrap();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let handle = Arc::clone(&handle);
                thread::spawn(move || {
                    for _ in 0..200 {
                        let snap = handle.current();
                        for r in snap.store.iter() {
                            assert!(snap.graph.contains_node(&r.district));
                            assert!(snap.graph.contains_node(&r.species));
                        }
                    }
                })
            })
            .collect();

        for i in 0..50 {
            let district = if i % 2 == 0 { "Ica" } else { "Lima" };
            handle.rebuild(&table(&[[district, "uva", "Y", "2"]]), None).unwrap();
        }
        for r in readers {
            r.join().unwrap();
        }
    }

    #[test]
    fn test_analysis_uses_configured_defaults() {
        let handle = GraphHandle::new(
            GraphSnapshot::empty(),
            AnalysisDefaults {
                limit: 1,
                sizes_sample: 10,
            },
        );
        handle
            .rebuild(&table(&[["Lima", "palta", "X", "1"], ["Ica", "palta", "Y", "1"]]), None)
            .unwrap();
        let report = handle
            .analysis(&AnalysisRequest::new(AnalysisKind::Bfs).start("palta"))
            .unwrap();
        assert_eq!(
            report.output,
            AnalysisOutput::Traversal {
                visited_count: 1,
                visited: vec!["PALTA".to_string()],
            }
        );
    }

    #[test]
    fn test_export_and_suggestions() {
        let handle = GraphHandle::default();
        handle
            .rebuild(&table(&[["Lima", "palta hass", "X", "1"], ["Lima", "mango", "Y", "1"]]), None)
            .unwrap();
        let export = handle.export();
        assert_eq!(export.nodes.len(), 3);
        assert_eq!(export.edges.len(), 2);
        assert_eq!(handle.species_suggestions("hass"), vec!["PALTA HASS"]);
    }
}
