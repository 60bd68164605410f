//! Analysis request surface: one entry point for bfs, dfs, shortest path
//! and components, with structured output and structured errors.

use std::str::FromStr;

use serde::Serialize;

use crate::error::{PlantgraphError, Result};
use crate::graph::{
    shortest_path_between, summarize_components, traverse_from, ComponentSummary, PathResult,
    RelationGraph, TraversalOrder, DEFAULT_SIZES_SAMPLE, DEFAULT_TRAVERSAL_LIMIT,
};
use crate::query::resolve_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    Bfs,
    Dfs,
    ShortestPath,
    Components,
}

impl FromStr for AnalysisKind {
    type Err = PlantgraphError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "bfs" => Ok(Self::Bfs),
            "dfs" => Ok(Self::Dfs),
            "shortest_path" | "dijkstra" => Ok(Self::ShortestPath),
            "components" | "unionfind" => Ok(Self::Components),
            other => Err(PlantgraphError::InvalidInput(format!(
                "unknown analysis kind '{}' (expected bfs, dfs, shortest_path or components)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub kind: AnalysisKind,
    pub start: Option<String>,
    pub target: Option<String>,
    pub limit: Option<usize>,
}

impl AnalysisRequest {
    pub fn new(kind: AnalysisKind) -> Self {
        Self {
            kind,
            start: None,
            target: None,
            limit: None,
        }
    }

    pub fn start(mut self, start: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisOutput {
    Traversal { visited_count: usize, visited: Vec<String> },
    Path(PathResult),
    Components(ComponentSummary),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub kind: AnalysisKind,
    pub output: AnalysisOutput,
    /// One entry per identifier remapped by the fuzzy resolution phase.
    pub notes: Vec<String>,
}

/// Defaults applied when a request leaves a parameter out.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisDefaults {
    pub limit: usize,
    pub sizes_sample: usize,
}

impl Default for AnalysisDefaults {
    fn default() -> Self {
        Self {
            limit: DEFAULT_TRAVERSAL_LIMIT,
            sizes_sample: DEFAULT_SIZES_SAMPLE,
        }
    }
}

fn required<'a>(value: &'a Option<String>, name: &str, kind: AnalysisKind) -> Result<&'a str> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| {
            PlantgraphError::InvalidInput(format!("{} is required for {:?}", name, kind))
        })
}

fn resolve_noted(
    graph: &RelationGraph,
    identifier: &str,
    role: &str,
    notes: &mut Vec<String>,
) -> Result<String> {
    let key = resolve_key(graph, identifier)?;
    if key != identifier.trim() {
        notes.push(format!("{} '{}' mapped to node '{}'", role, identifier.trim(), key));
    }
    Ok(key)
}

/// Run one analysis against `graph`.
pub fn analyze(
    graph: &RelationGraph,
    request: &AnalysisRequest,
    defaults: AnalysisDefaults,
) -> Result<AnalysisReport> {
    let mut notes = Vec::new();
    let output = match request.kind {
        AnalysisKind::Bfs | AnalysisKind::Dfs => {
            let start = required(&request.start, "start", request.kind)?;
            let start = resolve_noted(graph, start, "start", &mut notes)?;
            let order = if request.kind == AnalysisKind::Bfs {
                TraversalOrder::BreadthFirst
            } else {
                TraversalOrder::DepthFirst
            };
            let visited = traverse_from(graph, &start, request.limit.unwrap_or(defaults.limit), order);
            AnalysisOutput::Traversal {
                visited_count: visited.len(),
                visited,
            }
        }
        AnalysisKind::ShortestPath => {
            let start = required(&request.start, "start", request.kind)?;
            let target = required(&request.target, "target", request.kind)?;
            let start = resolve_noted(graph, start, "start", &mut notes)?;
            let target = resolve_noted(graph, target, "target", &mut notes)?;
            AnalysisOutput::Path(shortest_path_between(graph, &start, &target)?)
        }
        AnalysisKind::Components => {
            AnalysisOutput::Components(summarize_components(graph, defaults.sizes_sample))
        }
    };

    log::debug!("Analysis {:?} complete ({} notes)", request.kind, notes.len());
    Ok(AnalysisReport {
        kind: request.kind,
        output,
        notes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeKind;

    fn graph() -> RelationGraph {
        let mut g = RelationGraph::new();
        for d in ["LIMA", "ICA", "PIURA"] {
            g.upsert_node(d, NodeKind::District);
        }
        for s in ["PALTA", "UVA", "MANGO"] {
            g.upsert_node(s, NodeKind::Species);
        }
        g.add_contains_edge("LIMA", "PALTA");
        g.add_contains_edge("ICA", "PALTA");
        g.add_contains_edge("ICA", "UVA");
        g.add_contains_edge("PIURA", "MANGO");
        g
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("BFS".parse::<AnalysisKind>().unwrap(), AnalysisKind::Bfs);
        assert_eq!("dijkstra".parse::<AnalysisKind>().unwrap(), AnalysisKind::ShortestPath);
        assert_eq!("unionfind".parse::<AnalysisKind>().unwrap(), AnalysisKind::Components);
        assert!(matches!(
            "pagerank".parse::<AnalysisKind>(),
            Err(PlantgraphError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_bfs_with_fuzzy_start_records_note() {
        let req = AnalysisRequest::new(AnalysisKind::Bfs).start("lima").limit(2);
        let report = analyze(&graph(), &req, AnalysisDefaults::default()).unwrap();
        assert_eq!(
            report.output,
            AnalysisOutput::Traversal {
                visited_count: 2,
                visited: vec!["LIMA".to_string(), "PALTA".to_string()],
            }
        );
        assert_eq!(report.notes, vec!["start 'lima' mapped to node 'LIMA'"]);
    }

    #[test]
    fn test_exact_start_has_no_note() {
        let req = AnalysisRequest::new(AnalysisKind::Dfs).start("PIURA");
        let report = analyze(&graph(), &req, AnalysisDefaults::default()).unwrap();
        assert!(report.notes.is_empty());
    }

    #[test]
    fn test_default_limit_applies() {
        let req = AnalysisRequest::new(AnalysisKind::Bfs).start("LIMA");
        let defaults = AnalysisDefaults {
            limit: 3,
            sizes_sample: 10,
        };
        match analyze(&graph(), &req, defaults).unwrap().output {
            AnalysisOutput::Traversal { visited_count, .. } => assert_eq!(visited_count, 3),
            other => panic!("unexpected output {:?}", other),
        }
    }

    #[test]
    fn test_shortest_path_requires_target() {
        let req = AnalysisRequest::new(AnalysisKind::ShortestPath).start("LIMA");
        let err = analyze(&graph(), &req, AnalysisDefaults::default()).unwrap_err();
        assert!(err.to_string().contains("target is required"));
    }

    #[test]
    fn test_shortest_path_structured_errors() {
        let req = AnalysisRequest::new(AnalysisKind::ShortestPath)
            .start("LIMA")
            .target("MANGO");
        assert!(matches!(
            analyze(&graph(), &req, AnalysisDefaults::default()),
            Err(PlantgraphError::NoPath { .. })
        ));

        let req = AnalysisRequest::new(AnalysisKind::ShortestPath)
            .start("district")
            .target("MANGO");
        assert!(matches!(
            analyze(&graph(), &req, AnalysisDefaults::default()),
            Err(PlantgraphError::AmbiguousIdentifier { .. })
        ));
    }

    #[test]
    fn test_components_report() {
        let req = AnalysisRequest::new(AnalysisKind::Components);
        let report = analyze(&graph(), &req, AnalysisDefaults::default()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["kind"], "components");
        assert_eq!(json["output"]["count"], 2);
        assert_eq!(json["output"]["largest_size"], 4);
    }
}
