//! Shortest paths: weighted search through petgraph's A* with a zero
//! heuristic, and an unweighted BFS hop count otherwise.

use std::collections::{HashMap, VecDeque};

use petgraph::algo::astar;
use serde::Serialize;

use super::RelationGraph;
use crate::error::{PlantgraphError, Result};
use crate::query::resolve_key;

/// Cost of an edge without an explicit weight in the weighted search.
const DEFAULT_EDGE_WEIGHT: f64 = 1.0;

/// Path length: a hop count for unweighted searches, a weight sum otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PathDistance {
    Hops(usize),
    Weight(f64),
}

impl PathDistance {
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Hops(hops) => *hops as f64,
            Self::Weight(weight) => *weight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathResult {
    pub distance: PathDistance,
    pub path: Vec<String>,
    pub weighted: bool,
}

/// Shortest path between two free-text identifiers.
pub fn shortest_path(
    graph: &RelationGraph,
    start_identifier: &str,
    target_identifier: &str,
) -> Result<PathResult> {
    let start = resolve_key(graph, start_identifier)?;
    let target = resolve_key(graph, target_identifier)?;
    shortest_path_between(graph, &start, &target)
}

/// Shortest path between two existing node keys.
///
/// Weighted search runs only when some edge carries a weight; if the weights
/// cannot be used (negative or non-finite) the hop-count search answers
/// instead. Disconnected endpoints fail with `NoPath`.
pub fn shortest_path_between(graph: &RelationGraph, start: &str, target: &str) -> Result<PathResult> {
    if graph.has_weights() {
        match invalid_weight(graph) {
            None => {
                let (distance, path) =
                    weighted_path(graph, start, target).ok_or_else(|| no_path(start, target))?;
                return Ok(PathResult {
                    distance: PathDistance::Weight(distance),
                    path,
                    weighted: true,
                });
            }
            Some(reason) => {
                log::warn!("Weighted shortest path unavailable ({}), using hop count", reason);
            }
        }
    }

    let path = bfs_path(graph, start, target).ok_or_else(|| no_path(start, target))?;
    Ok(PathResult {
        distance: PathDistance::Hops(path.len() - 1),
        path,
        weighted: false,
    })
}

fn no_path(start: &str, target: &str) -> PlantgraphError {
    PlantgraphError::NoPath {
        start: start.to_string(),
        target: target.to_string(),
    }
}

/// First edge whose weight Dijkstra-style search cannot use.
fn invalid_weight(graph: &RelationGraph) -> Option<String> {
    graph.edges().find_map(|e| match e.weight {
        Some(w) if !w.is_finite() || w < 0.0 => Some(format!(
            "edge {} - {} has weight {}",
            e.district, e.species, w
        )),
        _ => None,
    })
}

fn weighted_path(graph: &RelationGraph, start: &str, target: &str) -> Option<(f64, Vec<String>)> {
    let from = graph.index_of(start)?;
    let goal = graph.index_of(target)?;
    let topology = graph.topology();
    let (cost, route) = astar(
        topology,
        from,
        |n| n == goal,
        |e| (*e.weight()).unwrap_or(DEFAULT_EDGE_WEIGHT),
        |_| 0.0,
    )?;
    Some((cost, route.into_iter().map(|idx| topology[idx].clone()).collect()))
}

fn bfs_path(graph: &RelationGraph, start: &str, target: &str) -> Option<Vec<String>> {
    if !graph.contains_node(start) || !graph.contains_node(target) {
        return None;
    }
    let mut parent: HashMap<String, Option<String>> = HashMap::new();
    let mut queue = VecDeque::new();
    parent.insert(start.to_string(), None);
    queue.push_back(start.to_string());

    while let Some(node) = queue.pop_front() {
        if node == target {
            return Some(unwind(&parent, target));
        }
        for next in graph.neighbors(&node) {
            if !parent.contains_key(next) {
                parent.insert(next.clone(), Some(node.clone()));
                queue.push_back(next.clone());
            }
        }
    }
    None
}

fn unwind(parent: &HashMap<String, Option<String>>, target: &str) -> Vec<String> {
    let mut path = vec![target.to_string()];
    let mut current = target;
    while let Some(Some(prev)) = parent.get(current) {
        path.push(prev.clone());
        current = prev;
    }
    path.reverse();
    path
}
