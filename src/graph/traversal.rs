//! Bounded BFS/DFS over the relation graph.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use super::RelationGraph;
use crate::error::Result;
use crate::query::resolve_key;

/// Default cap on visited nodes.
pub const DEFAULT_TRAVERSAL_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalOrder {
    BreadthFirst,
    DepthFirst,
}

/// Traverse from a free-text start identifier.
///
/// The identifier goes through the resolver first; ambiguity and absence are
/// returned as errors. At most `limit` nodes are returned, in visitation order.
pub fn bounded_traversal(
    graph: &RelationGraph,
    start_identifier: &str,
    limit: usize,
    order: TraversalOrder,
) -> Result<Vec<String>> {
    let start = resolve_key(graph, start_identifier)?;
    Ok(traverse_from(graph, &start, limit, order))
}

/// Traverse from a node key already known to exist.
pub fn traverse_from(
    graph: &RelationGraph,
    start: &str,
    limit: usize,
    order: TraversalOrder,
) -> Vec<String> {
    if limit == 0 || !graph.contains_node(start) {
        return Vec::new();
    }
    match order {
        TraversalOrder::BreadthFirst => bfs(graph, start, limit),
        TraversalOrder::DepthFirst => dfs_preorder(graph, start, limit),
    }
}

fn bfs(graph: &RelationGraph, start: &str, limit: usize) -> Vec<String> {
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    let mut result = Vec::new();

    visited.insert(start.to_string());
    queue.push_back(start.to_string());

    while let Some(node) = queue.pop_front() {
        for next in graph.neighbors(&node) {
            if visited.insert(next.clone()) {
                queue.push_back(next.clone());
            }
        }
        result.push(node);
        if result.len() >= limit {
            break;
        }
    }

    result
}

fn dfs_preorder(graph: &RelationGraph, start: &str, limit: usize) -> Vec<String> {
    let mut visited = HashSet::new();
    let mut stack = vec![start.to_string()];
    let mut result = Vec::new();

    while let Some(node) = stack.pop() {
        if !visited.insert(node.clone()) {
            continue;
        }
        // Reverse so the first neighbor is explored first.
        let mut pending: Vec<&String> = graph
            .neighbors(&node)
            .filter(|n| !visited.contains(*n))
            .collect();
        pending.reverse();
        stack.extend(pending.into_iter().cloned());

        result.push(node);
        if result.len() >= limit {
            break;
        }
    }

    result
}
