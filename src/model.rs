//! Record and node types shared by the store, the graph and the queries.

use serde::{Deserialize, Serialize};

/// One ingested planting row. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantingRecord {
    /// Sequential id assigned at ingestion, starting at 1.
    pub id: u64,
    pub species: String,
    pub titleholder: String,
    pub district: String,
    pub area: f64,
}

/// The two node kinds of the relation graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    District,
    Species,
}

impl NodeKind {
    /// Display group tag: districts are 1, species are 2.
    pub fn group(&self) -> u32 {
        match self {
            Self::District => 1,
            Self::Species => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::District => "District",
            Self::Species => "Species",
        }
    }

    /// Parse the persisted form written by [`NodeKind::as_str`].
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "District" => Some(Self::District),
            "Species" => Some(Self::Species),
            _ => None,
        }
    }
}

/// A node of the relation graph. Identity is `key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Normalized label; unique across the graph.
    pub key: String,
    pub kind: NodeKind,
    /// Human-readable title, e.g. `District: LIMA`.
    pub display_title: String,
    pub group: u32,
}

impl Node {
    pub fn new(key: impl Into<String>, kind: NodeKind) -> Self {
        let key = key.into();
        Self {
            display_title: format!("{}: {}", kind.as_str(), key),
            group: kind.group(),
            key,
            kind,
        }
    }

    /// Attribute values compared by the fuzzy resolution phase, in order:
    /// label-like fields first, then the remaining attributes stringified.
    pub fn attribute_values(&self) -> [String; 3] {
        [
            self.display_title.clone(),
            self.kind.as_str().to_string(),
            self.group.to_string(),
        ]
    }
}

/// Relation carried by every District-Species edge.
pub const CONTAINS: &str = "contains";

/// An undirected District-Species edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub district: String,
    pub species: String,
    pub relation: String,
    /// Optional traversal cost used by weighted shortest paths.
    pub weight: Option<f64>,
    /// Number of records collapsed into this edge.
    pub records: u64,
}
