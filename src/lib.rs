pub mod analysis;
pub mod config;
pub mod db;
pub mod error;
pub mod graph;
pub mod ingest;
pub mod model;
pub mod normalize;
pub mod query;
pub mod service;
pub mod store;

pub use analysis::{analyze, AnalysisDefaults, AnalysisKind, AnalysisOutput, AnalysisReport, AnalysisRequest};
pub use config::Config;
pub use error::{PlantgraphError, Result};
pub use graph::RelationGraph;
pub use model::{Edge, Node, NodeKind, PlantingRecord};
pub use query::{Resolution, SpeciesSearchResult};
pub use service::{GraphExport, GraphHandle, GraphSnapshot, GraphStats, SnapshotMeta};
pub use store::RecordStore;
