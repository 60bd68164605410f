use thiserror::Error;

/// Main error type for Plantgraph
#[derive(Error, Debug)]
pub enum PlantgraphError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Source file could not be read as a table
    #[error("Parse error: {0}")]
    Parse(String),

    /// Required input columns are absent; the build is aborted
    #[error("Validation error: missing required field(s): {}", missing.join(", "))]
    Validation { missing: Vec<String> },

    /// A row carries a value the builder cannot accept (non-numeric area)
    #[error("Validation error: row {row}: field {field} has invalid value {value:?}")]
    InvalidRow {
        row: usize,
        field: String,
        value: String,
    },

    /// No record or node matches the query
    #[error("Not found: {0}")]
    NotFound(String),

    /// Identifier resolution matched more than one node
    #[error("Ambiguous identifier '{identifier}', possible matches: {}", candidates.join(", "))]
    AmbiguousIdentifier {
        identifier: String,
        candidates: Vec<String>,
    },

    /// Both endpoints resolved but lie in different components
    #[error("No path between '{start}' and '{target}'")]
    NoPath { start: String, target: String },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenient Result type using PlantgraphError
pub type Result<T> = std::result::Result<T, PlantgraphError>;
