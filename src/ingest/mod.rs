pub mod csv_source;
pub mod json_source;
pub mod metadata;
pub mod table;

pub use csv_source::CsvSource;
pub use json_source::JsonSource;
pub use metadata::{compute_source_hash, source_extension};
pub use table::Table;

use std::path::Path;

use crate::error::{PlantgraphError, Result};

/// Trait for tabular source readers
pub trait TableSource {
    /// Check if this reader can handle the given file extension
    fn can_read(&self, extension: &str) -> bool;

    /// Read raw file content into a table
    fn read(&self, content: &str, path: &str) -> Result<Table>;
}

/// Source registry that selects the appropriate reader by extension
pub struct SourceRegistry {
    sources: Vec<Box<dyn TableSource>>,
}

impl SourceRegistry {
    /// Create a registry with the built-in CSV and JSON readers
    pub fn new(delimiter: u8) -> Self {
        let mut registry = Self {
            sources: Vec::new(),
        };

        registry.register(Box::new(CsvSource { delimiter }));
        registry.register(Box::new(JsonSource));

        registry
    }

    /// Register a reader
    pub fn register(&mut self, source: Box<dyn TableSource>) {
        self.sources.push(source);
    }

    /// Find a reader that can handle the given extension
    pub fn find_source(&self, extension: &str) -> Option<&dyn TableSource> {
        self.sources
            .iter()
            .find(|s| s.can_read(extension))
            .map(|s| s.as_ref())
    }

    /// Read content with the reader registered for `extension`
    pub fn read(&self, content: &str, path: &str, extension: &str) -> Result<Table> {
        let source = self.find_source(extension).ok_or_else(|| {
            PlantgraphError::Parse(format!("No reader found for extension: {}", extension))
        })?;
        source.read(content, path)
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new(b';')
    }
}

/// Read a source file into a table, picking the reader from its extension.
pub fn read_table(path: &Path, delimiter: u8) -> Result<Table> {
    let content = std::fs::read_to_string(path).map_err(PlantgraphError::Io)?;
    let extension = source_extension(path);
    let table = SourceRegistry::new(delimiter).read(
        &content,
        &path.to_string_lossy(),
        &extension,
    )?;
    log::info!(
        "Read {} rows ({} columns) from {}",
        table.len(),
        table.headers.len(),
        path.display()
    );
    Ok(table)
}
