use sha2::{Digest, Sha256};
use std::path::Path;

use crate::error::{PlantgraphError, Result};

/// Compute SHA256 hash of a source file's contents
pub fn compute_source_hash(path: &Path) -> Result<String> {
    let content = std::fs::read(path).map_err(PlantgraphError::Io)?;
    let mut hasher = Sha256::new();
    hasher.update(&content);
    let hash = hasher.finalize();
    Ok(format!("{:x}", hash))
}

/// Lower-cased file extension, empty when there is none.
pub fn source_extension(path: &Path) -> String {
    path.extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase()
}
