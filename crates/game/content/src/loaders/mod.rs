//! Catalog file loaders.

pub mod classes;
pub mod enemies;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Read and deserialize one JSON catalog file.
pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> LoadResult<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))?;
    serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))
}
