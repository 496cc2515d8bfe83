//! Enemy catalog loader and manifest builder.
//!
//! Enemies live as JSON files in a directory tree (first path component is
//! the family, e.g. `goblins/goblin_thug.json`). The manifest is a flat
//! summary of the whole tree used by encounter pickers; unreadable files are
//! collected as non-fatal errors so one bad mob never hides the rest.

use std::path::{Path, PathBuf};

use serde::Serialize;
use skirmish_core::{EnemyDefinition, titleize};

use super::{LoadResult, read_json};

/// Loader for individual enemy definitions.
pub struct EnemyLoader;

impl EnemyLoader {
    /// Load one enemy definition, inferring a missing id from the filename.
    pub fn load(path: &Path) -> LoadResult<EnemyDefinition> {
        let mut definition: EnemyDefinition = read_json(path)?;
        if definition.id.is_empty()
            && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
        {
            definition.id = stem.to_string();
        }
        Ok(definition)
    }
}

/// One manifest row.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub id: String,
    pub name: String,
    pub family: String,
    /// Path relative to the scanned directory.
    pub path: String,
    pub class_archetype: String,
    pub tags: Vec<String>,
    pub level_range: [u32; 2],
}

/// Summary of an enemy catalog tree.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub version: String,
    pub count: usize,
    pub mobs: Vec<ManifestEntry>,
    /// Non-fatal read/parse failures encountered during the scan.
    pub errors: Vec<String>,
}

/// Scan an enemy catalog tree and build its manifest.
///
/// Entries sort by family then name; errors are reported, not raised.
pub fn build_manifest(mobs_dir: &Path) -> Manifest {
    let mut mobs = Vec::new();
    let mut errors = Vec::new();

    for file in json_files(mobs_dir) {
        let relative = file
            .strip_prefix(mobs_dir)
            .unwrap_or(&file)
            .to_string_lossy()
            .replace('\\', "/");
        match EnemyLoader::load(&file) {
            Ok(definition) => {
                let family = if definition.family.is_empty() {
                    relative
                        .split('/')
                        .next()
                        .filter(|component| !component.ends_with(".json"))
                        .unwrap_or("")
                        .to_string()
                } else {
                    definition.family.clone()
                };
                let (low, high) = definition.level_range();
                mobs.push(ManifestEntry {
                    id: definition.id.clone(),
                    name: if definition.name.is_empty() {
                        titleize(&definition.id)
                    } else {
                        definition.name.clone()
                    },
                    family,
                    path: relative,
                    class_archetype: definition.class_archetype.clone(),
                    tags: definition.tags.clone(),
                    level_range: [low, high],
                });
            }
            Err(error) => {
                tracing::warn!(file = %relative, %error, "skipping unreadable mob");
                errors.push(format!("Failed to read {relative}: {error}"));
            }
        }
    }

    mobs.sort_by(|a, b| (&a.family, &a.name).cmp(&(&b.family, &b.name)));

    Manifest {
        version: "0.1".to_string(),
        count: mobs.len(),
        mobs,
        errors,
    }
}

impl Manifest {
    /// Write the manifest as pretty JSON.
    pub fn save(&self, path: &Path) -> LoadResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// All `.json` files under `dir`, recursively, in sorted path order.
fn json_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(current) = stack.pop() {
        let Ok(entries) = std::fs::read_dir(&current) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
    }
    files.sort();
    files
}
