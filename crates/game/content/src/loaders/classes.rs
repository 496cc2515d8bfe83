//! Class catalog loader.
//!
//! Classes live as `<id>.json` documents next to an `index.json` that fixes
//! listing order. Listing skips entries whose file is missing or corrupt -
//! one broken class must not take down the selection screen.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use skirmish_core::ClassDocument;

use super::{LoadResult, read_json};

/// One row of `index.json`.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct IndexEntry {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ClassIndex {
    #[serde(default)]
    classes: Vec<IndexEntry>,
}

/// Compact class summary for the selection screen.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassPreview {
    pub id: String,
    pub name: String,
    /// Archetype tags joined, e.g. "melee • tank".
    pub tagline: Option<String>,
    /// Uppercase stat labels the HUD expects; absent stats stay `None`.
    pub base_stats: BTreeMap<String, Option<i32>>,
    /// Starting kit strings, "Name×qty".
    pub starting_kit: Vec<String>,
}

/// Loader for the class catalog directory.
pub struct ClassLoader;

impl ClassLoader {
    /// Load one full class document.
    pub fn load(dir: &Path, class_id: &str) -> LoadResult<ClassDocument> {
        read_json(&class_path(dir, class_id))
    }

    /// Load the index, which fixes listing order.
    pub fn index(dir: &Path) -> LoadResult<Vec<IndexEntry>> {
        let index: ClassIndex = read_json(&dir.join("index.json"))?;
        Ok(index.classes)
    }

    /// List previews in index order, skipping broken entries.
    pub fn list(dir: &Path) -> LoadResult<Vec<ClassPreview>> {
        let mut previews = Vec::new();
        for entry in Self::index(dir)? {
            match read_json::<ClassDocument>(&class_path(dir, &entry.id)) {
                Ok(document) => previews.push(preview(&entry.id, &document)),
                Err(error) => {
                    tracing::warn!(class = %entry.id, %error, "skipping unreadable class");
                }
            }
        }
        Ok(previews)
    }
}

fn class_path(dir: &Path, class_id: &str) -> PathBuf {
    dir.join(format!("{class_id}.json"))
}

fn preview(id: &str, document: &ClassDocument) -> ClassPreview {
    let class = &document.class;

    let tagline = if class.archetype.is_empty() {
        None
    } else {
        Some(class.archetype.join(" • "))
    };

    // The HUD's expected label casing.
    let base_stats = ["hp", "mp", "atk", "def", "mag", "spd"]
        .into_iter()
        .map(|key| {
            (
                key.to_uppercase(),
                class.base_stats.get(key).copied(),
            )
        })
        .collect();

    let starting_kit = document
        .starter
        .as_ref()
        .map(|starter| {
            starter
                .inventory
                .iter()
                .map(|item| {
                    let name = item
                        .name
                        .clone()
                        .or_else(|| item.id.clone())
                        .unwrap_or_else(|| "item".to_string());
                    match item.qty {
                        Some(qty) => format!("{name}×{qty}"),
                        None => name,
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    ClassPreview {
        id: id.to_string(),
        name: class.display_name(),
        tagline,
        base_stats,
        starting_kit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_catalog(dir: &Path) {
        fs::write(
            dir.join("index.json"),
            r#"{"classes": [{"id": "warrior"}, {"id": "mage"}, {"id": "ghost"}]}"#,
        )
        .unwrap();
        fs::write(
            dir.join("warrior.json"),
            r#"{
                "class": {
                    "id": "warrior",
                    "name": "Warrior",
                    "archetype": ["melee", "tank"],
                    "baseStats": {"hp": 36, "mp": 0, "atk": 7, "def": 6, "mag": 1, "spd": 4},
                    "skills": [
                        {"id": "power_strike", "type": "physical", "cost": {"amount": 2, "resource": "stamina"},
                         "effects": [{"kind": "damage", "power": 5, "scaling": {"stat": "atk", "multiplierPercent": 120}}]}
                    ],
                    "resources": {"stamina": {"max": 10, "start": "full", "regenPerTurn": 2}}
                },
                "starter": {"inventory": [{"name": "Health Potion", "qty": 2}, {"id": "wood", "qty": 5}]}
            }"#,
        )
        .unwrap();
        // mage.json is corrupt on purpose; ghost.json does not exist.
        fs::write(dir.join("mage.json"), "{not json").unwrap();
    }

    #[test]
    fn list_skips_broken_entries_in_index_order() {
        let dir = tempfile::tempdir().unwrap();
        write_catalog(dir.path());

        let previews = ClassLoader::list(dir.path()).unwrap();
        assert_eq!(previews.len(), 1);
        let warrior = &previews[0];
        assert_eq!(warrior.name, "Warrior");
        assert_eq!(warrior.tagline.as_deref(), Some("melee • tank"));
        assert_eq!(warrior.base_stats["HP"], Some(36));
        assert_eq!(warrior.base_stats["MAG"], Some(1));
        assert_eq!(
            warrior.starting_kit,
            vec!["Health Potion×2".to_string(), "wood×5".to_string()]
        );
    }

    #[test]
    fn loaded_class_builds_a_fighting_combatant() {
        let dir = tempfile::tempdir().unwrap();
        write_catalog(dir.path());

        let document = ClassLoader::load(dir.path(), "warrior").unwrap();
        let fighter = document.class.combatant(Some("Aria"), 1);
        assert_eq!(fighter.hp(), 36);
        assert_eq!(fighter.pools.get("stamina").unwrap().max, 10);
        assert_eq!(fighter.pools.get("stamina").unwrap().regen_per_turn, 2);
        assert_eq!(fighter.skills.len(), 1);
        assert_eq!(fighter.skills[0].name, "Power Strike");
    }

    #[test]
    fn missing_index_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ClassLoader::list(dir.path()).is_err());
    }
}
