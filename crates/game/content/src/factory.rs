//! Combatant factory.
//!
//! Glues the loaders to the core's normalization: point it at the catalog
//! directories and it hands back engine-ready [`Combatant`]s with runtime
//! overrides (display name, level) applied.

use std::path::{Path, PathBuf};

use skirmish_core::Combatant;

use crate::loaders::classes::ClassLoader;
use crate::loaders::enemies::EnemyLoader;
use crate::loaders::LoadResult;

/// Factory over a catalog root with `classes/` and `mobs/` subtrees.
pub struct ContentFactory {
    classes_dir: PathBuf,
    mobs_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(catalog_root: impl Into<PathBuf>) -> Self {
        let root = catalog_root.into();
        Self {
            classes_dir: root.join("classes"),
            mobs_dir: root.join("mobs"),
        }
    }

    pub fn classes_dir(&self) -> &Path {
        &self.classes_dir
    }

    pub fn mobs_dir(&self) -> &Path {
        &self.mobs_dir
    }

    /// Build the player from a class id, with optional display-name and
    /// level overrides.
    pub fn player(&self, class_id: &str, name: Option<&str>, level: u32) -> LoadResult<Combatant> {
        let document = ClassLoader::load(&self.classes_dir, class_id)?;
        Ok(document.class.combatant(name, level))
    }

    /// Build an enemy from its manifest path (relative to the mobs tree),
    /// at the given level clamped into the declared range.
    pub fn enemy(&self, manifest_path: &str, level: Option<u32>) -> LoadResult<Combatant> {
        let definition = EnemyLoader::load(&self.mobs_dir.join(manifest_path))?;
        Ok(definition.combatant(level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn factory_builds_both_sides_of_an_encounter() {
        let root = tempfile::tempdir().unwrap();
        let classes = root.path().join("classes");
        let mobs = root.path().join("mobs/goblins");
        fs::create_dir_all(&classes).unwrap();
        fs::create_dir_all(&mobs).unwrap();

        fs::write(
            classes.join("mage.json"),
            r#"{"class": {"id": "mage", "name": "Mage",
                "baseStats": {"hp": 24, "mp": 14, "mag": 9, "def": 2},
                "skills": [{"id": "spark", "type": "magic", "cost": 3,
                            "effects": [{"kind": "damage", "power": 4}]}]}}"#,
        )
        .unwrap();
        fs::write(
            mobs.join("goblin_thug.json"),
            r#"{"levelRange": [1, 3], "baseStats": {"hp": 22, "atk": 5},
                "skills": {"club": {"effects": [{"kind": "damage", "power": 4}]}}}"#,
        )
        .unwrap();

        let factory = ContentFactory::new(root.path());
        let player = factory.player("mage", Some("Imogen"), 2).unwrap();
        let enemy = factory.enemy("goblins/goblin_thug.json", Some(2)).unwrap();

        assert_eq!(player.name, "Imogen");
        assert_eq!(player.hp(), 24);
        // Bare-number cost defaults to mana; the legacy mp gauge created and
        // filled the pool.
        assert_eq!(player.pools.get("mana").unwrap().current, 14);
        assert_eq!(enemy.name, "Goblin Thug");
        assert_eq!(enemy.level, 2);
    }

    #[test]
    fn missing_class_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("classes")).unwrap();
        let factory = ContentFactory::new(root.path());
        assert!(factory.player("paladin", None, 1).is_err());
    }
}
