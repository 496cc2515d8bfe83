//! Catalog loading for the combat engine.
//!
//! This crate reads the on-disk JSON catalogs (classes under
//! `classes/<id>.json` with an `index.json`, enemies as a tree of mob files)
//! and lowers them into `skirmish-core` types. Loading is deliberately
//! forgiving: a corrupt or missing file is skipped (and reported) rather
//! than failing the whole catalog, matching how the serving backend behaves.

pub mod factory;
pub mod loaders;

pub use factory::ContentFactory;
pub use loaders::classes::{ClassLoader, ClassPreview, IndexEntry};
pub use loaders::enemies::{EnemyLoader, Manifest, ManifestEntry, build_manifest};
