//! Content factory for loading every combat data file of a directory.

use std::path::{Path, PathBuf};

use combat_core::CombatConfig;

use crate::loaders::{
    ConfigLoader, FieldCatalog, FieldLoader, LoadResult, SpellBook, SpellLoader,
};

/// Content factory that loads combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── combat.toml
/// ├── fields.ron
/// └── spells.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load combat rules from `combat.toml`.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        ConfigLoader::load(&self.data_dir.join("combat.toml"))
    }

    /// Load field item types from `fields.ron`.
    pub fn load_fields(&self) -> LoadResult<FieldCatalog> {
        FieldLoader::load(&self.data_dir.join("fields.ron"))
    }

    /// Load and build the spell catalog from `spells.ron`.
    pub fn load_spells(&self) -> LoadResult<SpellBook> {
        SpellLoader::load(&self.data_dir.join("spells.ron"))
    }

    /// Spells whose created field is missing from `fields`.
    pub fn unknown_field_items(spells: &SpellBook, fields: &FieldCatalog) -> Vec<(String, u16)> {
        spells
            .iter()
            .filter_map(|(name, combat)| {
                let item_id = combat.params().item_id;
                (item_id != 0 && fields.get(item_id).is_none())
                    .then(|| (name.to_string(), item_id))
            })
            .collect()
    }
}
