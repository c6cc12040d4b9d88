//! Field item type loader.

use std::collections::HashMap;
use std::path::Path;

use combat_core::{FieldType, ItemTypeOracle};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Field catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FieldList {
    fields: Vec<FieldType>,
}

/// Field item types keyed by item id.
#[derive(Debug, Clone, Default)]
pub struct FieldCatalog {
    fields: HashMap<u16, FieldType>,
}

impl FieldCatalog {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, item_id: u16) -> Option<&FieldType> {
        self.fields.get(&item_id)
    }
}

impl ItemTypeOracle for FieldCatalog {
    fn field_type(&self, item_id: u16) -> Option<FieldType> {
        self.fields.get(&item_id).cloned()
    }
}

/// Loader for field item types from RON files.
pub struct FieldLoader;

impl FieldLoader {
    pub fn load(path: &Path) -> LoadResult<FieldCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parses a field list. Duplicate ids and no-PvP variants that point at
    /// unknown items are rejected.
    pub fn parse(content: &str) -> LoadResult<FieldCatalog> {
        let list: FieldList = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse field catalog RON: {}", e))?;

        let mut fields = HashMap::with_capacity(list.fields.len());
        for field in list.fields {
            let item_id = field.item_id;
            if fields.insert(item_id, field).is_some() {
                anyhow::bail!("Duplicate field item id {}", item_id);
            }
        }

        for field in fields.values() {
            if let Some(variant) = field.no_pvp_variant {
                if !fields.contains_key(&variant) {
                    anyhow::bail!(
                        "Field {} names unknown no-PvP variant {}",
                        field.item_id,
                        variant
                    );
                }
            }
        }

        Ok(FieldCatalog { fields })
    }
}
