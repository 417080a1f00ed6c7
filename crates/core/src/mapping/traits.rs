use std::collections::HashMap;
use std::path::Path;

use crate::config::{ConfigurationError, Result};

use super::types::ItemMapping;

/// Supplies the mapping of managed item types.
pub trait MappingReader: Send + Sync {
    /// Returns the mapping for `item_type`, if the reader knows it.
    fn item_mapping(&self, item_type: &str) -> Option<ItemMapping>;
}

/// Mapping reader backed by an in-memory table.
#[derive(Debug, Clone, Default)]
pub struct StaticMappingReader {
    mappings: HashMap<String, ItemMapping>,
}

impl StaticMappingReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a mapping, replacing any mapping for the same item type.
    pub fn with_mapping(mut self, mapping: ItemMapping) -> Self {
        self.insert(mapping);
        self
    }

    pub fn insert(&mut self, mapping: ItemMapping) {
        self.mappings.insert(mapping.item_type().to_string(), mapping);
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Parse a JSON list of mappings.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mappings: Vec<ItemMapping> =
            serde_json::from_str(json).map_err(|e| ConfigurationError::Parse(e.to_string()))?;
        Ok(mappings.into_iter().fold(Self::new(), Self::with_mapping))
    }

    /// Read and parse a JSON file holding a list of mappings.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigurationError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&contents)
    }
}

impl MappingReader for StaticMappingReader {
    fn item_mapping(&self, item_type: &str) -> Option<ItemMapping> {
        self.mappings.get(item_type).cloned()
    }
}
