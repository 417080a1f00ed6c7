//! Item serialization: Rust values to attribute-named JSON objects and back.

use dynamite_core::mapping::ItemMapping;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::manager::{ManagerError, Result};

/// A type stored through an item manager.
///
/// `ITEM_TYPE` is the name listed under `managed_items` in the table
/// configuration and the key the mapping reader is asked for.
pub trait Item: Serialize + DeserializeOwned {
    const ITEM_TYPE: &'static str;
}

/// Converts items to attribute maps using their mapping.
///
/// Stateless; one instance is shared by every item manager.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemSerializer;

impl ItemSerializer {
    pub fn new() -> Self {
        Self
    }

    /// Serialize an item into a JSON object keyed by field name.
    pub fn serialize_fields<T: Serialize>(&self, item: &T) -> Result<Map<String, Value>> {
        match serde_json::to_value(item) {
            Ok(Value::Object(fields)) => Ok(fields),
            Ok(_) => Err(ManagerError::Serialization(
                "item must serialize to an object".to_string(),
            )),
            Err(e) => Err(ManagerError::Serialization(e.to_string())),
        }
    }

    /// Rename fields to their stored attribute names.
    ///
    /// Fails when two fields end up under the same attribute.
    pub fn rename_to_attributes(
        &self,
        fields: Map<String, Value>,
        mapping: &ItemMapping,
    ) -> Result<Map<String, Value>> {
        let mut attributes = Map::with_capacity(fields.len());
        for (field, value) in fields {
            let attribute = mapping.attribute_name(&field).to_string();
            if attributes.contains_key(&attribute) {
                return Err(ManagerError::DuplicateAttribute(attribute));
            }
            attributes.insert(attribute, value);
        }
        Ok(attributes)
    }

    /// Rename stored attributes back to fields and deserialize.
    ///
    /// Attributes without a matching field, such as key attributes, are left
    /// for the item's `Deserialize` impl to ignore.
    pub fn deserialize_attributes<T: DeserializeOwned>(
        &self,
        attributes: Map<String, Value>,
        mapping: &ItemMapping,
    ) -> Result<T> {
        let fields: Map<String, Value> = attributes
            .into_iter()
            .map(|(attribute, value)| (mapping.field_name(&attribute).to_string(), value))
            .collect();

        serde_json::from_value(Value::Object(fields))
            .map_err(|e| ManagerError::Serialization(e.to_string()))
    }
}
