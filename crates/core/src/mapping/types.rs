use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

/// How one item type maps onto a table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemMapping {
    item_type: String,
    partition_key_format: String,
    #[serde(default)]
    sort_key_format: Option<String>,
    /// Item field name to stored attribute name.
    #[serde(default)]
    attributes: BTreeMap<String, String>,
}

impl ItemMapping {
    pub fn new(item_type: impl Into<String>, partition_key_format: impl Into<String>) -> Self {
        Self {
            item_type: item_type.into(),
            partition_key_format: partition_key_format.into(),
            sort_key_format: None,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_sort_key_format(mut self, format: impl Into<String>) -> Self {
        self.sort_key_format = Some(format.into());
        self
    }

    /// Stores `field` under a different attribute name.
    pub fn with_attribute(mut self, field: impl Into<String>, attribute: impl Into<String>) -> Self {
        self.attributes.insert(field.into(), attribute.into());
        self
    }

    pub fn item_type(&self) -> &str {
        &self.item_type
    }

    pub fn partition_key_format(&self) -> &str {
        &self.partition_key_format
    }

    pub fn sort_key_format(&self) -> Option<&str> {
        self.sort_key_format.as_deref()
    }

    /// Attribute name a field is stored under.
    pub fn attribute_name<'a>(&'a self, field: &'a str) -> &'a str {
        self.attributes.get(field).map(String::as_str).unwrap_or(field)
    }

    /// Field name an attribute is read into.
    pub fn field_name<'a>(&'a self, attribute: &'a str) -> &'a str {
        self.attributes
            .iter()
            .find(|(_, attr)| attr.as_str() == attribute)
            .map(|(field, _)| field.as_str())
            .unwrap_or(attribute)
    }

    /// An attribute that two fields are renamed to, if any.
    ///
    /// Such a mapping cannot be read back.
    pub fn duplicate_attribute(&self) -> Option<&str> {
        let mut seen = BTreeSet::new();
        self.attributes
            .values()
            .find(|attr| !seen.insert(attr.as_str()))
            .map(String::as_str)
    }

    /// Every key format of this mapping: partition key first.
    pub fn key_formats(&self) -> Vec<&str> {
        let mut formats = vec![self.partition_key_format.as_str()];
        if let Some(sk) = &self.sort_key_format {
            formats.push(sk);
        }
        formats
    }
}
