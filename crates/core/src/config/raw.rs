//! Raw configuration as read from a file, before validation.

use std::fmt;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use super::error::{ConfigurationError, Result};
use super::types::{Configuration, IndexKind};
use super::validation;

/// Configuration tree exactly as supplied.
///
/// Fields that validation requires are still optional here so that a missing
/// field is reported with the table it belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfiguration {
    /// Name of the mapping reader shared by all managers.
    #[serde(default)]
    pub mapping_reader: Option<String>,
    /// Table instance name to table configuration, in source order.
    ///
    /// Duplicate names are kept here and rejected by validation.
    #[serde(default, deserialize_with = "ordered_tables")]
    pub tables: Vec<(String, RawTableConfiguration)>,
}

/// One entry of the `tables` mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawTableConfiguration {
    pub table_name: Option<String>,
    pub partition_key_name: Option<String>,
    #[serde(default)]
    pub sort_key_name: Option<String>,
    #[serde(default)]
    pub indexes: Vec<RawIndexDescriptor>,
    #[serde(default)]
    pub object_type_attr: Option<String>,
    pub connection: Option<String>,
    #[serde(default)]
    pub managed_items: Vec<String>,
}

/// One entry of a table's `indexes` list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawIndexDescriptor {
    pub name: Option<String>,
    pub partition_key_name: Option<String>,
    #[serde(default)]
    pub sort_key_name: Option<String>,
    #[serde(default)]
    pub kind: Option<IndexKind>,
}

impl RawConfiguration {
    /// Parse a configuration from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ConfigurationError::Parse(e.to_string()))
    }

    /// Read and parse a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigurationError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&contents)
    }

    /// Sets the mapping reader name.
    pub fn with_mapping_reader(mut self, name: impl Into<String>) -> Self {
        self.mapping_reader = Some(name.into());
        self
    }

    /// Appends a table under the given instance name.
    pub fn with_table(mut self, instance: impl Into<String>, table: RawTableConfiguration) -> Self {
        self.tables.push((instance.into(), table));
        self
    }

    /// Validate into typed table configurations.
    pub fn validate(&self) -> Result<Configuration> {
        validation::validate(self)
    }
}

impl RawTableConfiguration {
    /// A table with the three required fields set.
    pub fn new(
        table_name: impl Into<String>,
        partition_key_name: impl Into<String>,
        connection: impl Into<String>,
    ) -> Self {
        Self {
            table_name: Some(table_name.into()),
            partition_key_name: Some(partition_key_name.into()),
            connection: Some(connection.into()),
            ..Self::default()
        }
    }

    pub fn with_sort_key(mut self, name: impl Into<String>) -> Self {
        self.sort_key_name = Some(name.into());
        self
    }

    pub fn with_index(mut self, index: RawIndexDescriptor) -> Self {
        self.indexes.push(index);
        self
    }

    pub fn with_object_type_attr(mut self, name: impl Into<String>) -> Self {
        self.object_type_attr = Some(name.into());
        self
    }

    pub fn with_managed_item(mut self, item_type: impl Into<String>) -> Self {
        self.managed_items.push(item_type.into());
        self
    }
}

impl RawIndexDescriptor {
    /// A global index over the given keys.
    pub fn global(
        name: impl Into<String>,
        partition_key_name: impl Into<String>,
        sort_key_name: Option<&str>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            partition_key_name: Some(partition_key_name.into()),
            sort_key_name: sort_key_name.map(str::to_string),
            kind: Some(IndexKind::Global),
        }
    }

    /// A local index; it shares the table's partition key.
    pub fn local(
        name: impl Into<String>,
        partition_key_name: impl Into<String>,
        sort_key_name: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            partition_key_name: Some(partition_key_name.into()),
            sort_key_name: Some(sort_key_name.into()),
            kind: Some(IndexKind::Local),
        }
    }
}

/// Deserialize a map into a list of entries, keeping order and duplicates.
fn ordered_tables<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<(String, RawTableConfiguration)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct TablesVisitor;

    impl<'de> Visitor<'de> for TablesVisitor {
        type Value = Vec<(String, RawTableConfiguration)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of table instance names to table configurations")
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut tables = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, RawTableConfiguration>()? {
                tables.push(entry);
            }
            Ok(tables)
        }
    }

    deserializer.deserialize_map(TablesVisitor)
}
