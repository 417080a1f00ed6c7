use serde::{Deserialize, Serialize};

/// Mapping reader used when the configuration does not name one.
pub const DEFAULT_MAPPING_READER: &str = "default";

/// Kind of a secondary index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    #[default]
    Global,
    Local,
}

impl IndexKind {
    /// Short label used in schema listings.
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexKind::Global => "GSI",
            IndexKind::Local => "LSI",
        }
    }
}

/// A validated secondary index descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDescriptor {
    pub name: String,
    pub partition_key_name: String,
    pub sort_key_name: Option<String>,
    pub kind: IndexKind,
}

/// A validated table configuration.
///
/// Built only by [`RawConfiguration::validate`](super::RawConfiguration::validate),
/// so every required field is present and non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfiguration {
    /// Name the table is registered under.
    pub instance_name: String,
    pub table_name: String,
    pub partition_key_name: String,
    pub sort_key_name: Option<String>,
    pub indexes: Vec<IndexDescriptor>,
    /// Attribute that stores the item type name, if any.
    pub object_type_attr: Option<String>,
    /// Name of the client connection this table uses.
    pub connection: String,
    /// Item type names handled by this table's manager.
    pub managed_items: Vec<String>,
}

/// A validated configuration: tables in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub mapping_reader: String,
    pub tables: Vec<TableConfiguration>,
}

impl Configuration {
    /// Distinct connection names referenced by the tables, in first-use order.
    pub fn connection_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for table in &self.tables {
            if !names.contains(&table.connection.as_str()) {
                names.push(&table.connection);
            }
        }
        names
    }
}
