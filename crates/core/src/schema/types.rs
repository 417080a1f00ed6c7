//! Table schema types (Functional Core - pure data).

use crate::config::{IndexDescriptor, IndexKind, TableConfiguration};
use crate::mapping::ItemMapping;

/// Secondary index schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSchema {
    pub name: String,
    pub partition_key_name: String,
    pub sort_key_name: Option<String>,
    pub kind: IndexKind,
}

/// Structural description of one table's keys and indexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    table_name: String,
    partition_key_name: String,
    sort_key_name: Option<String>,
    indexes: Vec<IndexSchema>,
    object_type_attr: Option<String>,
}

impl From<&IndexDescriptor> for IndexSchema {
    fn from(index: &IndexDescriptor) -> Self {
        Self {
            name: index.name.clone(),
            partition_key_name: index.partition_key_name.clone(),
            sort_key_name: index.sort_key_name.clone(),
            kind: index.kind,
        }
    }
}

impl From<&TableConfiguration> for TableSchema {
    fn from(config: &TableConfiguration) -> Self {
        Self {
            table_name: config.table_name.clone(),
            partition_key_name: config.partition_key_name.clone(),
            sort_key_name: config.sort_key_name.clone(),
            indexes: config.indexes.iter().map(IndexSchema::from).collect(),
            object_type_attr: config.object_type_attr.clone(),
        }
    }
}

impl TableSchema {
    pub fn new(
        table_name: impl Into<String>,
        partition_key_name: impl Into<String>,
        sort_key_name: Option<String>,
        indexes: Vec<IndexSchema>,
        object_type_attr: Option<String>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            partition_key_name: partition_key_name.into(),
            sort_key_name,
            indexes,
            object_type_attr,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn partition_key_name(&self) -> &str {
        &self.partition_key_name
    }

    pub fn sort_key_name(&self) -> Option<&str> {
        self.sort_key_name.as_deref()
    }

    pub fn indexes(&self) -> &[IndexSchema] {
        &self.indexes
    }

    pub fn object_type_attr(&self) -> Option<&str> {
        self.object_type_attr.as_deref()
    }

    /// Looks up an index by name.
    pub fn index(&self, name: &str) -> Option<&IndexSchema> {
        self.indexes.iter().find(|i| i.name == name)
    }

    /// Why `mapping` cannot address this table's primary key, if it cannot.
    pub fn key_mismatch(&self, mapping: &ItemMapping) -> Option<&'static str> {
        match (self.sort_key_name.is_some(), mapping.sort_key_format().is_some()) {
            (true, false) => Some("the table has a sort key but the mapping has no sort key format"),
            (false, true) => Some("the mapping has a sort key format but the table has no sort key"),
            _ => None,
        }
    }
}

/// Pure function: Format a schema for display.
pub fn format_schema(instance: &str, schema: &TableSchema) -> Vec<String> {
    let mut lines = vec![
        format!("{} -> table: {}", instance, schema.table_name),
        format!("  Partition key: {}", schema.partition_key_name),
    ];
    if let Some(sk) = &schema.sort_key_name {
        lines.push(format!("  Sort key: {}", sk));
    }
    if let Some(attr) = &schema.object_type_attr {
        lines.push(format!("  Object type attribute: {}", attr));
    }
    for index in &schema.indexes {
        lines.push(format!("  {}: {}", index.kind.as_str(), index.name));
        lines.push(format!("    Partition key: {}", index.partition_key_name));
        if let Some(sk) = &index.sort_key_name {
            lines.push(format!("    Sort key: {}", sk));
        }
    }
    lines
}
