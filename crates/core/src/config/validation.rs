//! Validation of raw configuration (Functional Core - pure functions).
//!
//! Tables are checked in source order and the first problem found is
//! returned.

use std::collections::HashSet;

use super::error::{ConfigurationError, Result};
use super::raw::{RawConfiguration, RawIndexDescriptor, RawTableConfiguration};
use super::types::{
    Configuration, IndexDescriptor, IndexKind, TableConfiguration, DEFAULT_MAPPING_READER,
};

/// Validate a raw configuration into typed table configurations.
pub fn validate(raw: &RawConfiguration) -> Result<Configuration> {
    let mapping_reader = match raw.mapping_reader.as_deref() {
        None => DEFAULT_MAPPING_READER.to_string(),
        Some(name) if name.trim().is_empty() => {
            return Err(ConfigurationError::BlankMappingReader)
        }
        Some(name) => name.trim().to_string(),
    };

    let mut seen = HashSet::new();
    let mut tables = Vec::with_capacity(raw.tables.len());

    for (instance, table) in &raw.tables {
        if instance.trim().is_empty() {
            return Err(ConfigurationError::BlankInstanceName);
        }
        if !seen.insert(instance.as_str()) {
            return Err(ConfigurationError::DuplicateTable(instance.clone()));
        }
        tables.push(validate_table(instance, table)?);
    }

    Ok(Configuration {
        mapping_reader,
        tables,
    })
}

fn validate_table(instance: &str, raw: &RawTableConfiguration) -> Result<TableConfiguration> {
    let table_name = required(instance, "table_name", raw.table_name.as_deref())?;
    let partition_key_name =
        required(instance, "partition_key_name", raw.partition_key_name.as_deref())?;
    let connection = required(instance, "connection", raw.connection.as_deref())?;
    let sort_key_name = optional(instance, "sort_key_name", raw.sort_key_name.as_deref())?;
    let object_type_attr =
        optional(instance, "object_type_attr", raw.object_type_attr.as_deref())?;

    let mut index_names = HashSet::new();
    let mut indexes = Vec::with_capacity(raw.indexes.len());
    for (position, index) in raw.indexes.iter().enumerate() {
        let index = validate_index(instance, position, index, &partition_key_name)?;
        if !index_names.insert(index.name.clone()) {
            return Err(ConfigurationError::DuplicateIndex {
                instance: instance.to_string(),
                index: index.name,
            });
        }
        indexes.push(index);
    }

    let mut managed_items = Vec::with_capacity(raw.managed_items.len());
    for item in raw.managed_items.iter().map(|i| i.trim()) {
        if item.is_empty() {
            return Err(ConfigurationError::BlankField {
                instance: instance.to_string(),
                field: "managed_items",
            });
        }
        if managed_items.iter().any(|i| i == item) {
            return Err(ConfigurationError::DuplicateManagedItem {
                instance: instance.to_string(),
                item: item.to_string(),
            });
        }
        managed_items.push(item.to_string());
    }

    Ok(TableConfiguration {
        instance_name: instance.to_string(),
        table_name,
        partition_key_name,
        sort_key_name,
        indexes,
        object_type_attr,
        connection,
        managed_items,
    })
}

fn validate_index(
    instance: &str,
    position: usize,
    raw: &RawIndexDescriptor,
    table_partition_key: &str,
) -> Result<IndexDescriptor> {
    let malformed = |reason: &str| ConfigurationError::MalformedIndex {
        instance: instance.to_string(),
        position,
        reason: reason.to_string(),
    };

    let name = match raw.name.as_deref().map(str::trim) {
        None => return Err(malformed("missing 'name'")),
        Some("") => return Err(malformed("blank 'name'")),
        Some(name) => name.to_string(),
    };
    let partition_key_name = match raw.partition_key_name.as_deref().map(str::trim) {
        None => return Err(malformed("missing 'partition_key_name'")),
        Some("") => return Err(malformed("blank 'partition_key_name'")),
        Some(key) => key.to_string(),
    };
    let sort_key_name = match raw.sort_key_name.as_deref().map(str::trim) {
        Some("") => return Err(malformed("blank 'sort_key_name'")),
        other => other.map(str::to_string),
    };

    let kind = raw.kind.unwrap_or_default();
    if kind == IndexKind::Local {
        if partition_key_name != table_partition_key {
            return Err(malformed(
                "a local index must use the table's partition key",
            ));
        }
        if sort_key_name.is_none() {
            return Err(malformed("a local index requires 'sort_key_name'"));
        }
    }

    Ok(IndexDescriptor {
        name,
        partition_key_name,
        sort_key_name,
        kind,
    })
}

/// A required field, trimmed.
fn required(instance: &str, field: &'static str, value: Option<&str>) -> Result<String> {
    match value.map(str::trim) {
        None => Err(ConfigurationError::MissingField {
            instance: instance.to_string(),
            field,
        }),
        Some("") => Err(ConfigurationError::BlankField {
            instance: instance.to_string(),
            field,
        }),
        Some(v) => Ok(v.to_string()),
    }
}

/// An optional field, trimmed when present.
fn optional(instance: &str, field: &'static str, value: Option<&str>) -> Result<Option<String>> {
    match value.map(str::trim) {
        Some("") => Err(ConfigurationError::BlankField {
            instance: instance.to_string(),
            field,
        }),
        other => Ok(other.map(str::to_string)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> RawTableConfiguration {
        RawTableConfiguration::new("Users", "id", "ddb_client").with_managed_item("UserItem")
    }

    #[test]
    fn test_valid_configuration() {
        let raw = RawConfiguration::default()
            .with_table(
                "users",
                users()
                    .with_sort_key("sk")
                    .with_index(RawIndexDescriptor::global("GSI1", "email", None))
                    .with_object_type_attr("objectType"),
            )
            .with_table("orders", RawTableConfiguration::new("Orders", "pk", "other"));

        let config = validate(&raw).unwrap();

        assert_eq!(config.mapping_reader, DEFAULT_MAPPING_READER);
        assert_eq!(config.tables.len(), 2);

        let users = &config.tables[0];
        assert_eq!(users.instance_name, "users");
        assert_eq!(users.table_name, "Users");
        assert_eq!(users.partition_key_name, "id");
        assert_eq!(users.sort_key_name.as_deref(), Some("sk"));
        assert_eq!(users.object_type_attr.as_deref(), Some("objectType"));
        assert_eq!(users.indexes[0].name, "GSI1");
        assert_eq!(users.indexes[0].kind, IndexKind::Global);
        assert_eq!(users.managed_items, vec!["UserItem"]);

        assert_eq!(config.connection_names(), vec!["ddb_client", "other"]);
    }

    #[test]
    fn test_missing_table_name() {
        let mut table = users();
        table.table_name = None;
        let raw = RawConfiguration::default().with_table("users", table);

        assert_eq!(
            validate(&raw),
            Err(ConfigurationError::MissingField {
                instance: "users".to_string(),
                field: "table_name",
            })
        );
    }

    #[test]
    fn test_missing_connection() {
        let mut table = users();
        table.connection = None;
        let raw = RawConfiguration::default().with_table("users", table);

        assert!(matches!(
            validate(&raw),
            Err(ConfigurationError::MissingField {
                field: "connection",
                ..
            })
        ));
    }

    #[test]
    fn test_blank_partition_key() {
        let raw = RawConfiguration::default()
            .with_table("users", RawTableConfiguration::new("Users", "  ", "ddb_client"));

        assert!(matches!(
            validate(&raw),
            Err(ConfigurationError::BlankField {
                field: "partition_key_name",
                ..
            })
        ));
    }

    #[test]
    fn test_blank_sort_key() {
        let raw = RawConfiguration::default().with_table("users", users().with_sort_key(""));

        assert!(matches!(
            validate(&raw),
            Err(ConfigurationError::BlankField {
                field: "sort_key_name",
                ..
            })
        ));
    }

    #[test]
    fn test_duplicate_table_rejected() {
        let raw = RawConfiguration::default()
            .with_table("users", users())
            .with_table("users", users());

        assert_eq!(
            validate(&raw),
            Err(ConfigurationError::DuplicateTable("users".to_string()))
        );
    }

    #[test]
    fn test_blank_instance_name_rejected() {
        let raw = RawConfiguration::default().with_table(" ", users());
        assert_eq!(validate(&raw), Err(ConfigurationError::BlankInstanceName));
    }

    #[test]
    fn test_blank_mapping_reader_rejected() {
        let raw = RawConfiguration::default().with_mapping_reader("  ");
        assert_eq!(validate(&raw), Err(ConfigurationError::BlankMappingReader));
    }

    #[test]
    fn test_fields_are_trimmed() {
        let raw = RawConfiguration::default()
            .with_mapping_reader(" annotations ")
            .with_table(
                "users",
                RawTableConfiguration::new(" Users", " id ", "ddb_client ")
                    .with_sort_key(" sk")
                    .with_managed_item(" UserItem ")
                    .with_index(RawIndexDescriptor::local("LSI1", "id ", "created_at")),
            );

        let config = validate(&raw).unwrap();
        let users = &config.tables[0];

        assert_eq!(config.mapping_reader, "annotations");
        assert_eq!(users.table_name, "Users");
        assert_eq!(users.partition_key_name, "id");
        assert_eq!(users.sort_key_name.as_deref(), Some("sk"));
        assert_eq!(users.connection, "ddb_client");
        assert_eq!(users.managed_items, vec!["UserItem"]);
        assert_eq!(users.indexes[0].kind, IndexKind::Local);
    }

    #[test]
    fn test_index_without_name() {
        let index = RawIndexDescriptor {
            partition_key_name: Some("gsi1pk".to_string()),
            ..RawIndexDescriptor::default()
        };
        let raw = RawConfiguration::default().with_table("users", users().with_index(index));

        assert_eq!(
            validate(&raw),
            Err(ConfigurationError::MalformedIndex {
                instance: "users".to_string(),
                position: 0,
                reason: "missing 'name'".to_string(),
            })
        );
    }

    #[test]
    fn test_index_without_partition_key() {
        let index = RawIndexDescriptor {
            name: Some("GSI1".to_string()),
            ..RawIndexDescriptor::default()
        };
        let raw = RawConfiguration::default().with_table(
            "users",
            users()
                .with_index(RawIndexDescriptor::global("GSI0", "a", None))
                .with_index(index),
        );

        assert!(matches!(
            validate(&raw),
            Err(ConfigurationError::MalformedIndex { position: 1, .. })
        ));
    }

    #[test]
    fn test_local_index_must_share_partition_key() {
        let raw = RawConfiguration::default().with_table(
            "users",
            users().with_index(RawIndexDescriptor::local("LSI1", "other", "lsi1sk")),
        );

        assert!(matches!(
            validate(&raw),
            Err(ConfigurationError::MalformedIndex { .. })
        ));
    }

    #[test]
    fn test_local_index_with_table_partition_key() {
        let raw = RawConfiguration::default().with_table(
            "users",
            users().with_index(RawIndexDescriptor::local("LSI1", "id", "lsi1sk")),
        );

        let config = validate(&raw).unwrap();
        assert_eq!(config.tables[0].indexes[0].kind, IndexKind::Local);
    }

    #[test]
    fn test_duplicate_index_rejected() {
        let raw = RawConfiguration::default().with_table(
            "users",
            users()
                .with_index(RawIndexDescriptor::global("GSI1", "a", None))
                .with_index(RawIndexDescriptor::global("GSI1", "b", Some("c"))),
        );

        assert_eq!(
            validate(&raw),
            Err(ConfigurationError::DuplicateIndex {
                instance: "users".to_string(),
                index: "GSI1".to_string(),
            })
        );
    }

    #[test]
    fn test_duplicate_managed_item_rejected() {
        let raw = RawConfiguration::default()
            .with_table("users", users().with_managed_item("UserItem"));

        assert!(matches!(
            validate(&raw),
            Err(ConfigurationError::DuplicateManagedItem { .. })
        ));
    }

    #[test]
    fn test_first_error_in_source_order_wins() {
        let mut broken = users();
        broken.partition_key_name = None;
        let raw = RawConfiguration::default()
            .with_table("first", broken)
            .with_table("second", RawTableConfiguration::default());

        assert!(matches!(
            validate(&raw),
            Err(ConfigurationError::MissingField { instance, field: "partition_key_name" })
                if instance == "first"
        ));
    }
}
