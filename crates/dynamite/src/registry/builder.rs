//! Registry builder (Imperative Shell).
//!
//! Turns a raw table configuration into a [`ManagerRegistry`]. Every check
//! runs before the first manager is constructed, so a failed build never
//! leaves a partial registry behind.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use aws_sdk_dynamodb::Client;

use dynamite_core::config::{ConfigurationError, RawConfiguration, Result, TableConfiguration};
use dynamite_core::key_format::{KeyFormat, KeyFormatResolver};
use dynamite_core::mapping::MappingReader;
use dynamite_core::schema::TableSchema;

use crate::connection::ConnectionRegistry;
use crate::logger::InstanceLogger;
use crate::manager::{ItemManager, SharedServices};
use crate::marshal::Marshaler;
use crate::serializer::ItemSerializer;

use super::manager_registry::ManagerRegistry;

/// Builds a [`ManagerRegistry`] from a table configuration.
pub struct RegistryBuilder {
    connections: ConnectionRegistry,
    mapping_readers: HashMap<String, Arc<dyn MappingReader>>,
    key_format_resolver: Option<KeyFormatResolver>,
}

impl fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut readers: Vec<&str> = self.mapping_readers.keys().map(String::as_str).collect();
        readers.sort_unstable();
        f.debug_struct("RegistryBuilder")
            .field("connections", &self.connections)
            .field("mapping_readers", &readers)
            .field("key_format_resolver", &self.key_format_resolver)
            .finish()
    }
}

impl RegistryBuilder {
    /// Creates a builder over the given named clients.
    ///
    /// With the `key-format` feature the builder starts with a resolver
    /// holding the `md5`, `upper`, `lower` and `uccase` filters.
    pub fn new(connections: ConnectionRegistry) -> Self {
        Self {
            connections,
            mapping_readers: HashMap::new(),
            key_format_resolver: default_resolver(),
        }
    }

    /// Registers a mapping reader under `name`, replacing any previous one.
    pub fn mapping_reader(
        mut self,
        name: impl Into<String>,
        reader: impl MappingReader + 'static,
    ) -> Self {
        self.mapping_readers.insert(name.into(), Arc::new(reader));
        self
    }

    /// Replaces the key-format resolver shared by all managers.
    pub fn key_format_resolver(mut self, resolver: KeyFormatResolver) -> Self {
        self.key_format_resolver = Some(resolver);
        self
    }

    /// Builds managers without a key-format resolver.
    pub fn without_key_format_resolver(mut self) -> Self {
        self.key_format_resolver = None;
        self
    }

    /// Validate `raw` and construct one item manager per table.
    pub fn build(&self, raw: &RawConfiguration) -> Result<ManagerRegistry> {
        let config = raw.validate()?;

        let mapping_reader = self
            .mapping_readers
            .get(&config.mapping_reader)
            .cloned()
            .ok_or_else(|| ConfigurationError::UnknownMappingReader(config.mapping_reader.clone()))?;

        let services = SharedServices {
            mapping_reader,
            serializer: Arc::new(ItemSerializer::new()),
            key_format_resolver: self.key_format_resolver.clone().map(Arc::new),
            marshaler: Arc::new(Marshaler::new()),
        };

        let mut clients = Vec::with_capacity(config.tables.len());
        for table in &config.tables {
            clients.push(self.preflight(table, &services)?);
        }

        let mut registry = ManagerRegistry::new();
        for (table, client) in config.tables.into_iter().zip(clients) {
            let instance = table.instance_name.clone();
            let logger = InstanceLogger::new(&instance);
            let schema = TableSchema::from(&table);
            let manager = ItemManager::new(
                instance.clone(),
                client,
                schema,
                table.managed_items,
                services.clone(),
                logger,
            );

            // Validation already rejected duplicate instance names.
            registry
                .add_managed_table(instance.clone(), manager)
                .map_err(|_| ConfigurationError::DuplicateTable(instance.clone()))?;

            tracing::info!(
                instance = %instance,
                table = %table.table_name,
                connection = %table.connection,
                "Registered item manager"
            );
        }

        tracing::info!(managers = registry.len(), "Manager registry built");
        Ok(registry)
    }

    /// Check one table against the connections, mappings and resolver.
    ///
    /// Returns the client the table's manager will use.
    fn preflight(&self, table: &TableConfiguration, services: &SharedServices) -> Result<Client> {
        let client = self.connections.get(&table.connection).cloned().ok_or_else(|| {
            ConfigurationError::UnknownConnection {
                instance: table.instance_name.clone(),
                connection: table.connection.clone(),
            }
        })?;

        let schema = TableSchema::from(table);
        let resolver = services.key_format_resolver.as_deref();

        for item in &table.managed_items {
            let mapping = services.mapping_reader.item_mapping(item).ok_or_else(|| {
                ConfigurationError::UnmappedItem {
                    instance: table.instance_name.clone(),
                    item: item.clone(),
                }
            })?;

            if let Some(reason) = schema.key_mismatch(&mapping) {
                return Err(ConfigurationError::InvalidKeyFormat {
                    item: item.clone(),
                    reason: reason.to_string(),
                });
            }

            if let Some(attribute) = mapping.duplicate_attribute() {
                return Err(ConfigurationError::DuplicateAttribute {
                    item: item.clone(),
                    attribute: attribute.to_string(),
                });
            }

            for source in mapping.key_formats() {
                let format =
                    KeyFormat::parse(source).map_err(|e| ConfigurationError::InvalidKeyFormat {
                        item: item.clone(),
                        reason: e.to_string(),
                    })?;

                let unknown = format
                    .filters()
                    .find(|f| !resolver.is_some_and(|r| r.has_filter(f)))
                    .map(str::to_string);
                if let Some(filter) = unknown {
                    return Err(ConfigurationError::UnknownFilter {
                        item: item.clone(),
                        filter,
                    });
                }
            }

            tracing::debug!(
                instance = %table.instance_name,
                item_type = %item,
                "Item mapping checked"
            );
        }
        Ok(client)
    }
}

#[cfg(feature = "key-format")]
fn default_resolver() -> Option<KeyFormatResolver> {
    Some(KeyFormatResolver::with_default_filters())
}

#[cfg(not(feature = "key-format"))]
fn default_resolver() -> Option<KeyFormatResolver> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_client;
    use dynamite_core::config::{RawIndexDescriptor, RawTableConfiguration};
    use dynamite_core::mapping::{ItemMapping, StaticMappingReader};

    fn reader() -> StaticMappingReader {
        StaticMappingReader::new()
            .with_mapping(ItemMapping::new("UserItem", "USER#{id}"))
            .with_mapping(
                ItemMapping::new("OrderItem", "ORDER#{id}").with_sort_key_format("ORDER#{created_at}"),
            )
    }

    fn builder() -> RegistryBuilder {
        RegistryBuilder::new(ConnectionRegistry::new().with_client("ddb_client", test_client()))
            .mapping_reader("default", reader())
    }

    fn users_table() -> RawTableConfiguration {
        RawTableConfiguration::new("Users", "PK", "ddb_client").with_managed_item("UserItem")
    }

    #[test]
    fn test_build_registers_every_table() {
        let raw = RawConfiguration::default()
            .with_table("users", users_table())
            .with_table(
                "orders",
                RawTableConfiguration::new("Orders", "PK", "ddb_client")
                    .with_sort_key("SK")
                    .with_index(RawIndexDescriptor::global("GSI1", "GSI1PK", Some("GSI1SK")))
                    .with_managed_item("OrderItem"),
            );

        let registry = builder().build(&raw).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["users", "orders"]);

        let orders = registry.get("orders").unwrap();
        assert_eq!(orders.schema().table_name(), "Orders");
        assert_eq!(orders.schema().sort_key_name(), Some("SK"));
        assert_eq!(orders.schema().indexes().len(), 1);
        assert_eq!(orders.logger_name(), "dynamite.orders");
        assert!(orders.manages("OrderItem"));
    }

    #[test]
    fn test_unknown_mapping_reader() {
        let raw = RawConfiguration::default()
            .with_mapping_reader("yaml")
            .with_table("users", users_table());

        assert_eq!(
            builder().build(&raw).unwrap_err(),
            ConfigurationError::UnknownMappingReader("yaml".to_string())
        );
    }

    #[test]
    fn test_unknown_connection() {
        let raw = RawConfiguration::default().with_table(
            "users",
            RawTableConfiguration::new("Users", "PK", "archive").with_managed_item("UserItem"),
        );

        assert_eq!(
            builder().build(&raw).unwrap_err(),
            ConfigurationError::UnknownConnection {
                instance: "users".to_string(),
                connection: "archive".to_string(),
            }
        );
    }

    #[test]
    fn test_unmapped_item() {
        let raw = RawConfiguration::default().with_table(
            "users",
            RawTableConfiguration::new("Users", "PK", "ddb_client").with_managed_item("GhostItem"),
        );

        assert_eq!(
            builder().build(&raw).unwrap_err(),
            ConfigurationError::UnmappedItem {
                instance: "users".to_string(),
                item: "GhostItem".to_string(),
            }
        );
    }

    #[test]
    fn test_sort_key_disagreement() {
        let raw = RawConfiguration::default().with_table(
            "users",
            RawTableConfiguration::new("Users", "PK", "ddb_client")
                .with_sort_key("SK")
                .with_managed_item("UserItem"),
        );

        assert!(matches!(
            builder().build(&raw),
            Err(ConfigurationError::InvalidKeyFormat { ref item, .. }) if item == "UserItem"
        ));
    }

    #[test]
    fn test_invalid_key_format() {
        let raw = RawConfiguration::default().with_table("users", users_table());
        let builder = builder().mapping_reader(
            "default",
            StaticMappingReader::new().with_mapping(ItemMapping::new("UserItem", "USER#{id")),
        );

        assert!(matches!(
            builder.build(&raw),
            Err(ConfigurationError::InvalidKeyFormat { .. })
        ));
    }

    #[test]
    fn test_ambiguous_renames_rejected() {
        let raw = RawConfiguration::default().with_table("users", users_table());
        let builder = builder().mapping_reader(
            "default",
            StaticMappingReader::new().with_mapping(
                ItemMapping::new("UserItem", "USER#{id}")
                    .with_attribute("email", "mail")
                    .with_attribute("backup_email", "mail"),
            ),
        );

        assert_eq!(
            builder.build(&raw).unwrap_err(),
            ConfigurationError::DuplicateAttribute {
                item: "UserItem".to_string(),
                attribute: "mail".to_string(),
            }
        );
    }

    #[test]
    fn test_filters_need_a_resolver() {
        let raw = RawConfiguration::default().with_table("users", users_table());
        let builder = builder()
            .mapping_reader(
                "default",
                StaticMappingReader::new().with_mapping(ItemMapping::new("UserItem", "USER#{id|md5}")),
            )
            .without_key_format_resolver();

        assert_eq!(
            builder.build(&raw).unwrap_err(),
            ConfigurationError::UnknownFilter {
                item: "UserItem".to_string(),
                filter: "md5".to_string(),
            }
        );
    }

    #[cfg(feature = "key-format")]
    #[test]
    fn test_default_filters_resolve() {
        let raw = RawConfiguration::default().with_table("users", users_table());
        let builder = builder().mapping_reader(
            "default",
            StaticMappingReader::new()
                .with_mapping(ItemMapping::new("UserItem", "USER#{id|lower|md5}")),
        );

        let registry = builder.build(&raw).unwrap();
        let resolver = registry.get("users").unwrap().key_format_resolver().cloned();
        assert_eq!(
            resolver.unwrap().filter_names(),
            vec!["lower", "md5", "uccase", "upper"]
        );
    }

    #[test]
    fn test_invalid_configuration_builds_nothing() {
        let raw = RawConfiguration::default().with_table(
            "users",
            RawTableConfiguration {
                table_name: None,
                ..users_table()
            },
        );

        assert_eq!(
            builder().build(&raw).unwrap_err(),
            ConfigurationError::MissingField {
                instance: "users".to_string(),
                field: "table_name",
            }
        );
    }
}
