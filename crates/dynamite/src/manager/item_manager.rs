//! Item manager implementation.

use std::fmt;
use std::sync::Arc;

use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_json::{Map, Value};
use tracing::Instrument;

use dynamite_core::key_format::{KeyFormat, KeyFormatResolver};
use dynamite_core::mapping::{ItemMapping, MappingReader};
use dynamite_core::schema::TableSchema;

use crate::logger::InstanceLogger;
use crate::marshal::{AttributeMap, Marshaler};
use crate::serializer::{Item, ItemSerializer};

use super::error::{
    map_delete_item_error, map_get_item_error, map_put_item_error, ManagerError, Result,
};

/// Collaborators shared by every item manager of one registry.
#[derive(Clone)]
pub struct SharedServices {
    pub mapping_reader: Arc<dyn MappingReader>,
    pub serializer: Arc<ItemSerializer>,
    pub key_format_resolver: Option<Arc<KeyFormatResolver>>,
    pub marshaler: Arc<Marshaler>,
}

impl fmt::Debug for SharedServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedServices")
            .field("key_format_resolver", &self.key_format_resolver)
            .finish_non_exhaustive()
    }
}

/// Reads and writes the item types managed by one table instance.
///
/// Built by [`RegistryBuilder`](crate::registry::RegistryBuilder); every
/// operation runs inside the instance's `item_manager` span.
pub struct ItemManager {
    instance_name: String,
    client: Client,
    schema: TableSchema,
    managed_items: Vec<String>,
    services: SharedServices,
    logger: InstanceLogger,
}

impl fmt::Debug for ItemManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemManager")
            .field("instance_name", &self.instance_name)
            .field("schema", &self.schema)
            .field("managed_items", &self.managed_items)
            .field("logger", &self.logger.name())
            .finish_non_exhaustive()
    }
}

impl ItemManager {
    pub(crate) fn new(
        instance_name: impl Into<String>,
        client: Client,
        schema: TableSchema,
        managed_items: Vec<String>,
        services: SharedServices,
        logger: InstanceLogger,
    ) -> Self {
        Self {
            instance_name: instance_name.into(),
            client,
            schema,
            managed_items,
            services,
            logger,
        }
    }

    pub fn instance_name(&self) -> &str {
        &self.instance_name
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn managed_items(&self) -> &[String] {
        &self.managed_items
    }

    pub fn manages(&self, item_type: &str) -> bool {
        self.managed_items.iter().any(|i| i == item_type)
    }

    /// The DynamoDB client of this instance's connection.
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn logger_name(&self) -> &str {
        self.logger.name()
    }

    pub fn key_format_resolver(&self) -> Option<&KeyFormatResolver> {
        self.services.key_format_resolver.as_deref()
    }

    /// Render the primary key of a `T` from its key fields.
    pub fn primary_key<T: Item>(&self, key_fields: &Value) -> Result<AttributeMap> {
        let mapping = self.mapping::<T>()?;
        self.key_attributes(&mapping, key_fields)
    }

    /// The attributes `put` stores for `item`, before marshaling.
    pub fn item_attributes<T: Item>(&self, item: &T) -> Result<Map<String, Value>> {
        let mapping = self.mapping::<T>()?;
        let serializer = &self.services.serializer;

        let fields = serializer.serialize_fields(item)?;
        let key = self.render_key(&mapping, &fields)?;
        let mut attributes = serializer.rename_to_attributes(fields, &mapping)?;

        for (name, value) in key {
            insert_reserved(&mut attributes, name, value)?;
        }
        if let Some(attr) = self.schema.object_type_attr() {
            insert_reserved(&mut attributes, attr.to_string(), T::ITEM_TYPE.to_string())?;
        }
        Ok(attributes)
    }

    /// Store `item`, replacing any item with the same primary key.
    pub async fn put<T: Item>(&self, item: &T) -> Result<()> {
        let attributes = self.item_attributes(item)?;
        let item = self.services.marshaler.marshal_item(&attributes)?;
        let table = self.schema.table_name();

        async {
            self.client
                .put_item()
                .table_name(table)
                .set_item(Some(item))
                .send()
                .await
                .map_err(|e| map_put_item_error(e, table))?;

            tracing::debug!(item_type = T::ITEM_TYPE, table, "Put item");
            Ok::<(), ManagerError>(())
        }
        .instrument(self.logger.span().clone())
        .await
    }

    /// Fetch the `T` addressed by `key_fields`.
    pub async fn get<T: Item>(&self, key_fields: &Value) -> Result<Option<T>> {
        let mapping = self.mapping::<T>()?;
        let key = self.key_attributes(&mapping, key_fields)?;
        let table = self.schema.table_name();

        let result = self
            .client
            .get_item()
            .table_name(table)
            .set_key(Some(key))
            .send()
            .instrument(self.logger.span().clone())
            .await
            .map_err(|e| map_get_item_error(e, table))?;

        let Some(item) = result.item else {
            self.logger.span().in_scope(|| {
                tracing::debug!(item_type = T::ITEM_TYPE, table, "Item not found");
            });
            return Ok(None);
        };

        let attributes = self.services.marshaler.unmarshal_item(item)?;
        self.check_object_type::<T>(&attributes)?;

        self.services
            .serializer
            .deserialize_attributes(attributes, &mapping)
            .map(Some)
    }

    /// Delete the `T` addressed by `key_fields`. Deleting a missing item succeeds.
    pub async fn delete<T: Item>(&self, key_fields: &Value) -> Result<()> {
        let mapping = self.mapping::<T>()?;
        let key = self.key_attributes(&mapping, key_fields)?;
        let table = self.schema.table_name();

        async {
            self.client
                .delete_item()
                .table_name(table)
                .set_key(Some(key))
                .send()
                .await
                .map_err(|e| map_delete_item_error(e, table))?;

            tracing::debug!(item_type = T::ITEM_TYPE, table, "Deleted item");
            Ok::<(), ManagerError>(())
        }
        .instrument(self.logger.span().clone())
        .await
    }

    fn mapping<T: Item>(&self) -> Result<ItemMapping> {
        if !self.manages(T::ITEM_TYPE) {
            return Err(ManagerError::UnmanagedItem {
                instance: self.instance_name.clone(),
                item_type: T::ITEM_TYPE.to_string(),
            });
        }
        self.services
            .mapping_reader
            .item_mapping(T::ITEM_TYPE)
            .ok_or_else(|| ManagerError::UnmappedItem(T::ITEM_TYPE.to_string()))
    }

    fn key_attributes(&self, mapping: &ItemMapping, key_fields: &Value) -> Result<AttributeMap> {
        let fields = key_fields.as_object().ok_or_else(|| {
            ManagerError::Serialization("key fields must be a JSON object".to_string())
        })?;

        Ok(self
            .render_key(mapping, fields)?
            .into_iter()
            .map(|(name, value)| (name, AttributeValue::S(value)))
            .collect())
    }

    /// Render the key attributes as `(attribute, value)` pairs, partition key first.
    fn render_key(
        &self,
        mapping: &ItemMapping,
        fields: &Map<String, Value>,
    ) -> Result<Vec<(String, String)>> {
        if let Some(reason) = self.schema.key_mismatch(mapping) {
            return Err(ManagerError::KeySchemaMismatch {
                item_type: mapping.item_type().to_string(),
                table: self.schema.table_name().to_string(),
                reason,
            });
        }

        let resolver = self.key_format_resolver();
        let partition = KeyFormat::parse(mapping.partition_key_format())?.render(fields, resolver)?;
        let mut key = vec![(self.schema.partition_key_name().to_string(), partition)];

        if let (Some(name), Some(format)) = (self.schema.sort_key_name(), mapping.sort_key_format()) {
            let sort = KeyFormat::parse(format)?.render(fields, resolver)?;
            key.push((name.to_string(), sort));
        }
        Ok(key)
    }

    fn check_object_type<T: Item>(&self, attributes: &Map<String, Value>) -> Result<()> {
        let Some(attr) = self.schema.object_type_attr() else {
            return Ok(());
        };
        match attributes.get(attr).and_then(Value::as_str) {
            Some(found) if found != T::ITEM_TYPE => Err(ManagerError::ObjectTypeMismatch {
                expected: T::ITEM_TYPE.to_string(),
                found: found.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

/// Insert a key or type attribute, refusing to overwrite a different value.
///
/// A field stored under the same name must already hold the rendered string.
/// Key attributes are always written as strings, so a number or bool field of
/// that name could not be read back.
fn insert_reserved(attributes: &mut Map<String, Value>, name: String, value: String) -> Result<()> {
    match attributes.get(&name) {
        Some(Value::String(existing)) if *existing == value => Ok(()),
        Some(Value::Number(_) | Value::Bool(_)) => Err(ManagerError::NonStringKeyField(name)),
        Some(_) => Err(ManagerError::KeyConflict(name)),
        None => {
            attributes.insert(name, Value::String(value));
            Ok(())
        }
    }
}
