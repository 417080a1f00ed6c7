//! Dynamite wires DynamoDB item managers from a table configuration.
//!
//! A [`RegistryBuilder`] validates a [`RawConfiguration`], checks every
//! managed item type against its mapping, and produces a [`ManagerRegistry`]
//! holding one [`ItemManager`] per configured table.

pub mod connection;
mod logger;
pub mod manager;
pub mod marshal;
pub mod registry;
pub mod serializer;

pub use dynamite_core::config::{ConfigurationError, RawConfiguration, RawTableConfiguration};
pub use dynamite_core::key_format::{KeyFormat, KeyFormatResolver};
pub use dynamite_core::mapping::{ItemMapping, MappingReader, StaticMappingReader};
pub use dynamite_core::schema::TableSchema;

pub use connection::{AwsConfig, ConnectionRegistry};
pub use logger::logger_name;
pub use manager::{ItemManager, ManagerError};
pub use marshal::{AttributeMap, Marshaler};
pub use registry::{ManagerRegistry, RegistryBuilder, RegistryError};
pub use serializer::{Item, ItemSerializer};
