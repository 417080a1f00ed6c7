use thiserror::Error;

/// Errors raised while loading, validating or wiring a configuration.
///
/// Every variant is fatal for the build: no registry is produced.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Failed to read configuration: {0}")]
    Io(String),
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
    #[error("Table '{instance}' is missing required field '{field}'")]
    MissingField {
        instance: String,
        field: &'static str,
    },
    #[error("Table '{instance}' has a blank '{field}'")]
    BlankField {
        instance: String,
        field: &'static str,
    },
    #[error("Table instance name must not be blank")]
    BlankInstanceName,
    #[error("Table '{0}' is declared more than once")]
    DuplicateTable(String),
    #[error("Table '{instance}' has a malformed index descriptor #{position}: {reason}")]
    MalformedIndex {
        instance: String,
        position: usize,
        reason: String,
    },
    #[error("Table '{instance}' declares index '{index}' more than once")]
    DuplicateIndex { instance: String, index: String },
    #[error("Table '{instance}' lists managed item '{item}' more than once")]
    DuplicateManagedItem { instance: String, item: String },
    #[error("Table '{instance}' refers to unknown connection '{connection}'")]
    UnknownConnection {
        instance: String,
        connection: String,
    },
    #[error("'mapping_reader' must not be blank")]
    BlankMappingReader,
    #[error("Unknown mapping reader '{0}'")]
    UnknownMappingReader(String),
    #[error("Table '{instance}' manages item '{item}' which has no mapping")]
    UnmappedItem { instance: String, item: String },
    #[error("Item '{item}' uses unknown key filter '{filter}'")]
    UnknownFilter { item: String, filter: String },
    #[error("Item '{item}' renames more than one field to attribute '{attribute}'")]
    DuplicateAttribute { item: String, attribute: String },
    #[error("Item '{item}' has an invalid key format: {reason}")]
    InvalidKeyFormat { item: String, reason: String },
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigurationError>;
