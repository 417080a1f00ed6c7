use thiserror::Error;

/// Errors returned by manager registry lookups and registration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("No item manager registered for '{instance}'")]
    NotFound { instance: String },
    #[error("An item manager is already registered for '{0}'")]
    AlreadyRegistered(String),
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
