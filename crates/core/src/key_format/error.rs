use thiserror::Error;

/// Errors raised while parsing or rendering a key format.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyFormatError {
    #[error("Unterminated placeholder in '{0}'")]
    Unterminated(String),
    #[error("Unmatched '}}' in '{0}'")]
    UnmatchedBrace(String),
    #[error("Nested placeholder in '{0}'")]
    NestedPlaceholder(String),
    #[error("Empty placeholder in '{0}'")]
    EmptyPlaceholder(String),
    #[error("Empty filter name in '{0}'")]
    EmptyFilter(String),
    #[error("Missing value for key field '{0}'")]
    MissingField(String),
    #[error("Key field '{0}' must be a string, number or boolean")]
    InvalidValue(String),
    #[error("Unknown key filter '{0}'")]
    UnknownFilter(String),
}

/// Result type for key format operations.
pub type Result<T> = std::result::Result<T, KeyFormatError>;
