//! Item manager errors and DynamoDB error mapping.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use dynamite_core::key_format::KeyFormatError;
use thiserror::Error;

/// Errors returned by item manager operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ManagerError {
    #[error("Item type '{item_type}' is not managed by '{instance}'")]
    UnmanagedItem { instance: String, item_type: String },
    #[error("No mapping for item type '{0}'")]
    UnmappedItem(String),
    #[error("Key format error: {0}")]
    KeyFormat(#[from] KeyFormatError),
    #[error("Item type '{item_type}' does not match the key schema of table '{table}': {reason}")]
    KeySchemaMismatch {
        item_type: String,
        table: String,
        reason: &'static str,
    },
    #[error("Attribute '{0}' holds a different value than the rendered key")]
    KeyConflict(String),
    #[error("Key attribute '{0}' is also an item field and must hold a string")]
    NonStringKeyField(String),
    #[error("More than one item field is stored as attribute '{0}'")]
    DuplicateAttribute(String),
    #[error("Stored item is a '{found}', expected '{expected}'")]
    ObjectTypeMismatch { expected: String, found: String },
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Table not found: {0}")]
    TableNotFound(String),
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
}

/// Result type for item manager operations.
pub type Result<T> = std::result::Result<T, ManagerError>;

/// Map a GetItem SDK error to ManagerError.
pub fn map_get_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetItemError, R>,
    table: &str,
) -> ManagerError {
    if let SdkError::DispatchFailure(failure) = &err {
        return ManagerError::ConnectionFailed(format!("{:?}", failure));
    }
    match err.into_service_error() {
        GetItemError::ResourceNotFoundException(_) => ManagerError::TableNotFound(table.to_string()),
        GetItemError::ProvisionedThroughputExceededException(_) => {
            ManagerError::QueryFailed("Throughput exceeded, please retry".to_string())
        }
        GetItemError::RequestLimitExceeded(_) => {
            ManagerError::QueryFailed("Request limit exceeded, please retry".to_string())
        }
        GetItemError::InternalServerError(_) => {
            ManagerError::QueryFailed("DynamoDB internal server error".to_string())
        }
        err => ManagerError::QueryFailed(format!("GetItem failed: {:?}", err)),
    }
}

/// Map a PutItem SDK error to ManagerError.
pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
    table: &str,
) -> ManagerError {
    if let SdkError::DispatchFailure(failure) = &err {
        return ManagerError::ConnectionFailed(format!("{:?}", failure));
    }
    match err.into_service_error() {
        PutItemError::ResourceNotFoundException(_) => ManagerError::TableNotFound(table.to_string()),
        PutItemError::ProvisionedThroughputExceededException(_) => {
            ManagerError::QueryFailed("Throughput exceeded, please retry".to_string())
        }
        PutItemError::RequestLimitExceeded(_) => {
            ManagerError::QueryFailed("Request limit exceeded, please retry".to_string())
        }
        PutItemError::ItemCollectionSizeLimitExceededException(_) => {
            ManagerError::QueryFailed("Item collection size limit exceeded".to_string())
        }
        PutItemError::TransactionConflictException(_) => {
            ManagerError::QueryFailed("Transaction conflict, please retry".to_string())
        }
        PutItemError::InternalServerError(_) => {
            ManagerError::QueryFailed("DynamoDB internal server error".to_string())
        }
        err => ManagerError::QueryFailed(format!("PutItem failed: {:?}", err)),
    }
}

/// Map a DeleteItem SDK error to ManagerError.
pub fn map_delete_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DeleteItemError, R>,
    table: &str,
) -> ManagerError {
    if let SdkError::DispatchFailure(failure) = &err {
        return ManagerError::ConnectionFailed(format!("{:?}", failure));
    }
    match err.into_service_error() {
        DeleteItemError::ResourceNotFoundException(_) => {
            ManagerError::TableNotFound(table.to_string())
        }
        DeleteItemError::ProvisionedThroughputExceededException(_) => {
            ManagerError::QueryFailed("Throughput exceeded, please retry".to_string())
        }
        DeleteItemError::RequestLimitExceeded(_) => {
            ManagerError::QueryFailed("Request limit exceeded, please retry".to_string())
        }
        DeleteItemError::TransactionConflictException(_) => {
            ManagerError::QueryFailed("Transaction conflict, please retry".to_string())
        }
        DeleteItemError::InternalServerError(_) => {
            ManagerError::QueryFailed("DynamoDB internal server error".to_string())
        }
        err => ManagerError::QueryFailed(format!("DeleteItem failed: {:?}", err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmanaged_item_display() {
        let error = ManagerError::UnmanagedItem {
            instance: "users".to_string(),
            item_type: "OrderItem".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Item type 'OrderItem' is not managed by 'users'"
        );
    }

    #[test]
    fn test_key_format_error_converts() {
        let error: ManagerError = KeyFormatError::MissingField("id".to_string()).into();
        assert_eq!(
            error.to_string(),
            "Key format error: Missing value for key field 'id'"
        );
    }

    #[test]
    fn test_object_type_mismatch_display() {
        let error = ManagerError::ObjectTypeMismatch {
            expected: "UserItem".to_string(),
            found: "OrderItem".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Stored item is a 'OrderItem', expected 'UserItem'"
        );
    }
}
