//! Conversion between JSON values and DynamoDB attribute values.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use serde_json::{Map, Value};

use crate::manager::{ManagerError, Result};

/// A DynamoDB item in wire format.
pub type AttributeMap = HashMap<String, AttributeValue>;

/// Converts between JSON objects and DynamoDB items.
///
/// Stateless; one instance is shared by every item manager.
#[derive(Debug, Clone, Copy, Default)]
pub struct Marshaler;

impl Marshaler {
    pub fn new() -> Self {
        Self
    }

    /// Convert a JSON object to a DynamoDB item.
    pub fn marshal_item(&self, attributes: &Map<String, Value>) -> Result<AttributeMap> {
        serde_dynamo::to_item(attributes).map_err(|e| ManagerError::Serialization(e.to_string()))
    }

    /// Convert a DynamoDB item to a JSON object.
    pub fn unmarshal_item(&self, item: AttributeMap) -> Result<Map<String, Value>> {
        serde_dynamo::from_item(item).map_err(|e| ManagerError::Serialization(e.to_string()))
    }
}
