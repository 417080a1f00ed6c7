//! Named DynamoDB connections.
//!
//! Table configurations refer to a client by name. The application supplies
//! the clients; the registry builder resolves the names.

mod client;

use std::collections::HashMap;

use aws_sdk_dynamodb::Client;

pub use client::{create_client, create_static_client, AwsConfig};

/// Clients keyed by connection name.
#[derive(Debug, Clone, Default)]
pub struct ConnectionRegistry {
    clients: HashMap<String, Client>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates one client per name from environment configuration.
    pub async fn from_env(names: &[&str]) -> Self {
        let aws_config = AwsConfig::default();
        tracing::debug!(endpoint = %aws_config.target_display(), "Creating DynamoDB clients");

        let mut connections = Self::new();
        for name in names {
            connections.insert(*name, create_client(&aws_config).await);
        }
        connections
    }

    pub fn with_client(mut self, name: impl Into<String>, client: Client) -> Self {
        self.insert(name, client);
        self
    }

    /// Registers a client, replacing any client with the same name.
    pub fn insert(&mut self, name: impl Into<String>, client: Client) {
        self.clients.insert(name.into(), client);
    }

    pub fn get(&self, name: &str) -> Option<&Client> {
        self.clients.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.clients.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
