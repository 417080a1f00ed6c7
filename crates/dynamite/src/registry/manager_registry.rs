use std::collections::HashMap;
use std::sync::Arc;

use crate::manager::ItemManager;

use super::error::{RegistryError, Result};

/// Item managers keyed by table instance name.
///
/// Filled once by [`RegistryBuilder`](super::RegistryBuilder) and read-only
/// afterwards. Iteration follows registration order.
#[derive(Debug, Default)]
pub struct ManagerRegistry {
    managers: HashMap<String, Arc<ItemManager>>,
    order: Vec<String>,
}

impl ManagerRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_managed_table(
        &mut self,
        name: impl Into<String>,
        manager: ItemManager,
    ) -> Result<()> {
        let name = name.into();
        if self.managers.contains_key(&name) {
            return Err(RegistryError::AlreadyRegistered(name));
        }
        self.managers.insert(name.clone(), Arc::new(manager));
        self.order.push(name);
        Ok(())
    }

    /// Look up the manager of a table instance.
    pub fn get(&self, instance_name: &str) -> Result<Arc<ItemManager>> {
        self.managers
            .get(instance_name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound {
                instance: instance_name.to_string(),
            })
    }

    pub fn contains(&self, instance_name: &str) -> bool {
        self.managers.contains_key(instance_name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Instance names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// `(instance name, manager)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<ItemManager>)> {
        self.order
            .iter()
            .filter_map(|name| self.managers.get(name).map(|m| (name.as_str(), m)))
    }
}
