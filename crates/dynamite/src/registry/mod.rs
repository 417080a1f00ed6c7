//! Manager registry and the builder that wires it from configuration.

mod builder;
mod error;
mod manager_registry;

pub use builder::RegistryBuilder;
pub use error::{RegistryError, Result};
pub use manager_registry::ManagerRegistry;
