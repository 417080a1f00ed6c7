mod error;
mod raw;
mod types;
mod validation;

pub use error::{ConfigurationError, Result};
pub use raw::{RawConfiguration, RawIndexDescriptor, RawTableConfiguration};
pub use types::{
    Configuration, IndexDescriptor, IndexKind, TableConfiguration, DEFAULT_MAPPING_READER,
};
pub use validation::validate;
