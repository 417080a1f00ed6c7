mod traits;
mod types;

pub use traits::{MappingReader, StaticMappingReader};
pub use types::ItemMapping;
