mod types;

pub use types::{format_schema, IndexSchema, TableSchema};
