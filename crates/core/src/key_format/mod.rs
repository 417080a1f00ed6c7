mod error;
#[cfg(feature = "key-filters")]
pub mod filters;
mod format;
mod resolver;

pub use error::{KeyFormatError, Result};
pub use format::KeyFormat;
pub use resolver::{KeyFilter, KeyFormatResolver};
