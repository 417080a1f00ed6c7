use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::error::Result;
use super::format::KeyFormat;

/// A named transformation applied to a key field value.
pub trait KeyFilter: Send + Sync + Debug {
    fn apply(&self, value: &str) -> String;
}

/// Maps filter names to filters.
///
/// Populated once at startup and shared read-only by every item manager.
#[derive(Debug, Clone, Default)]
pub struct KeyFormatResolver {
    filters: HashMap<String, Arc<dyn KeyFilter>>,
}

impl KeyFormatResolver {
    /// Creates a resolver with no filters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver with `md5`, `upper`, `lower` and `uccase`.
    #[cfg(feature = "key-filters")]
    pub fn with_default_filters() -> Self {
        use super::filters::{
            LowercaseFilter, Md5Filter, UppercaseFilter, UppercaseFirstFilter, LOWER, MD5, UCCASE,
            UPPER,
        };

        let mut resolver = Self::new();
        resolver.add_filter(MD5, Md5Filter);
        resolver.add_filter(UPPER, UppercaseFilter);
        resolver.add_filter(LOWER, LowercaseFilter);
        resolver.add_filter(UCCASE, UppercaseFirstFilter);
        resolver
    }

    /// Registers a filter, replacing any filter with the same name.
    pub fn add_filter(&mut self, name: impl Into<String>, filter: impl KeyFilter + 'static) {
        self.filters.insert(name.into(), Arc::new(filter));
    }

    /// Looks up a filter by name.
    pub fn filter(&self, name: &str) -> Option<&dyn KeyFilter> {
        self.filters.get(name).map(|f| &**f)
    }

    pub fn has_filter(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// Registered filter names, sorted.
    pub fn filter_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.filters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Parse `format` and render it from `values`.
    pub fn resolve(&self, format: &str, values: &Map<String, Value>) -> Result<String> {
        KeyFormat::parse(format)?.render(values, Some(self))
    }
}
