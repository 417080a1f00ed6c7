//! Built-in key filters.

use super::resolver::KeyFilter;

pub const MD5: &str = "md5";
pub const UPPER: &str = "upper";
pub const LOWER: &str = "lower";
pub const UCCASE: &str = "uccase";

/// Lowercase hex MD5 digest of the value.
#[derive(Debug, Clone, Copy, Default)]
pub struct Md5Filter;

impl KeyFilter for Md5Filter {
    fn apply(&self, value: &str) -> String {
        format!("{:x}", md5::compute(value.as_bytes()))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UppercaseFilter;

impl KeyFilter for UppercaseFilter {
    fn apply(&self, value: &str) -> String {
        value.to_uppercase()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LowercaseFilter;

impl KeyFilter for LowercaseFilter {
    fn apply(&self, value: &str) -> String {
        value.to_lowercase()
    }
}

/// Uppercases the first character and leaves the rest untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct UppercaseFirstFilter;

impl KeyFilter for UppercaseFirstFilter {
    fn apply(&self, value: &str) -> String {
        let mut chars = value.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}
