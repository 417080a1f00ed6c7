//! Core types for dynamite.
//!
//! Pure data and functions only: configuration parsing and validation, table
//! schemas, item mappings and key formats. Nothing in this crate talks to
//! DynamoDB.

pub mod config;
pub mod key_format;
pub mod mapping;
pub mod schema;
