//! Quill Core - a small parameterized SQL statement builder
//!
//! This crate assembles the four basic statement shapes (SELECT, INSERT,
//! UPDATE, DELETE) plus an optional WHERE clause as SQL text with positional
//! `?` placeholders and a matching ordered value list, so callers never
//! interpolate raw values into SQL text. Execution is left to an external
//! [`ConnectionPool`] collaborator.

pub mod builder;
pub mod error;
pub mod escape;
pub mod executor;
pub mod input;
pub mod value;

// Re-export main types
pub use builder::{Connector, Overrides, Query};
pub use error::{Error, Result};
pub use escape::EscapeHook;
pub use executor::ConnectionPool;
pub use input::{ColumnData, InsertData, IntoColumnData, IntoColumnList, IntoInsertData};
pub use value::Value;

/// Create a new statement builder for the given table
///
/// # Examples
/// ```
/// let (sql, values) = quill_core::query("users").select_all().sql().unwrap();
/// assert_eq!(sql, "SELECT * FROM users");
/// assert!(values.is_empty());
/// ```
pub fn query(table: &str) -> Query {
    Query::new(table)
}
