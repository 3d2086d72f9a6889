//! Builder argument types and normalization
//!
//! The builder methods accept either a list of bare column names or an
//! ordered column/value mapping (and, for INSERT, a bare placeholder count).
//! These shapes are modeled as tagged enums resolved up front into one
//! canonical ordered mapping, rather than inspected at runtime.

use crate::Value;

/// Column input for INSERT/UPDATE/WHERE clauses
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// Bare column names; each pairs with a NULL value
    Names(Vec<String>),
    /// Ordered column/value entries
    Entries(Vec<(String, Value)>),
}

impl ColumnData {
    /// Resolve into ordered entries, names pairing with NULL
    pub fn into_entries(self) -> Vec<(String, Value)> {
        match self {
            ColumnData::Names(names) => {
                names.into_iter().map(|name| (name, Value::Null)).collect()
            }
            ColumnData::Entries(entries) => entries,
        }
    }
}

/// Reconcile a base argument with supplementary entries into one ordered
/// mapping. Extras overwrite base entries by name, and append after existing
/// keys when new. Nothing at all yields an empty mapping.
pub fn normalize(base: Option<ColumnData>, extra: Option<ColumnData>) -> Vec<(String, Value)> {
    let mut entries = base.map(ColumnData::into_entries).unwrap_or_default();

    if let Some(extra) = extra {
        for (name, value) in extra.into_entries() {
            match entries.iter_mut().find(|(col, _)| *col == name) {
                Some(entry) => entry.1 = value,
                None => entries.push((name, value)),
            }
        }
    }

    entries
}

/// Trait for types that can be converted to column data
pub trait IntoColumnData {
    fn into_column_data(self) -> ColumnData;
}

impl IntoColumnData for ColumnData {
    fn into_column_data(self) -> ColumnData {
        self
    }
}

impl IntoColumnData for Vec<&str> {
    fn into_column_data(self) -> ColumnData {
        ColumnData::Names(self.into_iter().map(|s| s.to_string()).collect())
    }
}

impl IntoColumnData for Vec<String> {
    fn into_column_data(self) -> ColumnData {
        ColumnData::Names(self)
    }
}

impl<const N: usize> IntoColumnData for [&str; N] {
    fn into_column_data(self) -> ColumnData {
        ColumnData::Names(self.into_iter().map(|s| s.to_string()).collect())
    }
}

impl<V> IntoColumnData for Vec<(&str, V)>
where
    V: Into<Value>,
{
    fn into_column_data(self) -> ColumnData {
        ColumnData::Entries(
            self.into_iter()
                .map(|(col, val)| (col.to_string(), val.into()))
                .collect(),
        )
    }
}

impl<V, const N: usize> IntoColumnData for [(&str, V); N]
where
    V: Into<Value>,
{
    fn into_column_data(self) -> ColumnData {
        ColumnData::Entries(
            self.into_iter()
                .map(|(col, val)| (col.to_string(), val.into()))
                .collect(),
        )
    }
}

/// Column input for INSERT, which additionally accepts a bare placeholder
/// count (`INSERT INTO t VALUES (?, ?, ...)` with no column list)
#[derive(Debug, Clone, PartialEq)]
pub enum InsertData {
    Columns(ColumnData),
    Count(usize),
}

/// Trait for types that can be converted to INSERT data
pub trait IntoInsertData {
    fn into_insert_data(self) -> InsertData;
}

impl IntoInsertData for InsertData {
    fn into_insert_data(self) -> InsertData {
        self
    }
}

impl IntoInsertData for usize {
    fn into_insert_data(self) -> InsertData {
        InsertData::Count(self)
    }
}

impl IntoInsertData for ColumnData {
    fn into_insert_data(self) -> InsertData {
        InsertData::Columns(self)
    }
}

impl IntoInsertData for Vec<&str> {
    fn into_insert_data(self) -> InsertData {
        InsertData::Columns(self.into_column_data())
    }
}

impl IntoInsertData for Vec<String> {
    fn into_insert_data(self) -> InsertData {
        InsertData::Columns(self.into_column_data())
    }
}

impl<const N: usize> IntoInsertData for [&str; N] {
    fn into_insert_data(self) -> InsertData {
        InsertData::Columns(self.into_column_data())
    }
}

impl<V> IntoInsertData for Vec<(&str, V)>
where
    V: Into<Value>,
{
    fn into_insert_data(self) -> InsertData {
        InsertData::Columns(self.into_column_data())
    }
}

impl<V, const N: usize> IntoInsertData for [(&str, V); N]
where
    V: Into<Value>,
{
    fn into_insert_data(self) -> InsertData {
        InsertData::Columns(self.into_column_data())
    }
}

/// Trait for types that can be converted to SELECT column lists
pub trait IntoColumnList {
    fn into_column_list(self) -> Vec<String>;
}

impl IntoColumnList for &str {
    fn into_column_list(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoColumnList for String {
    fn into_column_list(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoColumnList for Vec<&str> {
    fn into_column_list(self) -> Vec<String> {
        self.into_iter().map(|s| s.to_string()).collect()
    }
}

impl IntoColumnList for Vec<String> {
    fn into_column_list(self) -> Vec<String> {
        self
    }
}

impl<const N: usize> IntoColumnList for [&str; N] {
    fn into_column_list(self) -> Vec<String> {
        self.into_iter().map(|s| s.to_string()).collect()
    }
}

// Tuples of up to 4 columns (common use case)
impl IntoColumnList for (&str, &str) {
    fn into_column_list(self) -> Vec<String> {
        vec![self.0.to_string(), self.1.to_string()]
    }
}

impl IntoColumnList for (&str, &str, &str) {
    fn into_column_list(self) -> Vec<String> {
        vec![self.0.to_string(), self.1.to_string(), self.2.to_string()]
    }
}

impl IntoColumnList for (&str, &str, &str, &str) {
    fn into_column_list(self) -> Vec<String> {
        vec![
            self.0.to_string(),
            self.1.to_string(),
            self.2.to_string(),
            self.3.to_string(),
        ]
    }
}
