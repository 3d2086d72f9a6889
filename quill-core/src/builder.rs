//! The `Query` statement builder

use std::fmt;
use std::sync::Arc;

use crate::escape::EscapeHook;
use crate::input::{normalize, IntoColumnData, IntoColumnList, IntoInsertData, InsertData};
use crate::{Error, Result, Value};

/// Generate a comma-separated run of `?` placeholders
fn placeholders(n: usize) -> String {
    let mut s = String::with_capacity(n * 3);
    for i in 0..n {
        if i > 0 {
            s.push_str(", ");
        }
        s.push('?');
    }
    s
}

/// The command clause of a statement; exactly one is set before rendering
/// is meaningful, and the most recent builder call wins
#[derive(Debug, Clone, PartialEq)]
enum Command {
    /// Empty column list renders as `SELECT *`
    Select { columns: Vec<String> },
    Insert { columns: Vec<String> },
    /// Bare placeholder count with no column list; values arrive at render time
    InsertCount(usize),
    Update { columns: Vec<String> },
    Delete,
}

/// How WHERE constraints are joined
#[derive(Debug, Clone, PartialEq)]
pub enum Connector {
    And,
    Or,
}

impl Connector {
    fn as_str(&self) -> &'static str {
        match self {
            Connector::And => " AND ",
            Connector::Or => " OR ",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct WhereClause {
    columns: Vec<String>,
    connector: Connector,
}

/// Render-time overrides for the terminal [`Query::sql_with`] call
///
/// `values` replaces the tracked command values wholesale (the only way to
/// bind values for a placeholder-count INSERT); `where_values` does the same
/// for the WHERE clause; `table` re-escapes and replaces the table name.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    table: Option<String>,
    values: Option<Vec<Value>>,
    where_values: Option<Vec<Value>>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn values<I>(mut self, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn where_values<I>(mut self, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.where_values = Some(values.into_iter().map(Into::into).collect());
        self
    }
}

/// A parameterized SQL statement builder
///
/// Assembles one of the four basic command shapes (SELECT/INSERT/UPDATE/
/// DELETE) plus an optional WHERE clause, keeping column order and bound
/// value order in lock-step so positional `?` placeholders line up with the
/// emitted value list. Callers never interpolate raw values into SQL text.
///
/// # Examples
/// ```
/// use quill_core::Query;
///
/// let (sql, values) = Query::new("users")
///     .select("name")
///     .where_all([("age", 22)])
///     .sql()
///     .unwrap();
/// assert_eq!(sql, "SELECT name FROM users WHERE age=?");
/// assert_eq!(values.len(), 1);
/// ```
#[derive(Clone)]
pub struct Query {
    table: Option<String>,
    command: Option<Command>,
    where_clause: Option<WhereClause>,
    command_values: Option<Vec<Value>>,
    where_values: Option<Vec<Value>>,
    escape: Option<Arc<dyn EscapeHook>>,
    // set when a non-empty input was escaped down to zero columns
    command_filtered: bool,
    where_filtered: bool,
}

impl Query {
    /// Create a builder for `table` with no escape hook; identifiers pass
    /// through verbatim
    pub fn new(table: &str) -> Self {
        Self {
            table: Some(table.to_string()),
            command: None,
            where_clause: None,
            command_values: None,
            where_values: None,
            escape: None,
            command_filtered: false,
            where_filtered: false,
        }
    }

    /// Create a builder whose identifiers run through `hook` before being
    /// embedded in SQL text; the table name is escaped once, here
    pub fn with_escape<H>(table: &str, hook: H) -> Self
    where
        H: EscapeHook + 'static,
    {
        let hook: Arc<dyn EscapeHook> = Arc::new(hook);
        Self {
            table: hook.escape(table),
            command: None,
            where_clause: None,
            command_values: None,
            where_values: None,
            escape: Some(hook),
            command_filtered: false,
            where_filtered: false,
        }
    }

    fn escape_ident(&self, ident: &str) -> Option<String> {
        match &self.escape {
            Some(hook) => hook.escape(ident),
            None => Some(ident.to_string()),
        }
    }

    /// Escape every column, dropping entries the hook rejects while keeping
    /// survivor order; reports whether a non-empty input was emptied out
    fn escape_entries(&self, entries: Vec<(String, Value)>) -> (Vec<String>, Vec<Value>, bool) {
        let had_input = !entries.is_empty();
        let mut columns = Vec::with_capacity(entries.len());
        let mut values = Vec::with_capacity(entries.len());

        for (col, val) in entries {
            if let Some(escaped) = self.escape_ident(&col) {
                columns.push(escaped);
                values.push(val);
            }
        }

        let filtered_empty = had_input && columns.is_empty();
        (columns, values, filtered_empty)
    }

    /// Build a SELECT command clause
    ///
    /// A list argument expands to one column per element; an empty list is
    /// equivalent to [`select_all`](Self::select_all).
    pub fn select<C>(mut self, columns: C) -> Self
    where
        C: IntoColumnList,
    {
        let requested = columns.into_column_list();
        let had_input = !requested.is_empty();
        let columns: Vec<String> = requested
            .iter()
            .filter_map(|col| self.escape_ident(col))
            .collect();

        self.command_filtered = had_input && columns.is_empty();
        self.command = Some(Command::Select { columns });
        self.command_values = None;
        self
    }

    /// Build a `SELECT * FROM table` command clause
    pub fn select_all(mut self) -> Self {
        self.command = Some(Command::Select {
            columns: Vec::new(),
        });
        self.command_values = None;
        self.command_filtered = false;
        self
    }

    /// Build an INSERT command clause
    ///
    /// Column names pair with NULL values, an ordered mapping carries its own
    /// values, and a bare `usize` switches to placeholder-count mode:
    /// `INSERT INTO table VALUES (?, ...)` with no column list and no tracked
    /// values — supply them at render time with [`Overrides::values`].
    pub fn insert<D>(mut self, data: D) -> Self
    where
        D: IntoInsertData,
    {
        match data.into_insert_data() {
            InsertData::Count(n) => {
                self.command = Some(Command::InsertCount(n));
                self.command_values = None;
                self.command_filtered = false;
                self
            }
            InsertData::Columns(columns) => {
                let entries = normalize(Some(columns), None);
                self.insert_entries(entries)
            }
        }
    }

    /// INSERT with supplementary entries layered over `data` (overwriting by
    /// name, appending when new)
    pub fn insert_with<D, E>(self, data: D, extra: E) -> Self
    where
        D: IntoColumnData,
        E: IntoColumnData,
    {
        let entries = normalize(Some(data.into_column_data()), Some(extra.into_column_data()));
        self.insert_entries(entries)
    }

    fn insert_entries(mut self, entries: Vec<(String, Value)>) -> Self {
        let (columns, values, filtered) = self.escape_entries(entries);
        self.command = Some(Command::Insert { columns });
        self.command_values = Some(values);
        self.command_filtered = filtered;
        self
    }

    /// Build an UPDATE command clause
    pub fn update<D>(self, data: D) -> Self
    where
        D: IntoColumnData,
    {
        let entries = normalize(Some(data.into_column_data()), None);
        self.update_entries(entries)
    }

    /// UPDATE with supplementary entries layered over `data`
    pub fn update_with<D, E>(self, data: D, extra: E) -> Self
    where
        D: IntoColumnData,
        E: IntoColumnData,
    {
        let entries = normalize(Some(data.into_column_data()), Some(extra.into_column_data()));
        self.update_entries(entries)
    }

    fn update_entries(mut self, entries: Vec<(String, Value)>) -> Self {
        let (columns, values, filtered) = self.escape_entries(entries);
        self.command = Some(Command::Update { columns });
        self.command_values = Some(values);
        self.command_filtered = filtered;
        self
    }

    /// Build a DELETE command clause
    pub fn delete(mut self) -> Self {
        self.command = Some(Command::Delete);
        self.command_values = None;
        self.command_filtered = false;
        self
    }

    /// Add a WHERE clause with constraints joined by AND (same as
    /// [`where_all`](Self::where_all))
    pub fn where_<D>(self, data: D) -> Self
    where
        D: IntoColumnData,
    {
        self.where_all(data)
    }

    /// Add a WHERE clause with constraints joined by AND
    pub fn where_all<D>(self, data: D) -> Self
    where
        D: IntoColumnData,
    {
        let entries = normalize(Some(data.into_column_data()), None);
        self.where_entries(entries, Connector::And)
    }

    /// Add a WHERE clause with constraints joined by OR
    pub fn where_any<D>(self, data: D) -> Self
    where
        D: IntoColumnData,
    {
        let entries = normalize(Some(data.into_column_data()), None);
        self.where_entries(entries, Connector::Or)
    }

    /// AND-joined WHERE with supplementary entries layered over `data`
    pub fn where_all_with<D, E>(self, data: D, extra: E) -> Self
    where
        D: IntoColumnData,
        E: IntoColumnData,
    {
        let entries = normalize(Some(data.into_column_data()), Some(extra.into_column_data()));
        self.where_entries(entries, Connector::And)
    }

    /// OR-joined WHERE with supplementary entries layered over `data`
    pub fn where_any_with<D, E>(self, data: D, extra: E) -> Self
    where
        D: IntoColumnData,
        E: IntoColumnData,
    {
        let entries = normalize(Some(data.into_column_data()), Some(extra.into_column_data()));
        self.where_entries(entries, Connector::Or)
    }

    fn where_entries(mut self, entries: Vec<(String, Value)>, connector: Connector) -> Self {
        let (columns, values, filtered) = self.escape_entries(entries);
        self.where_clause = Some(WhereClause { columns, connector });
        self.where_values = Some(values);
        self.where_filtered = filtered;
        self
    }

    /// The current flat value sequence: command values, then where values
    pub fn values(&self) -> Vec<Value> {
        let mut values = self.command_values.clone().unwrap_or_default();
        values.extend(self.where_values.clone().unwrap_or_default());
        values
    }

    /// Whether enough information exists to render a valid statement: a
    /// command clause is set and the table name survived escaping
    pub fn is_complete(&self) -> bool {
        self.command.is_some() && self.table.as_deref().is_some_and(|t| !t.is_empty())
    }

    fn clause_name(&self) -> &'static str {
        match &self.command {
            Some(Command::Select { .. }) => "SELECT",
            Some(Command::Insert { .. }) | Some(Command::InsertCount(_)) => "INSERT",
            Some(Command::Update { .. }) => "UPDATE",
            Some(Command::Delete) => "DELETE",
            None => "command",
        }
    }

    fn render(&self, command: &Command) -> String {
        let table = self.table.as_deref().unwrap_or("");
        let mut sql = String::new();

        match command {
            Command::Select { columns } => {
                sql.push_str("SELECT ");
                if columns.is_empty() && !self.command_filtered {
                    sql.push('*');
                } else {
                    sql.push_str(&columns.join(", "));
                }
                sql.push_str(" FROM ");
                sql.push_str(table);
            }
            Command::Insert { columns } => {
                sql.push_str("INSERT INTO ");
                sql.push_str(table);
                sql.push_str(" (");
                sql.push_str(&columns.join(", "));
                sql.push_str(") VALUES (");
                sql.push_str(&placeholders(columns.len()));
                sql.push(')');
            }
            Command::InsertCount(n) => {
                sql.push_str("INSERT INTO ");
                sql.push_str(table);
                sql.push_str(" VALUES (");
                sql.push_str(&placeholders(*n));
                sql.push(')');
            }
            Command::Update { columns } => {
                sql.push_str("UPDATE ");
                sql.push_str(table);
                sql.push_str(" SET ");
                let assignments: Vec<String> =
                    columns.iter().map(|col| format!("{}=?", col)).collect();
                sql.push_str(&assignments.join(", "));
            }
            Command::Delete => {
                sql.push_str("DELETE FROM ");
                sql.push_str(table);
            }
        }

        if let Some(where_clause) = &self.where_clause {
            sql.push_str(" WHERE ");
            let constraints: Vec<String> = where_clause
                .columns
                .iter()
                .map(|col| format!("{}=?", col))
                .collect();
            sql.push_str(&constraints.join(where_clause.connector.as_str()));
        }

        sql
    }

    /// Terminal render: the finished SQL text and its flat value sequence
    ///
    /// Returns an error when the escape hook emptied out a clause that had
    /// columns; check [`is_complete`](Self::is_complete) before treating the
    /// text of a command-less builder as executable SQL.
    pub fn sql(&self) -> Result<(String, Vec<Value>)> {
        if self.command_filtered {
            return Err(Error::empty_clause(self.clause_name()));
        }
        if self.where_filtered {
            return Err(Error::empty_clause("WHERE"));
        }

        let text = self.to_string();
        let values = self.values();
        tracing::debug!(sql = %text, params = values.len(), "rendered statement");
        Ok((text, values))
    }

    /// Terminal render with late overrides; overrides persist on the builder
    pub fn sql_with(&mut self, overrides: Overrides) -> Result<(String, Vec<Value>)> {
        if let Some(values) = overrides.values {
            self.command_values = Some(values);
        }
        if let Some(where_values) = overrides.where_values {
            self.where_values = Some(where_values);
        }
        if let Some(table) = overrides.table {
            self.table = self.escape_ident(&table);
        }

        self.sql()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.command {
            Some(command) => f.write_str(&self.render(command)),
            None => write!(
                f,
                "Incomplete Query on table: {}",
                self.table.as_deref().unwrap_or("")
            ),
        }
    }
}

impl fmt::Debug for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("table", &self.table)
            .field("command", &self.command)
            .field("where_clause", &self.where_clause)
            .field("command_values", &self.command_values)
            .field("where_values", &self.where_values)
            .field("escape_hook", &self.escape.is_some())
            .finish()
    }
}
