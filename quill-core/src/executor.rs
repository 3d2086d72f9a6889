//! Query execution and connection pool interface
//!
//! The builder itself never performs I/O; a [`ConnectionPool`] is the
//! external collaborator that accepts the rendered `(text, values)` pair and
//! runs it against a real driver.

use crate::{Query, Result, Value};
use serde::de::DeserializeOwned;
use std::future::Future;

/// Trait for database connection pools
pub trait ConnectionPool: Send + Sync + Clone {
    /// Execute a statement that returns no rows (INSERT, UPDATE, DELETE)
    fn execute(&self, sql: &str, params: &[Value]) -> impl Future<Output = Result<u64>> + Send;

    /// Execute a statement that returns multiple rows
    fn fetch_all<T>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Result<Vec<T>>> + Send
    where
        T: DeserializeOwned + Send + Unpin;

    /// Execute a statement that returns a single row
    fn fetch_one<T>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Result<T>> + Send
    where
        T: DeserializeOwned + Send + Unpin;

    /// Execute a statement that returns an optional row
    fn fetch_optional<T>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Result<Option<T>>> + Send
    where
        T: DeserializeOwned + Send + Unpin;
}

impl Query {
    /// Render and execute, returning the affected row count
    pub async fn execute<P>(&self, pool: &P) -> Result<u64>
    where
        P: ConnectionPool,
    {
        let (sql, params) = self.sql()?;
        pool.execute(&sql, &params).await
    }

    /// Render and fetch all matching rows
    pub async fn fetch_all<T, P>(&self, pool: &P) -> Result<Vec<T>>
    where
        P: ConnectionPool,
        T: DeserializeOwned + Send + Unpin,
    {
        let (sql, params) = self.sql()?;
        pool.fetch_all(&sql, &params).await
    }

    /// Render and fetch exactly one row
    pub async fn fetch_one<T, P>(&self, pool: &P) -> Result<T>
    where
        P: ConnectionPool,
        T: DeserializeOwned + Send + Unpin,
    {
        let (sql, params) = self.sql()?;
        pool.fetch_one(&sql, &params).await
    }

    /// Render and fetch at most one row
    pub async fn fetch_optional<T, P>(&self, pool: &P) -> Result<Option<T>>
    where
        P: ConnectionPool,
        T: DeserializeOwned + Send + Unpin,
    {
        let (sql, params) = self.sql()?;
        pool.fetch_optional(&sql, &params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::sync::{Arc, Mutex};

    /// Records every statement it is asked to run
    #[derive(Clone, Default)]
    struct RecordingPool {
        calls: Arc<Mutex<Vec<(String, Vec<Value>)>>>,
    }

    impl RecordingPool {
        fn record(&self, sql: &str, params: &[Value]) {
            self.calls
                .lock()
                .unwrap()
                .push((sql.to_string(), params.to_vec()));
        }
    }

    impl ConnectionPool for RecordingPool {
        fn execute(
            &self,
            sql: &str,
            params: &[Value],
        ) -> impl Future<Output = Result<u64>> + Send {
            self.record(sql, params);
            async { Ok(1) }
        }

        fn fetch_all<T>(
            &self,
            sql: &str,
            params: &[Value],
        ) -> impl Future<Output = Result<Vec<T>>> + Send
        where
            T: DeserializeOwned + Send + Unpin,
        {
            self.record(sql, params);
            async { Ok(Vec::new()) }
        }

        fn fetch_one<T>(
            &self,
            sql: &str,
            params: &[Value],
        ) -> impl Future<Output = Result<T>> + Send
        where
            T: DeserializeOwned + Send + Unpin,
        {
            self.record(sql, params);
            async { Err(Error::invalid_query("recording pool has no rows")) }
        }

        fn fetch_optional<T>(
            &self,
            sql: &str,
            params: &[Value],
        ) -> impl Future<Output = Result<Option<T>>> + Send
        where
            T: DeserializeOwned + Send + Unpin,
        {
            self.record(sql, params);
            async { Ok(None) }
        }
    }

    #[tokio::test]
    async fn test_execute_forwards_rendered_pair() {
        let pool = RecordingPool::default();
        let affected = Query::new("users")
            .update([("name", "jane")])
            .where_all([("id", 7)])
            .execute(&pool)
            .await
            .unwrap();
        assert_eq!(affected, 1);

        let calls = pool.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "UPDATE users SET name=? WHERE id=?");
        assert_eq!(
            calls[0].1,
            vec![Value::String("jane".to_string()), Value::I32(7)]
        );
    }

    #[tokio::test]
    async fn test_fetch_all_forwards_rendered_pair() {
        let pool = RecordingPool::default();
        let rows: Vec<serde_json::Value> = Query::new("users")
            .select(["name"])
            .where_all([("age", 22)])
            .fetch_all(&pool)
            .await
            .unwrap();
        assert!(rows.is_empty());

        let calls = pool.calls.lock().unwrap();
        assert_eq!(calls[0].0, "SELECT name FROM users WHERE age=?");
        assert_eq!(calls[0].1, vec![Value::I32(22)]);
    }

    #[test]
    fn test_execute_propagates_render_error() {
        let pool = RecordingPool::default();
        let query = Query::with_escape("t", |_: &str| -> Option<String> { None })
            .update([("a", 1)]);

        let err = tokio_test::block_on(query.execute(&pool)).unwrap_err();
        assert!(matches!(err, Error::EmptyClause { .. }));
        assert!(pool.calls.lock().unwrap().is_empty());
    }
}
