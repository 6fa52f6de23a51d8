//! Execution boundary.
//!
//! The builders never talk to a database themselves. A statement renders its
//! SQL and parameters and hands them to an [`Executor`], a collaborator
//! supplied by the caller (a connection wrapper, a test double, a closure).
//!
//! [`QueryClient`] is a small factory that attaches one executor and one
//! [`ClientConfig`] to every statement it creates.

mod config;
mod row;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::QbResult;
use crate::expr::{Func, Raw};
use crate::qb::{BuiltQuery, Delete, Insert, Select, StatementKind, TableRef, Update};
use crate::value::Value;

pub use config::{APP_ENV_VAR, ClientConfig};
pub use row::Row;

/// What an executor returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryOutput {
    /// Result rows of a Select.
    Rows(Vec<Row>),
    /// Last insert id (Insert) or affected rows (Update, Delete).
    Count(u64),
}

/// Runs rendered SQL.
///
/// Implemented for any `Fn(&str, &[Value], bool) -> QbResult<QueryOutput>`.
pub trait Executor: Send + Sync {
    fn execute(&self, sql: &str, params: &[Value], debug: bool) -> QbResult<QueryOutput>;
}

impl<F> Executor for F
where
    F: Fn(&str, &[Value], bool) -> QbResult<QueryOutput> + Send + Sync,
{
    fn execute(&self, sql: &str, params: &[Value], debug: bool) -> QbResult<QueryOutput> {
        self(sql, params, debug)
    }
}

/// An executor plus the logging settings used when running through it.
#[derive(Clone)]
pub struct ExecutorHandle {
    executor: Arc<dyn Executor>,
    max_logged_sql: Option<usize>,
}

impl fmt::Debug for ExecutorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutorHandle")
            .field("max_logged_sql", &self.max_logged_sql)
            .finish_non_exhaustive()
    }
}

impl ExecutorHandle {
    pub fn new(executor: Arc<dyn Executor>) -> Self {
        Self {
            executor,
            max_logged_sql: ClientConfig::default().max_logged_sql,
        }
    }

    fn with_config(executor: Arc<dyn Executor>, config: &ClientConfig) -> Self {
        Self {
            executor,
            max_logged_sql: config.max_logged_sql,
        }
    }

    /// Log the statement, then run it.
    pub(crate) fn run(
        &self,
        kind: StatementKind,
        built: &BuiltQuery,
        is_debug: bool,
    ) -> QbResult<QueryOutput> {
        let sql = self.truncate_sql(&built.sql);
        if is_debug {
            let expanded = self.truncate_sql(&built.to_debug_sql());
            tracing::info!(
                target: "sqlforge.sql",
                statement = %kind,
                param_count = built.params.len(),
                debug = is_debug,
                sql = %sql,
                expanded = %expanded,
                "executing statement"
            );
        } else {
            tracing::debug!(
                target: "sqlforge.sql",
                statement = %kind,
                param_count = built.params.len(),
                debug = is_debug,
                sql = %sql,
                "executing statement"
            );
        }

        self.executor
            .execute(&built.sql, &built.params, is_debug)
            .inspect_err(|err| {
                tracing::warn!(
                    target: "sqlforge.sql",
                    statement = %kind,
                    error = %err,
                    sql = %sql,
                    "statement failed"
                );
            })
    }

    fn truncate_sql(&self, sql: &str) -> String {
        match self.max_logged_sql {
            Some(max) if sql.chars().count() > max => {
                format!("{}...", sql.chars().take(max).collect::<String>())
            }
            _ => sql.to_string(),
        }
    }
}

/// Statement factory bound to one executor and configuration.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use sqlforge::{Conditional, QbResult, QueryClient, QueryOutput, Row, Value};
///
/// let client = QueryClient::new(Arc::new(
///     |_sql: &str, _params: &[Value], _debug: bool| -> QbResult<QueryOutput> {
///         Ok(QueryOutput::Rows(vec![Row::new().with("name", "alice")]))
///     },
/// ));
///
/// let name = client
///     .select_unique_value("users", "name")
///     .where_eq("id", 1)
///     .value()
///     .unwrap();
/// assert_eq!(name, Some(Value::from("alice")));
/// ```
#[derive(Clone)]
pub struct QueryClient {
    executor: Arc<dyn Executor>,
    config: ClientConfig,
}

impl fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl QueryClient {
    /// Create a client with the default configuration.
    pub fn new(executor: Arc<dyn Executor>) -> Self {
        Self::with_config(executor, ClientConfig::default())
    }

    pub fn with_config(executor: Arc<dyn Executor>, config: ClientConfig) -> Self {
        Self { executor, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn handle(&self) -> ExecutorHandle {
        ExecutorHandle::with_config(Arc::clone(&self.executor), &self.config)
    }

    pub fn select(&self, table: impl Into<TableRef>) -> Select {
        Select::new(table)
            .with_handle(self.handle())
            .debug(self.config.debug)
    }

    pub fn insert(&self, table: impl Into<TableRef>) -> Insert {
        Insert::new(table)
            .with_handle(self.handle())
            .debug(self.config.debug)
    }

    pub fn update(&self, table: impl Into<TableRef>) -> Update {
        Update::new(table)
            .with_handle(self.handle())
            .debug(self.config.debug)
    }

    pub fn delete(&self, table: impl Into<TableRef>) -> Delete {
        Delete::new(table)
            .with_handle(self.handle())
            .debug(self.config.debug)
    }

    /// Build a raw fragment.
    pub fn raw<I, V>(&self, sql: impl Into<String>, params: I) -> Raw
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Raw::new(sql, params)
    }

    /// Build a function call.
    pub fn func(&self, name: &str) -> QbResult<Func> {
        Func::new(name)
    }

    /// A Select for fetching one row; pair with [`Select::first`].
    pub fn select_single_row(&self, table: impl Into<TableRef>) -> Select {
        self.select(table).limit(1)
    }

    /// A Select of one column; pair with [`Select::value`].
    pub fn select_unique_value(&self, table: impl Into<TableRef>, column: &str) -> Select {
        self.select(table).column(column).limit(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_long_sql() {
        let exec: Arc<dyn Executor> =
            Arc::new(|_: &str, _: &[Value], _: bool| -> QbResult<QueryOutput> {
                Ok(QueryOutput::Count(0))
            });
        let handle = ExecutorHandle::with_config(exec, &ClientConfig::new().max_logged_sql(5));
        assert_eq!(handle.truncate_sql("Select * From t"), "Selec...");
        assert_eq!(handle.truncate_sql("abc"), "abc");
    }

    #[test]
    fn handle_debug_hides_executor() {
        let exec: Arc<dyn Executor> =
            Arc::new(|_: &str, _: &[Value], _: bool| -> QbResult<QueryOutput> {
                Ok(QueryOutput::Count(0))
            });
        let s = format!("{:?}", ExecutorHandle::new(exec));
        assert!(s.contains("max_logged_sql"));
    }
}
