//! Clause storage shared by every statement kind.

use crate::client::ExecutorHandle;
use crate::compiler::Compiler;
use crate::error::{QbError, QbResult};
use crate::expr::Raw;
use crate::qb::Select;
use crate::qb::condition::Predicate;

/// The table a statement operates on.
#[derive(Debug, Clone)]
pub enum TableRef {
    /// A plain name, optionally dotted or written as `"name as alias"`.
    Name(String),
    /// A table with an alias.
    Aliased { alias: String, name: String },
    /// A subquery in FROM, with an alias.
    Derived { alias: String, select: Box<Select> },
}

impl TableRef {
    /// Create an aliased table reference (`` `name` as `alias` ``).
    pub fn aliased(alias: impl Into<String>, name: impl Into<String>) -> Self {
        TableRef::Aliased {
            alias: alias.into(),
            name: name.into(),
        }
    }

    /// Create a derived table (`` (Select ...) as `alias` ``).
    pub fn derived(alias: impl Into<String>, select: Select) -> Self {
        TableRef::Derived {
            alias: alias.into(),
            select: Box::new(select),
        }
    }
}

impl From<&str> for TableRef {
    fn from(name: &str) -> Self {
        TableRef::Name(name.to_string())
    }
}

impl From<String> for TableRef {
    fn from(name: String) -> Self {
        TableRef::Name(name)
    }
}

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub(crate) fn to_sql(self) -> &'static str {
        match self {
            SortDir::Asc => "Asc",
            SortDir::Desc => "Desc",
        }
    }
}

/// A single ORDER BY item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub column: String,
    pub dir: SortDir,
}

/// LIMIT clause data. Renders as `Limit offset, count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Limit {
    pub count: Option<u64>,
    pub offset: Option<u64>,
}

/// Clause lists common to Select, Insert, Update and Delete.
#[derive(Debug, Clone)]
pub(crate) struct Base {
    pub(crate) table: TableRef,
    pub(crate) wheres: Vec<Predicate>,
    pub(crate) order_by: Vec<OrderItem>,
    pub(crate) limit: Option<Limit>,
    pub(crate) raw: Option<Raw>,
    pub(crate) executor: Option<ExecutorHandle>,
    pub(crate) debug: bool,
    /// First builder misuse, reported by `build()`.
    pub(crate) error: Option<QbError>,
}

impl Base {
    pub(crate) fn new(table: TableRef) -> Self {
        Self {
            table,
            wheres: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            raw: None,
            executor: None,
            debug: false,
            error: None,
        }
    }

    pub(crate) fn record_error(&mut self, err: QbError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    /// Fail on a recorded error, or render the raw override if one is set.
    pub(crate) fn compile_override(&self, compiler: &mut Compiler) -> QbResult<Option<String>> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        match &self.raw {
            Some(raw) => compiler.build_raw(raw).map(Some),
            None => Ok(None),
        }
    }
}

/// Methods every statement kind shares: executor, debug flag and raw override.
macro_rules! impl_statement_common {
    ($ty:ty) => {
        impl $ty {
            /// Attach the executor used by [`Statement::execute`](crate::qb::Statement::execute).
            pub fn with_executor(
                mut self,
                executor: std::sync::Arc<dyn crate::client::Executor>,
            ) -> Self {
                self.base.executor = Some(crate::client::ExecutorHandle::new(executor));
                self
            }

            pub(crate) fn with_handle(mut self, handle: crate::client::ExecutorHandle) -> Self {
                self.base.executor = Some(handle);
                self
            }

            /// Set the debug flag forwarded to the executor.
            pub fn debug(mut self, flag: bool) -> Self {
                self.base.debug = flag;
                self
            }

            /// Replace the whole statement with raw SQL.
            ///
            /// Every other clause is ignored once a raw override is set.
            pub fn raw<I, V>(mut self, sql: impl Into<String>, params: I) -> Self
            where
                I: IntoIterator<Item = V>,
                V: Into<crate::value::Value>,
            {
                self.base.raw = Some(crate::expr::Raw::new(sql, params));
                self
            }

            /// Replace the whole statement with a prepared [`Raw`](crate::expr::Raw).
            pub fn raw_expr(mut self, raw: crate::expr::Raw) -> Self {
                self.base.raw = Some(raw);
                self
            }
        }
    };
}

/// ORDER BY and LIMIT methods (Select, Update, Delete).
macro_rules! impl_ordering {
    ($ty:ty) => {
        impl $ty {
            /// Add ORDER BY column Asc.
            pub fn order_by(self, column: impl Into<String>) -> Self {
                self.order_by_dir(column, crate::qb::SortDir::Asc)
            }

            /// Add ORDER BY column Desc.
            pub fn order_by_desc(self, column: impl Into<String>) -> Self {
                self.order_by_dir(column, crate::qb::SortDir::Desc)
            }

            /// Add ORDER BY column with an explicit direction.
            pub fn order_by_dir(
                mut self,
                column: impl Into<String>,
                dir: crate::qb::SortDir,
            ) -> Self {
                self.base.order_by.push(crate::qb::OrderItem {
                    column: column.into(),
                    dir,
                });
                self
            }

            /// Add several ORDER BY items at once.
            pub fn order_by_list<I, C>(mut self, items: I) -> Self
            where
                I: IntoIterator<Item = (C, crate::qb::SortDir)>,
                C: Into<String>,
            {
                for (column, dir) in items {
                    self = self.order_by_dir(column, dir);
                }
                self
            }

            /// Set LIMIT, replacing any earlier limit.
            pub fn limit(mut self, count: u64) -> Self {
                self.base.limit = Some(crate::qb::Limit {
                    count: Some(count),
                    offset: None,
                });
                self
            }

            /// Set LIMIT with an offset (`Limit offset, count`).
            pub fn limit_offset(mut self, count: u64, offset: u64) -> Self {
                self.base.limit = Some(crate::qb::Limit {
                    count: Some(count),
                    offset: Some(offset),
                });
                self
            }
        }
    };
}

/// Route the predicate DSL to the statement's WHERE list.
macro_rules! impl_conditional {
    ($ty:ty) => {
        impl crate::qb::Conditional for $ty {
            fn predicates_mut(&mut self) -> &mut Vec<crate::qb::Predicate> {
                &mut self.base.wheres
            }

            fn record_error(&mut self, err: crate::error::QbError) {
                self.base.record_error(err);
            }
        }
    };
}

pub(crate) use impl_conditional;
pub(crate) use impl_ordering;
pub(crate) use impl_statement_common;
