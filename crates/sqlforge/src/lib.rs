//! # sqlforge
//!
//! A fluent builder for MySQL-dialect SELECT, INSERT, UPDATE and DELETE
//! statements.
//!
//! ## Features
//!
//! - **Parameterized by default**: values become `?` placeholders with an
//!   ordered parameter list; identifiers are backtick-escaped inline
//! - **Raw escape hatch**: `Raw` fragments with `?` (bound) and `??`
//!   (identifier) placeholders
//! - **Nested conditions**: And/Or groups, IN lists, subqueries, Exists
//! - **Safe defaults**: operators are allow-listed, INSERT requires rows,
//!   UPDATE requires SET
//! - **Executor boundary**: statements hand SQL to a caller-supplied
//!   `Executor`; logging goes through `tracing`
//!
//! ## Query Builder (qb)
//!
//! ```
//! use sqlforge::{Conditional, Raw, Statement, qb};
//!
//! // SELECT
//! let q = qb::select("foo")
//!     .where_eq("bar", "baz")
//!     .where_raw(Raw::new("?? <> ?", ["col1", "value1"]))
//!     .order_by_desc("id")
//!     .limit_offset(10, 20);
//! let built = q.build().unwrap();
//! assert_eq!(
//!     built.sql,
//!     "Select * From `foo` Where `bar` = ? And `col1` <> ? Order By `id` Desc Limit 20, 10"
//! );
//!
//! // INSERT ... ON DUPLICATE KEY UPDATE
//! let q = qb::insert("foo")
//!     .values_map([("id", 1), ("hits", 1)])
//!     .on_duplicate_values(["hits"]);
//! assert_eq!(
//!     q.build().unwrap().sql,
//!     "Insert Into `foo` (`id`, `hits`) Values (?, ?) On Duplicate Key Update `hits` = Values(`hits`)"
//! );
//! ```

pub mod client;
pub mod compiler;
pub mod error;
pub mod expr;
pub mod ident;
pub mod qb;
pub mod value;

pub use client::{ClientConfig, Executor, ExecutorHandle, QueryClient, QueryOutput, Row};
pub use compiler::Compiler;
pub use error::{QbError, QbResult};
pub use expr::{ColumnExpr, Func, Raw};
pub use value::{Operand, Value};

// Re-export qb module for easy access
pub use qb::{
    BuiltQuery, Conditional, Delete, Insert, JoinKind, JoinOn, Select, SortDir, Statement,
    TableRef, Update, WhereGroup, delete, insert, select, update,
};
