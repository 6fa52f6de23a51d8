//! Statement builders.
//!
//! Each builder is a plain value: every method consumes `self` and returns
//! the updated builder, so statements are assembled in one chain and can be
//! cloned to branch. Rendering happens only in [`Statement::build`].
//!
//! # Usage
//!
//! ```
//! use sqlforge::qb::{self, Conditional, Statement};
//!
//! let q = qb::select("foo")
//!     .where_eq("id", 1)
//!     .or_where_in("status", ["new", "open"]);
//! assert_eq!(
//!     q.build().unwrap().sql,
//!     "Select * From `foo` Where `id` = ? Or `status` In (?, ?)"
//! );
//!
//! let ins = qb::insert("foo").values_map([("bar", "baz")]);
//! assert_eq!(ins.to_debug_sql().unwrap(), "Insert Into `foo` (`bar`) Values (\"baz\")");
//!
//! let upd = qb::update("foo").set("bar", 2).where_eq("id", 1);
//! assert_eq!(upd.build().unwrap().params.len(), 2);
//!
//! let del = qb::delete("foo").where_null("deleted_at");
//! assert_eq!(del.build().unwrap().sql, "Delete From `foo` Where `deleted_at` Is Null");
//! ```

mod base;
mod condition;
mod delete;
mod insert;
mod join;
mod select;
mod traits;
mod update;

pub use base::{Limit, OrderItem, SortDir, TableRef};
pub use condition::{
    ALLOWED_OPERATORS, Combinator, Conditional, Criteria, Predicate, WhereGroup,
    is_allowed_operator,
};
pub use delete::Delete;
pub use insert::{DuplicateUpdate, Insert};
pub use join::{Join, JoinCondition, JoinKey, JoinKind, JoinOn, OnCondition};
pub use select::{Column, Select};
pub use traits::{BuiltQuery, Statement, StatementKind};
pub use update::Update;

/// Create a SELECT builder for the given table.
pub fn select(table: impl Into<TableRef>) -> Select {
    Select::new(table)
}

/// Create an INSERT builder for the given table.
pub fn insert(table: impl Into<TableRef>) -> Insert {
    Insert::new(table)
}

/// Create an UPDATE builder for the given table.
pub fn update(table: impl Into<TableRef>) -> Update {
    Update::new(table)
}

/// Create a DELETE builder for the given table.
pub fn delete(table: impl Into<TableRef>) -> Delete {
    Delete::new(table)
}

#[cfg(test)]
mod tests;
