//! UPDATE statement builder.

use crate::client::ExecutorHandle;
use crate::compiler::Compiler;
use crate::error::{QbError, QbResult};
use crate::qb::base::{Base, TableRef, impl_conditional, impl_ordering, impl_statement_common};
use crate::qb::traits::{Statement, StatementKind};
use crate::value::Operand;

/// UPDATE builder.
///
/// # Example
/// ```
/// use sqlforge::{Conditional, Statement, update};
///
/// let built = update("users")
///     .set("name", "bob")
///     .where_eq("id", 1)
///     .build()
///     .unwrap();
/// assert_eq!(built.sql, "Update `users` Set `name` = ? Where `id` = ?");
/// ```
#[derive(Debug, Clone)]
pub struct Update {
    base: Base,
    assignments: Vec<(String, Operand)>,
}

impl Update {
    pub fn new(table: impl Into<TableRef>) -> Self {
        Self {
            base: Base::new(table.into()),
            assignments: Vec::new(),
        }
    }

    /// Set a column. Setting the same column again replaces its value in place.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Operand>) -> Self {
        let column = column.into();
        let value = value.into();
        match self.assignments.iter_mut().find(|(c, _)| *c == column) {
            Some((_, existing)) => *existing = value,
            None => self.assignments.push((column, value)),
        }
        self
    }

    /// Set several columns.
    pub fn set_map<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Operand>,
    {
        for (column, value) in pairs {
            self = self.set(column, value);
        }
        self
    }
}

impl_statement_common!(Update);
impl_ordering!(Update);
impl_conditional!(Update);

impl Statement for Update {
    fn kind(&self) -> StatementKind {
        StatementKind::Update
    }

    fn compile(&self, compiler: &mut Compiler) -> QbResult<String> {
        if let Some(sql) = self.base.compile_override(compiler)? {
            return Ok(sql);
        }
        if self.assignments.is_empty() {
            return Err(QbError::validation("update has no SET columns"));
        }
        let table = compiler.build_table(&self.base.table)?;
        let values = compiler.build_update_values(&self.assignments)?;
        let wheres = compiler.build_where(&self.base.wheres)?;
        let order_by = compiler.build_order_by(&self.base.order_by);
        let limit = compiler.build_limit(self.base.limit.as_ref());
        Ok(format!("Update {table} Set {values}{wheres}{order_by}{limit}"))
    }

    fn executor(&self) -> Option<&ExecutorHandle> {
        self.base.executor.as_ref()
    }

    fn is_debug(&self) -> bool {
        self.base.debug
    }
}
