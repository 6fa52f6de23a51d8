//! DELETE statement builder.

use crate::client::ExecutorHandle;
use crate::compiler::Compiler;
use crate::error::QbResult;
use crate::qb::base::{Base, TableRef, impl_conditional, impl_ordering, impl_statement_common};
use crate::qb::traits::{Statement, StatementKind};

/// DELETE builder.
///
/// A DELETE without conditions renders without a WHERE clause; guarding
/// against that is left to the caller.
#[derive(Debug, Clone)]
pub struct Delete {
    base: Base,
}

impl Delete {
    pub fn new(table: impl Into<TableRef>) -> Self {
        Self {
            base: Base::new(table.into()),
        }
    }
}

impl_statement_common!(Delete);
impl_ordering!(Delete);
impl_conditional!(Delete);

impl Statement for Delete {
    fn kind(&self) -> StatementKind {
        StatementKind::Delete
    }

    fn compile(&self, compiler: &mut Compiler) -> QbResult<String> {
        if let Some(sql) = self.base.compile_override(compiler)? {
            return Ok(sql);
        }
        let table = compiler.build_table(&self.base.table)?;
        let wheres = compiler.build_where(&self.base.wheres)?;
        let order_by = compiler.build_order_by(&self.base.order_by);
        let limit = compiler.build_limit(self.base.limit.as_ref());
        Ok(format!("Delete From {table}{wheres}{order_by}{limit}"))
    }

    fn executor(&self) -> Option<&ExecutorHandle> {
        self.base.executor.as_ref()
    }

    fn is_debug(&self) -> bool {
        self.base.debug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qb::Conditional;

    #[test]
    fn delete_renders_where_order_limit() {
        let sql = Delete::new("t")
            .where_op("age", "<", 18)
            .order_by("id")
            .limit(5)
            .build()
            .unwrap()
            .sql;
        assert_eq!(sql, "Delete From `t` Where `age` < ? Order By `id` Asc Limit 5");
    }
}
