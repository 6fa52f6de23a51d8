//! SELECT statement builder.

use crate::client::{ExecutorHandle, QueryOutput, Row};
use crate::compiler::Compiler;
use crate::error::{QbError, QbResult};
use crate::expr::{ColumnExpr, Func, Raw};
use crate::qb::base::{
    Base, Limit, TableRef, impl_conditional, impl_ordering, impl_statement_common,
};
use crate::qb::condition::is_allowed_operator;
use crate::qb::join::{Join, JoinCondition, JoinKey, JoinKind, JoinOn};
use crate::qb::traits::{Statement, StatementKind};
use crate::value::{Operand, Value};

/// A selected column with an optional alias.
#[derive(Debug, Clone)]
pub struct Column {
    pub expr: ColumnExpr,
    pub alias: Option<String>,
}

/// SELECT builder.
///
/// # Example
/// ```
/// use sqlforge::{Conditional, Statement, select};
///
/// let q = select("users")
///     .columns(["id", "name"])
///     .where_eq("status", "active")
///     .order_by_desc("created_at")
///     .limit(10);
///
/// let built = q.build().unwrap();
/// assert_eq!(
///     built.sql,
///     "Select `id`, `name` From `users` Where `status` = ? Order By `created_at` Desc Limit 10"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Select {
    pub(crate) base: Base,
    columns: Vec<Column>,
    distinct: bool,
    group_by: Vec<String>,
    joins: Vec<Join>,
}

impl Select {
    /// Create a new SELECT builder for a table.
    pub fn new(table: impl Into<TableRef>) -> Self {
        Self {
            base: Base::new(table.into()),
            columns: Vec::new(),
            distinct: false,
            group_by: Vec::new(),
            joins: Vec::new(),
        }
    }

    /// Add a column, function, raw expression or subquery to the select list.
    pub fn column(mut self, expr: impl Into<ColumnExpr>) -> Self {
        self.columns.push(Column {
            expr: expr.into(),
            alias: None,
        });
        self
    }

    /// Add an aliased entry to the select list.
    pub fn column_as(mut self, expr: impl Into<ColumnExpr>, alias: impl Into<String>) -> Self {
        self.columns.push(Column {
            expr: expr.into(),
            alias: Some(alias.into()),
        });
        self
    }

    /// Add several entries to the select list.
    pub fn columns<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ColumnExpr>,
    {
        for column in columns {
            self = self.column(column);
        }
        self
    }

    /// Add several aliased entries, given as `(alias, expr)` pairs.
    pub fn columns_aliased<I, A, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = (A, C)>,
        A: Into<String>,
        C: Into<ColumnExpr>,
    {
        for (alias, expr) in columns {
            self = self.column_as(expr, alias);
        }
        self
    }

    pub fn distinct(mut self, flag: bool) -> Self {
        self.distinct = flag;
        self
    }

    /// Select `Count(*)` aliased as `c`.
    pub fn count(self) -> Self {
        self.count_of("*", "c")
    }

    /// Select `Count(expr) as alias`. An empty column or `"*"` counts rows.
    pub fn count_of(self, expr: impl Into<Operand>, alias: impl Into<String>) -> Self {
        let arg = match expr.into() {
            Operand::Value(Value::Text(s)) if matches!(s.trim(), "" | "*") => {
                Operand::Raw(Raw::sql("*"))
            }
            other => other,
        };
        self.column_as(Func::named("Count", [arg]), alias)
    }

    pub fn group_by(mut self, column: impl Into<String>) -> Self {
        self.group_by.push(column.into());
        self
    }

    pub fn group_by_cols<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.group_by.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Add a join matched on a single `local op reference` comparison.
    pub fn join(
        mut self,
        kind: JoinKind,
        table: impl Into<TableRef>,
        local: impl Into<String>,
        op: &str,
        reference: impl Into<JoinKey>,
    ) -> Self {
        if !is_allowed_operator(op) {
            self.base
                .record_error(QbError::InvalidOperator(op.to_string()));
            return self;
        }
        self.joins.push(Join {
            kind,
            table: table.into(),
            condition: JoinCondition::Keys {
                local: local.into(),
                operator: op.to_string(),
                reference: reference.into(),
            },
        });
        self
    }

    pub fn left_join(
        self,
        table: impl Into<TableRef>,
        local: impl Into<String>,
        reference: impl Into<JoinKey>,
    ) -> Self {
        self.join(JoinKind::Left, table, local, "=", reference)
    }

    pub fn right_join(
        self,
        table: impl Into<TableRef>,
        local: impl Into<String>,
        reference: impl Into<JoinKey>,
    ) -> Self {
        self.join(JoinKind::Right, table, local, "=", reference)
    }

    pub fn inner_join(
        self,
        table: impl Into<TableRef>,
        local: impl Into<String>,
        reference: impl Into<JoinKey>,
    ) -> Self {
        self.join(JoinKind::Inner, table, local, "=", reference)
    }

    pub fn outer_join(
        self,
        table: impl Into<TableRef>,
        local: impl Into<String>,
        reference: impl Into<JoinKey>,
    ) -> Self {
        self.join(JoinKind::Outer, table, local, "=", reference)
    }

    /// Add a join whose ON clause is built by `f`.
    pub fn join_on<F>(mut self, kind: JoinKind, table: impl Into<TableRef>, f: F) -> Self
    where
        F: FnOnce(JoinOn) -> JoinOn,
    {
        let on = f(JoinOn::new());
        if let Some(err) = on.error.clone() {
            self.base.record_error(err);
            return self;
        }
        self.joins.push(Join {
            kind,
            table: table.into(),
            condition: JoinCondition::On(on),
        });
        self
    }

    pub fn left_join_on<F>(self, table: impl Into<TableRef>, f: F) -> Self
    where
        F: FnOnce(JoinOn) -> JoinOn,
    {
        self.join_on(JoinKind::Left, table, f)
    }

    pub fn right_join_on<F>(self, table: impl Into<TableRef>, f: F) -> Self
    where
        F: FnOnce(JoinOn) -> JoinOn,
    {
        self.join_on(JoinKind::Right, table, f)
    }

    pub fn inner_join_on<F>(self, table: impl Into<TableRef>, f: F) -> Self
    where
        F: FnOnce(JoinOn) -> JoinOn,
    {
        self.join_on(JoinKind::Inner, table, f)
    }

    pub fn outer_join_on<F>(self, table: impl Into<TableRef>, f: F) -> Self
    where
        F: FnOnce(JoinOn) -> JoinOn,
    {
        self.join_on(JoinKind::Outer, table, f)
    }

    /// Execute and return all rows. `Ok(None)` without an executor.
    pub fn get(&self) -> QbResult<Option<Vec<Row>>> {
        match self.execute()? {
            None => Ok(None),
            Some(QueryOutput::Rows(rows)) => Ok(Some(rows)),
            Some(QueryOutput::Count(n)) => Err(QbError::UnexpectedOutput(format!(
                "select returned an affected-row count ({n})"
            ))),
        }
    }

    /// Execute with `Limit 1` and return the first row, if any.
    pub fn first(&self) -> QbResult<Option<Row>> {
        let mut single = self.clone();
        let offset = single.base.limit.and_then(|l| l.offset);
        single.base.limit = Some(Limit {
            count: Some(1),
            offset,
        });
        Ok(single.get()?.and_then(|rows| rows.into_iter().next()))
    }

    /// Execute with `Limit 1` and return the first column of the first row.
    pub fn value(&self) -> QbResult<Option<Value>> {
        Ok(self.first()?.and_then(|row| row.into_first()))
    }
}

impl_statement_common!(Select);
impl_ordering!(Select);
impl_conditional!(Select);

impl Statement for Select {
    fn kind(&self) -> StatementKind {
        StatementKind::Select
    }

    fn compile(&self, compiler: &mut Compiler) -> QbResult<String> {
        if let Some(sql) = self.base.compile_override(compiler)? {
            return Ok(sql);
        }
        let distinct = if self.distinct { " Distinct" } else { "" };
        let columns = compiler.build_columns(&self.columns)?;
        let table = compiler.build_table(&self.base.table)?;
        let joins = compiler.build_joins(&self.joins)?;
        let wheres = compiler.build_where(&self.base.wheres)?;
        let group_by = compiler.build_group_by(&self.group_by);
        let order_by = compiler.build_order_by(&self.base.order_by);
        let limit = compiler.build_limit(self.base.limit.as_ref());
        Ok(format!(
            "Select{distinct} {columns} From {table}{joins}{wheres}{group_by}{order_by}{limit}"
        ))
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
    fn select_star_by_default() {
        let sql = Select::new("foo").build().unwrap().sql;
        assert_eq!(sql, "Select * From `foo`");
    }

    #[test]
    fn count_renders_wildcard_unescaped() {
        let sql = Select::new("foo").count().build().unwrap().sql;
        assert_eq!(sql, "Select Count(*) as `c` From `foo`");
    }

    #[test]
    fn count_of_column_is_escaped() {
        let sql = Select::new("foo").count_of("id", "n").build().unwrap().sql;
        assert_eq!(sql, "Select Count(`id`) as `n` From `foo`");
    }

    #[test]
    fn invalid_join_operator_fails_build() {
        let q = Select::new("a").join(JoinKind::Left, "b", "a.id", "=<", "b.id");
        assert_eq!(
            q.build().unwrap_err(),
            QbError::InvalidOperator("=<".into())
        );
    }

    #[test]
    fn where_param_order_follows_text() {
        let built = Select::new("t")
            .column(Raw::new("? as x", [0]))
            .where_eq("a", 1)
            .where_between("b", 2, 3)
            .build()
            .unwrap();
        assert_eq!(
            built.sql,
            "Select ? as x From `t` Where `a` = ? And `b` Between ? And ?"
        );
        assert_eq!(
            built.params,
            vec![Value::from(0), Value::from(1), Value::from(2), Value::from(3)]
        );
    }
}
