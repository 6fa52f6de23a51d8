//! INSERT statement builder.

use crate::client::ExecutorHandle;
use crate::compiler::Compiler;
use crate::error::{QbError, QbResult};
use crate::qb::base::{Base, TableRef, impl_statement_common};
use crate::qb::traits::{Statement, StatementKind};
use crate::value::Operand;

/// An `On Duplicate Key Update` entry.
#[derive(Debug, Clone)]
pub enum DuplicateUpdate {
    /// `` `col` = value ``
    Assign(String, Operand),
    /// `` `col` = Values(`col`) ``
    FromValues(String),
}

/// INSERT builder.
///
/// Rows are positional, or keyed by column name. For keyed rows the column
/// list is taken from the first row when none was set explicitly; each row's
/// values render in that row's own order.
///
/// # Example
/// ```
/// use sqlforge::{Statement, insert};
///
/// let built = insert("users")
///     .values_map([("name", "alice"), ("email", "a@example.com")])
///     .build()
///     .unwrap();
/// assert_eq!(built.sql, "Insert Into `users` (`name`, `email`) Values (?, ?)");
/// ```
#[derive(Debug, Clone)]
pub struct Insert {
    base: Base,
    columns: Vec<String>,
    rows: Vec<Vec<Operand>>,
    duplicates: Vec<DuplicateUpdate>,
    ignore: bool,
}

impl Insert {
    pub fn new(table: impl Into<TableRef>) -> Self {
        Self {
            base: Base::new(table.into()),
            columns: Vec::new(),
            rows: Vec::new(),
            duplicates: Vec::new(),
            ignore: false,
        }
    }

    /// Set the column list explicitly.
    pub fn columns<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Append one positional row. An empty row adds nothing.
    pub fn values<I, V>(mut self, row: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Operand>,
    {
        let row: Vec<Operand> = row.into_iter().map(Into::into).collect();
        if !row.is_empty() {
            self.rows.push(row);
        }
        self
    }

    /// Append several positional rows.
    pub fn values_rows<R, I, V>(mut self, rows: R) -> Self
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = V>,
        V: Into<Operand>,
    {
        for row in rows {
            self = self.values(row);
        }
        self
    }

    /// Append one keyed row. An empty row adds nothing.
    pub fn values_map<I, K, V>(mut self, row: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Operand>,
    {
        let (keys, values): (Vec<String>, Vec<Operand>) = row
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .unzip();
        if values.is_empty() {
            return self;
        }
        if self.columns.is_empty() {
            self.columns = keys;
        }
        self.rows.push(values);
        self
    }

    /// Append several keyed rows.
    pub fn values_maps<R, I, K, V>(mut self, rows: R) -> Self
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Operand>,
    {
        for row in rows {
            self = self.values_map(row);
        }
        self
    }

    /// Render `Insert Ignore Into`.
    pub fn ignore(mut self, flag: bool) -> Self {
        self.ignore = flag;
        self
    }

    /// Add `` `column` = value `` to On Duplicate Key Update.
    pub fn on_duplicate_update(
        mut self,
        column: impl Into<String>,
        value: impl Into<Operand>,
    ) -> Self {
        self.duplicates
            .push(DuplicateUpdate::Assign(column.into(), value.into()));
        self
    }

    /// Add several assignments to On Duplicate Key Update.
    pub fn on_duplicate_update_map<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Operand>,
    {
        for (column, value) in pairs {
            self = self.on_duplicate_update(column, value);
        }
        self
    }

    /// Add `` `column` = Values(`column`) `` for each column.
    pub fn on_duplicate_values<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.duplicates
            .extend(columns.into_iter().map(|c| DuplicateUpdate::FromValues(c.into())));
        self
    }
}

impl_statement_common!(Insert);

impl Statement for Insert {
    fn kind(&self) -> StatementKind {
        StatementKind::Insert
    }

    fn compile(&self, compiler: &mut Compiler) -> QbResult<String> {
        if let Some(sql) = self.base.compile_override(compiler)? {
            return Ok(sql);
        }
        if self.rows.is_empty() {
            return Err(QbError::validation("insert has no rows"));
        }
        let ignore = if self.ignore { " Ignore" } else { "" };
        let table = compiler.build_table(&self.base.table)?;
        let columns = compiler.build_insert_columns(&self.columns);
        let values = compiler.build_insert_values(&self.rows)?;
        let duplicates = compiler.build_duplicate_updates(&self.duplicates)?;
        Ok(format!(
            "Insert{ignore} Into {table}{columns} Values {values}{duplicates}"
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
    use crate::value::Value;

    #[test]
    fn insert_without_rows_is_invalid() {
        let err = Insert::new("t").columns(["a"]).build().unwrap_err();
        assert!(matches!(err, QbError::Validation(_)));
    }

    #[test]
    fn explicit_columns_win_over_keys() {
        let built = Insert::new("t")
            .columns(["x", "y"])
            .values_map([("a", 1), ("b", 2)])
            .build()
            .unwrap();
        assert_eq!(built.sql, "Insert Into `t` (`x`, `y`) Values (?, ?)");
    }

    #[test]
    fn keyed_rows_infer_columns_once() {
        let built = Insert::new("t")
            .values_map([("a", 1), ("b", 2)])
            .values_map([("b", 4), ("a", 3)])
            .build()
            .unwrap();
        assert_eq!(built.sql, "Insert Into `t` (`a`, `b`) Values (?, ?), (?, ?)");
        assert_eq!(
            built.params,
            vec![Value::from(1), Value::from(2), Value::from(4), Value::from(3)]
        );
    }

    #[test]
    fn empty_row_is_skipped() {
        let built = Insert::new("t")
            .values(Vec::<i32>::new())
            .values([1])
            .build()
            .unwrap();
        assert_eq!(built.sql, "Insert Into `t` Values (?)");
    }
}
