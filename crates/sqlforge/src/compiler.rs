//! Renders builder state into SQL text plus an ordered parameter list.
//!
//! A [`Compiler`] is created per `build()` call. Each `build_*` method returns
//! the text of one clause and appends the values it binds, so the parameter
//! list always follows the textual order of the `?` placeholders.
//!
//! Two contexts exist for operands:
//! - identifier context (columns, tables, ON keys): strings are escaped with
//!   backticks, never bound
//! - value context (WHERE values, SET, VALUES): scalars become `?` and are
//!   bound

use crate::error::{QbError, QbResult};
use crate::expr::{ColumnExpr, Func, Raw};
use crate::ident;
use crate::qb::{
    Column, DuplicateUpdate, Join, JoinCondition, JoinKey, Limit, OnCondition, OrderItem,
    Predicate, Select, Statement, TableRef,
};
use crate::value::{Operand, Value};

/// SQL renderer with an accumulating parameter list.
#[derive(Debug, Default)]
pub struct Compiler {
    params: Vec<Value>,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters bound so far.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn into_params(self) -> Vec<Value> {
        self.params
    }

    /// Render a raw fragment, inlining `??` identifiers and binding the rest.
    pub fn build_raw(&mut self, raw: &Raw) -> QbResult<String> {
        let (sql, params) = expand_raw(raw)?;
        self.params.extend(params);
        Ok(sql)
    }

    /// Comma-joined select list, `*` when empty.
    pub fn build_columns(&mut self, columns: &[Column]) -> QbResult<String> {
        if columns.is_empty() {
            return Ok("*".to_string());
        }
        let mut parts = Vec::with_capacity(columns.len());
        for column in columns {
            let mut sql = self.escape_column_expr(&column.expr)?;
            if let Some(alias) = &column.alias {
                sql.push_str(" as ");
                sql.push_str(&ident::escape(alias));
            }
            parts.push(sql);
        }
        Ok(parts.join(", "))
    }

    pub fn build_table(&mut self, table: &TableRef) -> QbResult<String> {
        match table {
            TableRef::Name(name) => Ok(ident::escape(name)),
            TableRef::Aliased { alias, name } => Ok(format!(
                "{} as {}",
                ident::escape(name),
                ident::escape(alias)
            )),
            TableRef::Derived { alias, select } => Ok(format!(
                "{} as {}",
                self.build_subquery(select)?,
                ident::escape(alias)
            )),
        }
    }

    /// Every join, each prefixed with a space.
    pub fn build_joins(&mut self, joins: &[Join]) -> QbResult<String> {
        let mut sql = String::new();
        for join in joins {
            let table = self.build_table(&join.table)?;
            let on = match &join.condition {
                JoinCondition::Keys {
                    local,
                    operator,
                    reference,
                } => format!(
                    "{} {} {}",
                    ident::escape(local),
                    operator,
                    self.escape_join_key(reference)?
                ),
                JoinCondition::On(group) => {
                    if group.conditions().is_empty() {
                        return Err(QbError::validation(format!(
                            "join on {table} has no conditions"
                        )));
                    }
                    self.build_join_ons(group.conditions())?
                }
            };
            sql.push_str(&format!(" {} Join {} On {}", join.kind.keyword(), table, on));
        }
        Ok(sql)
    }

    pub fn build_join_ons(&mut self, conditions: &[OnCondition]) -> QbResult<String> {
        let mut parts = Vec::with_capacity(conditions.len());
        for (i, cond) in conditions.iter().enumerate() {
            let body = format!(
                "{} {} {}",
                ident::escape(&cond.local),
                cond.operator,
                self.escape_join_key(&cond.reference)?
            );
            if i == 0 {
                parts.push(body);
            } else {
                parts.push(format!("{} {}", cond.combinator.keyword(), body));
            }
        }
        Ok(parts.join(" "))
    }

    /// ` Where ...`, or nothing when there are no predicates.
    pub fn build_where(&mut self, predicates: &[Predicate]) -> QbResult<String> {
        if predicates.is_empty() {
            return Ok(String::new());
        }
        Ok(format!(" Where {}", self.build_conditions(predicates)?))
    }

    /// Predicates joined by their combinators; the first one drops its own.
    pub fn build_conditions(&mut self, predicates: &[Predicate]) -> QbResult<String> {
        let mut parts = Vec::with_capacity(predicates.len());
        for (i, predicate) in predicates.iter().enumerate() {
            let body = match predicate {
                Predicate::Simple {
                    column,
                    operator,
                    value,
                    ..
                } => {
                    let value = self.param(value)?;
                    match column {
                        Some(column) => format!("{} {} {}", ident::escape(column), operator, value),
                        None => format!("{operator} {value}"),
                    }
                }
                Predicate::Raw { raw, .. } => self.build_raw(raw)?,
                Predicate::Group { group, .. } => {
                    format!("({})", self.build_conditions(group.predicates())?)
                }
            };
            if i == 0 {
                parts.push(body);
            } else {
                parts.push(format!("{} {}", predicate.combinator().keyword(), body));
            }
        }
        Ok(parts.join(" "))
    }

    pub fn build_group_by(&mut self, columns: &[String]) -> String {
        if columns.is_empty() {
            return String::new();
        }
        let cols: Vec<String> = columns.iter().map(|c| ident::escape(c)).collect();
        format!(" Group By {}", cols.join(", "))
    }

    pub fn build_order_by(&mut self, items: &[OrderItem]) -> String {
        if items.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = items
            .iter()
            .map(|item| format!("{} {}", ident::escape(&item.column), item.dir.to_sql()))
            .collect();
        format!(" Order By {}", parts.join(", "))
    }

    /// ` Limit count` or ` Limit offset, count`. Nothing without a count.
    pub fn build_limit(&mut self, limit: Option<&Limit>) -> String {
        match limit {
            Some(Limit {
                count: Some(count),
                offset: Some(offset),
            }) => format!(" Limit {offset}, {count}"),
            Some(Limit {
                count: Some(count),
                offset: None,
            }) => format!(" Limit {count}"),
            _ => String::new(),
        }
    }

    /// ` (`a`, `b`)`, or nothing when no columns are named.
    pub fn build_insert_columns(&mut self, columns: &[String]) -> String {
        if columns.is_empty() {
            return String::new();
        }
        let cols: Vec<String> = columns.iter().map(|c| ident::escape(c)).collect();
        format!(" ({})", cols.join(", "))
    }

    /// `(?, ?), (?, ?)`
    pub fn build_insert_values(&mut self, rows: &[Vec<Operand>]) -> QbResult<String> {
        let mut parts = Vec::with_capacity(rows.len());
        for row in rows {
            parts.push(format!("({})", self.parameterize(row)?));
        }
        Ok(parts.join(", "))
    }

    /// `` `a` = ?, `b` = ? ``
    pub fn build_update_values(&mut self, assignments: &[(String, Operand)]) -> QbResult<String> {
        let mut parts = Vec::with_capacity(assignments.len());
        for (column, value) in assignments {
            parts.push(format!("{} = {}", ident::escape(column), self.param(value)?));
        }
        Ok(parts.join(", "))
    }

    /// ` On Duplicate Key Update ...`, or nothing.
    pub fn build_duplicate_updates(&mut self, entries: &[DuplicateUpdate]) -> QbResult<String> {
        if entries.is_empty() {
            return Ok(String::new());
        }
        let mut parts = Vec::with_capacity(entries.len());
        for entry in entries {
            let sql = match entry {
                DuplicateUpdate::Assign(column, value) => {
                    format!("{} = {}", ident::escape(column), self.param(value)?)
                }
                DuplicateUpdate::FromValues(column) => {
                    let values = Func::named("Values", [column.as_str()]);
                    format!("{} = {}", ident::escape(column), self.escape_function(&values)?)
                }
            };
            parts.push(sql);
        }
        Ok(format!(" On Duplicate Key Update {}", parts.join(", ")))
    }

    /// `(Select ...)`, with the subquery's parameters merged in.
    pub fn build_subquery(&mut self, select: &Select) -> QbResult<String> {
        let built = select.build()?;
        self.params.extend(built.params);
        Ok(format!("({})", built.sql))
    }

    fn escape_column_expr(&mut self, expr: &ColumnExpr) -> QbResult<String> {
        match expr {
            ColumnExpr::Name(name) => Ok(ident::escape(name)),
            ColumnExpr::Raw(raw) => self.build_raw(raw),
            ColumnExpr::Func(func) => self.escape_function(func),
            ColumnExpr::Select(select) => self.build_subquery(select),
        }
    }

    fn escape_join_key(&mut self, key: &JoinKey) -> QbResult<String> {
        match key {
            JoinKey::Column(name) => Ok(ident::escape(name)),
            JoinKey::Raw(raw) => self.build_raw(raw),
        }
    }

    /// Identifier-context rendering of an operand.
    fn escape(&mut self, operand: &Operand) -> QbResult<String> {
        match operand {
            Operand::Value(Value::Text(name)) => Ok(ident::escape(name)),
            Operand::Raw(raw) => self.build_raw(raw),
            Operand::Func(func) => self.escape_function(func),
            Operand::Select(select) => self.build_subquery(select),
            other => Err(QbError::unsupported(other.describe())),
        }
    }

    /// `Name(arg, ...)` with identifier-context arguments.
    fn escape_function(&mut self, func: &Func) -> QbResult<String> {
        let mut args = Vec::with_capacity(func.args().len());
        for arg in func.args() {
            args.push(self.escape(arg)?);
        }
        Ok(format!("{}({})", func.name(), args.join(", ")))
    }

    /// Value-context rendering of an operand.
    fn param(&mut self, operand: &Operand) -> QbResult<String> {
        match operand {
            Operand::Value(value) => {
                self.params.push(value.clone());
                Ok("?".to_string())
            }
            Operand::List(items) => Ok(format!("({})", self.parameterize(items)?)),
            Operand::Raw(raw) => self.build_raw(raw),
            Operand::Func(func) => Ok(format!(
                "{}({})",
                func.name(),
                self.parameterize(func.args())?
            )),
            Operand::Select(select) => self.build_subquery(select),
        }
    }

    fn parameterize(&mut self, operands: &[Operand]) -> QbResult<String> {
        let mut parts = Vec::with_capacity(operands.len());
        for operand in operands {
            parts.push(self.param(operand)?);
        }
        Ok(parts.join(", "))
    }
}

/// Scan a raw fragment left to right.
///
/// `?` keeps its parameter bound. `??` takes the next unconsumed parameter,
/// escapes it as an identifier and removes it from the bound list. Returns the
/// rewritten text and the parameters that remain bound.
fn expand_raw(raw: &Raw) -> QbResult<(String, Vec<Value>)> {
    let mut params = raw.params().to_vec();
    let mut cursor = 0;
    let mut identifiers = 0;
    let mut out = String::with_capacity(raw.text().len());
    let mut chars = raw.text().chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '?' {
            out.push(ch);
            continue;
        }
        if chars.peek() == Some(&'?') {
            chars.next();
            identifiers += 1;
            if cursor >= params.len() {
                return Err(QbError::MissingRawParameter {
                    position: identifiers,
                });
            }
            match params.remove(cursor) {
                Value::Text(name) => out.push_str(&ident::escape(&name)),
                other => {
                    return Err(QbError::unsupported(format!(
                        "{} in an identifier placeholder",
                        other.describe()
                    )));
                }
            }
        } else {
            cursor += 1;
            out.push('?');
        }
    }

    Ok((out, params))
}
