//! WHERE predicates and the fluent predicate DSL.
//!
//! [`Conditional`] is implemented by every builder that owns a WHERE list
//! (Select, Update, Delete) and by [`WhereGroup`], so nested groups accept the
//! same methods as top-level statements.
//!
//! # Example
//! ```
//! use sqlforge::{Conditional, Statement, select};
//!
//! let q = select("users")
//!     .where_eq("status", "active")
//!     .where_group(|g| g.where_op("age", ">", 18).or_where_null("age"));
//! assert_eq!(
//!     q.build().unwrap().sql,
//!     "Select * From `users` Where `status` = ? And (`age` > ? Or `age` Is Null)"
//! );
//! ```

use crate::error::QbError;
use crate::expr::Raw;
use crate::qb::Select;
use crate::value::{Operand, Value};

/// Operators accepted from callers, compared case-insensitively.
pub const ALLOWED_OPERATORS: &[&str] = &[
    "=",
    "<",
    ">",
    "<=",
    ">=",
    "<>",
    "!=",
    "like",
    "in",
    "not in",
    "is",
    "is not",
    "between",
    "not between",
    "exists",
    "not exists",
];

/// Check an operator against [`ALLOWED_OPERATORS`].
pub fn is_allowed_operator(op: &str) -> bool {
    ALLOWED_OPERATORS
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(op))
}

/// How a predicate joins the one before it.
///
/// The first predicate of a list renders without its combinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Combinator {
    #[default]
    And,
    Or,
}

impl Combinator {
    pub(crate) fn keyword(self) -> &'static str {
        match self {
            Combinator::And => "And",
            Combinator::Or => "Or",
        }
    }
}

/// A single WHERE entry.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// `column operator value`. `column` is `None` for Exists.
    Simple {
        combinator: Combinator,
        column: Option<String>,
        operator: String,
        value: Operand,
    },
    /// Literal SQL.
    Raw { combinator: Combinator, raw: Raw },
    /// A parenthesized nested group.
    Group {
        combinator: Combinator,
        group: WhereGroup,
    },
}

impl Predicate {
    pub fn combinator(&self) -> Combinator {
        match self {
            Predicate::Simple { combinator, .. }
            | Predicate::Raw { combinator, .. }
            | Predicate::Group { combinator, .. } => *combinator,
        }
    }
}

/// A nested predicate list, rendered in parentheses.
#[derive(Debug, Clone, Default)]
pub struct WhereGroup {
    predicates: Vec<Predicate>,
    error: Option<QbError>,
}

impl WhereGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl Conditional for WhereGroup {
    fn predicates_mut(&mut self) -> &mut Vec<Predicate> {
        &mut self.predicates
    }

    fn record_error(&mut self, err: QbError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}

/// Loosely shaped condition input for [`Conditional::and_where`].
///
/// - `(column, value)`: equality
/// - `(column, operator, value)`: explicit operator
/// - a list of `(column, value)` pairs: one equality each
/// - [`Raw`]: literal SQL
/// - [`WhereGroup`]: nested group
#[derive(Debug, Clone)]
pub enum Criteria {
    Eq(String, Operand),
    Op(String, String, Operand),
    Map(Vec<(String, Operand)>),
    Raw(Raw),
    Group(WhereGroup),
}

impl<K: Into<String>, V: Into<Operand>> From<(K, V)> for Criteria {
    fn from((column, value): (K, V)) -> Self {
        Criteria::Eq(column.into(), value.into())
    }
}

impl<'a, K: Into<String>, V: Into<Operand>> From<(K, &'a str, V)> for Criteria {
    fn from((column, op, value): (K, &'a str, V)) -> Self {
        Criteria::Op(column.into(), op.to_string(), value.into())
    }
}

impl<K: Into<String>, V: Into<Operand>> From<Vec<(K, V)>> for Criteria {
    fn from(pairs: Vec<(K, V)>) -> Self {
        Criteria::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<Operand>, const N: usize> From<[(K, V); N]> for Criteria {
    fn from(pairs: [(K, V); N]) -> Self {
        Criteria::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<Raw> for Criteria {
    fn from(raw: Raw) -> Self {
        Criteria::Raw(raw)
    }
}

impl From<WhereGroup> for Criteria {
    fn from(group: WhereGroup) -> Self {
        Criteria::Group(group)
    }
}

/// Fluent WHERE methods.
///
/// Each `where_*` method adds a predicate joined with And, each `or_where_*`
/// method one joined with Or. An operator outside [`ALLOWED_OPERATORS`] is
/// remembered and returned by `build()`.
pub trait Conditional: Sized {
    #[doc(hidden)]
    fn predicates_mut(&mut self) -> &mut Vec<Predicate>;

    #[doc(hidden)]
    fn record_error(&mut self, err: QbError);

    /// Add a loosely shaped condition joined with And.
    fn and_where(self, criteria: impl Into<Criteria>) -> Self {
        push_criteria(self, Combinator::And, criteria.into())
    }

    /// Add a loosely shaped condition joined with Or.
    fn or_where(self, criteria: impl Into<Criteria>) -> Self {
        push_criteria(self, Combinator::Or, criteria.into())
    }

    /// `column = value`
    fn where_eq(self, column: impl Into<String>, value: impl Into<Operand>) -> Self {
        push_simple(self, Combinator::And, column.into(), "=", value.into())
    }

    fn or_where_eq(self, column: impl Into<String>, value: impl Into<Operand>) -> Self {
        push_simple(self, Combinator::Or, column.into(), "=", value.into())
    }

    /// `column op value`, with `op` checked against the allow-list.
    fn where_op(self, column: impl Into<String>, op: &str, value: impl Into<Operand>) -> Self {
        push_simple(self, Combinator::And, column.into(), op, value.into())
    }

    fn or_where_op(self, column: impl Into<String>, op: &str, value: impl Into<Operand>) -> Self {
        push_simple(self, Combinator::Or, column.into(), op, value.into())
    }

    /// One equality per pair, all joined with And.
    fn where_map<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Operand>,
    {
        for (column, value) in pairs {
            self = self.where_eq(column, value);
        }
        self
    }

    /// One equality per pair, each joined with Or.
    fn or_where_map<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Operand>,
    {
        for (column, value) in pairs {
            self = self.or_where_eq(column, value);
        }
        self
    }

    /// Literal SQL joined with And.
    fn where_raw(mut self, raw: Raw) -> Self {
        self.predicates_mut().push(Predicate::Raw {
            combinator: Combinator::And,
            raw,
        });
        self
    }

    fn or_where_raw(mut self, raw: Raw) -> Self {
        self.predicates_mut().push(Predicate::Raw {
            combinator: Combinator::Or,
            raw,
        });
        self
    }

    /// Nested group joined with And. An empty group adds nothing.
    fn where_group<F>(self, f: F) -> Self
    where
        F: FnOnce(WhereGroup) -> WhereGroup,
    {
        push_group(self, Combinator::And, f(WhereGroup::new()))
    }

    fn or_where_group<F>(self, f: F) -> Self
    where
        F: FnOnce(WhereGroup) -> WhereGroup,
    {
        push_group(self, Combinator::Or, f(WhereGroup::new()))
    }

    /// `column In (...)`. An empty list adds nothing.
    fn where_in<I, V>(self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Operand>,
    {
        push_list(self, Combinator::And, column.into(), "In", values)
    }

    fn or_where_in<I, V>(self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Operand>,
    {
        push_list(self, Combinator::Or, column.into(), "In", values)
    }

    /// `column Not In (...)`. An empty list adds nothing.
    fn where_not_in<I, V>(self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Operand>,
    {
        push_list(self, Combinator::And, column.into(), "Not In", values)
    }

    fn or_where_not_in<I, V>(self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Operand>,
    {
        push_list(self, Combinator::Or, column.into(), "Not In", values)
    }

    /// `column In (Select ...)`
    fn where_in_query(self, column: impl Into<String>, query: Select) -> Self {
        push_builtin(self, Combinator::And, Some(column.into()), "In", query.into())
    }

    fn or_where_in_query(self, column: impl Into<String>, query: Select) -> Self {
        push_builtin(self, Combinator::Or, Some(column.into()), "In", query.into())
    }

    fn where_not_in_query(self, column: impl Into<String>, query: Select) -> Self {
        push_builtin(self, Combinator::And, Some(column.into()), "Not In", query.into())
    }

    fn or_where_not_in_query(self, column: impl Into<String>, query: Select) -> Self {
        push_builtin(self, Combinator::Or, Some(column.into()), "Not In", query.into())
    }

    /// `column Is Null`
    fn where_null(self, column: impl Into<String>) -> Self {
        push_builtin(self, Combinator::And, Some(column.into()), "Is", null())
    }

    fn or_where_null(self, column: impl Into<String>) -> Self {
        push_builtin(self, Combinator::Or, Some(column.into()), "Is", null())
    }

    /// `column Is Not Null`
    fn where_not_null(self, column: impl Into<String>) -> Self {
        push_builtin(self, Combinator::And, Some(column.into()), "Is Not", null())
    }

    fn or_where_not_null(self, column: impl Into<String>) -> Self {
        push_builtin(self, Combinator::Or, Some(column.into()), "Is Not", null())
    }

    /// `column Between ? And ?`
    fn where_between(
        self,
        column: impl Into<String>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> Self {
        let range = between(low.into(), high.into());
        push_builtin(self, Combinator::And, Some(column.into()), "Between", range)
    }

    fn or_where_between(
        self,
        column: impl Into<String>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> Self {
        let range = between(low.into(), high.into());
        push_builtin(self, Combinator::Or, Some(column.into()), "Between", range)
    }

    /// `column Not Between ? And ?`
    fn where_not_between(
        self,
        column: impl Into<String>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> Self {
        let range = between(low.into(), high.into());
        push_builtin(self, Combinator::And, Some(column.into()), "Not Between", range)
    }

    fn or_where_not_between(
        self,
        column: impl Into<String>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> Self {
        let range = between(low.into(), high.into());
        push_builtin(self, Combinator::Or, Some(column.into()), "Not Between", range)
    }

    /// `Exists (Select ...)`
    fn where_exists(self, query: Select) -> Self {
        push_builtin(self, Combinator::And, None, "Exists", query.into())
    }

    fn or_where_exists(self, query: Select) -> Self {
        push_builtin(self, Combinator::Or, None, "Exists", query.into())
    }

    /// `Not Exists (Select ...)`
    fn where_not_exists(self, query: Select) -> Self {
        push_builtin(self, Combinator::And, None, "Not Exists", query.into())
    }

    fn or_where_not_exists(self, query: Select) -> Self {
        push_builtin(self, Combinator::Or, None, "Not Exists", query.into())
    }
}

fn null() -> Operand {
    Operand::Raw(Raw::sql("Null"))
}

fn between(low: Value, high: Value) -> Operand {
    Operand::Raw(Raw::new("? And ?", [low, high]))
}

fn push_simple<C: Conditional>(
    mut target: C,
    combinator: Combinator,
    column: String,
    op: &str,
    value: Operand,
) -> C {
    if !is_allowed_operator(op) {
        target.record_error(QbError::InvalidOperator(op.to_string()));
        return target;
    }
    push_builtin(target, combinator, Some(column), op, value)
}

fn push_builtin<C: Conditional>(
    mut target: C,
    combinator: Combinator,
    column: Option<String>,
    operator: &str,
    value: Operand,
) -> C {
    target.predicates_mut().push(Predicate::Simple {
        combinator,
        column,
        operator: operator.to_string(),
        value,
    });
    target
}

fn push_list<C, I, V>(target: C, combinator: Combinator, column: String, op: &str, values: I) -> C
where
    C: Conditional,
    I: IntoIterator<Item = V>,
    V: Into<Operand>,
{
    let items: Vec<Operand> = values.into_iter().map(Into::into).collect();
    if items.is_empty() {
        return target;
    }
    push_builtin(target, combinator, Some(column), op, Operand::List(items))
}

fn push_group<C: Conditional>(mut target: C, combinator: Combinator, group: WhereGroup) -> C {
    if let Some(err) = group.error.clone() {
        target.record_error(err);
    }
    if group.is_empty() {
        return target;
    }
    target
        .predicates_mut()
        .push(Predicate::Group { combinator, group });
    target
}

fn push_criteria<C: Conditional>(target: C, combinator: Combinator, criteria: Criteria) -> C {
    match criteria {
        Criteria::Eq(column, value) => push_simple(target, combinator, column, "=", value),
        Criteria::Op(column, op, value) => push_simple(target, combinator, column, &op, value),
        Criteria::Map(pairs) => pairs.into_iter().fold(target, |acc, (column, value)| {
            push_simple(acc, combinator, column, "=", value)
        }),
        Criteria::Raw(raw) => {
            let mut target = target;
            target.predicates_mut().push(Predicate::Raw { combinator, raw });
            target
        }
        Criteria::Group(group) => push_group(target, combinator, group),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_is_case_insensitive() {
        assert!(is_allowed_operator("LIKE"));
        assert!(is_allowed_operator("Not In"));
        assert!(is_allowed_operator("<>"));
        assert!(!is_allowed_operator("=="));
        assert!(!is_allowed_operator("; drop table"));
    }

    #[test]
    fn invalid_operator_is_recorded_not_pushed() {
        let g = WhereGroup::new().where_op("a", "===", 1);
        assert!(g.is_empty());
        assert_eq!(g.error, Some(QbError::InvalidOperator("===".into())));
    }

    #[test]
    fn first_error_wins() {
        let g = WhereGroup::new().where_op("a", "~", 1).where_op("b", "^", 2);
        assert_eq!(g.error, Some(QbError::InvalidOperator("~".into())));
    }

    #[test]
    fn empty_in_list_is_a_no_op() {
        let g = WhereGroup::new().where_in("id", Vec::<i32>::new());
        assert!(g.is_empty());
    }

    #[test]
    fn map_criteria_adds_one_predicate_per_pair() {
        let g = WhereGroup::new().or_where(vec![("a", 1), ("b", 2)]);
        assert_eq!(g.predicates().len(), 2);
        assert!(g.predicates().iter().all(|p| p.combinator() == Combinator::Or));
    }

    #[test]
    fn nested_group_error_propagates() {
        let g = WhereGroup::new().where_group(|inner| inner.where_op("x", "!!", 1));
        assert!(g.is_empty());
        assert!(matches!(g.error, Some(QbError::InvalidOperator(_))));
    }

    #[test]
    fn null_helpers_use_is_operators() {
        let g = WhereGroup::new().where_null("a").or_where_not_null("b");
        match &g.predicates()[1] {
            Predicate::Simple { operator, .. } => assert_eq!(operator, "Is Not"),
            other => panic!("unexpected predicate {other:?}"),
        }
    }
}
