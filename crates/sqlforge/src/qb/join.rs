//! JOIN clauses.

use crate::error::QbError;
use crate::expr::Raw;
use crate::qb::base::TableRef;
use crate::qb::condition::{Combinator, is_allowed_operator};

/// Join type, rendered before `Join`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Left,
    Right,
    Inner,
    Outer,
}

impl JoinKind {
    pub(crate) fn keyword(self) -> &'static str {
        match self {
            JoinKind::Left => "Left",
            JoinKind::Right => "Right",
            JoinKind::Inner => "Inner",
            JoinKind::Outer => "Outer",
        }
    }
}

/// Right-hand side of an ON comparison: a column, or literal SQL.
#[derive(Debug, Clone)]
pub enum JoinKey {
    Column(String),
    Raw(Raw),
}

impl From<&str> for JoinKey {
    fn from(name: &str) -> Self {
        JoinKey::Column(name.to_string())
    }
}

impl From<String> for JoinKey {
    fn from(name: String) -> Self {
        JoinKey::Column(name)
    }
}

impl From<Raw> for JoinKey {
    fn from(raw: Raw) -> Self {
        JoinKey::Raw(raw)
    }
}

/// One `local op reference` comparison inside an ON clause.
#[derive(Debug, Clone)]
pub struct OnCondition {
    pub combinator: Combinator,
    pub local: String,
    pub operator: String,
    pub reference: JoinKey,
}

/// A multi-condition ON clause, built inside `*_join_on` closures.
#[derive(Debug, Clone, Default)]
pub struct JoinOn {
    conditions: Vec<OnCondition>,
    pub(crate) error: Option<QbError>,
}

impl JoinOn {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conditions(&self) -> &[OnCondition] {
        &self.conditions
    }

    /// `local = reference`, joined with And.
    pub fn on(self, local: impl Into<String>, reference: impl Into<JoinKey>) -> Self {
        self.push(Combinator::And, local.into(), "=", reference.into())
    }

    /// `local op reference`, joined with And.
    pub fn on_op(self, local: impl Into<String>, op: &str, reference: impl Into<JoinKey>) -> Self {
        self.push(Combinator::And, local.into(), op, reference.into())
    }

    /// Alias of [`JoinOn::on`].
    pub fn and_on(self, local: impl Into<String>, reference: impl Into<JoinKey>) -> Self {
        self.on(local, reference)
    }

    /// Alias of [`JoinOn::on_op`].
    pub fn and_on_op(
        self,
        local: impl Into<String>,
        op: &str,
        reference: impl Into<JoinKey>,
    ) -> Self {
        self.on_op(local, op, reference)
    }

    /// `local = reference`, joined with Or.
    pub fn or_on(self, local: impl Into<String>, reference: impl Into<JoinKey>) -> Self {
        self.push(Combinator::Or, local.into(), "=", reference.into())
    }

    /// `local op reference`, joined with Or.
    pub fn or_on_op(
        self,
        local: impl Into<String>,
        op: &str,
        reference: impl Into<JoinKey>,
    ) -> Self {
        self.push(Combinator::Or, local.into(), op, reference.into())
    }

    fn push(mut self, combinator: Combinator, local: String, op: &str, reference: JoinKey) -> Self {
        if !is_allowed_operator(op) {
            if self.error.is_none() {
                self.error = Some(QbError::InvalidOperator(op.to_string()));
            }
            return self;
        }
        self.conditions.push(OnCondition {
            combinator,
            local,
            operator: op.to_string(),
            reference,
        });
        self
    }
}

/// How a join is matched.
#[derive(Debug, Clone)]
pub enum JoinCondition {
    /// A single `local op reference` comparison.
    Keys {
        local: String,
        operator: String,
        reference: JoinKey,
    },
    /// Several comparisons joined with And/Or.
    On(JoinOn),
}

/// A JOIN clause.
#[derive(Debug, Clone)]
pub struct Join {
    pub kind: JoinKind,
    pub table: TableRef,
    pub condition: JoinCondition,
}
