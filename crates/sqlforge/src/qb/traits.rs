//! Trait definitions for statement builders.

use std::fmt;

use crate::client::{ExecutorHandle, QueryOutput};
use crate::compiler::Compiler;
use crate::error::QbResult;
use crate::value::Value;

/// Which statement a builder produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StatementKind::Select => "select",
            StatementKind::Insert => "insert",
            StatementKind::Update => "update",
            StatementKind::Delete => "delete",
        })
    }
}

/// Base trait for all statement builders.
///
/// Provides rendering and execution through the attached executor.
pub trait Statement {
    fn kind(&self) -> StatementKind;

    /// Render this statement's clauses into `compiler` and return the SQL text.
    fn compile(&self, compiler: &mut Compiler) -> QbResult<String>;

    /// The attached executor, if any.
    fn executor(&self) -> Option<&ExecutorHandle>;

    /// Debug flag forwarded to the executor.
    fn is_debug(&self) -> bool;

    /// Render the statement.
    ///
    /// Rendering is atomic: on error no partial SQL is returned.
    fn build(&self) -> QbResult<BuiltQuery> {
        let mut compiler = Compiler::new();
        let sql = self.compile(&mut compiler)?;
        let params = compiler.into_params();
        tracing::trace!(
            target: "sqlforge.compile",
            statement = %self.kind(),
            param_count = params.len(),
            "compiled statement"
        );
        Ok(BuiltQuery::new(sql, params))
    }

    /// Render with every `?` replaced by a quoted literal. For logs only.
    fn to_debug_sql(&self) -> QbResult<String> {
        Ok(self.build()?.to_debug_sql())
    }

    /// Render and hand the statement to the executor.
    ///
    /// Returns `Ok(None)` when no executor is attached.
    fn execute(&self) -> QbResult<Option<QueryOutput>> {
        let built = self.build()?;
        let Some(handle) = self.executor() else {
            return Ok(None);
        };
        handle
            .run(self.kind(), &built, self.is_debug())
            .map(Some)
    }
}

/// Rendered SQL with its parameters, ready for an executor.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

impl BuiltQuery {
    pub fn new(sql: String, params: Vec<Value>) -> Self {
        Self { sql, params }
    }

    /// Number of `?` placeholders in the SQL text.
    ///
    /// A `?` inside a backtick-quoted identifier is not a placeholder.
    pub fn placeholder_count(&self) -> usize {
        scan_placeholders(&self.sql)
            .filter(|&(_, is_placeholder)| is_placeholder)
            .count()
    }

    /// Substitute each `?` with the matching parameter as a quoted literal.
    ///
    /// Placeholders beyond the parameter list are left untouched.
    pub fn to_debug_sql(&self) -> String {
        let mut out = String::with_capacity(self.sql.len() + self.params.len() * 4);
        let mut params = self.params.iter();
        for (ch, is_placeholder) in scan_placeholders(&self.sql) {
            if is_placeholder {
                if let Some(value) = params.next() {
                    out.push_str(&value.to_debug_literal());
                    continue;
                }
            }
            out.push(ch);
        }
        out
    }
}

/// Walk `sql` char by char, flagging each `?` outside backtick quotes.
///
/// A doubled backtick inside an identifier toggles out and straight back in,
/// so it never exposes the text around it.
fn scan_placeholders(sql: &str) -> impl Iterator<Item = (char, bool)> + '_ {
    let mut quoted = false;
    sql.chars().map(move |ch| {
        if ch == '`' {
            quoted = !quoted;
        }
        (ch, ch == '?' && !quoted)
    })
}
