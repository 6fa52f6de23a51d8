//! Expression wrappers: raw SQL fragments, function calls and column expressions.

use crate::error::{QbError, QbResult};
use crate::qb::Select;
use crate::value::{Operand, Value};

/// Literal SQL with its own parameter list.
///
/// The text follows the placeholder protocol:
/// - `?` is a bind placeholder, backed by the next value in `params`
/// - `??` is an identifier placeholder: the next value is escaped and inlined
///   at render time and removed from the bound parameters
///
/// # Example
/// ```
/// use sqlforge::Raw;
///
/// let raw = Raw::new("?? <> ?", ["col1", "value1"]);
/// assert_eq!(raw.params().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Raw {
    sql: String,
    params: Vec<Value>,
}

impl Raw {
    /// Create a raw expression with parameters.
    pub fn new<I, V>(sql: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            sql: sql.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a raw expression without parameters.
    pub fn sql(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// The literal SQL text.
    pub fn text(&self) -> &str {
        &self.sql
    }

    /// The parameters, in placeholder order.
    pub fn params(&self) -> &[Value] {
        &self.params
    }
}

/// A SQL function call such as `Count(*)` or `Now()`.
///
/// In a column position the arguments are escaped as identifiers; in a value
/// position they are bound as parameters.
#[derive(Debug, Clone)]
pub struct Func {
    name: String,
    args: Vec<Operand>,
}

impl Func {
    /// Create a function call without arguments.
    ///
    /// The name is title-cased (`count` -> `Count`). An empty name is rejected.
    pub fn new(name: &str) -> QbResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(QbError::EmptyFunction);
        }
        Ok(Self {
            name: title_case(name),
            args: Vec::new(),
        })
    }

    /// Create a function call with arguments.
    pub fn with_args<I, A>(name: &str, args: I) -> QbResult<Self>
    where
        I: IntoIterator<Item = A>,
        A: Into<Operand>,
    {
        let mut func = Self::new(name)?;
        func.args = args.into_iter().map(Into::into).collect();
        Ok(func)
    }

    /// Built-in function with a known, already title-cased name.
    pub(crate) fn named<I, A>(name: &'static str, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Operand>,
    {
        Self {
            name: name.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Append an argument.
    pub fn arg(mut self, arg: impl Into<Operand>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[Operand] {
        &self.args
    }
}

fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for ch in s.chars() {
        if at_word_start {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        at_word_start = ch.is_whitespace();
    }
    out
}

/// The expression part of a selected column.
#[derive(Debug, Clone)]
pub enum ColumnExpr {
    /// A plain, dotted or `"name as alias"` column name.
    Name(String),
    Raw(Raw),
    Func(Func),
    /// A subquery used as a column.
    Select(Box<Select>),
}

impl From<&str> for ColumnExpr {
    fn from(name: &str) -> Self {
        ColumnExpr::Name(name.to_string())
    }
}

impl From<String> for ColumnExpr {
    fn from(name: String) -> Self {
        ColumnExpr::Name(name)
    }
}

impl From<Raw> for ColumnExpr {
    fn from(raw: Raw) -> Self {
        ColumnExpr::Raw(raw)
    }
}

impl From<Func> for ColumnExpr {
    fn from(func: Func) -> Self {
        ColumnExpr::Func(func)
    }
}

impl From<Select> for ColumnExpr {
    fn from(select: Select) -> Self {
        ColumnExpr::Select(Box::new(select))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn func_rejects_empty_name() {
        assert_eq!(Func::new("").unwrap_err(), QbError::EmptyFunction);
        assert_eq!(Func::new("   ").unwrap_err(), QbError::EmptyFunction);
    }

    #[test]
    fn func_name_is_title_cased() {
        assert_eq!(Func::new("count").unwrap().name(), "Count");
        assert_eq!(Func::new("now").unwrap().name(), "Now");
        assert_eq!(Func::new("group_concat").unwrap().name(), "Group_concat");
    }

    #[test]
    fn func_collects_args() {
        let f = Func::with_args("concat", ["a", "b"]).unwrap().arg(1);
        assert_eq!(f.args().len(), 3);
    }

    #[test]
    fn raw_keeps_param_order() {
        let raw = Raw::new("? And ?", [1, 2]);
        assert_eq!(raw.text(), "? And ?");
        assert_eq!(raw.params(), &[Value::Int(1), Value::Int(2)]);
    }
}
