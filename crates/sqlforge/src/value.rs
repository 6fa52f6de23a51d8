//! Bind values and value-position operands.
//!
//! [`Value`] is a scalar that ends up in the parameter list handed to the
//! executor. [`Operand`] is anything that can sit in a value position of a
//! statement: a scalar, a list of operands, a [`Raw`] fragment, a [`Func`]
//! call or a nested [`Select`].

use crate::expr::{Func, Raw};
use crate::qb::Select;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A scalar bind value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Timestamp(DateTime<Utc>),
    Uuid(Uuid),
    Json(serde_json::Value),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the text payload, if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Read the value as a signed integer, if it fits.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::UInt(n) => i64::try_from(*n).ok(),
            _ => None,
        }
    }

    /// Render the value as a double-quoted, backslash-escaped literal.
    ///
    /// Used by debug rendering only. The output is not safe to execute.
    pub fn to_debug_literal(&self) -> String {
        let text = match self {
            Value::Null => return "NULL".to_string(),
            Value::Bool(b) => String::from(if *b { "1" } else { "0" }),
            Value::Int(n) => n.to_string(),
            Value::UInt(n) => n.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Text(s) => s.clone(),
            Value::Bytes(b) => String::from_utf8_lossy(b).into_owned(),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            Value::Timestamp(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            Value::Uuid(u) => u.hyphenated().to_string(),
            Value::Json(j) => j.to_string(),
        };
        format!("\"{}\"", add_slashes(&text))
    }

    pub(crate) fn describe(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Bool(_) => "a boolean",
            Value::Int(_) | Value::UInt(_) | Value::Float(_) => "a number",
            Value::Text(_) => "a string",
            Value::Bytes(_) => "a byte string",
            Value::Date(_) | Value::DateTime(_) | Value::Timestamp(_) => "a date",
            Value::Uuid(_) => "a uuid",
            Value::Json(_) => "a JSON document",
        }
    }
}

/// Backslash-escape quotes, backslashes and NUL bytes.
fn add_slashes(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    for ch in s.chars() {
        match ch {
            '\'' | '"' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            '\0' => out.push_str("\\0"),
            _ => out.push(ch),
        }
    }
    out
}

/// An operand in a value position.
#[derive(Debug, Clone)]
pub enum Operand {
    /// A single bind value.
    Value(Value),
    /// A parenthesized, comma-joined list (IN lists).
    List(Vec<Operand>),
    /// Literal SQL with its own parameters.
    Raw(Raw),
    /// A function call whose arguments are parameterized recursively.
    Func(Func),
    /// A subquery.
    Select(Box<Select>),
}

impl Operand {
    /// Short description used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Operand::Value(v) => v.describe(),
            Operand::List(_) => "a list",
            Operand::Raw(_) => "a raw expression",
            Operand::Func(_) => "a function call",
            Operand::Select(_) => "a subquery",
        }
    }
}

macro_rules! impl_scalar_from {
    ($($t:ty => |$v:ident| $conv:expr),* $(,)?) => {
        $(
            impl From<$t> for Value {
                fn from($v: $t) -> Self {
                    $conv
                }
            }

            impl From<$t> for Operand {
                fn from(v: $t) -> Self {
                    Operand::Value(Value::from(v))
                }
            }
        )*
    };
}

impl_scalar_from! {
    bool => |v| Value::Bool(v),
    i8 => |v| Value::Int(i64::from(v)),
    i16 => |v| Value::Int(i64::from(v)),
    i32 => |v| Value::Int(i64::from(v)),
    i64 => |v| Value::Int(v),
    isize => |v| Value::Int(v as i64),
    u8 => |v| Value::Int(i64::from(v)),
    u16 => |v| Value::Int(i64::from(v)),
    u32 => |v| Value::Int(i64::from(v)),
    u64 => |v| Value::UInt(v),
    usize => |v| Value::UInt(v as u64),
    f32 => |v| Value::Float(f64::from(v)),
    f64 => |v| Value::Float(v),
    String => |v| Value::Text(v),
    &str => |v| Value::Text(v.to_string()),
    &String => |v| Value::Text(v.clone()),
    NaiveDate => |v| Value::Date(v),
    NaiveDateTime => |v| Value::DateTime(v),
    DateTime<Utc> => |v| Value::Timestamp(v),
    Uuid => |v| Value::Uuid(v),
    serde_json::Value => |v| Value::Json(v),
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Option<T>> for Operand {
    fn from(v: Option<T>) -> Self {
        Operand::Value(Value::from(v))
    }
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Operand::Value(v)
    }
}

impl<T: Into<Operand>> From<Vec<T>> for Operand {
    fn from(items: Vec<T>) -> Self {
        Operand::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Operand>, const N: usize> From<[T; N]> for Operand {
    fn from(items: [T; N]) -> Self {
        Operand::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<Raw> for Operand {
    fn from(raw: Raw) -> Self {
        Operand::Raw(raw)
    }
}

impl From<Func> for Operand {
    fn from(func: Func) -> Self {
        Operand::Func(func)
    }
}

impl From<Select> for Operand {
    fn from(select: Select) -> Self {
        Operand::Select(Box::new(select))
    }
}
