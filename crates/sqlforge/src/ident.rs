//! SQL identifier escaping.
//!
//! Identifiers (tables, columns, aliases) are never bound as parameters, so
//! they are rendered inline, wrapped in backticks:
//!
//! - Each `.`-separated segment is quoted on its own: `t.col` -> `` `t`.`col` ``
//! - Embedded backticks are doubled and NUL bytes are dropped
//! - A trailing `.*` is kept as a bare wildcard: `t.*` -> `` `t`.* ``
//! - `"name as alias"` splits into two escaped halves joined by ` as `
//!
//! # Example
//! ```
//! use sqlforge::ident::{Ident, escape};
//!
//! assert_eq!(Ident::parse("db.users").to_sql(), "`db`.`users`");
//! assert_eq!(escape("users as u"), "`users` as `u`");
//! ```

/// Identifier delimiter.
pub const DELIMITER: char = '`';

/// A part of a SQL identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentPart {
    /// A name that gets quoted.
    Name(String),
    /// The `*` wildcard after a qualifier.
    Wildcard,
}

/// A possibly qualified SQL identifier (`schema.table.column`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub parts: Vec<IdentPart>,
}

impl Ident {
    /// Parse a dotted identifier.
    ///
    /// Parsing never fails: every character is representable once quoted.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim_end();
        if let Some(qualifier) = trimmed.strip_suffix(".*") {
            let mut parts: Vec<IdentPart> = qualifier
                .split('.')
                .map(|seg| IdentPart::Name(seg.to_string()))
                .collect();
            parts.push(IdentPart::Wildcard);
            return Self { parts };
        }

        Self {
            parts: s
                .split('.')
                .map(|seg| IdentPart::Name(seg.to_string()))
                .collect(),
        }
    }

    /// Render the identifier as SQL.
    pub fn to_sql(&self) -> String {
        let mut out = String::new();
        self.write_sql(&mut out);
        out
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            match part {
                IdentPart::Name(name) => write_quoted(out, name),
                IdentPart::Wildcard => out.push('*'),
            }
        }
    }
}

/// Quote a single segment, doubling embedded delimiters and dropping NULs.
pub fn quote(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len() + 2);
    write_quoted(&mut out, segment);
    out
}

fn write_quoted(out: &mut String, segment: &str) {
    out.push(DELIMITER);
    for ch in segment.chars() {
        match ch {
            DELIMITER => {
                out.push(DELIMITER);
                out.push(DELIMITER);
            }
            '\0' => {}
            _ => out.push(ch),
        }
    }
    out.push(DELIMITER);
}

/// Escape a name that may carry an ` as ` alias and dotted qualifiers.
pub fn escape(name: &str) -> String {
    if let Some((base, alias)) = name.split_once(" as ") {
        return format!("{} as {}", escape(base.trim()), escape(alias.trim()));
    }
    Ident::parse(name).to_sql()
}
