//! Statement composition: quoting rules and an ordered clause buffer.

use crate::error::OptionsError;
use std::fmt::Display;

/// Quote identifier (double quotes, embedded quotes doubled).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Quote string literal. Backslash goes first so the quote escapes survive.
pub fn quoted_literal(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

pub fn bool_literal(b: bool) -> &'static str {
    if b {
        "TRUE"
    } else {
        "FALSE"
    }
}

/// A typed options struct that renders to exactly one SQL statement.
pub trait SqlStatement {
    /// Check required fields and field combinations. Runs before any SQL is built.
    fn validate(&self) -> Result<(), OptionsError>;

    /// Render the statement. Callers go through [`SqlStatement::to_sql`].
    fn build(&self) -> String;

    fn to_sql(&self) -> Result<String, OptionsError> {
        self.validate()?;
        Ok(self.build())
    }
}

/// Ordered clause buffer. Each push appends one space-separated clause; optional
/// pushes append nothing when the value is absent.
#[derive(Debug, Default)]
pub struct StatementBuf {
    parts: Vec<String>,
}

impl StatementBuf {
    pub fn new(head: &str) -> Self {
        StatementBuf {
            parts: vec![head.to_string()],
        }
    }

    pub fn push(&mut self, clause: impl Into<String>) -> &mut Self {
        let clause = clause.into();
        if !clause.is_empty() {
            self.parts.push(clause);
        }
        self
    }

    pub fn keyword_if(&mut self, cond: bool, keyword: &str) -> &mut Self {
        if cond {
            self.parts.push(keyword.to_string());
        }
        self
    }

    /// `KEY = value` with the value rendered as-is.
    pub fn param<T: Display>(&mut self, key: &str, value: T) -> &mut Self {
        self.parts.push(format!("{} = {}", key, value));
        self
    }

    pub fn opt_param<T: Display>(&mut self, key: &str, value: Option<T>) -> &mut Self {
        if let Some(v) = value {
            self.param(key, v);
        }
        self
    }

    /// `KEY = 'value'` when present.
    pub fn opt_string(&mut self, key: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value {
            self.param(key, quoted_literal(v));
        }
        self
    }

    /// `KEY = TRUE|FALSE` when present.
    pub fn opt_bool(&mut self, key: &str, value: Option<bool>) -> &mut Self {
        if let Some(v) = value {
            self.param(key, bool_literal(v));
        }
        self
    }

    /// `prefix (a, b, c)`; nothing when `items` is empty.
    pub fn list(&mut self, prefix: &str, items: &[String]) -> &mut Self {
        if !items.is_empty() {
            let body = format!("({})", items.join(", "));
            if prefix.is_empty() {
                self.parts.push(body);
            } else {
                self.parts.push(format!("{} {}", prefix, body));
            }
        }
        self
    }

    pub fn finish(&self) -> String {
        self.parts.join(" ")
    }
}

/// Helper for "exactly one action" alter statements.
pub fn exactly_one(set: &[bool], fields: &'static str) -> Result<(), OptionsError> {
    if set.iter().filter(|b| **b).count() != 1 {
        return Err(OptionsError::ExactlyOneOf(fields));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_double_embedded_quotes() {
        assert_eq!(quoted("my\"db"), "\"my\"\"db\"");
        assert_eq!(quoted("plain"), "\"plain\"");
    }

    #[test]
    fn literals_escape_quotes_and_backslashes() {
        assert_eq!(quoted_literal("it's"), "'it\\'s'");
        assert_eq!(quoted_literal("a\\b"), "'a\\\\b'");
    }

    #[test]
    fn absent_optional_clauses_render_nothing() {
        let mut buf = StatementBuf::new("CREATE DATABASE");
        buf.push(quoted("D"))
            .opt_param::<i32>("DATA_RETENTION_TIME_IN_DAYS", None)
            .opt_string("COMMENT", None)
            .opt_bool("AUTO_REFRESH", None)
            .list("PARTITION BY", &[]);
        assert_eq!(buf.finish(), "CREATE DATABASE \"D\"");
    }

    #[test]
    fn present_clauses_render_in_push_order() {
        let mut buf = StatementBuf::new("X");
        buf.opt_bool("B", Some(false))
            .opt_param("N", Some(3))
            .list("PARTITION BY", &["a".into(), "b".into()]);
        assert_eq!(buf.finish(), "X B = FALSE N = 3 PARTITION BY (a, b)");
    }

    #[test]
    fn exactly_one_rejects_zero_and_many() {
        assert!(exactly_one(&[false, false], "a, b").is_err());
        assert!(exactly_one(&[true, true], "a, b").is_err());
        assert!(exactly_one(&[false, true], "a, b").is_ok());
    }
}
