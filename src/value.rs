//! The coerced literal value type shared by predicates and rendering.

use std::fmt;

/// A literal value extracted from a filter expression.
///
/// Only literals ever become values; column references and function calls
/// are rejected during translation so that every bound parameter is
/// caller-controlled data rather than SQL text.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl Value {
    /// Renders the value as an inline SQL literal.
    ///
    /// Single quotes in strings are doubled, so the result is safe to splice
    /// into generated SQL text.
    pub fn to_sql_literal(&self) -> String {
        match self {
            Value::Str(s) => format!("'{}'", s.replace('\'', "''")),
            Value::Int(i) => i.to_string(),
            // Whole-valued floats keep a decimal point so the literal still
            // reads as a float in the generated SQL.
            Value::Float(f) if f.fract() == 0.0 && f.is_finite() => format!("{f:.1}"),
            Value::Float(f) => f.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => "NULL".to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_sql_literal())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_literal_escapes_quotes() {
        assert_eq!(Value::from("O'Brien").to_sql_literal(), "'O''Brien'");
    }

    #[test]
    fn test_scalar_literals() {
        assert_eq!(Value::Int(-7).to_sql_literal(), "-7");
        assert_eq!(Value::Float(100.5).to_sql_literal(), "100.5");
        assert_eq!(Value::Bool(true).to_sql_literal(), "true");
        assert_eq!(Value::Null.to_sql_literal(), "NULL");
    }

    #[test]
    fn test_whole_valued_float_keeps_decimal_point() {
        assert_eq!(Value::Float(1.0).to_sql_literal(), "1.0");
        assert_eq!(Value::Float(-2.0).to_sql_literal(), "-2.0");
    }
}
