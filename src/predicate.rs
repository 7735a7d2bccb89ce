//! The predicate tree produced by translation, and its two renderers.
//!
//! A predicate is a closed tagged union: plain-column comparisons and
//! membership tests stay on the typed path, while JSON-path comparisons are
//! raw SQL fragments carrying their own bound parameters. Composition via
//! AND/OR never needs to know which branch produced a leaf.

use crate::value::Value;
use std::fmt;

/// A comparison operator supported on filter predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Like,
}

impl CompareOp {
    pub fn as_sql(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "!=",
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
            CompareOp::LtEq => "<=",
            CompareOp::GtEq => ">=",
            CompareOp::Like => "LIKE",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// One node of the output expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// A typed comparison on an ordinary column.
    Compare {
        column: String,
        op: CompareOp,
        value: Value,
    },
    /// A typed membership test on an ordinary column.
    InList { column: String, values: Vec<Value> },
    /// A literal SQL fragment with one `?` placeholder per bound parameter.
    /// Used for JSON-path columns, which the typed column API cannot express.
    Raw { sql: String, params: Vec<Value> },
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
}

impl Predicate {
    pub fn and(self, other: Predicate) -> Predicate {
        Predicate::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Predicate) -> Predicate {
        Predicate::Or(Box::new(self), Box::new(other))
    }

    /// Renders the predicate with all values spelled as inline SQL literals.
    pub fn to_sql(&self) -> String {
        self.render(&mut RenderMode::Inline)
    }

    /// Renders the predicate with `?` placeholders, returning the SQL text
    /// and the bound parameters in placeholder order.
    pub fn to_prepared_sql(&self) -> (String, Vec<Value>) {
        let mut params = Vec::new();
        let sql = self.render(&mut RenderMode::Prepared(&mut params));
        (sql, params)
    }

    fn render(&self, mode: &mut RenderMode<'_>) -> String {
        match self {
            Predicate::Compare { column, op, value } => {
                format!("({} {} {})", quote_ident(column), op, mode.value(value))
            }
            Predicate::InList { column, values } => {
                let list = values
                    .iter()
                    .map(|v| mode.value(v))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("({} IN ({}))", quote_ident(column), list)
            }
            Predicate::Raw { sql, params } => mode.raw(sql, params),
            Predicate::And(left, right) => {
                format!("({} AND {})", left.render(mode), right.render(mode))
            }
            Predicate::Or(left, right) => {
                format!("({} OR {})", left.render(mode), right.render(mode))
            }
        }
    }
}

enum RenderMode<'a> {
    Inline,
    Prepared(&'a mut Vec<Value>),
}

impl RenderMode<'_> {
    fn value(&mut self, value: &Value) -> String {
        match self {
            RenderMode::Inline => value.to_sql_literal(),
            RenderMode::Prepared(params) => {
                params.push(value.clone());
                "?".to_string()
            }
        }
    }

    /// Emits a raw fragment, either substituting its placeholders with
    /// literals or keeping them and collecting the parameters.
    fn raw(&mut self, sql: &str, params: &[Value]) -> String {
        match self {
            RenderMode::Inline => {
                let mut out = String::with_capacity(sql.len());
                let mut values = params.iter();
                for ch in sql.chars() {
                    if ch == '?' {
                        match values.next() {
                            Some(value) => out.push_str(&value.to_sql_literal()),
                            None => out.push(ch),
                        }
                    } else {
                        out.push(ch);
                    }
                }
                out
            }
            RenderMode::Prepared(collected) => {
                collected.extend(params.iter().cloned());
                sql.to_string()
            }
        }
    }
}

/// Double-quotes an identifier, doubling any embedded quote characters.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
