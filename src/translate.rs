//! The recursive translator from the parsed SQL expression AST to the
//! predicate tree.
//!
//! Parsing itself is delegated to `sqlparser`; this module owns everything
//! after it: classifying left-hand sides as plain columns or JSON paths,
//! coercing right-hand literals, mapping operators, and choosing between
//! the typed and raw emission paths.

use crate::error::FilterError;
use crate::path::{self, ColumnRef, JsonColumns};
use crate::predicate::{CompareOp, Predicate};
use crate::value::Value;
use sqlparser::ast::{
    BinaryOperator, Expr, SetExpr, Statement, UnaryOperator, Value as AstValue,
};
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;

/// Parses a WHERE clause string and translates it into a predicate tree.
///
/// The input is first run through the path codec so that JSON path syntax
/// survives the SQL grammar, then parsed as the selection of a synthetic
/// `SELECT`, mirroring how the clause will eventually be used.
pub fn parse_where(
    json_columns: &JsonColumns,
    where_str: &str,
) -> Result<Predicate, FilterError> {
    let encoded = path::encode(where_str);
    log::debug!("encoded filter {:?} as {:?}", where_str, encoded);

    let sql = format!("SELECT * FROM t WHERE {encoded}");
    let statements = Parser::parse_sql(&GenericDialect {}, &sql)?;
    let selection = statements
        .first()
        .and_then(|statement| match statement {
            Statement::Query(query) => match query.body.as_ref() {
                SetExpr::Select(select) => select.selection.clone(),
                _ => None,
            },
            _ => None,
        })
        .ok_or_else(|| FilterError::UnsupportedExpression(where_str.to_string()))?;

    translate(json_columns, &selection)
}

/// Translates one node of the expression AST.
///
/// Only boolean combinators, comparisons, membership tests, and grouping are
/// accepted; parentheses are structural and grouping is re-added at render
/// time.
pub fn translate(json_columns: &JsonColumns, expr: &Expr) -> Result<Predicate, FilterError> {
    match expr {
        Expr::BinaryOp { left, op, right } => match op {
            BinaryOperator::And => {
                Ok(translate(json_columns, left)?.and(translate(json_columns, right)?))
            }
            BinaryOperator::Or => {
                Ok(translate(json_columns, left)?.or(translate(json_columns, right)?))
            }
            BinaryOperator::Eq => comparison(json_columns, left, CompareOp::Eq, right),
            BinaryOperator::NotEq => comparison(json_columns, left, CompareOp::NotEq, right),
            BinaryOperator::Lt => comparison(json_columns, left, CompareOp::Lt, right),
            BinaryOperator::Gt => comparison(json_columns, left, CompareOp::Gt, right),
            BinaryOperator::LtEq => comparison(json_columns, left, CompareOp::LtEq, right),
            BinaryOperator::GtEq => comparison(json_columns, left, CompareOp::GtEq, right),
            other => Err(FilterError::UnsupportedOperator(other.to_string())),
        },
        Expr::Like {
            negated: false,
            expr,
            pattern,
            ..
        } => comparison(json_columns, expr, CompareOp::Like, pattern),
        Expr::Like { negated: true, .. } => {
            Err(FilterError::UnsupportedOperator("NOT LIKE".to_string()))
        }
        Expr::InList {
            expr,
            list,
            negated: false,
        } => membership(json_columns, expr, list),
        Expr::InList { negated: true, .. } => {
            Err(FilterError::UnsupportedOperator("NOT IN".to_string()))
        }
        Expr::Nested(inner) => translate(json_columns, inner),
        other => Err(FilterError::UnsupportedExpression(other.to_string())),
    }
}

fn comparison(
    json_columns: &JsonColumns,
    left: &Expr,
    op: CompareOp,
    right: &Expr,
) -> Result<Predicate, FilterError> {
    let column = resolve_column(json_columns, left)?;
    let value = coerce_value(right)?;
    log::trace!("comparison {:?} {} {:?}", column, op, value);

    match column {
        ColumnRef::Plain(name) => {
            if op == CompareOp::Like && !matches!(value, Value::Str(_)) {
                return Err(FilterError::LikePatternMustBeString);
            }
            Ok(Predicate::Compare {
                column: name,
                op,
                value,
            })
        }
        ColumnRef::JsonPath { column, path } => Ok(Predicate::Raw {
            sql: format!("{} {} ?", json_extract(&column, &path), op),
            params: vec![value],
        }),
    }
}

fn membership(
    json_columns: &JsonColumns,
    left: &Expr,
    list: &[Expr],
) -> Result<Predicate, FilterError> {
    let column = resolve_column(json_columns, left)?;
    let values = list.iter().map(coerce_value).collect::<Result<Vec<_>, _>>()?;

    match column {
        ColumnRef::Plain(name) => Ok(Predicate::InList {
            column: name,
            values,
        }),
        ColumnRef::JsonPath { column, path } => {
            let placeholders = vec!["?"; values.len()].join(", ");
            Ok(Predicate::Raw {
                sql: format!("{} IN ({placeholders})", json_extract(&column, &path)),
                params: values,
            })
        }
    }
}

/// Resolves the left-hand side of a comparison to a column reference.
fn resolve_column(json_columns: &JsonColumns, expr: &Expr) -> Result<ColumnRef, FilterError> {
    match expr {
        Expr::Identifier(ident) => Ok(path::decode(&ident.value, json_columns)),
        // Explicitly quoted qualified names bypass the codec; treat the
        // joined spelling as an ordinary column.
        Expr::CompoundIdentifier(idents) => Ok(ColumnRef::Plain(
            idents
                .iter()
                .map(|ident| ident.value.as_str())
                .collect::<Vec<_>>()
                .join("."),
        )),
        Expr::Function(_) => Err(FilterError::FunctionsNotAllowed),
        other => Err(FilterError::UnsupportedLeftHandSide(other.to_string())),
    }
}

/// Coerces a right-hand expression to a single literal value.
///
/// Column references are rejected here: allowing them would let a filter
/// compare columns to columns and smuggle SQL through what the renderer
/// treats as bound data.
fn coerce_value(expr: &Expr) -> Result<Value, FilterError> {
    match expr {
        Expr::Identifier(_) | Expr::CompoundIdentifier(_) => {
            Err(FilterError::ColumnAsValueNotAllowed)
        }
        Expr::Value(value) => coerce_literal(&value.value),
        Expr::UnaryOp {
            op: UnaryOperator::Minus,
            expr,
        } => match coerce_value(expr)? {
            Value::Int(i) => Ok(Value::Int(-i)),
            Value::Float(f) => Ok(Value::Float(-f)),
            _ => Err(FilterError::UnsupportedValueExpression(expr.to_string())),
        },
        Expr::Nested(inner) => coerce_value(inner),
        Expr::Function(_) => Err(FilterError::FunctionsNotAllowed),
        other => Err(FilterError::UnsupportedValueExpression(other.to_string())),
    }
}

fn coerce_literal(value: &AstValue) -> Result<Value, FilterError> {
    match value {
        AstValue::SingleQuotedString(s) | AstValue::DoubleQuotedString(s) => {
            Ok(Value::Str(s.clone()))
        }
        AstValue::Number(text, _) => {
            if text.contains('.') || text.contains('e') || text.contains('E') {
                text.parse::<f64>()
                    .map(Value::Float)
                    .map_err(|_| FilterError::InvalidFloat(text.clone()))
            } else {
                text.parse::<i64>()
                    .map(Value::Int)
                    .map_err(|_| FilterError::InvalidInteger(text.clone()))
            }
        }
        AstValue::Boolean(b) => Ok(Value::Bool(*b)),
        AstValue::Null => Ok(Value::Null),
        other => Err(FilterError::UnsupportedValueExpression(other.to_string())),
    }
}

/// Spells the dialect's JSON extraction call for a decoded path.
///
/// The path uses dot separators between fields with `[N]` appended directly
/// for array indices, e.g. `JSONExtract(meta, '$.items[2].name')`. A bare
/// JSON column (empty path) extracts the whole document.
fn json_extract(column: &str, path: &str) -> String {
    if path.is_empty() {
        format!("JSONExtract({column})")
    } else {
        format!("JSONExtract({column}, '$.{path}')")
    }
}
