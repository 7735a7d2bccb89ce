use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("invalid query: {0}")]
    Parse(#[from] sqlparser::parser::ParserError),

    #[error("unsupported expression: {0}")]
    UnsupportedExpression(String),

    #[error("unsupported left-hand side: {0}")]
    UnsupportedLeftHandSide(String),

    #[error("unsupported value expression: {0}")]
    UnsupportedValueExpression(String),

    #[error("unsupported operator: {0}")]
    UnsupportedOperator(String),

    #[error("functions are not allowed in filter expressions")]
    FunctionsNotAllowed,

    #[error("column references are not allowed as values")]
    ColumnAsValueNotAllowed,

    #[error("invalid integer value: {0}")]
    InvalidInteger(String),

    #[error("invalid float value: {0}")]
    InvalidFloat(String),

    #[error("LIKE pattern must be a string")]
    LikePatternMustBeString,
}
