//! Translates SQL-like WHERE clause strings into composable predicate trees.
//!
//! Columns declared by the caller as JSON documents may be addressed with
//! dotted/indexed path syntax (`meta.items[2].name`); such accesses are
//! rewritten into `JSONExtract` calls in the emitted SQL, with comparison
//! values always passed as bound parameters. Everything else stays on the
//! typed column path of the query builder.
//!
//! The pipeline: the raw clause is lexically encoded so JSON paths survive
//! the SQL grammar, parsed with `sqlparser`, and the resulting AST is walked
//! into a [`Predicate`] tree that renders either inline or prepared SQL.

pub mod error;
pub mod path;
pub mod predicate;
pub mod query;
pub mod translate;
pub mod value;

// --- Public API ---
pub use error::FilterError;
pub use path::{ColumnRef, JsonColumns, decode, encode};
pub use predicate::{CompareOp, Predicate};
pub use query::SelectQuery;
pub use translate::{parse_where, translate};
pub use value::Value;
