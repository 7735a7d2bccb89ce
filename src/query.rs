//! Minimal query-builder state: a table plus an AND-composed predicate.

use crate::error::FilterError;
use crate::path::JsonColumns;
use crate::predicate::{Predicate, quote_ident};
use crate::translate;
use crate::value::Value;

/// Builder state for a `SELECT * FROM <table>` query with an optional
/// filter.
///
/// Each successful [`add_predicate`](Self::add_predicate) call returns a new
/// query with the translated WHERE clause ANDed onto any predicate already
/// present. On failure the original query is untouched, so the call is a
/// no-op for the caller.
#[derive(Debug, Clone, Default)]
pub struct SelectQuery {
    table: String,
    predicate: Option<Predicate>,
}

impl SelectQuery {
    pub fn from(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            predicate: None,
        }
    }

    /// Translates a WHERE clause and ANDs it onto the query.
    pub fn add_predicate(
        &self,
        json_columns: &JsonColumns,
        where_str: &str,
    ) -> Result<Self, FilterError> {
        let predicate = translate::parse_where(json_columns, where_str)?;
        let combined = match &self.predicate {
            Some(existing) => existing.clone().and(predicate),
            None => predicate,
        };
        Ok(Self {
            table: self.table.clone(),
            predicate: Some(combined),
        })
    }

    /// Renders the query with inline literals.
    pub fn to_sql(&self) -> String {
        match &self.predicate {
            Some(predicate) => format!(
                "SELECT * FROM {} WHERE {}",
                quote_ident(&self.table),
                predicate.to_sql()
            ),
            None => format!("SELECT * FROM {}", quote_ident(&self.table)),
        }
    }

    /// Renders the query with `?` placeholders and the bound parameter list.
    pub fn to_prepared_sql(&self) -> (String, Vec<Value>) {
        match &self.predicate {
            Some(predicate) => {
                let (clause, params) = predicate.to_prepared_sql();
                (
                    format!("SELECT * FROM {} WHERE {}", quote_ident(&self.table), clause),
                    params,
                )
            }
            None => (format!("SELECT * FROM {}", quote_ident(&self.table)), Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_without_predicate() {
        assert_eq!(
            SelectQuery::from("users").to_sql(),
            r#"SELECT * FROM "users""#
        );
    }

    #[test]
    fn test_predicates_combine_with_and() {
        let columns = JsonColumns::new(["meta"]);
        let query = SelectQuery::from("users")
            .add_predicate(&columns, "id = 1")
            .unwrap()
            .add_predicate(&columns, "meta.verified = true")
            .unwrap();
        assert_eq!(
            query.to_sql(),
            r#"SELECT * FROM "users" WHERE (("id" = 1) AND JSONExtract(meta, '$.verified') = true)"#
        );
    }

    #[test]
    fn test_failed_translation_leaves_query_unchanged() {
        let columns = JsonColumns::new(["meta"]);
        let query = SelectQuery::from("users");
        let err = query
            .add_predicate(&columns, "LENGTH(name) > 5")
            .unwrap_err();
        assert_eq!(err, FilterError::FunctionsNotAllowed);
        assert_eq!(query.to_sql(), r#"SELECT * FROM "users""#);
    }
}
