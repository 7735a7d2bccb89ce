//! The path codec: a reversible lexical rewrite between human JSON path
//! syntax (`meta.items[2].name`) and the flat identifier form the SQL parser
//! accepts (`meta__items__2__name`).
//!
//! The rewrite exists because the generic SQL grammar has no notion of
//! bracketed array indices inside column references. Its output contract is
//! load-bearing: every encoded identifier must decode back to a path that is
//! equal for lookup purposes, and text that merely looks numeric
//! (`100.5`) must never be mistaken for a path.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Separator used in encoded identifiers in place of `.` and `[`.
const SEPARATOR: &str = "__";

/// An identifier followed by one or more `.field` or `[index]` groups.
static PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+(?:\.\w+|\[[^\]]+\])+").expect("valid path pattern"));

/// A bare decimal float literal, which must survive encoding untouched.
static FLOAT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+$").expect("valid float pattern"));

/// Rewrites every path-like substring of a WHERE clause into its flat
/// identifier form.
///
/// Float literals are left untouched, as is anything inside single-quoted
/// SQL string literals (including literals using `''` escapes). Inputs with
/// no path-like substrings are returned unchanged.
pub fn encode(where_str: &str) -> String {
    let mut out = String::with_capacity(where_str.len());
    let mut rest = where_str;
    while let Some(start) = rest.find('\'') {
        out.push_str(&encode_segment(&rest[..start]));
        let end = end_of_string_literal(rest, start);
        out.push_str(&rest[start..end]);
        rest = &rest[end..];
    }
    out.push_str(&encode_segment(rest));
    out
}

/// Returns the byte offset one past the closing quote of the string literal
/// opening at `start`, honoring `''` escapes. An unterminated literal runs
/// to the end of the input; the SQL parser reports it later.
fn end_of_string_literal(s: &str, start: usize) -> usize {
    let bytes = s.as_bytes();
    let mut end = start + 1;
    while let Some(i) = s[end..].find('\'') {
        end = end + i + 1;
        if bytes.get(end) == Some(&b'\'') {
            end += 1;
        } else {
            return end;
        }
    }
    s.len()
}

fn encode_segment(segment: &str) -> String {
    PATH_RE
        .replace_all(segment, |caps: &Captures| {
            let matched = &caps[0];
            if FLOAT_RE.is_match(matched) {
                matched.to_string()
            } else {
                matched
                    .replace('.', SEPARATOR)
                    .replace('[', SEPARATOR)
                    .replace(']', "")
            }
        })
        .into_owned()
}

/// The ordered set of caller-declared JSON columns.
///
/// Declaration order matters: the first column whose name matches an
/// identifier (exactly or as an encoded prefix) wins.
#[derive(Debug, Clone, Default)]
pub struct JsonColumns(Vec<String>);

impl JsonColumns {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(columns.into_iter().map(Into::into).collect())
    }

    fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// A decoded column reference: either an ordinary column or a field inside
/// a JSON document.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnRef {
    Plain(String),
    JsonPath { column: String, path: String },
}

/// Decodes an identifier produced by [`encode`] back into a column
/// reference.
///
/// An identifier equal to a registered JSON column yields an empty path.
/// One starting with `<column>__` has its remainder split on the separator:
/// an all-digits token folds into the preceding field as an array index
/// (`field[N]`); an all-digits token with no preceding field is kept as a
/// bare path component. Anything else is an ordinary column.
pub fn decode(identifier: &str, json_columns: &JsonColumns) -> ColumnRef {
    for column in json_columns.iter() {
        if identifier == column {
            return ColumnRef::JsonPath {
                column: column.to_string(),
                path: String::new(),
            };
        }
        if let Some(rest) = identifier
            .strip_prefix(column)
            .and_then(|r| r.strip_prefix(SEPARATOR))
        {
            return ColumnRef::JsonPath {
                column: column.to_string(),
                path: reassemble_path(rest),
            };
        }
    }
    ColumnRef::Plain(identifier.to_string())
}

fn reassemble_path(encoded: &str) -> String {
    let mut fields: Vec<String> = Vec::new();
    for token in encoded.split(SEPARATOR) {
        if token.parse::<u64>().is_ok()
            && let Some(last) = fields.last_mut()
        {
            last.push('[');
            last.push_str(token);
            last.push(']');
        } else {
            fields.push(token.to_string());
        }
    }
    fields.join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_path(column: &str, path: &str) -> ColumnRef {
        ColumnRef::JsonPath {
            column: column.to_string(),
            path: path.to_string(),
        }
    }

    #[test]
    fn test_encode_is_idempotent_without_paths() {
        let input = "status = 'active' AND count >= 10";
        assert_eq!(encode(input), input);
    }

    #[test]
    fn test_encode_leaves_floats_untouched() {
        assert_eq!(encode("price > 100.5"), "price > 100.5");
        assert_eq!(encode("100.5"), "100.5");
    }

    #[test]
    fn test_encode_simple_path() {
        assert_eq!(encode("meta.name = 'John'"), "meta__name = 'John'");
    }

    #[test]
    fn test_encode_indexed_path() {
        assert_eq!(
            encode("meta.alfa[0][1].gamma = 'value'"),
            "meta__alfa__0__1__gamma = 'value'"
        );
    }

    #[test]
    fn test_encode_skips_string_literals() {
        assert_eq!(
            encode("email LIKE '%@example.com'"),
            "email LIKE '%@example.com'"
        );
        assert_eq!(
            encode("note = 'it''s a.b' AND meta.name = 'x'"),
            "note = 'it''s a.b' AND meta__name = 'x'"
        );
    }

    #[test]
    fn test_decode_exact_column() {
        let columns = JsonColumns::new(["meta"]);
        assert_eq!(decode("meta", &columns), json_path("meta", ""));
    }

    #[test]
    fn test_decode_folds_indices() {
        let columns = JsonColumns::new(["meta"]);
        assert_eq!(
            decode("meta__alfa__0__1__gamma", &columns),
            json_path("meta", "alfa[0][1].gamma")
        );
    }

    #[test]
    fn test_decode_leading_digit_token_stays_a_field() {
        let columns = JsonColumns::new(["meta"]);
        assert_eq!(decode("meta__0__b", &columns), json_path("meta", "0.b"));
    }

    #[test]
    fn test_decode_unknown_column_is_plain() {
        let columns = JsonColumns::new(["meta"]);
        assert_eq!(
            decode("settings__theme", &columns),
            ColumnRef::Plain("settings__theme".to_string())
        );
        assert_eq!(decode("id", &columns), ColumnRef::Plain("id".to_string()));
    }

    #[test]
    fn test_round_trip() {
        let columns = JsonColumns::new(["meta", "settings"]);
        for (input, column, path) in [
            ("meta.name", "meta", "name"),
            ("meta.items[2].properties.name", "meta", "items[2].properties.name"),
            ("settings.preferences[0].theme", "settings", "preferences[0].theme"),
        ] {
            assert_eq!(decode(&encode(input), &columns), json_path(column, path));
        }
    }
}
