//! Value parsing for stanza body lines.
//!
//! Values come in three shapes: a scalar token, a quoted string, or a
//! whitespace/comma separated list. Table references get their own splitter
//! because their database lists embed commas (`pub,archive.transcript`), so
//! they may only be separated by whitespace.
//!
//! All helpers return a bare [`ParseErrorKind`]; the parser attaches the
//! file name and line number.

use smallvec::SmallVec;
use tl_core::TableRef;

use crate::error::ParseErrorKind;

/// Parses a scalar value: one bare token or one quoted string.
pub fn parse_scalar(key: &str, raw: &str) -> Result<String, ParseErrorKind> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ParseErrorKind::MissingValue(key.to_owned()));
    }
    if let Some(quoted) = raw.strip_prefix('"') {
        let Some(inner) = quoted.strip_suffix('"') else {
            return Err(ParseErrorKind::UnterminatedQuote);
        };
        return Ok(inner.to_owned());
    }
    if raw.split_whitespace().nth(1).is_some() {
        return Err(ParseErrorKind::ValueArity(key.to_owned()));
    }
    Ok(raw.to_owned())
}

/// Parses free text: a quoted string, or the whole trimmed remainder.
///
/// Used for descriptions, where unquoted multi-word values are welcome.
pub fn parse_text(raw: &str) -> Result<String, ParseErrorKind> {
    let raw = raw.trim();
    if let Some(quoted) = raw.strip_prefix('"') {
        let Some(inner) = quoted.strip_suffix('"') else {
            return Err(ParseErrorKind::UnterminatedQuote);
        };
        return Ok(inner.to_owned());
    }
    Ok(raw.to_owned())
}

/// Splits a whitespace/comma separated list into its tokens.
///
/// An empty value yields an empty list.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Parses a boolean value: exactly `true` or `false`.
pub fn parse_bool(raw: &str) -> Result<bool, ParseErrorKind> {
    match raw.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(ParseErrorKind::BadBool(other.to_owned())),
    }
}

/// Parses a ratio in `0.0..=1.0`.
pub fn parse_ratio(raw: &str) -> Result<f64, ParseErrorKind> {
    let raw = raw.trim();
    let value: f64 = raw
        .parse()
        .map_err(|_| ParseErrorKind::BadRatio(raw.to_owned()))?;
    if !(0.0..=1.0).contains(&value) {
        return Err(ParseErrorKind::RatioOutOfRange(value));
    }
    Ok(value)
}

/// Parses a table reference: `table` or `db1,db2.table`.
///
/// A bare table name is unrestricted (any database); wildcards in the table
/// part are the caller's business and pass through untouched.
pub fn parse_table_ref(raw: &str) -> Result<TableRef, ParseErrorKind> {
    let raw = raw.trim();
    if raw.is_empty() || raw.contains(char::is_whitespace) {
        return Err(ParseErrorKind::BadTableRef(raw.to_owned()));
    }
    let (databases, table) = match raw.split_once('.') {
        Some((dbs, table)) => (parse_db_list(dbs, raw)?, table),
        None => (SmallVec::new(), raw),
    };
    if table.is_empty() || table.contains('.') {
        return Err(ParseErrorKind::BadTableRef(raw.to_owned()));
    }
    Ok(TableRef {
        databases,
        table: table.to_owned(),
    })
}

/// Parses a field declaration spec: `table.field` or `db1,db2.table.field`.
pub fn parse_field_spec(
    raw: &str,
) -> Result<(SmallVec<[String; 2]>, String, String), ParseErrorKind> {
    let raw = raw.trim();
    if raw.contains(char::is_whitespace) {
        return Err(ParseErrorKind::BadFieldSpec(raw.to_owned()));
    }
    let parts: Vec<&str> = raw.split('.').collect();
    let (databases, table, field) = match parts.as_slice() {
        [table, field] => (SmallVec::new(), *table, *field),
        [dbs, table, field] => (parse_db_list(dbs, raw)?, *table, *field),
        _ => return Err(ParseErrorKind::BadFieldSpec(raw.to_owned())),
    };
    if table.is_empty() || field.is_empty() {
        return Err(ParseErrorKind::BadFieldSpec(raw.to_owned()));
    }
    Ok((databases, table.to_owned(), field.to_owned()))
}

/// Splits the comma list ahead of the first `.` in a table or field spec.
fn parse_db_list(dbs: &str, context: &str) -> Result<SmallVec<[String; 2]>, ParseErrorKind> {
    let mut list = SmallVec::new();
    for db in dbs.split(',') {
        if db.is_empty() {
            return Err(ParseErrorKind::BadTableRef(context.to_owned()));
        }
        list.push(db.to_owned());
    }
    Ok(list)
}
