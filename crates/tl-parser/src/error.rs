//! Error types for the tl-parser crate.
//!
//! This module provides the [`ParseError`] type for syntax errors in a
//! `.links` source. The parser is the only layer that performs syntactic
//! validation, and every failure carries the file name and the 1-indexed
//! line it occurred on.

use camino::Utf8PathBuf;

/// A syntax error in a `.links` source, located by file and line.
///
/// # Examples
///
/// ```
/// use tl_parser::{ParseError, ParseErrorKind};
///
/// let err = ParseError {
///     file: "all.links".into(),
///     line: 12,
///     kind: ParseErrorKind::UnknownKey("colour".to_owned()),
/// };
/// assert_eq!(err.to_string(), "all.links:12: unknown key 'colour'");
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{file}:{line}: {kind}")]
pub struct ParseError {
    /// Source file being parsed.
    pub file: Utf8PathBuf,

    /// 1-indexed line the error occurred on.
    pub line: u32,

    /// What went wrong.
    pub kind: ParseErrorKind,
}

/// The specific syntax failures the parser can report.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseErrorKind {
    /// Stanza header keyword is not one of the recognized kinds.
    #[error("unknown stanza keyword '{0}'")]
    UnknownStanza(String),

    /// A stanza header was missing its name or argument.
    #[error("'{0}' stanza is missing its name")]
    MissingStanzaName(String),

    /// A stanza header carried more arguments than its keyword takes.
    #[error("'{0}' stanza takes a single name")]
    ExtraStanzaArgs(String),

    /// An indented line appeared before any stanza header.
    #[error("indented line outside of a stanza")]
    OrphanLine,

    /// An indented line under a header-only stanza.
    #[error("'{0}' stanza takes no body lines")]
    UnexpectedBody(String),

    /// A body line that is neither `key: value` nor a `field` declaration.
    #[error("expected 'key: value', got '{0}'")]
    BadBodyLine(String),

    /// A `key: value` line with a key this stanza does not recognize.
    #[error("unknown key '{0}'")]
    UnknownKey(String),

    /// A field option appeared before any `field` line in the stanza.
    #[error("field option '{0}' before any field declaration")]
    FieldOptionOutsideField(String),

    /// A key was given no value.
    #[error("key '{0}' is missing a value")]
    MissingValue(String),

    /// A scalar value held more than one token.
    #[error("expected a single value for '{0}'")]
    ValueArity(String),

    /// A quoted string never closed.
    #[error("unterminated quoted string")]
    UnterminatedQuote,

    /// A value that should be `true` or `false` was something else.
    #[error("expected true or false, got '{0}'")]
    BadBool(String),

    /// A ratio value failed to parse as a number.
    #[error("expected a ratio, got '{0}'")]
    BadRatio(String),

    /// A ratio value parsed but fell outside `0.0..=1.0`.
    #[error("ratio {0} is outside 0.0..=1.0")]
    RatioOutOfRange(f64),

    /// A table reference was malformed.
    #[error("malformed table reference '{0}'")]
    BadTableRef(String),

    /// A `field` declaration was not `[dbs.]table.field`.
    #[error("malformed field spec '{0}', expected [db,db.]table.field")]
    BadFieldSpec(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_locates_file_and_line() {
        let err = ParseError {
            file: "all.links".into(),
            line: 7,
            kind: ParseErrorKind::OrphanLine,
        };
        let msg = err.to_string();
        assert!(msg.starts_with("all.links:7:"));
        assert!(msg.contains("outside of a stanza"));
    }

    #[test]
    fn test_kind_displays() {
        assert_eq!(
            ParseErrorKind::UnknownStanza("widget".to_owned()).to_string(),
            "unknown stanza keyword 'widget'"
        );
        assert_eq!(
            ParseErrorKind::RatioOutOfRange(1.5).to_string(),
            "ratio 1.5 is outside 0.0..=1.0"
        );
        assert_eq!(
            ParseErrorKind::BadFieldSpec("nodots".to_owned()).to_string(),
            "malformed field spec 'nodots', expected [db,db.]table.field"
        );
    }
}
