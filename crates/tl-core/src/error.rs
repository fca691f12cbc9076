//! Error types for the tl-core crate.
//!
//! This module provides the [`DtfParseError`] type for failures while parsing
//! a dotted `db.table.field` triple. These are recoverable, per-call errors:
//! a malformed triple never invalidates a loaded [`LinkModel`](crate::LinkModel).

/// Errors that can occur while parsing a dotted `db.table.field` triple.
///
/// # Examples
///
/// ```
/// use tl_core::{Dtf, DtfParseError};
///
/// let err = "nodots".parse::<Dtf>().unwrap_err();
/// assert!(matches!(err, DtfParseError::MissingSeparator(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DtfParseError {
    /// The text contains no `.` separator at all.
    #[error("expected db.table or db.table.field, got '{0}'")]
    MissingSeparator(String),

    /// The database component before the first `.` is empty.
    #[error("empty database component in '{0}'")]
    EmptyDatabase(String),

    /// The table component is empty.
    #[error("empty table component in '{0}'")]
    EmptyTable(String),
}
