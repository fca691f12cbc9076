//! The `(database, table, field)` addressing triple and the join-edge pair.
//!
//! [`Dtf`] is the addressing unit for every relation and route query: a fully
//! qualified column written in dotted form as `db.table.field`. [`JoinPair`]
//! is one directed join step between two such columns, recording the
//! identifier set that declared them equivalent.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::set::SetId;
use crate::error::DtfParseError;

/// A `(database, table, field)` triple.
///
/// The field component may be empty when only a table is being located,
/// which is how route queries address their endpoints.
///
/// # Examples
///
/// ```
/// use tl_core::Dtf;
///
/// let dtf: Dtf = "pub.transcript.tx_id".parse()?;
/// assert_eq!(dtf.database, "pub");
/// assert_eq!(dtf.table, "transcript");
/// assert_eq!(dtf.field, "tx_id");
///
/// // Table-only form: field stays empty.
/// let t: Dtf = "pub.transcript".parse()?;
/// assert!(t.field.is_empty());
/// # Ok::<(), tl_core::DtfParseError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dtf {
    /// Database name.
    pub database: String,

    /// Table name.
    pub table: String,

    /// Field name; empty when only a table is addressed.
    pub field: String,
}

impl Dtf {
    /// Creates a new triple from its three components.
    ///
    /// # Examples
    ///
    /// ```
    /// use tl_core::Dtf;
    ///
    /// let dtf = Dtf::new("pub", "transcript", "tx_id");
    /// assert_eq!(dtf.to_string(), "pub.transcript.tx_id");
    /// ```
    #[inline]
    #[must_use]
    pub fn new(
        database: impl Into<String>,
        table: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self {
            database: database.into(),
            table: table.into(),
            field: field.into(),
        }
    }

    /// Parses a dotted `db.table.field` triple.
    ///
    /// The two-component form `db.table` is accepted and leaves the field
    /// empty. Anything after the second `.` is the field, so field names
    /// themselves may not contain further qualification.
    ///
    /// # Errors
    ///
    /// Returns a [`DtfParseError`] when the separator is missing or the
    /// database/table components are empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use tl_core::Dtf;
    ///
    /// let dtf = Dtf::from_dotted("archive.chain12.score")?;
    /// assert_eq!(dtf.field, "score");
    ///
    /// assert!(Dtf::from_dotted("justatable").is_err());
    /// assert!(Dtf::from_dotted(".t.f").is_err());
    /// # Ok::<(), tl_core::DtfParseError>(())
    /// ```
    pub fn from_dotted(triple: &str) -> Result<Self, DtfParseError> {
        let Some((database, rest)) = triple.split_once('.') else {
            return Err(DtfParseError::MissingSeparator(triple.to_owned()));
        };
        if database.is_empty() {
            return Err(DtfParseError::EmptyDatabase(triple.to_owned()));
        }
        let (table, field) = match rest.split_once('.') {
            Some((table, field)) => (table, field),
            None => (rest, ""),
        };
        if table.is_empty() {
            return Err(DtfParseError::EmptyTable(triple.to_owned()));
        }
        Ok(Self::new(database, table, field))
    }

    /// Returns `true` if `self` and `other` address the same database and
    /// table, ignoring the field component.
    ///
    /// # Examples
    ///
    /// ```
    /// use tl_core::Dtf;
    ///
    /// let a = Dtf::new("pub", "transcript", "tx_id");
    /// let b = Dtf::new("pub", "transcript", "name");
    /// let c = Dtf::new("archive", "transcript", "tx_id");
    ///
    /// assert!(a.same_table(&b));
    /// assert!(!a.same_table(&c));
    /// ```
    #[inline]
    #[must_use]
    pub fn same_table(&self, other: &Self) -> bool {
        self.database == other.database && self.table == other.table
    }
}

/// Returns `true` if every triple in the list addresses the same database
/// and table.
///
/// An empty list is trivially all-same.
///
/// # Examples
///
/// ```
/// use tl_core::{all_same_table, Dtf};
///
/// let list = [
///     Dtf::new("pub", "transcript", "tx_id"),
///     Dtf::new("pub", "transcript", "name"),
/// ];
/// assert!(all_same_table(&list));
/// ```
#[must_use]
pub fn all_same_table(list: &[Dtf]) -> bool {
    match list.split_first() {
        Some((first, rest)) => rest.iter().all(|dtf| first.same_table(dtf)),
        None => true,
    }
}

impl fmt::Display for Dtf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.database, self.table, self.field)
    }
}

impl FromStr for Dtf {
    type Err = DtfParseError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_dotted(s)
    }
}

/// One directed join step: `source.field` and `target.field` hold the same
/// identifier according to the set named by `via`.
///
/// Pairs are plain owned values created per query; `via` indexes into the
/// [`LinkModel`](crate::LinkModel) that produced them rather than borrowing
/// it, so results can outlive intermediate references freely.
///
/// # Examples
///
/// ```
/// use tl_core::{Dtf, JoinPair, SetId};
///
/// let pair = JoinPair {
///     source: Dtf::new("pub", "transcript", "tx_id"),
///     target: Dtf::new("pub", "exon", "tx_id"),
///     via: SetId::new(0),
/// };
/// assert_eq!(pair.to_string(), "pub.transcript.tx_id -> pub.exon.tx_id");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JoinPair {
    /// Field on the table the query started from.
    pub source: Dtf,

    /// Field on the table being joined to.
    pub target: Dtf,

    /// The identifier set this pair is based on.
    pub via: SetId,
}

impl JoinPair {
    /// Creates a new pair.
    #[inline]
    #[must_use]
    pub fn new(source: Dtf, target: Dtf, via: SetId) -> Self {
        Self { source, target, via }
    }
}

impl fmt::Display for JoinPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dotted_full_triple() {
        let dtf = Dtf::from_dotted("pub.transcript.tx_id").expect("parse failed");
        assert_eq!(dtf.database, "pub");
        assert_eq!(dtf.table, "transcript");
        assert_eq!(dtf.field, "tx_id");
    }

    #[test]
    fn test_from_dotted_table_only() {
        let dtf = Dtf::from_dotted("pub.transcript").expect("parse failed");
        assert_eq!(dtf.database, "pub");
        assert_eq!(dtf.table, "transcript");
        assert!(dtf.field.is_empty());
    }

    #[test]
    fn test_from_dotted_missing_separator() {
        let err = Dtf::from_dotted("transcript").unwrap_err();
        assert_eq!(err, DtfParseError::MissingSeparator("transcript".to_owned()));
    }

    #[test]
    fn test_from_dotted_empty_components() {
        assert!(matches!(
            Dtf::from_dotted(".transcript.tx_id"),
            Err(DtfParseError::EmptyDatabase(_))
        ));
        assert!(matches!(
            Dtf::from_dotted("pub..tx_id"),
            Err(DtfParseError::EmptyTable(_))
        ));
        assert!(matches!(
            Dtf::from_dotted("pub."),
            Err(DtfParseError::EmptyTable(_))
        ));
    }

    #[test]
    fn test_from_dotted_empty_field_allowed() {
        // Trailing dot means an explicitly empty field.
        let dtf = Dtf::from_dotted("pub.transcript.").expect("parse failed");
        assert!(dtf.field.is_empty());
    }

    #[test]
    fn test_display_round_trip() {
        let dtf = Dtf::new("pub", "transcript", "tx_id");
        let parsed: Dtf = dtf.to_string().parse().expect("parse failed");
        assert_eq!(dtf, parsed);
    }

    #[test]
    fn test_same_table_ignores_field() {
        let a = Dtf::new("pub", "t1", "x");
        let b = Dtf::new("pub", "t1", "y");
        assert!(a.same_table(&b));
        assert!(!a.same_table(&Dtf::new("other", "t1", "x")));
        assert!(!a.same_table(&Dtf::new("pub", "t2", "x")));
    }

    #[test]
    fn test_all_same_table() {
        assert!(all_same_table(&[]));
        let list = [
            Dtf::new("pub", "t1", "a"),
            Dtf::new("pub", "t1", "b"),
            Dtf::new("pub", "t1", ""),
        ];
        assert!(all_same_table(&list));

        let mixed = [Dtf::new("pub", "t1", "a"), Dtf::new("pub", "t2", "a")];
        assert!(!all_same_table(&mixed));
    }

    #[test]
    fn test_dtf_serialization() {
        let dtf = Dtf::new("pub", "transcript", "tx_id");
        let json = serde_json::to_string(&dtf).expect("serialize failed");
        let parsed: Dtf = serde_json::from_str(&json).expect("deserialize failed");
        assert_eq!(dtf, parsed);
    }

    #[test]
    fn test_join_pair_display() {
        let pair = JoinPair::new(
            Dtf::new("pub", "transcript", "tx_id"),
            Dtf::new("archive", "exon", "tx_id"),
            SetId::new(3),
        );
        assert_eq!(
            pair.to_string(),
            "pub.transcript.tx_id -> archive.exon.tx_id"
        );
    }
}
