//! Table references and catalog wildcard matching.
//!
//! A [`TableRef`] names a table in one or more databases; dependency, type,
//! and ignore stanzas are all built from them. Table names in type stanzas
//! may use catalog wildcards: `%` matches any run of characters and `?`
//! matches exactly one, mirroring the pattern syntax the surrounding catalog
//! tooling uses for physical table lookups.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Matches a catalog wildcard pattern against a table name.
///
/// `%` matches any (possibly empty) run of characters and `?` matches exactly
/// one. Matching is byte-wise; table names are ASCII in practice.
///
/// # Examples
///
/// ```
/// use tl_core::wildcard_match;
///
/// assert!(wildcard_match("%_align", "part_align"));
/// assert!(wildcard_match("chain?", "chain3"));
/// assert!(wildcard_match("transcript", "transcript"));
/// assert!(!wildcard_match("chain?", "chain12"));
/// ```
#[must_use]
pub fn wildcard_match(pattern: &str, name: &str) -> bool {
    let p = pattern.as_bytes();
    let n = name.as_bytes();
    let (mut pi, mut ni) = (0usize, 0usize);
    // Most recent '%' position and the name position it was tried at, for
    // backtracking when a literal run fails further along.
    let mut backtrack: Option<(usize, usize)> = None;

    while ni < n.len() {
        if pi < p.len() && (p[pi] == b'?' || p[pi] == n[ni]) {
            pi += 1;
            ni += 1;
        } else if pi < p.len() && p[pi] == b'%' {
            backtrack = Some((pi, ni));
            pi += 1;
        } else if let Some((bp, bn)) = backtrack {
            pi = bp + 1;
            ni = bn + 1;
            backtrack = Some((bp, bn + 1));
        } else {
            return false;
        }
    }
    while pi < p.len() && p[pi] == b'%' {
        pi += 1;
    }
    pi == p.len()
}

/// A table in one or more databases.
///
/// An empty database list means the reference is unrestricted and matches the
/// table in any database. The table name may carry catalog wildcards when the
/// reference comes from a `type` stanza.
///
/// # Examples
///
/// ```
/// use tl_core::TableRef;
///
/// let r = TableRef::new(vec!["pub".to_owned()], "%_align");
/// assert!(r.matches("pub", "part_align"));
/// assert!(!r.matches("archive", "part_align"));
///
/// let unrestricted = TableRef::new(vec![], "transcript");
/// assert!(unrestricted.matches("anything", "transcript"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRef {
    /// Databases this reference covers; empty means unrestricted.
    pub databases: SmallVec<[String; 2]>,

    /// Table name, possibly containing `%`/`?` wildcards.
    pub table: String,
}

impl TableRef {
    /// Creates a new table reference.
    #[must_use]
    pub fn new(databases: impl IntoIterator<Item = String>, table: impl Into<String>) -> Self {
        Self {
            databases: databases.into_iter().collect(),
            table: table.into(),
        }
    }

    /// Returns `true` if this reference covers the given database.
    ///
    /// An empty database list covers everything.
    #[inline]
    #[must_use]
    pub fn allows_database(&self, database: &str) -> bool {
        self.databases.is_empty() || self.databases.iter().any(|db| db == database)
    }

    /// Returns `true` if this reference covers `(database, table)`,
    /// honoring wildcards in the table name.
    #[inline]
    #[must_use]
    pub fn matches(&self, database: &str, table: &str) -> bool {
        self.allows_database(database) && wildcard_match(&self.table, table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_match_literal() {
        assert!(wildcard_match("transcript", "transcript"));
        assert!(!wildcard_match("transcript", "transcripts"));
        assert!(!wildcard_match("transcripts", "transcript"));
    }

    #[test]
    fn test_wildcard_match_percent() {
        assert!(wildcard_match("%", ""));
        assert!(wildcard_match("%", "anything"));
        assert!(wildcard_match("chr%_gap", "chr10_random_gap"));
        assert!(wildcard_match("%align%", "part_align_v2"));
        assert!(!wildcard_match("%_gap", "gap"));
    }

    #[test]
    fn test_wildcard_match_question() {
        assert!(wildcard_match("chain?", "chain3"));
        assert!(!wildcard_match("chain?", "chain"));
        assert!(!wildcard_match("chain?", "chain33"));
        assert!(wildcard_match("c?ain%", "chain_self"));
    }

    #[test]
    fn test_wildcard_match_backtracking() {
        // The first '%' must give characters back for the tail to match.
        assert!(wildcard_match("%ab", "aab"));
        assert!(wildcard_match("%a%b", "xaxb"));
        assert!(!wildcard_match("%ab", "aba"));
    }

    #[test]
    fn test_table_ref_database_filter() {
        let r = TableRef::new(vec!["pub".to_owned(), "archive".to_owned()], "transcript");
        assert!(r.matches("pub", "transcript"));
        assert!(r.matches("archive", "transcript"));
        assert!(!r.matches("scratch", "transcript"));
    }

    #[test]
    fn test_table_ref_unrestricted() {
        let r = TableRef::new(vec![], "chain?");
        assert!(r.matches("pub", "chain1"));
        assert!(r.matches("archive", "chain9"));
        assert!(!r.matches("pub", "chained"));
    }
}
