//! Dependency, type, ignore, and exclusivity declarations.
//!
//! These records sit alongside the identifier sets in a compiled model.
//! [`Dependency`] is a staleness signal consumed by downstream tooling, not
//! a join edge. [`TypeGroup`] lets a field's table name stand for a family
//! of wildcarded physical tables. [`IgnoreRule`] removes tables from every
//! relation and route query, while [`ExclusivityGroup`] leaves tables in
//! place but forbids joins between databases in the same group.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::table::TableRef;
use crate::hash::FxHashSet;

/// "If this table's content changes, these tables must be treated as stale."
///
/// Purely informational for the join engine: dependencies never produce
/// relation edges and never influence routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    /// Source line of the `dependency` stanza.
    pub line: u32,

    /// The table whose changes invalidate others.
    pub table: TableRef,

    /// The tables that go stale when it changes.
    pub depends_on: Vec<TableRef>,
}

/// A named family of tables sharing a declared type.
///
/// Member references may use catalog wildcards, letting relation lookups
/// match a whole family of physical tables without enumerating them.
///
/// # Examples
///
/// ```
/// use tl_core::{TableRef, TypeGroup};
///
/// let group = TypeGroup {
///     line: 1,
///     name: "alignments".to_owned(),
///     tables: vec![TableRef::new(vec!["pub".to_owned()], "%_align")],
/// };
/// assert!(group.covers("pub", "part_align"));
/// assert!(!group.covers("pub", "transcript"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeGroup {
    /// Source line of the `type` stanza.
    pub line: u32,

    /// Type name, referenced by fields in place of a physical table.
    pub name: String,

    /// Member tables, wildcards permitted.
    pub tables: Vec<TableRef>,
}

impl TypeGroup {
    /// Returns `true` if any member reference covers `(database, table)`.
    #[must_use]
    pub fn covers(&self, database: &str, table: &str) -> bool {
        self.tables.iter().any(|t| t.matches(database, table))
    }
}

/// Tables excluded from all relation and route queries.
///
/// Table entries may use catalog wildcards; an empty database list applies
/// the rule in every database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IgnoreRule {
    /// Source line of the `ignore` stanza.
    pub line: u32,

    /// Databases the rule applies to; empty means all.
    pub databases: SmallVec<[String; 2]>,

    /// Table name patterns to exclude.
    pub tables: Vec<String>,
}

impl IgnoreRule {
    /// Returns `true` if the rule excludes `(database, table)`.
    #[must_use]
    pub fn excludes(&self, database: &str, table: &str) -> bool {
        let db_ok = self.databases.is_empty() || self.databases.iter().any(|db| db == database);
        db_ok
            && self
                .tables
                .iter()
                .any(|pattern| super::table::wildcard_match(pattern, table))
    }
}

/// Databases that must never be joined with each other within one route.
///
/// Distinct from [`IgnoreRule`]: the tables stay queryable, only cross-group
/// edges are suppressed. Represented as a plain set of names; the membership
/// test is "do both databases appear in this group."
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusivityGroup {
    /// Source line of the `exclusive` stanza.
    pub line: u32,

    /// Group name, for diagnostics only.
    pub name: String,

    /// Member database names.
    pub databases: FxHashSet<String>,
}

impl ExclusivityGroup {
    /// Returns `true` if both databases belong to this group.
    #[inline]
    #[must_use]
    pub fn holds_both(&self, a: &str, b: &str) -> bool {
        self.databases.contains(a) && self.databases.contains(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::fx_hash_set;

    #[test]
    fn test_type_group_covers() {
        let group = TypeGroup {
            line: 10,
            name: "genes".to_owned(),
            tables: vec![
                TableRef::new(vec!["pub".to_owned()], "%Gene"),
                TableRef::new(vec![], "refFlat"),
            ],
        };
        assert!(group.covers("pub", "knownGene"));
        assert!(group.covers("archive", "refFlat"));
        assert!(!group.covers("archive", "knownGene"));
        assert!(!group.covers("pub", "knownGenes"));
    }

    #[test]
    fn test_ignore_rule_excludes() {
        let rule = IgnoreRule {
            line: 3,
            databases: SmallVec::from_vec(vec!["pub".to_owned()]),
            tables: vec!["scratchTmp".to_owned(), "bak%".to_owned()],
        };
        assert!(rule.excludes("pub", "scratchTmp"));
        assert!(rule.excludes("pub", "bak2024"));
        assert!(!rule.excludes("archive", "scratchTmp"));
        assert!(!rule.excludes("pub", "transcript"));
    }

    #[test]
    fn test_ignore_rule_all_databases() {
        let rule = IgnoreRule {
            line: 3,
            databases: SmallVec::new(),
            tables: vec!["tmp%".to_owned()],
        };
        assert!(rule.excludes("pub", "tmpSort"));
        assert!(rule.excludes("anything", "tmpSort"));
    }

    #[test]
    fn test_exclusivity_group_holds_both() {
        let mut databases = fx_hash_set();
        databases.insert("frozen2023".to_owned());
        databases.insert("live".to_owned());
        let group = ExclusivityGroup {
            line: 1,
            name: "frozenVsLive".to_owned(),
            databases,
        };
        assert!(group.holds_both("frozen2023", "live"));
        assert!(group.holds_both("live", "frozen2023"));
        assert!(!group.holds_both("live", "pub"));
    }
}
