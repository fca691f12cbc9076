//! Joinable field declarations.
//!
//! A [`JoinField`] describes one column an identifier set can join on: which
//! table owns it, which databases carry that table, and the comparison and
//! verification semantics declared for it (trim rules, list separators,
//! primary-key status, coverage flags, split-table naming).

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One joinable column belonging to an identifier set.
///
/// # Examples
///
/// ```
/// use tl_core::JoinField;
///
/// let mut field = JoinField::new("transcript", "tx_id");
/// field.databases.push("pub".to_owned());
/// field.primary = true;
///
/// assert!(field.allows_database("pub"));
/// assert!(!field.allows_database("archive"));
/// assert!(field.matches_table("transcript"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinField {
    /// Source line of the `field` declaration, for diagnostics.
    pub line: u32,

    /// Databases this field's table lives in; empty means unrestricted.
    pub databases: SmallVec<[String; 2]>,

    /// Owning table name.
    pub table: String,

    /// Column name.
    pub field: String,

    /// Strings chopped from the front of a value before comparison.
    pub chop_before: SmallVec<[String; 1]>,

    /// Strings chopped from the end of a value before comparison.
    pub chop_after: SmallVec<[String; 1]>,

    /// Separator when the field holds a delimited list of identifiers.
    pub separator: Option<String>,

    /// The identifier is a positional index into the separated list.
    pub index_of: bool,

    /// This field is the set's primary key.
    pub primary: bool,

    /// Minimum fraction of rows that must hit the primary key for the set
    /// to be accepted for this table.
    pub min_check: f64,

    /// No more than one row per identifier.
    pub unique: bool,

    /// Every identifier in the domain appears in this field.
    pub full: bool,

    /// Physical-table prefix when the logical table is split (`chr1_mrna`
    /// style naming).
    pub split_prefix: Option<String>,

    /// Physical-table suffix when the logical table is split.
    pub split_suffix: Option<String>,

    /// Identifier values skipped during verification.
    pub exclude: SmallVec<[String; 2]>,
}

impl JoinField {
    /// Creates a field on the given table and column with default semantics:
    /// unrestricted databases, no trim rules, not primary, `min_check` 1.0.
    #[must_use]
    pub fn new(table: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            line: 0,
            databases: SmallVec::new(),
            table: table.into(),
            field: field.into(),
            chop_before: SmallVec::new(),
            chop_after: SmallVec::new(),
            separator: None,
            index_of: false,
            primary: false,
            min_check: 1.0,
            unique: false,
            full: false,
            split_prefix: None,
            split_suffix: None,
            exclude: SmallVec::new(),
        }
    }

    /// Returns `true` if this field's table lives in the given database.
    ///
    /// An empty database list is unrestricted.
    #[inline]
    #[must_use]
    pub fn allows_database(&self, database: &str) -> bool {
        self.databases.is_empty() || self.databases.iter().any(|db| db == database)
    }

    /// Returns `true` if the given physical table name matches this field's
    /// table, either exactly or through split-table naming.
    ///
    /// A split field with prefix `part_` on table `align` matches physical
    /// tables like `part_align` and `part2_align`: the name must start with
    /// the prefix and end with the declared table (and symmetrically for a
    /// suffix). The exact name always matches, split or not, since many
    /// catalogs carry an unsplit copy alongside the per-partition tables.
    ///
    /// # Examples
    ///
    /// ```
    /// use tl_core::JoinField;
    ///
    /// let mut field = JoinField::new("align", "tx_id");
    /// field.split_prefix = Some("part_".to_owned());
    ///
    /// assert!(field.matches_table("align"));
    /// assert!(field.matches_table("part_align"));
    /// assert!(field.matches_table("part_extra_align"));
    /// assert!(!field.matches_table("misaligned"));
    /// ```
    #[must_use]
    pub fn matches_table(&self, table: &str) -> bool {
        if self.table == table {
            return true;
        }
        if let Some(prefix) = &self.split_prefix {
            if table.len() >= prefix.len() + self.table.len()
                && table.starts_with(prefix.as_str())
                && table.ends_with(self.table.as_str())
            {
                return true;
            }
        }
        if let Some(suffix) = &self.split_suffix {
            if table.len() >= suffix.len() + self.table.len()
                && table.starts_with(self.table.as_str())
                && table.ends_with(suffix.as_str())
            {
                return true;
            }
        }
        false
    }

    /// Returns `true` if the field holds a delimited list of identifiers.
    #[inline]
    #[must_use]
    pub const fn is_list(&self) -> bool {
        self.separator.is_some()
    }
}
