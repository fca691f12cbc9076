//! Identifier sets and their handles.
//!
//! An [`IdentifierSet`] is a named group of [`JoinField`]s understood to hold
//! the same real-world identifier. Sets form a single-inheritance hierarchy:
//! a child set's fields join exactly like its parent's, plus local additions.
//! Parents are stored as resolved [`SetId`] indexes (never raw references)
//! and child links are derived once at build time, so the hierarchy cannot
//! dangle or form ownership cycles.

use serde::{Deserialize, Serialize};

use super::field::JoinField;

/// An opaque handle to an identifier set inside a
/// [`LinkModel`](crate::LinkModel).
///
/// Uses a newtype pattern for type safety - prevents accidentally using a
/// raw integer where a set index is expected.
///
/// # Examples
///
/// ```
/// use tl_core::SetId;
///
/// let a = SetId::new(3);
/// let b = SetId::new(3);
/// assert_eq!(a, b);
/// assert_eq!(a.index(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SetId(pub u32);

impl SetId {
    /// Creates a handle from a set-list index.
    #[inline]
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the index into the model's set list.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A named group of fields that share one real-world identifier.
///
/// # Examples
///
/// ```
/// use tl_core::{IdentifierSet, JoinField};
///
/// let mut set = IdentifierSet::new("txId");
/// set.fields.push(JoinField::new("transcript", "tx_id"));
/// set.fields.push(JoinField::new("exon", "tx_id"));
///
/// assert_eq!(set.name, "txId");
/// assert_eq!(set.fields.len(), 2);
/// assert!(set.parent.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifierSet {
    /// Set name, unique within a model.
    pub name: String,

    /// Source line of the `identifier` stanza, for diagnostics.
    pub line: u32,

    /// Resolved parent set, if this set declared `typeOf`.
    pub parent: Option<SetId>,

    /// Derived back-links to sets declaring this one as parent.
    ///
    /// Computed once by the model builder as the inverse of the parent
    /// links; never mutated afterwards and never owning.
    pub children: Vec<SetId>,

    /// Public-facing name, if different from `name`.
    pub external: Option<String>,

    /// Human-readable description.
    pub description: String,

    /// The fields sharing this identifier.
    pub fields: Vec<JoinField>,

    /// No reliable primary key exists; matches are best-effort.
    pub is_fuzzy: bool,

    /// Parent fields have already been flattened into this set, so relation
    /// expansion must not walk the hierarchy again.
    pub expanded: bool,

    /// A primary-key change forces dependent tables to fully rebuild.
    pub is_dependency: bool,
}

impl IdentifierSet {
    /// Creates an empty set with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            line: 0,
            parent: None,
            children: Vec::new(),
            external: None,
            description: String::new(),
            fields: Vec::new(),
            is_fuzzy: false,
            expanded: false,
            is_dependency: false,
        }
    }

    /// Returns the name shown to end users: the external name when declared,
    /// the set name otherwise.
    #[inline]
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.external.as_deref().unwrap_or(&self.name)
    }

    /// Returns the set's primary-key field, if one is declared.
    #[must_use]
    pub fn primary_field(&self) -> Option<&JoinField> {
        self.fields.iter().find(|f| f.primary)
    }
}
