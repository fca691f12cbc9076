//! Raw parser output, one record per stanza.
//!
//! The parser resolves nothing: identifier-set parents stay as names, and it
//! is the model builder's job to turn a [`LinksFile`] into a compiled
//! [`LinkModel`](tl_core::LinkModel). Dependency, type, ignore, and
//! exclusivity stanzas already parse into their final `tl-core` shapes, so
//! only identifier sets need a raw intermediate.

use camino::Utf8PathBuf;
use tl_core::{Dependency, ExclusivityGroup, IgnoreRule, JoinField, TypeGroup};

/// An `identifier` stanza before parent resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSet {
    /// Source line of the stanza header.
    pub line: u32,

    /// Set name.
    pub name: String,

    /// Unresolved `typeOf`/`parent` set name.
    pub parent: Option<String>,

    /// Public-facing name.
    pub external: Option<String>,

    /// Human-readable description.
    pub description: String,

    /// No reliable primary key exists.
    pub is_fuzzy: bool,

    /// Parent fields are already flattened into this set.
    pub expanded: bool,

    /// Primary-key changes force dependents to rebuild.
    pub is_dependency: bool,

    /// The stanza's field declarations, in order.
    pub fields: Vec<JoinField>,
}

impl RawSet {
    /// Creates an empty stanza record.
    #[must_use]
    pub fn new(name: impl Into<String>, line: u32) -> Self {
        Self {
            line,
            name: name.into(),
            parent: None,
            external: None,
            description: String::new(),
            is_fuzzy: false,
            expanded: false,
            is_dependency: false,
            fields: Vec::new(),
        }
    }
}

/// Everything parsed out of one `.links` source, stanza order preserved.
///
/// Declaration order matters downstream: it fixes relation discovery order
/// and thereby route tie-breaking, so each list keeps file order exactly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinksFile {
    /// Source file name, carried into errors and the compiled model.
    pub file_name: Utf8PathBuf,

    /// `identifier` stanzas.
    pub sets: Vec<RawSet>,

    /// `dependency` stanzas.
    pub dependencies: Vec<Dependency>,

    /// `type` stanzas.
    pub type_groups: Vec<TypeGroup>,

    /// `ignore` stanzas.
    pub ignores: Vec<IgnoreRule>,

    /// `exclusive` stanzas.
    pub exclusives: Vec<ExclusivityGroup>,

    /// `databasesChecked` stanza contents.
    pub databases_checked: Vec<String>,

    /// `databasesIgnored` stanza contents.
    pub databases_ignored: Vec<String>,
}

impl LinksFile {
    /// Creates an empty file record with the given name.
    #[must_use]
    pub fn new(file_name: impl Into<Utf8PathBuf>) -> Self {
        Self {
            file_name: file_name.into(),
            ..Self::default()
        }
    }
}
