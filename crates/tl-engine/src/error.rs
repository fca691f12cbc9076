//! Error types for the tl-engine crate.
//!
//! [`BuildError`] covers semantic failures while resolving parsed records
//! into a model; [`LoadError`] is the umbrella for everything `load` can
//! fail with. Both classes are fatal to loading: no partial model is ever
//! published. "No route" and "no relations" are ordinary empty results, not
//! errors, and never appear here.

use camino::Utf8PathBuf;

/// Semantic errors while compiling parsed records into a model.
///
/// Every variant names the source file and the offending line, matching the
/// parser's diagnostic style.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// Two `identifier` stanzas share a name.
    #[error("{file}:{line}: duplicate identifier set '{name}' (first declared on line {first_line})")]
    DuplicateSet {
        /// Source file.
        file: Utf8PathBuf,
        /// The reused set name.
        name: String,
        /// Line of the second declaration.
        line: u32,
        /// Line of the first declaration.
        first_line: u32,
    },

    /// A `typeOf` reference names a set that does not exist.
    #[error("{file}:{line}: identifier set '{set}' has unknown parent '{parent}'")]
    UnresolvedParent {
        /// Source file.
        file: Utf8PathBuf,
        /// The referencing set.
        set: String,
        /// The missing parent name.
        parent: String,
        /// Line of the referencing stanza.
        line: u32,
    },

    /// Following `typeOf` links from a set leads back to it.
    #[error("{file}:{line}: identifier set '{set}' is part of an inheritance cycle")]
    InheritanceCycle {
        /// Source file.
        file: Utf8PathBuf,
        /// A set on the cycle.
        set: String,
        /// Line of that set's stanza.
        line: u32,
    },
}

/// Everything [`load`](crate::load) can fail with.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read links file: {0}")]
    Io(#[from] std::io::Error),

    /// The file could not be parsed.
    #[error(transparent)]
    Parse(#[from] tl_parser::ParseError),

    /// The parsed records could not be compiled into a model.
    #[error(transparent)]
    Build(#[from] BuildError),
}
