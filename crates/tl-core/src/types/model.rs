//! The compiled link model.
//!
//! A [`LinkModel`] is the read-only product of loading a `.links` file: the
//! full identifier-set list, the name symbol table, the exclusivity groups,
//! the checked/ignored database name sets, and the dependency/type/ignore
//! records. It is built once, never mutated, and dropped as a unit - the
//! model is the sole owner of every set, field, and rule, so no per-structure
//! free protocol exists and query results never borrow from it (they index
//! into it via [`SetId`]).
//!
//! # Thread Safety
//!
//! All data is owned `String`/`Vec` state, so a finished model is `Send` and
//! `Sync` and safe to share read-only across query threads. Construction
//! itself is single-threaded: build fully, then publish.
//!
//! # Examples
//!
//! ```
//! use tl_core::{IdentifierSet, JoinField, LinkModel, ModelParts};
//!
//! let mut tx_id = IdentifierSet::new("txId");
//! tx_id.fields.push(JoinField::new("transcript", "tx_id"));
//!
//! let mut parts = ModelParts::new("demo.links");
//! parts.push_set(tx_id);
//! let model = LinkModel::from_parts(parts);
//!
//! let id = model.set_id("txId").expect("known set");
//! assert_eq!(model.set(id).fields.len(), 1);
//! assert!(model.exclusive_check("pub", "pub"));
//! ```

use std::collections::VecDeque;

use camino::{Utf8Path, Utf8PathBuf};

use super::rules::{Dependency, ExclusivityGroup, IgnoreRule, TypeGroup};
use super::set::{IdentifierSet, SetId};
use crate::hash::{FxHashMap, FxHashSet, fx_hash_set};

/// The pieces a model builder assembles before publishing a [`LinkModel`].
///
/// Kept separate from the model itself so the model's fields stay private
/// and immutable after construction.
#[derive(Debug, Clone, Default)]
pub struct ModelParts {
    /// Source file the model was compiled from.
    pub file_name: Utf8PathBuf,

    /// Identifier sets in declaration order, parent/child links resolved.
    pub sets: Vec<IdentifierSet>,

    /// Exclusivity groups in declaration order.
    pub exclusive: Vec<ExclusivityGroup>,

    /// Databases a verification pass should check.
    pub databases_checked: FxHashSet<String>,

    /// Databases a verification pass should skip.
    pub databases_ignored: FxHashSet<String>,

    /// Table dependency records.
    pub dependencies: Vec<Dependency>,

    /// Named wildcard table groups.
    pub type_groups: Vec<TypeGroup>,

    /// Tables excluded from all queries.
    pub ignore_rules: Vec<IgnoreRule>,
}

impl ModelParts {
    /// Creates empty parts for the given source file name.
    #[must_use]
    pub fn new(file_name: impl Into<Utf8PathBuf>) -> Self {
        Self {
            file_name: file_name.into(),
            ..Self::default()
        }
    }

    /// Appends a set and returns the [`SetId`] it will have in the model.
    pub fn push_set(&mut self, set: IdentifierSet) -> SetId {
        let id = SetId::new(u32::try_from(self.sets.len()).unwrap_or(u32::MAX));
        self.sets.push(set);
        id
    }
}

/// Compiled join-relationship information across all databases.
///
/// See the [module documentation](self) for construction and ownership
/// semantics.
#[derive(Debug, Clone)]
pub struct LinkModel {
    file_name: Utf8PathBuf,
    sets: Vec<IdentifierSet>,
    symbols: FxHashMap<String, SetId>,
    exclusive: Vec<ExclusivityGroup>,
    databases_checked: FxHashSet<String>,
    databases_ignored: FxHashSet<String>,
    dependencies: Vec<Dependency>,
    type_groups: Vec<TypeGroup>,
    ignore_rules: Vec<IgnoreRule>,
}

impl LinkModel {
    /// Publishes a model from assembled parts.
    ///
    /// The symbol table is rebuilt here from the final set list; callers are
    /// expected to have validated name uniqueness, parent resolution, and
    /// inheritance acyclicity beforehand (the builder in `tl-engine` does).
    #[must_use]
    pub fn from_parts(parts: ModelParts) -> Self {
        let mut symbols =
            FxHashMap::with_capacity_and_hasher(parts.sets.len(), rustc_hash::FxBuildHasher);
        for (index, set) in parts.sets.iter().enumerate() {
            symbols
                .entry(set.name.clone())
                .or_insert_with(|| SetId::new(u32::try_from(index).unwrap_or(u32::MAX)));
        }
        Self {
            file_name: parts.file_name,
            sets: parts.sets,
            symbols,
            exclusive: parts.exclusive,
            databases_checked: parts.databases_checked,
            databases_ignored: parts.databases_ignored,
            dependencies: parts.dependencies,
            type_groups: parts.type_groups,
            ignore_rules: parts.ignore_rules,
        }
    }

    /// The source file this model was compiled from.
    #[inline]
    #[must_use]
    pub fn file_name(&self) -> &Utf8Path {
        &self.file_name
    }

    /// Looks up a set by name in the symbol table.
    #[inline]
    #[must_use]
    pub fn set_id(&self, name: &str) -> Option<SetId> {
        self.symbols.get(name).copied()
    }

    /// Returns the set behind a handle.
    ///
    /// Handles come from this model's own lookups, so an out-of-range index
    /// is a caller bug and panics like any slice index.
    #[inline]
    #[must_use]
    pub fn set(&self, id: SetId) -> &IdentifierSet {
        &self.sets[id.index()]
    }

    /// Iterates all sets in declaration order with their handles.
    pub fn sets(&self) -> impl Iterator<Item = (SetId, &IdentifierSet)> {
        self.sets
            .iter()
            .enumerate()
            .map(|(index, set)| (SetId::new(u32::try_from(index).unwrap_or(u32::MAX)), set))
    }

    /// Number of identifier sets in the model.
    #[inline]
    #[must_use]
    pub fn set_count(&self) -> usize {
        self.sets.len()
    }

    /// Returns `true` if a join between the two databases is allowed.
    ///
    /// A database is always compatible with itself; otherwise the join is
    /// allowed unless both names co-occur in some exclusivity group.
    ///
    /// # Examples
    ///
    /// ```
    /// use tl_core::{LinkModel, ModelParts};
    ///
    /// let model = LinkModel::from_parts(ModelParts::new("empty.links"));
    /// assert!(model.exclusive_check("pub", "pub"));
    /// assert!(model.exclusive_check("pub", "archive"));
    /// ```
    #[must_use]
    pub fn exclusive_check(&self, a: &str, b: &str) -> bool {
        a == b || !self.exclusive.iter().any(|group| group.holds_both(a, b))
    }

    /// Returns the full inheritance chain of a set: itself, all descendants
    /// (children, recursively), then all ancestors (parents, recursively) -
    /// explicitly excluding siblings.
    ///
    /// Descendants come breadth-first in declaration order; ancestors come
    /// nearest-first. Every set appears at most once, so the chain length is
    /// bounded by the number of sets in the model.
    #[must_use]
    pub fn inheritance_chain(&self, id: SetId) -> Vec<SetId> {
        let mut chain = Vec::new();
        let mut seen = fx_hash_set();

        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            chain.push(current);
            queue.extend(self.sets[current.index()].children.iter().copied());
        }

        let mut ancestor = self.sets[id.index()].parent;
        while let Some(parent) = ancestor {
            if !seen.insert(parent) {
                break;
            }
            chain.push(parent);
            ancestor = self.sets[parent.index()].parent;
        }

        chain
    }

    /// Returns `true` if `(database, table)` is excluded by an ignore rule.
    #[must_use]
    pub fn is_ignored(&self, database: &str, table: &str) -> bool {
        self.ignore_rules
            .iter()
            .any(|rule| rule.excludes(database, table))
    }

    /// Looks up a type group by name.
    #[must_use]
    pub fn type_group(&self, name: &str) -> Option<&TypeGroup> {
        self.type_groups.iter().find(|group| group.name == name)
    }

    /// The exclusivity groups in declaration order.
    #[inline]
    #[must_use]
    pub fn exclusivity_groups(&self) -> &[ExclusivityGroup] {
        &self.exclusive
    }

    /// The dependency records in declaration order.
    #[inline]
    #[must_use]
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// The type groups in declaration order.
    #[inline]
    #[must_use]
    pub fn type_groups(&self) -> &[TypeGroup] {
        &self.type_groups
    }

    /// The ignore rules in declaration order.
    #[inline]
    #[must_use]
    pub fn ignore_rules(&self) -> &[IgnoreRule] {
        &self.ignore_rules
    }

    /// Databases a verification pass should check.
    #[inline]
    #[must_use]
    pub fn databases_checked(&self) -> &FxHashSet<String> {
        &self.databases_checked
    }

    /// Databases a verification pass should skip.
    #[inline]
    #[must_use]
    pub fn databases_ignored(&self) -> &FxHashSet<String> {
        &self.databases_ignored
    }
}
