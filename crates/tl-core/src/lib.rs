//! Core types, errors, and utilities for the tablelink engine.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - [`Dtf`] / [`JoinPair`] - the addressing triple and join-edge values
//!   returned by relation and route queries
//! - [`IdentifierSet`], [`JoinField`], [`TableRef`] and the rule types that
//!   describe declared join semantics
//! - [`LinkModel`] - the compiled, read-only model that owns all of the above
//! - [`DtfParseError`] for recoverable dotted-triple parse failures
//! - Type aliases for `FxHashMap`/`FxHashSet` (faster than std)
//!
//! The stanza parser lives in `tl-parser` and the model builder, relation
//! engine, and route finder live in `tl-engine`; this crate is deliberately
//! free of I/O so the types can be constructed directly in tests.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod hash;
pub mod types;

pub use error::DtfParseError;
pub use hash::{
    FxBuildHasher, FxHashMap, FxHashSet, fx_hash_map, fx_hash_map_with_capacity, fx_hash_set,
    fx_hash_set_with_capacity,
};
pub use types::{
    Dtf, Dependency, ExclusivityGroup, IdentifierSet, IgnoreRule, JoinField, JoinPair, LinkModel,
    ModelParts, SetId, TableRef, TypeGroup, all_same_table, wildcard_match,
};
