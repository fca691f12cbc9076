//! Model builder, relation engine, and route finder for tablelink.
//!
//! This crate turns a parsed `.links` file into a compiled
//! [`LinkModel`](tl_core::LinkModel) and answers the two questions the data
//! browser asks of it:
//!
//! - [`relate`]: given one table, every table it can join to directly
//! - [`find_route`] / [`find_route_through_all`]: a concrete, validated
//!   chain of join steps between two or more tables, possibly spanning
//!   databases
//!
//! # Overview
//!
//! The entry point is [`load`] (or [`load_str`] for in-memory sources):
//!
//! ```
//! use tl_core::Dtf;
//! use tl_engine::{find_route, load_str, relate};
//!
//! let model = load_str(
//!     "demo.links",
//!     "identifier txId\n  field pub.transcript.tx_id\n  field pub.exon.tx_id\n",
//! )?;
//!
//! let pairs = relate(&model, "pub", "transcript");
//! assert_eq!(pairs.len(), 1);
//!
//! let route = find_route(
//!     &model,
//!     &Dtf::new("pub", "transcript", ""),
//!     &Dtf::new("pub", "exon", ""),
//! );
//! assert!(route.is_some());
//! # Ok::<(), tl_engine::LoadError>(())
//! ```
//!
//! # Error Handling
//!
//! Loading fails loudly with file-and-line diagnostics and never publishes a
//! partial model. Queries never fail: "no relations" is an empty list and
//! "no route" is `None`.
//!
//! # Concurrency
//!
//! All algorithms are synchronous, in-memory traversals. A loaded model is
//! immutable and `Send + Sync`; share it read-only across threads freely
//! once `load` returns.

#![deny(clippy::all)]
#![warn(missing_docs)]

mod builder;
mod error;
mod relate;
mod route;

use camino::Utf8Path;
use tl_core::LinkModel;
use tracing::info;

pub use builder::build;
pub use error::{BuildError, LoadError};
pub use relate::{dump_pairs, relate};
pub use route::{find_route, find_route_through_all};

/// Reads, parses, and compiles a `.links` file into a model.
///
/// # Errors
///
/// Returns a [`LoadError`] when the file cannot be read, fails to parse, or
/// fails semantic validation. All parse and build failures carry the file
/// name and offending line number.
pub fn load(path: &Utf8Path) -> Result<LinkModel, LoadError> {
    let source = std::fs::read_to_string(path.as_std_path())?;
    let model = load_str(path, &source)?;
    info!(file = %path, sets = model.set_count(), "loaded links file");
    Ok(model)
}

/// Parses and compiles an in-memory `.links` source.
///
/// `file_name` is used for diagnostics only. This is the test-friendly
/// sibling of [`load`].
///
/// # Errors
///
/// Same as [`load`], minus I/O.
pub fn load_str(
    file_name: impl AsRef<Utf8Path>,
    source: &str,
) -> Result<LinkModel, LoadError> {
    let file = tl_parser::parse_links(file_name.as_ref(), source)?;
    Ok(build(file)?)
}
