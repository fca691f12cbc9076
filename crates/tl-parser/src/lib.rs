//! Stanza parser for the `.links` declarative join format.
//!
//! A `.links` file describes which fields across which tables and databases
//! hold the same real-world identifiers, plus the dependency, type, ignore,
//! and exclusivity declarations that govern how those identifiers may be
//! joined. This crate turns that text into raw records; resolving them into
//! a queryable model is `tl-engine`'s job.
//!
//! # Format
//!
//! Unindented lines open stanzas, indented lines fill them in:
//!
//! ```text
//! identifier txId
//!   description: "Transcript accession"
//!   field pub,archive.transcript.tx_id
//!     primary: true
//!     minCheck: 0.95
//!   field pub.exon.tx_ids
//!     separator: ","
//!
//! dependency pub.transcript
//!   on: pub.exon
//!
//! type alignments
//!   table: pub.%_align
//!
//! ignore pub
//!   table: scratchTmp bak%
//!
//! exclusive frozenVsLive
//!   databases: frozen2023 live
//!
//! databasesChecked pub archive
//! ```
//!
//! # Overview
//!
//! The entry point is [`parse_links`]:
//!
//! ```
//! use tl_parser::parse_links;
//!
//! let source = "identifier txId\n  field pub.transcript.tx_id\n";
//! let file = parse_links("all.links".as_ref(), source)?;
//! assert_eq!(file.sets.len(), 1);
//! # Ok::<(), tl_parser::ParseError>(())
//! ```
//!
//! Every record carries its 1-indexed source line, and every error carries
//! the file name and line it occurred on - this is the only layer performing
//! syntactic validation.

#![deny(clippy::all)]
#![warn(missing_docs)]

mod error;
mod parse;
mod raw;
mod value;

pub use error::{ParseError, ParseErrorKind};
pub use parse::parse_links;
pub use raw::{LinksFile, RawSet};
