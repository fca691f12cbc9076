//! The `.links` stanza parser.
//!
//! The format is line-oriented: a line with no leading whitespace opens a
//! stanza (`identifier txId`, `dependency pub.transcript`, ...), and indented
//! lines form its body. Body lines are `key: value` pairs, except inside
//! `identifier` stanzas where a `field <spec>` line opens a field block whose
//! options follow as further `key: value` lines. Lines whose first non-blank
//! character is `#` are comments.
//!
//! Parsing performs all syntactic validation - unknown keys, value arity,
//! malformed references, out-of-range ratios - and tags every record with
//! its 1-indexed source line. Semantic validation (duplicate set names,
//! parent resolution, inheritance cycles) belongs to the model builder.

use camino::Utf8Path;
use smallvec::SmallVec;
use tl_core::{Dependency, ExclusivityGroup, IgnoreRule, JoinField, TypeGroup, fx_hash_set};

use crate::error::{ParseError, ParseErrorKind};
use crate::raw::{LinksFile, RawSet};
use crate::value;

/// The stanza currently being filled in.
enum Stanza {
    None,
    Set(RawSet),
    Dependency(Dependency),
    Type(TypeGroup),
    Ignore(IgnoreRule),
    Exclusive(ExclusivityGroup),
    /// `databasesChecked` / `databasesIgnored`: header only, no body.
    HeaderOnly(&'static str),
}

/// Parses a `.links` source into raw records.
///
/// `file_name` is used only for diagnostics and is carried into the result;
/// reading the file from disk is the caller's job (see `tl-engine::load`).
///
/// # Errors
///
/// Returns a [`ParseError`] with file name and line number on the first
/// syntax error encountered.
///
/// # Examples
///
/// ```
/// use tl_parser::parse_links;
///
/// let source = "\
/// identifier txId
///   description: \"Transcript accession\"
///   field pub.transcript.tx_id
///     primary: true
///   field pub.exon.tx_id
/// ";
/// let file = parse_links("demo.links".as_ref(), source)?;
/// assert_eq!(file.sets.len(), 1);
/// assert_eq!(file.sets[0].fields.len(), 2);
/// assert!(file.sets[0].fields[0].primary);
/// # Ok::<(), tl_parser::ParseError>(())
/// ```
pub fn parse_links(file_name: &Utf8Path, source: &str) -> Result<LinksFile, ParseError> {
    let mut parser = Parser {
        file: LinksFile::new(file_name),
        stanza: Stanza::None,
    };

    for (index, raw_line) in source.lines().enumerate() {
        let line_no = u32::try_from(index + 1).unwrap_or(u32::MAX);
        let line = raw_line.trim_end();
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let result = if line.starts_with([' ', '\t']) {
            parser.body_line(trimmed, line_no)
        } else {
            parser.header_line(trimmed, line_no)
        };
        result.map_err(|kind| ParseError {
            file: file_name.to_owned(),
            line: line_no,
            kind,
        })?;
    }

    parser.flush();
    Ok(parser.file)
}

struct Parser {
    file: LinksFile,
    stanza: Stanza,
}

impl Parser {
    /// Finishes the current stanza and appends it to the output.
    fn flush(&mut self) {
        match std::mem::replace(&mut self.stanza, Stanza::None) {
            Stanza::None | Stanza::HeaderOnly(_) => {}
            Stanza::Set(set) => self.file.sets.push(set),
            Stanza::Dependency(dep) => self.file.dependencies.push(dep),
            Stanza::Type(group) => self.file.type_groups.push(group),
            Stanza::Ignore(rule) => self.file.ignores.push(rule),
            Stanza::Exclusive(group) => self.file.exclusives.push(group),
        }
    }

    fn header_line(&mut self, line: &str, line_no: u32) -> Result<(), ParseErrorKind> {
        self.flush();

        let (keyword, rest) = match line.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (line, ""),
        };

        self.stanza = match keyword {
            "identifier" => Stanza::Set(RawSet::new(single_name(keyword, rest)?, line_no)),
            "dependency" => Stanza::Dependency(Dependency {
                line: line_no,
                table: value::parse_table_ref(require_rest(keyword, rest)?)?,
                depends_on: Vec::new(),
            }),
            "type" => Stanza::Type(TypeGroup {
                line: line_no,
                name: single_name(keyword, rest)?,
                tables: Vec::new(),
            }),
            "ignore" => Stanza::Ignore(IgnoreRule {
                line: line_no,
                databases: SmallVec::from_vec(value::parse_list(rest)),
                tables: Vec::new(),
            }),
            "exclusive" => Stanza::Exclusive(ExclusivityGroup {
                line: line_no,
                name: single_name(keyword, rest)?,
                databases: fx_hash_set(),
            }),
            "databasesChecked" => {
                self.file.databases_checked.extend(value::parse_list(rest));
                Stanza::HeaderOnly("databasesChecked")
            }
            "databasesIgnored" => {
                self.file.databases_ignored.extend(value::parse_list(rest));
                Stanza::HeaderOnly("databasesIgnored")
            }
            other => return Err(ParseErrorKind::UnknownStanza(other.to_owned())),
        };
        Ok(())
    }

    fn body_line(&mut self, line: &str, line_no: u32) -> Result<(), ParseErrorKind> {
        match &mut self.stanza {
            Stanza::None => Err(ParseErrorKind::OrphanLine),
            Stanza::HeaderOnly(keyword) => Err(ParseErrorKind::UnexpectedBody((*keyword).to_owned())),
            Stanza::Set(set) => set_body_line(set, line, line_no),
            Stanza::Dependency(dep) => match split_key(line)? {
                ("on", spec) => {
                    dep.depends_on.push(value::parse_table_ref(spec)?);
                    Ok(())
                }
                (key, _) => Err(ParseErrorKind::UnknownKey(key.to_owned())),
            },
            Stanza::Type(group) => match split_key(line)? {
                ("table", specs) => {
                    for spec in specs.split_whitespace() {
                        group.tables.push(value::parse_table_ref(spec)?);
                    }
                    Ok(())
                }
                (key, _) => Err(ParseErrorKind::UnknownKey(key.to_owned())),
            },
            Stanza::Ignore(rule) => match split_key(line)? {
                ("table", names) => {
                    rule.tables.extend(value::parse_list(names));
                    Ok(())
                }
                (key, _) => Err(ParseErrorKind::UnknownKey(key.to_owned())),
            },
            Stanza::Exclusive(group) => match split_key(line)? {
                ("databases", names) => {
                    group.databases.extend(value::parse_list(names));
                    Ok(())
                }
                (key, _) => Err(ParseErrorKind::UnknownKey(key.to_owned())),
            },
        }
    }
}

/// Handles one body line of an `identifier` stanza.
fn set_body_line(set: &mut RawSet, line: &str, line_no: u32) -> Result<(), ParseErrorKind> {
    // `field <spec>` opens a new field block; everything else is key: value.
    if let Some(spec) = line.strip_prefix("field ") {
        let (databases, table, field) = value::parse_field_spec(spec)?;
        let mut join_field = JoinField::new(table, field);
        join_field.line = line_no;
        join_field.databases = databases;
        set.fields.push(join_field);
        return Ok(());
    }

    let (key, raw) = split_key(line)?;
    match key {
        "typeOf" | "parent" => {
            set.parent = Some(value::parse_scalar(key, raw)?);
            Ok(())
        }
        "external" => {
            set.external = Some(value::parse_scalar(key, raw)?);
            Ok(())
        }
        "description" => {
            set.description = value::parse_text(raw)?;
            Ok(())
        }
        "isFuzzy" => {
            set.is_fuzzy = value::parse_bool(raw)?;
            Ok(())
        }
        "expanded" => {
            set.expanded = value::parse_bool(raw)?;
            Ok(())
        }
        "isDependency" => {
            set.is_dependency = value::parse_bool(raw)?;
            Ok(())
        }
        _ => field_option_line(set, key, raw),
    }
}

/// Handles a field-option key, which must follow a `field` line.
fn field_option_line(set: &mut RawSet, key: &str, raw: &str) -> Result<(), ParseErrorKind> {
    const FIELD_KEYS: [&str; 12] = [
        "databases",
        "chopBefore",
        "chopAfter",
        "separator",
        "indexOf",
        "primary",
        "minCheck",
        "unique",
        "full",
        "splitPrefix",
        "splitSuffix",
        "exclude",
    ];
    if !FIELD_KEYS.contains(&key) {
        return Err(ParseErrorKind::UnknownKey(key.to_owned()));
    }
    let Some(field) = set.fields.last_mut() else {
        return Err(ParseErrorKind::FieldOptionOutsideField(key.to_owned()));
    };

    match key {
        "databases" => field.databases.extend(value::parse_list(raw)),
        "chopBefore" => field.chop_before.extend(value::parse_list(raw)),
        "chopAfter" => field.chop_after.extend(value::parse_list(raw)),
        "separator" => field.separator = Some(value::parse_scalar(key, raw)?),
        "indexOf" => field.index_of = value::parse_bool(raw)?,
        "primary" => field.primary = value::parse_bool(raw)?,
        "minCheck" => field.min_check = value::parse_ratio(raw)?,
        "unique" => field.unique = value::parse_bool(raw)?,
        "full" => field.full = value::parse_bool(raw)?,
        "splitPrefix" => field.split_prefix = Some(value::parse_scalar(key, raw)?),
        "splitSuffix" => field.split_suffix = Some(value::parse_scalar(key, raw)?),
        "exclude" => field.exclude.extend(value::parse_list(raw)),
        _ => {}
    }
    Ok(())
}

/// Splits a body line at its first `:` into key and raw value.
fn split_key(line: &str) -> Result<(&str, &str), ParseErrorKind> {
    let Some((key, raw)) = line.split_once(':') else {
        return Err(ParseErrorKind::BadBodyLine(line.to_owned()));
    };
    Ok((key.trim(), raw.trim()))
}

/// A stanza header that takes exactly one name.
fn single_name(keyword: &str, rest: &str) -> Result<String, ParseErrorKind> {
    let mut tokens = rest.split_whitespace();
    let Some(name) = tokens.next() else {
        return Err(ParseErrorKind::MissingStanzaName(keyword.to_owned()));
    };
    if tokens.next().is_some() {
        return Err(ParseErrorKind::ExtraStanzaArgs(keyword.to_owned()));
    }
    Ok(name.to_owned())
}

/// A stanza header whose argument is a single required token.
fn require_rest<'a>(keyword: &str, rest: &'a str) -> Result<&'a str, ParseErrorKind> {
    if rest.is_empty() {
        return Err(ParseErrorKind::MissingStanzaName(keyword.to_owned()));
    }
    Ok(rest)
}
