//! The relation engine: all declared join partners of one table.
//!
//! Relation discovery walks the identifier sets in declaration order, so the
//! output order is deterministic for a given `.links` file. That ordering is
//! load-bearing: the route finder breaks ties by first-discovered edge.

use smallvec::SmallVec;
use std::io::{self, Write};
use tl_core::{Dtf, JoinField, JoinPair, LinkModel};
use tracing::debug;

/// Lists every way the given table can join to other tables, possibly in
/// other databases.
///
/// A field of an identifier set matches the input table when its database
/// list allows `database` and its table name matches exactly, through
/// split-table naming, or through a type group whose wildcard members cover
/// the input. Each matching set is expanded to its full inheritance chain
/// (unless the set is already `expanded`), and every field in the chain on a
/// different table contributes one pair per target database.
///
/// Pairs whose target is excluded by an ignore rule, or whose database pair
/// fails the exclusivity check, are silently dropped. Duplicate targets via
/// multiple shared identifier sets are kept; callers deduplicate if needed.
/// An empty result is a normal outcome, not an error.
///
/// # Examples
///
/// ```
/// use tl_engine::{load_str, relate};
///
/// let model = load_str(
///     "demo.links",
///     "identifier txId\n  field pub.transcript.tx_id\n  field pub.exon.tx_id\n",
/// )?;
/// let pairs = relate(&model, "pub", "transcript");
/// assert_eq!(pairs.len(), 1);
/// assert_eq!(pairs[0].target.table, "exon");
/// # Ok::<(), tl_engine::LoadError>(())
/// ```
#[must_use]
pub fn relate(model: &LinkModel, database: &str, table: &str) -> Vec<JoinPair> {
    if model.is_ignored(database, table) {
        return Vec::new();
    }

    let mut pairs = Vec::new();
    for (id, set) in model.sets() {
        for field in &set.fields {
            if !field_matches(model, field, database, table) {
                continue;
            }
            let chain = if set.expanded {
                vec![id]
            } else {
                model.inheritance_chain(id)
            };
            for chain_id in chain {
                for other in &model.set(chain_id).fields {
                    // Same logical table: covers the exact and split cases,
                    // and the matched field's own type-group name.
                    if other.matches_table(table) || other.table == field.table {
                        continue;
                    }
                    let target_dbs: SmallVec<[&str; 2]> = if other.databases.is_empty() {
                        SmallVec::from_slice(&[database])
                    } else {
                        other.databases.iter().map(String::as_str).collect()
                    };
                    for target_db in target_dbs {
                        if model.is_ignored(target_db, &other.table) {
                            continue;
                        }
                        if !model.exclusive_check(database, target_db) {
                            continue;
                        }
                        pairs.push(JoinPair::new(
                            Dtf::new(database, table, field.field.clone()),
                            Dtf::new(target_db, other.table.clone(), other.field.clone()),
                            chain_id,
                        ));
                    }
                }
            }
        }
    }

    debug!(database, table, pairs = pairs.len(), "relate");
    pairs
}

/// Field-to-table matching for relation discovery.
fn field_matches(model: &LinkModel, field: &JoinField, database: &str, table: &str) -> bool {
    if !field.allows_database(database) {
        return false;
    }
    if field.matches_table(table) {
        return true;
    }
    model
        .type_group(&field.table)
        .is_some_and(|group| group.covers(database, table))
}

/// Writes a pair list with resolved identifier-set names, mostly for
/// debugging and the CLI's text output.
///
/// # Errors
///
/// Propagates write failures from the underlying writer.
pub fn dump_pairs<W: Write>(model: &LinkModel, pairs: &[JoinPair], out: &mut W) -> io::Result<()> {
    for pair in pairs {
        writeln!(out, "{pair} (via {})", model.set(pair.via).display_name())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_str;

    fn model(source: &str) -> LinkModel {
        load_str("test.links", source).expect("load failed")
    }

    #[test]
    fn test_relate_within_one_set() {
        let model = model(
            "identifier txId\n\
             \tfield pub.transcript.tx_id\n\
             \tfield pub.exon.tx_id\n\
             \tfield archive.txBackup.tx\n",
        );
        let pairs = relate(&model, "pub", "transcript");
        let targets: Vec<String> = pairs.iter().map(|p| p.target.to_string()).collect();
        assert_eq!(targets, ["pub.exon.tx_id", "archive.txBackup.tx"]);
        for pair in &pairs {
            assert_eq!(pair.source.table, "transcript");
            assert_eq!(pair.source.field, "tx_id");
        }
    }

    #[test]
    fn test_relate_no_matches_is_empty() {
        let model = model(
            "identifier txId\n\
             \tfield pub.transcript.tx_id\n",
        );
        assert!(relate(&model, "pub", "unknownTable").is_empty());
    }

    #[test]
    fn test_relate_respects_field_database_list() {
        let model = model(
            "identifier txId\n\
             \tfield pub.transcript.tx_id\n\
             \tfield pub.exon.tx_id\n",
        );
        // The transcript field is declared for `pub` only.
        assert!(relate(&model, "archive", "transcript").is_empty());
    }

    #[test]
    fn test_relate_unrestricted_field_uses_query_database() {
        let model = model(
            "identifier txId\n\
             \tfield transcript.tx_id\n\
             \tfield exon.tx_id\n",
        );
        let pairs = relate(&model, "anydb", "transcript");
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].target.database, "anydb");
    }

    #[test]
    fn test_relate_expands_inheritance_chain() {
        let model = model(
            "identifier geneId\n\
             \tfield pub.gene.gene_id\n\
             identifier txId\n\
             \ttypeOf: geneId\n\
             \tfield pub.transcript.tx_id\n\
             identifier probeId\n\
             \ttypeOf: geneId\n\
             \tfield pub.probe.probe_id\n",
        );
        // Ancestors are reachable; siblings are not.
        let targets: Vec<String> = relate(&model, "pub", "transcript")
            .iter()
            .map(|p| p.target.table.clone())
            .collect();
        assert_eq!(targets, ["gene"]);

        // From the parent's table, both children are reachable.
        let targets: Vec<String> = relate(&model, "pub", "gene")
            .iter()
            .map(|p| p.target.table.clone())
            .collect();
        assert_eq!(targets, ["transcript", "probe"]);
    }

    #[test]
    fn test_relate_expanded_set_skips_chain() {
        let model = model(
            "identifier geneId\n\
             \tfield pub.gene.gene_id\n\
             identifier txId\n\
             \ttypeOf: geneId\n\
             \texpanded: true\n\
             \tfield pub.transcript.tx_id\n\
             \tfield pub.gene.gene_alias\n",
        );
        let targets: Vec<String> = relate(&model, "pub", "transcript")
            .iter()
            .map(|p| p.target.field.clone())
            .collect();
        // Only the flattened-in field, not the parent's copy.
        assert_eq!(targets, ["gene_alias"]);
    }

    #[test]
    fn test_relate_split_table_match() {
        let model = model(
            "identifier accession\n\
             \tfield pub.align.acc\n\
             \t\tsplitPrefix: part_\n\
             \tfield pub.accIndex.acc\n",
        );
        let pairs = relate(&model, "pub", "part_7_align");
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].source.table, "part_7_align");
        assert_eq!(pairs[0].target.table, "accIndex");
    }

    #[test]
    fn test_relate_type_group_match() {
        let model = model(
            "type alignments\n\
             \ttable: pub.%_align\n\
             identifier accession\n\
             \tfield pub.alignments.acc\n\
             \tfield pub.accIndex.acc\n",
        );
        let pairs = relate(&model, "pub", "blat_align");
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].source.table, "blat_align");
        assert_eq!(pairs[0].target.table, "accIndex");
    }

    #[test]
    fn test_relate_exclusivity_filters_targets() {
        let model = model(
            "identifier txId\n\
             \tfield frozen.transcript.tx_id\n\
             \tfield live.exon.tx_id\n\
             exclusive freeze\n\
             \tdatabases: frozen live\n",
        );
        assert!(relate(&model, "frozen", "transcript").is_empty());
    }

    #[test]
    fn test_relate_all_pairs_pass_exclusive_check() {
        let model = model(
            "identifier txId\n\
             \tfield frozen,live,pub.transcript.tx_id\n\
             \tfield frozen,live,pub.exon.tx_id\n\
             exclusive freeze\n\
             \tdatabases: frozen live\n",
        );
        for db in ["frozen", "live", "pub"] {
            for pair in relate(&model, db, "transcript") {
                assert!(model.exclusive_check(&pair.source.database, &pair.target.database));
            }
        }
    }

    #[test]
    fn test_relate_ignore_rule_drops_target_and_input() {
        let model = model(
            "identifier txId\n\
             \tfield pub.transcript.tx_id\n\
             \tfield pub.scratchTmp.tx_id\n\
             \tfield pub.exon.tx_id\n\
             ignore pub\n\
             \ttable: scratchTmp\n",
        );
        let targets: Vec<String> = relate(&model, "pub", "transcript")
            .iter()
            .map(|p| p.target.table.clone())
            .collect();
        assert_eq!(targets, ["exon"]);

        // The ignored table produces nothing as a query input either.
        assert!(relate(&model, "pub", "scratchTmp").is_empty());
    }

    #[test]
    fn test_relate_duplicate_targets_via_two_sets() {
        let model = model(
            "identifier txId\n\
             \tfield pub.transcript.tx_id\n\
             \tfield pub.exon.tx_id\n\
             identifier txName\n\
             \tfield pub.transcript.name\n\
             \tfield pub.exon.name\n",
        );
        let pairs = relate(&model, "pub", "transcript");
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].target.table, "exon");
        assert_eq!(pairs[1].target.table, "exon");
        assert_ne!(pairs[0].via, pairs[1].via);
    }

    #[test]
    fn test_dump_pairs_resolves_set_names() {
        let model = model(
            "identifier txId\n\
             \texternal: TranscriptID\n\
             \tfield pub.transcript.tx_id\n\
             \tfield pub.exon.tx_id\n",
        );
        let pairs = relate(&model, "pub", "transcript");
        let mut out = Vec::new();
        dump_pairs(&model, &pairs, &mut out).expect("write failed");
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(
            text,
            "pub.transcript.tx_id -> pub.exon.tx_id (via TranscriptID)\n"
        );
    }
}
