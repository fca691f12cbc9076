//! Resolves parsed records into a compiled [`LinkModel`].
//!
//! The builder performs the semantic half of loading: name uniqueness,
//! parent resolution, child back-link derivation, and inheritance cycle
//! detection. It consumes the parser's output and either publishes a fully
//! consistent model or fails with a file-and-line diagnostic - there is no
//! partially built state to observe.

use tl_core::{IdentifierSet, LinkModel, ModelParts, SetId, fx_hash_map, fx_hash_set};
use tl_parser::LinksFile;
use tracing::debug;

use crate::error::BuildError;

/// Compiles parsed records into a model.
///
/// # Errors
///
/// Returns a [`BuildError`] for duplicate set names, unresolved `typeOf`
/// references, or inheritance cycles.
///
/// # Examples
///
/// ```
/// use tl_parser::parse_links;
/// use tl_engine::build;
///
/// let source = "\
/// identifier geneId
///   field pub.gene.gene_id
/// identifier txId
///   typeOf: geneId
///   field pub.transcript.tx_id
/// ";
/// let file = parse_links("demo.links".as_ref(), source)?;
/// let model = build(file)?;
///
/// let gene = model.set_id("geneId").expect("known set");
/// let tx = model.set_id("txId").expect("known set");
/// assert_eq!(model.set(tx).parent, Some(gene));
/// assert_eq!(model.set(gene).children, vec![tx]);
/// # Ok::<(), tl_engine::LoadError>(())
/// ```
pub fn build(file: LinksFile) -> Result<LinkModel, BuildError> {
    let mut parts = ModelParts::new(file.file_name.clone());

    // Pass 1: symbol table, with duplicate detection.
    let mut symbols = fx_hash_map::<String, (SetId, u32)>();
    for raw in &file.sets {
        let id = SetId::new(u32::try_from(parts.sets.len()).unwrap_or(u32::MAX));
        if let Some(&(_, first_line)) = symbols.get(&raw.name) {
            return Err(BuildError::DuplicateSet {
                file: file.file_name.clone(),
                name: raw.name.clone(),
                line: raw.line,
                first_line,
            });
        }
        symbols.insert(raw.name.clone(), (id, raw.line));

        let mut set = IdentifierSet::new(raw.name.clone());
        set.line = raw.line;
        set.external = raw.external.clone();
        set.description = raw.description.clone();
        set.is_fuzzy = raw.is_fuzzy;
        set.expanded = raw.expanded;
        set.is_dependency = raw.is_dependency;
        set.fields = raw.fields.clone();
        parts.sets.push(set);
    }

    // Pass 2: resolve parent references against the full symbol table.
    for (index, raw) in file.sets.iter().enumerate() {
        if let Some(parent_name) = &raw.parent {
            let Some(&(parent_id, _)) = symbols.get(parent_name) else {
                return Err(BuildError::UnresolvedParent {
                    file: file.file_name.clone(),
                    set: raw.name.clone(),
                    parent: parent_name.clone(),
                    line: raw.line,
                });
            };
            parts.sets[index].parent = Some(parent_id);
        }
    }

    // Pass 3: derive child back-links as the inverse of parent links.
    for index in 0..parts.sets.len() {
        if let Some(parent) = parts.sets[index].parent {
            let child = SetId::new(u32::try_from(index).unwrap_or(u32::MAX));
            parts.sets[parent.index()].children.push(child);
        }
    }

    // Pass 4: inheritance cycles. Chains already proven to terminate are
    // marked safe so each set is walked at most once overall.
    let mut safe = fx_hash_set::<SetId>();
    for index in 0..parts.sets.len() {
        let mut path: Vec<SetId> = Vec::new();
        let mut current = Some(SetId::new(u32::try_from(index).unwrap_or(u32::MAX)));
        while let Some(id) = current {
            if safe.contains(&id) {
                break;
            }
            if path.contains(&id) {
                let set = &parts.sets[id.index()];
                return Err(BuildError::InheritanceCycle {
                    file: file.file_name.clone(),
                    set: set.name.clone(),
                    line: set.line,
                });
            }
            path.push(id);
            current = parts.sets[id.index()].parent;
        }
        safe.extend(path);
    }

    parts.exclusive = file.exclusives;
    parts.dependencies = file.dependencies;
    parts.type_groups = file.type_groups;
    parts.ignore_rules = file.ignores;
    parts.databases_checked = file.databases_checked.into_iter().collect();
    parts.databases_ignored = file.databases_ignored.into_iter().collect();

    debug!(
        sets = parts.sets.len(),
        exclusivity_groups = parts.exclusive.len(),
        dependencies = parts.dependencies.len(),
        type_groups = parts.type_groups.len(),
        ignore_rules = parts.ignore_rules.len(),
        "compiled link model"
    );

    Ok(LinkModel::from_parts(parts))
}
