#![deny(missing_docs)]

//! # Document Assembly
//!
//! Walks every group, builds its operations and merges them into one
//! [`Document`]. A single schema cache is shared by all groups of a build so
//! each type lands in the schema table exactly once.

use crate::descriptors::{DescriptorSet, GroupDescriptor, MethodDescriptor, MethodHint, TypeCatalog};
use crate::document::{Document, Tag};
use crate::error::AppResult;
use crate::settings::Settings;
use crate::translator::naming::controller_name;
use crate::translator::operation::build_operations;
use crate::translator::schema::{non_empty, SchemaResolver, SchemaTable};
use crate::translator::shape::ShapeClassifier;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Assembles a document from a full descriptor set.
pub fn assemble(set: &DescriptorSet, settings: &Settings) -> AppResult<Document> {
    let catalog = set.catalog()?;
    assemble_groups(&set.groups, &catalog, settings)
}

/// Assembles a document from groups whose types live in `catalog`.
///
/// Any classification or binding error aborts the build; no partial document
/// is returned.
pub fn assemble_groups(
    groups: &[GroupDescriptor],
    catalog: &TypeCatalog,
    settings: &Settings,
) -> AppResult<Document> {
    let mut document = Document::new(&settings.title, &settings.version);
    let mut resolver = SchemaResolver::new(ShapeClassifier::new(catalog), &settings.schema);
    let mut schemas = SchemaTable::new();

    for group in groups {
        let methods: Vec<&MethodDescriptor> = group
            .methods
            .iter()
            .filter(|m| is_included(m, settings))
            .collect();

        if methods.is_empty() {
            warn!(group = %group.name, "Group has no usable methods");
            continue;
        }
        register_tag(&mut document.tags, group);

        for method in methods {
            for operation in
                build_operations(method, group, settings, &mut resolver, &mut schemas)?
            {
                let verb = operation.verb;
                let item = document
                    .paths
                    .entry(operation.path_template.clone())
                    .or_default();
                if let Some(previous) = item.insert(verb, operation) {
                    warn!(
                        path = %previous.path_template,
                        verb = %verb,
                        replaced = %previous.id,
                        "Overwriting operation registered for the same path and verb"
                    );
                }
            }
        }
    }

    document.schemas = schemas;
    disambiguate_operation_ids(&mut document);

    info!(
        paths = document.paths.len(),
        operations = document.operation_count(),
        schemas = document.schemas.len(),
        "Assembled document"
    );
    Ok(document)
}

/// Groups sharing a logical name share one tag; the first description wins.
fn register_tag(tags: &mut Vec<Tag>, group: &GroupDescriptor) {
    let name = controller_name(&group.name);
    let description = non_empty(group.description());
    match tags.iter_mut().find(|t| t.name == name) {
        Some(existing) => {
            if existing.description.is_none() {
                existing.description = description;
            }
        }
        None => tags.push(Tag {
            name: name.to_string(),
            description,
        }),
    }
}

fn is_included(method: &MethodDescriptor, settings: &Settings) -> bool {
    if method.name == settings.excluded_method_name {
        debug!(method = %method.name, "Excluding method by name");
        return false;
    }
    if method.has_hint(&MethodHint::NonAction) {
        debug!(method = %method.name, "Excluding non-action method");
        return false;
    }
    true
}

/// Makes operation ids unique across the document.
///
/// The first operation keeps its id; later ones sharing it get `2`, `3`, ...
/// in document order, skipping any id already in use.
pub fn disambiguate_operation_ids(document: &mut Document) {
    let mut taken: HashSet<String> = document.operations().map(|op| op.id.clone()).collect();
    let mut seen: HashSet<String> = HashSet::new();
    let mut counters: HashMap<String, usize> = HashMap::new();

    for operation in document.paths.values_mut().flat_map(|item| item.values_mut()) {
        if seen.insert(operation.id.clone()) {
            continue;
        }

        let base = operation.id.clone();
        let counter = counters.entry(base.clone()).or_insert(1);
        let renamed = loop {
            *counter += 1;
            let candidate = format!("{}{}", base, counter);
            if !taken.contains(&candidate) {
                break candidate;
            }
        };

        warn!(from = %base, to = %renamed, "Renaming duplicate operation id");
        taken.insert(renamed.clone());
        seen.insert(renamed.clone());
        operation.id = renamed;
    }
}
