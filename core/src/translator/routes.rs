#![deny(missing_docs)]

//! # Route & Method Resolution
//!
//! Derives the path template and HTTP verbs of a method, from explicit routing
//! hints when present and from naming conventions otherwise.

use crate::descriptors::{GroupDescriptor, HttpVerb, MethodDescriptor, MethodHint};
use crate::settings::Settings;
use crate::translator::naming::{
    action_name, controller_name, convention_verb, join_route, operation_id,
};
use std::collections::BTreeSet;
use tracing::warn;

/// Marks a route that ignores the group's route prefix.
const ROOT_ROUTE_MARKER: &str = "~/";

/// The routing facts derived for one method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    /// Path template, before placeholder matching.
    pub path_template: String,
    /// Verbs, ordered GET, POST, PUT, DELETE, OPTIONS, HEAD, PATCH; never empty.
    pub verbs: BTreeSet<HttpVerb>,
    /// The logical action name.
    pub action_name: String,
    /// The operation id, before document-wide disambiguation.
    pub operation_id: String,
}

/// Resolves path template, verbs and operation id for a method.
pub fn resolve_route(
    method: &MethodDescriptor,
    group: &GroupDescriptor,
    settings: &Settings,
) -> ResolvedRoute {
    let action = action_name(method);
    ResolvedRoute {
        path_template: resolve_path(method, group, action, &settings.default_url_template),
        verbs: resolve_verbs(method, action),
        action_name: action.to_string(),
        operation_id: operation_id(action),
    }
}

fn resolve_path(
    method: &MethodDescriptor,
    group: &GroupDescriptor,
    action: &str,
    default_template: &str,
) -> String {
    let explicit = method.hints.iter().find_map(|h| match h {
        MethodHint::Route(template) => Some(template.as_str()),
        _ => None,
    });

    match explicit {
        Some(route) => match route.strip_prefix(ROOT_ROUTE_MARKER) {
            Some(rooted) => join_route(&[rooted]),
            None => join_route(&[group.route_prefix().unwrap_or(""), route]),
        },
        None => {
            let synthesized = default_template
                .replace("{controller}", controller_name(&group.name))
                .replace("{action}", action);
            join_route(&[synthesized.as_str()])
        }
    }
}

fn resolve_verbs(method: &MethodDescriptor, action: &str) -> BTreeSet<HttpVerb> {
    let mut verbs: BTreeSet<HttpVerb> = method.hints.iter().filter_map(MethodHint::verb).collect();

    for hint in &method.hints {
        if let MethodHint::AcceptVerbs(list) = hint {
            for raw in list {
                match HttpVerb::parse(raw) {
                    Some(verb) => {
                        verbs.insert(verb);
                    }
                    None => warn!(method = %method.name, verb = %raw, "Skipping unknown verb"),
                }
            }
        }
    }

    if verbs.is_empty() {
        verbs.insert(convention_verb(action));
    }
    verbs
}
