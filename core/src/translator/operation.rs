#![deny(missing_docs)]

//! # Operation Building
//!
//! Combines route resolution, parameter classification and response
//! resolution into one [`Operation`] per resolved verb of a method.

use crate::descriptors::{GroupDescriptor, MethodDescriptor, MethodHint, ResponseTypeHint};
use crate::document::{Operation, Response};
use crate::error::AppResult;
use crate::settings::Settings;
use crate::translator::naming::controller_name;
use crate::translator::params::{classify_parameters, ensure_single_body, PathTemplate};
use crate::translator::routes::resolve_route;
use crate::translator::schema::{non_empty, SchemaResolver, SchemaTable};
use indexmap::IndexMap;
use tracing::debug;

const STATUS_OK: &str = "200";
const STATUS_NO_CONTENT: &str = "204";

/// Builds the operations of one method, one per resolved verb.
///
/// Fails with `AmbiguousBodyBinding` when two parameters end up in the body,
/// and with `UnresolvableTypeShape` when a parameter or response type cannot
/// be classified.
pub fn build_operations<'a>(
    method: &MethodDescriptor,
    group: &GroupDescriptor,
    settings: &Settings,
    resolver: &mut SchemaResolver<'a>,
    schemas: &mut SchemaTable,
) -> AppResult<Vec<Operation>> {
    let route = resolve_route(method, group, settings);
    let template = PathTemplate::parse(&route.path_template);

    let (parameters, path_template) =
        classify_parameters(&method.parameters, &template, resolver, schemas)?;
    ensure_single_body(&route.operation_id, &parameters)?;

    let responses = build_responses(method, resolver, schemas)?;

    let summary = method
        .hints
        .iter()
        .find_map(|h| match h {
            MethodHint::Description(text) => non_empty(Some(text)),
            _ => None,
        })
        .or_else(|| non_empty(method.documentation.as_deref()));

    let tags = vec![controller_name(&group.name).to_string()];
    let deprecated = method.has_hint(&MethodHint::Obsolete);

    let operations = route
        .verbs
        .iter()
        .map(|verb| Operation {
            id: route.operation_id.clone(),
            path_template: path_template.clone(),
            verb: *verb,
            parameters: parameters.clone(),
            responses: responses.clone(),
            summary: summary.clone(),
            tags: tags.clone(),
            deprecated,
        })
        .collect::<Vec<_>>();

    debug!(
        operation_id = %route.operation_id,
        path = %path_template,
        verbs = operations.len(),
        "Built operation"
    );
    Ok(operations)
}

fn build_responses<'a>(
    method: &MethodDescriptor,
    resolver: &mut SchemaResolver<'a>,
    schemas: &mut SchemaTable,
) -> AppResult<IndexMap<String, Response>> {
    let return_docs = non_empty(method.return_documentation.as_deref());
    let overrides: Vec<&ResponseTypeHint> = method
        .hints
        .iter()
        .filter_map(|h| match h {
            MethodHint::ResponseType(r) => Some(r),
            _ => None,
        })
        .collect();

    let mut responses = IndexMap::new();

    if overrides.is_empty() {
        let classified = resolver.classifier().classify(&method.returns)?;
        let response = if classified.is_void() {
            empty_response(STATUS_NO_CONTENT, return_docs)
        } else {
            Response {
                status_code: STATUS_OK.to_string(),
                description: return_docs.unwrap_or_default(),
                schema: Some(resolver.resolve_classified(&classified, schemas)?),
            }
        };
        responses.insert(response.status_code.clone(), response);
        return Ok(responses);
    }

    for hint in overrides {
        let classified = match &hint.ty {
            Some(ty) => Some(resolver.classifier().classify(ty)?),
            None => None,
        };
        let schema = match &classified {
            Some(c) if !c.is_void() => Some(resolver.resolve_classified(c, schemas)?),
            _ => None,
        };
        let inferred = if schema.is_some() {
            STATUS_OK
        } else {
            STATUS_NO_CONTENT
        };
        let status_code = hint
            .status
            .clone()
            .unwrap_or_else(|| inferred.to_string());
        let description = non_empty(hint.description.as_deref())
            .or_else(|| return_docs.clone())
            .unwrap_or_default();

        // Later declarations for the same status win
        responses.insert(
            status_code.clone(),
            Response {
                status_code,
                description,
                schema,
            },
        );
    }

    Ok(responses)
}

fn empty_response(status: &str, description: Option<String>) -> Response {
    Response {
        status_code: status.to_string(),
        description: description.unwrap_or_default(),
        schema: None,
    }
}
