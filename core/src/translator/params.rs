#![deny(missing_docs)]

//! # Parameter Classification
//!
//! Decides where each method parameter is bound (path, query or body) and
//! resolves its schema. Route placeholders are matched first, so parameters
//! classified afterwards see only the placeholders nobody claimed.

use crate::descriptors::{ParameterDescriptor, ParameterHint};
use crate::document::{Binding, Parameter, PrimitiveKind, SchemaNode};
use crate::error::{AppError, AppResult};
use crate::translator::naming::join_route;
use crate::translator::schema::{non_empty, SchemaResolver, SchemaTable};
use crate::translator::shape::Shape;
use regex::Regex;
use std::sync::OnceLock;

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([^{}]+)\}").expect("placeholder regex is valid"))
}

/// A `{name}` placeholder of a route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Variable name, stripped of constraints and markers.
    pub name: String,
    /// Whether the template marked it optional (`{id?}` or `{id=5}`).
    pub optional: bool,
}

/// A route template with its placeholders normalized to `{name}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    /// The normalized template text.
    pub template: String,
    /// Placeholders in template order.
    pub placeholders: Vec<Placeholder>,
}

impl PathTemplate {
    /// Parses a template, normalizing `{id:int}`, `{id?}` and `{*rest}` to `{id}` / `{rest}`.
    pub fn parse(raw: &str) -> Self {
        let mut placeholders = Vec::new();
        let template = placeholder_regex()
            .replace_all(raw, |caps: &regex::Captures<'_>| {
                let inner = caps[1].trim().trim_start_matches('*');
                let optional = inner.ends_with('?') || inner.contains('=');
                let name = inner
                    .split([':', '=', '?'])
                    .next()
                    .unwrap_or(inner)
                    .trim()
                    .to_string();
                let replacement = format!("{{{}}}", name);
                placeholders.push(Placeholder { name, optional });
                replacement
            })
            .into_owned();

        Self {
            template,
            placeholders,
        }
    }

    /// Removes placeholders nobody claimed and collapses the empty segments left behind.
    pub fn without(&self, unmatched: &[Placeholder]) -> String {
        let mut path = self.template.clone();
        for placeholder in unmatched {
            path = path.replace(&format!("{{{}}}", placeholder.name), "");
        }
        join_route(&[path.as_str()])
    }
}

/// Removes and returns the placeholder matching `name` (ASCII case-insensitive).
pub fn take_placeholder(remaining: &mut Vec<Placeholder>, name: &str) -> Option<Placeholder> {
    let idx = remaining
        .iter()
        .position(|p| p.name.eq_ignore_ascii_case(name))?;
    Some(remaining.remove(idx))
}

/// Classifies one parameter.
///
/// `placeholder` is the route placeholder the parameter claimed, if any.
pub fn classify_parameter<'a>(
    param: &ParameterDescriptor,
    placeholder: Option<&Placeholder>,
    resolver: &mut SchemaResolver<'a>,
    schemas: &mut SchemaTable,
) -> AppResult<Parameter> {
    let classified = resolver.classifier().classify(&param.ty)?;
    let description = non_empty(param.documentation.as_deref());

    if let Some(placeholder) = placeholder {
        // Path segments are always textual
        let schema = match classified.shape {
            Shape::Primitive(kind) if kind != PrimitiveKind::File => {
                SchemaNode::primitive(kind)
            }
            Shape::Enum(_) => resolver.resolve_classified(&classified, schemas)?.nullable(false),
            _ => SchemaNode::primitive(PrimitiveKind::String),
        };
        return Ok(Parameter {
            name: placeholder.name.clone(),
            binding: Binding::Path,
            schema,
            description,
            is_optional: placeholder.optional,
        });
    }

    let is_optional = param.optional || classified.is_nullable();
    let from_body = param.hints.contains(&ParameterHint::FromBody);
    let from_uri = param.hints.contains(&ParameterHint::FromUri);

    let (binding, schema) = if classified.shape.is_complex() {
        if from_uri {
            (
                Binding::Query,
                SchemaNode::primitive(PrimitiveKind::String).nullable(classified.is_nullable()),
            )
        } else {
            (
                Binding::Body,
                resolver.resolve_classified(&classified, schemas)?,
            )
        }
    } else {
        let schema = resolver.resolve_classified(&classified, schemas)?;
        if from_body {
            (Binding::Body, schema)
        } else {
            (Binding::Query, schema)
        }
    };

    Ok(Parameter {
        name: param.name.clone(),
        binding,
        schema,
        description,
        is_optional,
    })
}

/// Classifies all parameters of a method against a route template.
///
/// Returns the parameters in declaration order and the final path template,
/// with unclaimed placeholders removed.
pub fn classify_parameters<'a>(
    params: &[ParameterDescriptor],
    template: &PathTemplate,
    resolver: &mut SchemaResolver<'a>,
    schemas: &mut SchemaTable,
) -> AppResult<(Vec<Parameter>, String)> {
    let mut remaining = template.placeholders.clone();
    let claimed: Vec<Option<Placeholder>> = params
        .iter()
        .map(|p| take_placeholder(&mut remaining, &p.name))
        .collect();

    let mut classified = Vec::with_capacity(params.len());
    for (param, placeholder) in params.iter().zip(claimed.iter()) {
        classified.push(classify_parameter(
            param,
            placeholder.as_ref(),
            resolver,
            schemas,
        )?);
    }

    Ok((classified, template.without(&remaining)))
}

/// Fails when more than one parameter is bound to the body.
pub fn ensure_single_body(operation_id: &str, params: &[Parameter]) -> AppResult<()> {
    let bodies: Vec<String> = params
        .iter()
        .filter(|p| p.binding == Binding::Body)
        .map(|p| p.name.clone())
        .collect();
    if bodies.len() > 1 {
        return Err(AppError::AmbiguousBodyBinding {
            operation_id: operation_id.to_string(),
            parameters: bodies,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::{DescriptorSet, TypeCatalog, TypeRef};
    use crate::settings::SchemaSettings;
    use crate::translator::shape::ShapeClassifier;

    fn catalog() -> TypeCatalog {
        DescriptorSet::from_yaml(
            r#"
types:
  - name: User
    members:
      - name: id
        type: i64
  - name: Filter
    members:
      - name: term
        type: String
  - name: Color
    kind: enum
    values:
      - name: Red
"#,
        )
        .unwrap()
        .catalog()
        .unwrap()
    }

    fn param(name: &str, ty: &str, hints: Vec<ParameterHint>) -> ParameterDescriptor {
        ParameterDescriptor {
            name: name.into(),
            ty: TypeRef::parse(ty).unwrap(),
            optional: false,
            documentation: None,
            hints,
        }
    }

    #[test]
    fn test_template_normalization() {
        let t = PathTemplate::parse("users/{id:int}/files/{name?}/{*rest}");
        assert_eq!(t.template, "users/{id}/files/{name}/{rest}");
        assert_eq!(
            t.placeholders,
            vec![
                Placeholder {
                    name: "id".into(),
                    optional: false
                },
                Placeholder {
                    name: "name".into(),
                    optional: true
                },
                Placeholder {
                    name: "rest".into(),
                    optional: false
                },
            ]
        );
    }

    #[test]
    fn test_unmatched_placeholder_removed() {
        let t = PathTemplate::parse("users/{id}");
        assert_eq!(t.without(&t.placeholders), "users");

        let nested = PathTemplate::parse("api/{controller}/{id}/items");
        assert_eq!(
            nested.without(&nested.placeholders[1..]),
            "api/{controller}/items"
        );
    }

    #[test]
    fn test_path_placeholder_is_consumed() {
        let catalog = catalog();
        let settings = SchemaSettings::default();
        let mut resolver = SchemaResolver::new(ShapeClassifier::new(&catalog), &settings);
        let mut schemas = SchemaTable::new();

        let params = vec![param("id", "i64", vec![]), param("verbose", "bool", vec![])];
        let (classified, path) = classify_parameters(
            &params,
            &PathTemplate::parse("users/{id}"),
            &mut resolver,
            &mut schemas,
        )
        .unwrap();

        assert_eq!(path, "users/{id}");
        assert_eq!(classified[0].binding, Binding::Path);
        assert_eq!(classified[0].schema, SchemaNode::primitive(PrimitiveKind::Int64));
        assert_eq!(classified[1].binding, Binding::Query);
        assert_eq!(classified.iter().filter(|p| p.name == "id").count(), 1);
    }

    #[test]
    fn test_object_in_path_is_coerced_to_string() {
        let catalog = catalog();
        let settings = SchemaSettings::default();
        let mut resolver = SchemaResolver::new(ShapeClassifier::new(&catalog), &settings);
        let mut schemas = SchemaTable::new();

        let (classified, _) = classify_parameters(
            &[param("Filter", "Filter", vec![])],
            &PathTemplate::parse("search/{filter}"),
            &mut resolver,
            &mut schemas,
        )
        .unwrap();
        assert_eq!(classified[0].name, "filter");
        assert_eq!(classified[0].binding, Binding::Path);
        assert_eq!(classified[0].schema, SchemaNode::primitive(PrimitiveKind::String));
        assert!(schemas.is_empty());
    }

    #[test]
    fn test_binding_rules() {
        let catalog = catalog();
        let settings = SchemaSettings::default();
        let mut resolver = SchemaResolver::new(ShapeClassifier::new(&catalog), &settings);
        let mut schemas = SchemaTable::new();

        let body = classify_parameter(
            &param("user", "User", vec![]),
            None,
            &mut resolver,
            &mut schemas,
        )
        .unwrap();
        assert_eq!(body.binding, Binding::Body);
        assert_eq!(body.schema, SchemaNode::reference("User"));

        let query_object = classify_parameter(
            &param("filter", "Filter", vec![ParameterHint::FromUri]),
            None,
            &mut resolver,
            &mut schemas,
        )
        .unwrap();
        assert_eq!(query_object.binding, Binding::Query);
        assert_eq!(query_object.schema, SchemaNode::primitive(PrimitiveKind::String));

        let ids = classify_parameter(
            &param("ids", "Vec<i32>", vec![]),
            None,
            &mut resolver,
            &mut schemas,
        )
        .unwrap();
        assert_eq!(ids.binding, Binding::Query);

        let raw = classify_parameter(
            &param("raw", "String", vec![ParameterHint::FromBody]),
            None,
            &mut resolver,
            &mut schemas,
        )
        .unwrap();
        assert_eq!(raw.binding, Binding::Body);

        let color = classify_parameter(
            &param("color", "Option<Color>", vec![]),
            None,
            &mut resolver,
            &mut schemas,
        )
        .unwrap();
        assert_eq!(color.binding, Binding::Query);
        assert!(color.is_optional);
    }

    #[test]
    fn test_two_bodies_are_rejected() {
        let params = vec![
            Parameter {
                name: "a".into(),
                binding: Binding::Body,
                schema: SchemaNode::reference("User"),
                description: None,
                is_optional: false,
            },
            Parameter {
                name: "b".into(),
                binding: Binding::Body,
                schema: SchemaNode::reference("Filter"),
                description: None,
                is_optional: false,
            },
        ];
        let err = ensure_single_body("Create", &params).unwrap_err();
        match err {
            AppError::AmbiguousBodyBinding {
                operation_id,
                parameters,
            } => {
                assert_eq!(operation_id, "Create");
                assert_eq!(parameters, vec!["a", "b"]);
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert!(ensure_single_body("Create", &params[..1]).is_ok());
    }
}
