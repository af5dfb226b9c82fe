#![deny(missing_docs)]

//! # Wire Format
//!
//! Renders a [`Document`] as a Swagger 2.0 JSON tree. Keys keep insertion
//! order (`serde_json` with `preserve_order`), so output is stable across runs.

use crate::document::{
    AdditionalProperties, Binding, Document, EnumSchema, Operation, Parameter, PrimitiveKind,
    Response, SchemaKind, SchemaNode,
};
use crate::error::{AppError, AppResult};
use serde_json::{json, Map, Value};

const SWAGGER_VERSION: &str = "2.0";
const JSON_MEDIA_TYPE: &str = "application/json";
const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Builds the Swagger 2.0 JSON tree of a document.
pub fn to_json(document: &Document) -> Value {
    let mut info = Map::new();
    info.insert("title".to_string(), json!(document.info.title));
    info.insert("version".to_string(), json!(document.info.version));

    let mut paths = Map::new();
    for (template, item) in &document.paths {
        let mut item_obj = Map::new();
        for (verb, operation) in item {
            item_obj.insert(
                verb.as_str().to_string(),
                operation_to_json(operation, document),
            );
        }
        paths.insert(format!("/{}", template), Value::Object(item_obj));
    }

    let mut definitions = Map::new();
    for (name, schema) in &document.schemas {
        definitions.insert(name.clone(), schema_to_json(schema));
    }

    let mut doc = Map::new();
    doc.insert("swagger".to_string(), json!(SWAGGER_VERSION));
    doc.insert("info".to_string(), Value::Object(info));
    doc.insert("consumes".to_string(), json!([JSON_MEDIA_TYPE]));
    doc.insert("produces".to_string(), json!([JSON_MEDIA_TYPE]));
    if !document.tags.is_empty() {
        let tags: Vec<Value> = document
            .tags
            .iter()
            .map(|tag| {
                let mut obj = Map::new();
                obj.insert("name".to_string(), json!(tag.name));
                if let Some(desc) = &tag.description {
                    obj.insert("description".to_string(), json!(desc));
                }
                Value::Object(obj)
            })
            .collect();
        doc.insert("tags".to_string(), Value::Array(tags));
    }
    doc.insert("paths".to_string(), Value::Object(paths));
    doc.insert("definitions".to_string(), Value::Object(definitions));
    Value::Object(doc)
}

/// Pretty-printed JSON text.
pub fn to_json_string(document: &Document) -> AppResult<String> {
    serde_json::to_string_pretty(&to_json(document))
        .map_err(|e| AppError::General(format!("Failed to serialize document as JSON: {}", e)))
}

/// YAML text.
pub fn to_yaml(document: &Document) -> AppResult<String> {
    serde_yaml::to_string(&to_json(document))
        .map_err(|e| AppError::General(format!("Failed to serialize document as YAML: {}", e)))
}

fn operation_to_json(operation: &Operation, document: &Document) -> Value {
    let mut op = Map::new();
    if !operation.tags.is_empty() {
        op.insert("tags".to_string(), json!(operation.tags));
    }
    op.insert("operationId".to_string(), json!(operation.id));
    if let Some(summary) = &operation.summary {
        op.insert("summary".to_string(), json!(summary));
    }
    if operation.deprecated {
        op.insert("deprecated".to_string(), json!(true));
    }

    let parameters: Vec<Value> = operation
        .parameters
        .iter()
        .map(|p| parameter_to_json(p, document))
        .collect();
    op.insert("parameters".to_string(), Value::Array(parameters));

    let mut responses = Map::new();
    for (status, response) in &operation.responses {
        responses.insert(status.clone(), response_to_json(response));
    }
    op.insert("responses".to_string(), Value::Object(responses));

    Value::Object(op)
}

fn parameter_to_json(param: &Parameter, document: &Document) -> Value {
    let mut obj = Map::new();
    obj.insert("name".to_string(), json!(param.name));
    obj.insert("in".to_string(), json!(param.binding.as_str()));
    if let Some(desc) = &param.description {
        obj.insert("description".to_string(), json!(desc));
    }
    // Swagger 2.0 path parameters must be required
    let required = param.binding == Binding::Path || !param.is_optional;
    obj.insert("required".to_string(), json!(required));

    if param.binding == Binding::Body {
        obj.insert("schema".to_string(), schema_to_json(&param.schema));
    } else {
        write_simple_type(&mut obj, &param.schema, document);
    }
    if param.schema.nullable || (param.binding == Binding::Path && param.is_optional) {
        obj.insert("x-nullable".to_string(), json!(true));
    }
    Value::Object(obj)
}

/// Non-body parameters and their `items` cannot use `$ref`; enums are inlined
/// from the schema table and anything else complex degrades to `string`.
/// `type: file` is only legal for form data, so files become binary strings.
fn write_simple_type(obj: &mut Map<String, Value>, schema: &SchemaNode, document: &Document) {
    match &schema.kind {
        SchemaKind::Primitive(PrimitiveKind::File) => {
            obj.insert("type".to_string(), json!("string"));
            obj.insert("format".to_string(), json!("binary"));
        }
        SchemaKind::Primitive(kind) => write_primitive(obj, *kind),
        SchemaKind::Array(item) => {
            obj.insert("type".to_string(), json!("array"));
            let mut items = Map::new();
            write_simple_type(&mut items, item, document);
            obj.insert("items".to_string(), Value::Object(items));
        }
        SchemaKind::Enum(values) => write_enum(obj, values),
        SchemaKind::Reference(name) => match document.schemas.get(name).map(|s| &s.kind) {
            Some(SchemaKind::Enum(values)) => write_enum(obj, values),
            _ => write_primitive(obj, PrimitiveKind::String),
        },
        SchemaKind::Object(_) => write_primitive(obj, PrimitiveKind::String),
    }
}

fn write_primitive(obj: &mut Map<String, Value>, kind: PrimitiveKind) {
    obj.insert("type".to_string(), json!(kind.json_type()));
    if let Some(format) = kind.format() {
        obj.insert("format".to_string(), json!(format));
    }
}

fn write_enum(obj: &mut Map<String, Value>, values: &EnumSchema) {
    if values.is_integer() {
        write_primitive(obj, PrimitiveKind::Int32);
    } else {
        write_primitive(obj, PrimitiveKind::String);
    }
    obj.insert("enum".to_string(), Value::Array(values.values.clone()));
}

fn response_to_json(response: &Response) -> Value {
    let mut obj = Map::new();
    obj.insert("description".to_string(), json!(response.description));
    if let Some(schema) = &response.schema {
        obj.insert("schema".to_string(), schema_to_json(schema));
    }
    Value::Object(obj)
}

/// Renders one schema node.
pub fn schema_to_json(schema: &SchemaNode) -> Value {
    let mut obj = Map::new();
    match &schema.kind {
        SchemaKind::Reference(name) => {
            obj.insert(
                "$ref".to_string(),
                json!(format!("{}{}", DEFINITIONS_PREFIX, name)),
            );
        }
        SchemaKind::Primitive(kind) => write_primitive(&mut obj, *kind),
        SchemaKind::Array(item) => {
            obj.insert("type".to_string(), json!("array"));
            obj.insert("items".to_string(), schema_to_json(item));
        }
        SchemaKind::Enum(values) => {
            write_enum(&mut obj, values);
            obj.insert("x-enumNames".to_string(), json!(values.names));
        }
        SchemaKind::Object(object) => {
            obj.insert("type".to_string(), json!("object"));
            if !object.required.is_empty() {
                obj.insert("required".to_string(), json!(object.required));
            }
            if !object.properties.is_empty() {
                let mut props = Map::new();
                for (name, prop) in &object.properties {
                    props.insert(name.clone(), schema_to_json(prop));
                }
                obj.insert("properties".to_string(), Value::Object(props));
            }
            let additional = match &object.additional {
                AdditionalProperties::Forbidden => json!(false),
                AdditionalProperties::Any => json!({}),
                AdditionalProperties::Schema(value) => schema_to_json(value),
            };
            obj.insert("additionalProperties".to_string(), additional);
        }
    }

    if schema.reference_name().is_none() {
        if let Some(desc) = &schema.description {
            obj.insert("description".to_string(), json!(desc));
        }
    }
    if schema.nullable {
        obj.insert("x-nullable".to_string(), json!(true));
    }
    Value::Object(obj)
}
