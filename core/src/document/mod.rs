#![deny(missing_docs)]

//! # Document Model
//!
//! The resolved API description: operations grouped by path and verb, plus the
//! deduplicated schema table every `Reference` node points into.

pub mod wire;

use crate::descriptors::HttpVerb;
use indexmap::IndexMap;

/// Primitive kinds, each fixing a JSON type and optional format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// `string`
    String,
    /// `integer` / `int32`
    Int32,
    /// `integer` / `int64`
    Int64,
    /// `number` / `float`
    Float,
    /// `number` / `double`
    Double,
    /// `number` / `decimal`
    Decimal,
    /// `boolean`
    Boolean,
    /// `string` / `date`
    Date,
    /// `string` / `date-time`
    DateTime,
    /// `string` / `uuid`
    Uuid,
    /// `string` / `duration`
    Duration,
    /// `string` / `uri`
    Uri,
    /// `string` / `byte` (base64 payload)
    Byte,
    /// `file`
    File,
}

impl PrimitiveKind {
    /// The JSON type name.
    pub fn json_type(&self) -> &'static str {
        match self {
            PrimitiveKind::Int32 | PrimitiveKind::Int64 => "integer",
            PrimitiveKind::Float | PrimitiveKind::Double | PrimitiveKind::Decimal => "number",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::File => "file",
            _ => "string",
        }
    }

    /// The format qualifier, if any.
    pub fn format(&self) -> Option<&'static str> {
        match self {
            PrimitiveKind::Int32 => Some("int32"),
            PrimitiveKind::Int64 => Some("int64"),
            PrimitiveKind::Float => Some("float"),
            PrimitiveKind::Double => Some("double"),
            PrimitiveKind::Decimal => Some("decimal"),
            PrimitiveKind::Date => Some("date"),
            PrimitiveKind::DateTime => Some("date-time"),
            PrimitiveKind::Uuid => Some("uuid"),
            PrimitiveKind::Duration => Some("duration"),
            PrimitiveKind::Uri => Some("uri"),
            PrimitiveKind::Byte => Some("byte"),
            PrimitiveKind::String | PrimitiveKind::Boolean | PrimitiveKind::File => None,
        }
    }
}

/// What an object accepts beyond its declared properties.
#[derive(Debug, Clone, PartialEq)]
pub enum AdditionalProperties {
    /// Nothing beyond the declared properties.
    Forbidden,
    /// Any value.
    Any,
    /// Values matching a schema (dictionaries).
    Schema(Box<SchemaNode>),
}

/// An object schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSchema {
    /// Properties in declaration order.
    pub properties: IndexMap<String, SchemaNode>,
    /// Names of required properties.
    pub required: Vec<String>,
    /// Extra property policy.
    pub additional: AdditionalProperties,
}

/// An enumeration schema.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumSchema {
    /// Serialized values: integers when every value is numbered, names otherwise.
    pub values: Vec<serde_json::Value>,
    /// Symbolic names, parallel to `values`.
    pub names: Vec<String>,
}

impl EnumSchema {
    /// Whether the enum serializes as integers.
    pub fn is_integer(&self) -> bool {
        !self.values.is_empty() && self.values.iter().all(|v| v.is_i64())
    }
}

/// The variant part of a schema node.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    /// An inline primitive.
    Primitive(PrimitiveKind),
    /// An object (inline for any/dictionaries, table entries otherwise).
    Object(ObjectSchema),
    /// An inline array.
    Array(Box<SchemaNode>),
    /// A reference to a schema table entry.
    Reference(String),
    /// An enumeration (table entries only).
    Enum(EnumSchema),
}

/// A node of the resolved schema graph.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    /// Node variant.
    pub kind: SchemaKind,
    /// Whether `null` is accepted.
    pub nullable: bool,
    /// Documentation text.
    pub description: Option<String>,
}

impl SchemaNode {
    /// Wraps a kind with no nullability or description.
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            nullable: false,
            description: None,
        }
    }

    /// An inline primitive.
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self::new(SchemaKind::Primitive(kind))
    }

    /// A reference to the named table entry.
    pub fn reference(name: impl Into<String>) -> Self {
        Self::new(SchemaKind::Reference(name.into()))
    }

    /// An inline array of `item`.
    pub fn array(item: SchemaNode) -> Self {
        Self::new(SchemaKind::Array(Box::new(item)))
    }

    /// Marks the node nullable.
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// The referenced table name, for `Reference` nodes.
    pub fn reference_name(&self) -> Option<&str> {
        match &self.kind {
            SchemaKind::Reference(name) => Some(name),
            _ => None,
        }
    }
}

/// Where a parameter's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    /// A route template placeholder.
    Path,
    /// The query string.
    Query,
    /// The request body.
    Body,
}

impl Binding {
    /// The `in` value of the wire format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Binding::Path => "path",
            Binding::Query => "query",
            Binding::Body => "body",
        }
    }
}

/// A classified operation parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Binding location.
    pub binding: Binding,
    /// Resolved schema.
    pub schema: SchemaNode,
    /// Documentation text.
    pub description: Option<String>,
    /// Whether the caller may omit the value.
    pub is_optional: bool,
}

/// One response of an operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Status code, e.g. `200`.
    pub status_code: String,
    /// Description (may be empty).
    pub description: String,
    /// Payload schema; absent for empty responses.
    pub schema: Option<SchemaNode>,
}

/// A normalized operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    /// Document-wide unique identifier (after disambiguation).
    pub id: String,
    /// Route template without leading slash.
    pub path_template: String,
    /// HTTP verb.
    pub verb: HttpVerb,
    /// Ordered parameters; at most one is bound to the body.
    pub parameters: Vec<Parameter>,
    /// Responses keyed by status code.
    pub responses: IndexMap<String, Response>,
    /// Short summary.
    pub summary: Option<String>,
    /// Grouping tags.
    pub tags: Vec<String>,
    /// Whether the operation is deprecated.
    pub deprecated: bool,
}

impl Operation {
    /// Looks a parameter up by name.
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// The body parameter, if any.
    pub fn body_parameter(&self) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.binding == Binding::Body)
    }
}

/// A named operation group with its description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Tag name, as used in `Operation::tags`.
    pub name: String,
    /// Documentation text.
    pub description: Option<String>,
}

/// Document title and version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    /// API title.
    pub title: String,
    /// API version.
    pub version: String,
}

/// The complete resolved API description.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Title and version.
    pub info: DocumentInfo,
    /// Tags of the groups that contributed operations, in group order.
    pub tags: Vec<Tag>,
    /// Operations keyed by path template, then verb.
    pub paths: IndexMap<String, IndexMap<HttpVerb, Operation>>,
    /// The canonical schema table.
    pub schemas: IndexMap<String, SchemaNode>,
}

impl Document {
    /// Creates an empty document.
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            info: DocumentInfo {
                title: title.into(),
                version: version.into(),
            },
            tags: Vec::new(),
            paths: IndexMap::new(),
            schemas: IndexMap::new(),
        }
    }

    /// Looks an operation up by path template and verb.
    pub fn operation(&self, path: &str, verb: HttpVerb) -> Option<&Operation> {
        self.paths.get(path).and_then(|item| item.get(&verb))
    }

    /// Iterates all operations in document order.
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.paths.values().flat_map(|item| item.values())
    }

    /// Finds an operation by its identifier.
    pub fn operation_by_id(&self, id: &str) -> Option<&Operation> {
        self.operations().find(|op| op.id == id)
    }

    /// Number of operations.
    pub fn operation_count(&self) -> usize {
        self.paths.values().map(IndexMap::len).sum()
    }
}
