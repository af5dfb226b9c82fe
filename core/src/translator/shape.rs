#![deny(missing_docs)]

//! # Type Shape Classification
//!
//! Decides how a type behaves structurally (primitive, array, dictionary, enum,
//! object) after peeling off wrapper types such as `Task<T>` or `Option<T>`.
//! Classification is pure: it reads the type catalog and nothing else.

use crate::descriptors::{TypeCatalog, TypeDefinition, TypeKind, TypeRef};
use crate::document::PrimitiveKind;
use crate::error::{AppError, AppResult};

/// How many wrappers are peeled before a type is treated as an opaque object.
pub const MAX_WRAPPER_DEPTH: usize = 8;

/// The kinds of wrapper types the classifier unwraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapperKind {
    /// `Task<T>`, `ValueTask<T>`, `Future<T>`
    Async,
    /// `IHttpActionResult`, `HttpResponseMessage`, `IActionResult`, non-generic `ActionResult`
    ActionResult,
    /// `ActionResult<T>`, `Json<T>`, `Ok<T>`, `OkNegotiatedContentResult<T>`
    TypedResult,
    /// `Option<T>`, `Nullable<T>`
    Nullable,
}

/// The structural shape of an unwrapped type.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape<'a> {
    /// No payload.
    Void,
    /// The universal "any" type.
    Any,
    /// A primitive, including the binary file sentinel.
    Primitive(PrimitiveKind),
    /// An enumerable collection of the given element type.
    Array(TypeRef),
    /// A string-keyed map with the given value type.
    Dictionary(TypeRef),
    /// A declared enumeration.
    Enum(&'a TypeDefinition),
    /// A declared object, or an opaque one when the wrapper bound was hit.
    Object(Option<&'a TypeDefinition>),
}

impl Shape<'_> {
    /// Whether values of this shape are structured (object-like).
    pub fn is_complex(&self) -> bool {
        matches!(self, Shape::Object(_) | Shape::Dictionary(_) | Shape::Any)
    }
}

/// The result of classifying a type.
#[derive(Debug, Clone, PartialEq)]
pub struct Classified<'a> {
    /// The type left after unwrapping.
    pub ty: TypeRef,
    /// Its shape.
    pub shape: Shape<'a>,
    /// Wrappers peeled off, outermost first.
    pub wrappers: Vec<WrapperKind>,
}

impl Classified<'_> {
    /// Whether a nullable wrapper was peeled off.
    pub fn is_nullable(&self) -> bool {
        self.wrappers.contains(&WrapperKind::Nullable)
    }

    /// Whether the payload is void.
    pub fn is_void(&self) -> bool {
        self.shape == Shape::Void
    }
}

/// Classifies type references against a catalog of declared types.
#[derive(Debug, Clone, Copy)]
pub struct ShapeClassifier<'a> {
    catalog: &'a TypeCatalog,
}

impl<'a> ShapeClassifier<'a> {
    /// Creates a classifier over the given catalog.
    pub fn new(catalog: &'a TypeCatalog) -> Self {
        Self { catalog }
    }

    /// The catalog this classifier reads.
    pub fn catalog(&self) -> &'a TypeCatalog {
        self.catalog
    }

    /// Unwraps wrapper types and classifies the payload.
    pub fn classify(&self, ty: &TypeRef) -> AppResult<Classified<'a>> {
        let mut current = ty.clone();
        let mut wrappers = Vec::new();

        while let Some((kind, inner)) = wrapper_kind(&current)? {
            if wrappers.len() >= MAX_WRAPPER_DEPTH {
                return Ok(Classified {
                    ty: current,
                    shape: Shape::Object(None),
                    wrappers,
                });
            }
            wrappers.push(kind);
            current = inner.unwrap_or_else(TypeRef::void);
        }

        let shape = self.base_shape(&current)?;
        Ok(Classified {
            ty: current,
            shape,
            wrappers,
        })
    }

    fn base_shape(&self, ty: &TypeRef) -> AppResult<Shape<'a>> {
        let name = ty.name.as_str();

        if ty.is_void() {
            return Ok(Shape::Void);
        }
        if is_any(name) {
            expect_arity(ty, 0)?;
            return Ok(Shape::Any);
        }
        if is_file(name) {
            expect_arity(ty, 0)?;
            return Ok(Shape::Primitive(PrimitiveKind::File));
        }
        if let Some(kind) = primitive_kind(name) {
            // `DateTime<Utc>` carries a time zone marker, not a payload
            if kind != PrimitiveKind::DateTime {
                expect_arity(ty, 0)?;
            }
            return Ok(Shape::Primitive(kind));
        }
        if is_dictionary(name) {
            expect_arity(ty, 2)?;
            return Ok(Shape::Dictionary(ty.args[1].clone()));
        }
        if is_array(name) {
            expect_arity(ty, 1)?;
            let element = &ty.args[0];
            // Byte buffers travel as base64 strings
            if element.args.is_empty() && matches!(element.name.as_str(), "u8" | "byte" | "Byte") {
                return Ok(Shape::Primitive(PrimitiveKind::Byte));
            }
            return Ok(Shape::Array(element.clone()));
        }

        let def = self
            .catalog
            .get(name)
            .ok_or_else(|| AppError::unresolvable(ty.to_string(), "type is not declared"))?;
        expect_arity(ty, def.generic_params.len())?;
        match def.kind {
            TypeKind::Enum => Ok(Shape::Enum(def)),
            TypeKind::Object => Ok(Shape::Object(Some(def))),
        }
    }
}

/// Identifies a wrapper type and its payload (`None` for payload-less wrappers).
pub fn wrapper_kind(ty: &TypeRef) -> AppResult<Option<(WrapperKind, Option<TypeRef>)>> {
    let kind = match ty.name.as_str() {
        "Task" | "ValueTask" | "Future" => WrapperKind::Async,
        "IHttpActionResult" | "HttpResponseMessage" | "IActionResult" => {
            WrapperKind::ActionResult
        }
        "ActionResult" if ty.args.is_empty() => WrapperKind::ActionResult,
        "ActionResult" | "Json" | "Ok" | "OkNegotiatedContentResult" => WrapperKind::TypedResult,
        "Option" | "Nullable" => {
            expect_arity(ty, 1)?;
            WrapperKind::Nullable
        }
        _ => return Ok(None),
    };

    match ty.args.len() {
        0 => Ok(Some((kind, None))),
        1 => Ok(Some((kind, Some(ty.args[0].clone())))),
        n => Err(AppError::unresolvable(
            ty.to_string(),
            format!("wrapper takes at most 1 type argument, found {}", n),
        )),
    }
}

fn expect_arity(ty: &TypeRef, expected: usize) -> AppResult<()> {
    if ty.args.len() == expected {
        Ok(())
    } else {
        Err(AppError::unresolvable(
            ty.to_string(),
            format!(
                "expected {} type argument(s), found {}",
                expected,
                ty.args.len()
            ),
        ))
    }
}

fn is_any(name: &str) -> bool {
    matches!(
        name,
        "object" | "Object" | "Any" | "Value" | "JsonValue" | "JToken" | "JObject" | "dynamic"
    )
}

fn is_file(name: &str) -> bool {
    matches!(name, "File" | "IFormFile" | "HttpPostedFileBase" | "Stream")
}

fn is_array(name: &str) -> bool {
    matches!(
        name,
        "Vec"
            | "VecDeque"
            | "List"
            | "IList"
            | "ICollection"
            | "IEnumerable"
            | "IReadOnlyList"
            | "IReadOnlyCollection"
            | "HashSet"
            | "BTreeSet"
            | "ISet"
            | "Array"
    )
}

fn is_dictionary(name: &str) -> bool {
    matches!(
        name,
        "HashMap" | "BTreeMap" | "IndexMap" | "Dictionary" | "IDictionary" | "IReadOnlyDictionary"
    )
}

fn primitive_kind(name: &str) -> Option<PrimitiveKind> {
    let kind = match name {
        "String" | "string" | "str" | "char" | "Char" => PrimitiveKind::String,
        "i8" | "i16" | "i32" | "u8" | "u16" | "sbyte" | "byte" | "short" | "ushort" | "int"
        | "SByte" | "Byte" | "Int16" | "UInt16" | "Int32" => PrimitiveKind::Int32,
        "i64" | "i128" | "isize" | "u32" | "u64" | "u128" | "usize" | "long" | "ulong"
        | "uint" | "UInt32" | "Int64" | "UInt64" => PrimitiveKind::Int64,
        "f32" | "float" | "Single" => PrimitiveKind::Float,
        "f64" | "double" | "Double" => PrimitiveKind::Double,
        "decimal" | "Decimal" => PrimitiveKind::Decimal,
        "bool" | "Boolean" => PrimitiveKind::Boolean,
        "NaiveDate" | "Date" | "DateOnly" => PrimitiveKind::Date,
        "DateTime" | "NaiveDateTime" | "DateTimeOffset" | "OffsetDateTime" => {
            PrimitiveKind::DateTime
        }
        "Uuid" | "Guid" => PrimitiveKind::Uuid,
        "Duration" | "TimeSpan" => PrimitiveKind::Duration,
        "Url" | "Uri" => PrimitiveKind::Uri,
        _ => return None,
    };
    Some(kind)
}
