#![deny(missing_docs)]

//! # Type Expressions
//!
//! Parses type expression strings (e.g. `Task<Vec<User>>`) into structural [`TypeRef`]s.
//! Descriptor files spell every type this way; the engine never sees raw strings.

use crate::error::{AppError, AppResult};
// Import HasGenericArgs to access .generic_arg_list() on PathSegments
use ra_ap_edition::Edition;
use ra_ap_syntax::ast::{self, HasGenericArgs};
use ra_ap_syntax::{AstNode, SourceFile};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Name used for the unit / void type.
pub const VOID: &str = "void";

/// Name used for slice and fixed-size array syntax (`[T]`, `[T; N]`).
pub const SLICE: &str = "Array";

/// Structural identity of a type: its name plus generic arguments.
///
/// Two `TypeRef`s are equal when their names and argument lists are equal,
/// which makes this the key of the schema cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeRef {
    /// Unqualified type name (last path segment).
    pub name: String,
    /// Generic type arguments, in declaration order.
    pub args: Vec<TypeRef>,
}

impl TypeRef {
    /// Creates a non-generic type reference.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Creates a generic type reference.
    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// The void marker.
    pub fn void() -> Self {
        Self::named(VOID)
    }

    /// Parses a type expression such as `HashMap<String, Vec<i64>>`.
    pub fn parse(expr: &str) -> AppResult<Self> {
        let trimmed = expr.trim();
        if trimmed.is_empty() {
            return Err(AppError::InvalidDescriptor("empty type expression".into()));
        }

        // Wrap the expression in a type alias so it parses as valid Rust syntax
        let code = format!("type _Wrapper = {};", trimmed);
        let parse = SourceFile::parse(&code, Edition::Edition2021);
        if let Some(err) = parse.errors().first() {
            return Err(AppError::InvalidDescriptor(format!(
                "failed to parse type expression '{}': {}",
                trimmed, err
            )));
        }
        let file = parse.tree();

        let type_alias = file
            .syntax()
            .descendants()
            .find_map(ast::TypeAlias::cast)
            .ok_or_else(|| {
                AppError::InvalidDescriptor(format!("failed to parse type expression '{}'", trimmed))
            })?;

        let root_type = type_alias.ty().ok_or_else(|| {
            AppError::InvalidDescriptor(format!("invalid type syntax: '{}'", trimmed))
        })?;

        from_ast_type(&root_type, trimmed)
    }

    /// Whether this is the void marker.
    pub fn is_void(&self) -> bool {
        self.args.is_empty() && matches!(self.name.as_str(), VOID | "Void" | "()" | "Unit")
    }

    /// Replaces generic parameter names with concrete arguments.
    ///
    /// `bindings` pairs a parameter name (e.g. `T`) with the type bound to it.
    pub fn substitute(&self, bindings: &[(String, TypeRef)]) -> TypeRef {
        if self.args.is_empty() {
            if let Some((_, bound)) = bindings.iter().find(|(param, _)| *param == self.name) {
                return bound.clone();
            }
        }
        TypeRef {
            name: self.name.clone(),
            args: self.args.iter().map(|a| a.substitute(bindings)).collect(),
        }
    }
}

impl Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", arg)?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

impl TryFrom<String> for TypeRef {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TypeRef::parse(&value)
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.to_string()
    }
}

/// Recursively converts an AST Type node into a `TypeRef`.
fn from_ast_type(ty: &ast::Type, source: &str) -> AppResult<TypeRef> {
    let invalid = |what: &str| AppError::InvalidDescriptor(format!("{} in '{}'", what, source));

    match ty {
        ast::Type::PathType(path_type) => {
            let path = path_type.path().ok_or_else(|| invalid("empty path"))?;
            let segment = path.segment().ok_or_else(|| invalid("empty segment"))?;
            let name_ref = segment.name_ref().ok_or_else(|| invalid("no type name"))?;
            let name = name_ref.text().to_string();

            let mut args = Vec::new();
            if let Some(generic_args) = segment.generic_arg_list() {
                for arg in generic_args.generic_args() {
                    match arg {
                        ast::GenericArg::TypeArg(type_arg) => {
                            let inner = type_arg
                                .ty()
                                .ok_or_else(|| invalid("invalid generic type"))?;
                            args.push(from_ast_type(&inner, source)?);
                        }
                        // Lifetimes carry no structural information
                        ast::GenericArg::LifetimeArg(_) => {}
                        _ => return Err(invalid("unsupported generic argument")),
                    }
                }
            }

            Ok(TypeRef { name, args })
        }
        ast::Type::RefType(ref_type) => {
            let inner = ref_type.ty().ok_or_else(|| invalid("invalid reference"))?;
            from_ast_type(&inner, source)
        }
        ast::Type::SliceType(slice) => {
            let inner = slice.ty().ok_or_else(|| invalid("invalid slice"))?;
            Ok(TypeRef::generic(SLICE, vec![from_ast_type(&inner, source)?]))
        }
        ast::Type::ArrayType(array) => {
            let inner = array.ty().ok_or_else(|| invalid("invalid array"))?;
            Ok(TypeRef::generic(SLICE, vec![from_ast_type(&inner, source)?]))
        }
        ast::Type::TupleType(tuple) if tuple.fields().next().is_none() => Ok(TypeRef::void()),
        _ => Err(invalid("unsupported type structure")),
    }
}
