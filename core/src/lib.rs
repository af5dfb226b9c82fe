#![deny(missing_docs)]

//! # Endpoint Doc Core
//!
//! Translates endpoint descriptors (groups of methods plus the types they
//! use) into an API description document: operations grouped by path and
//! verb, and a deduplicated schema table.

/// Shared error types.
pub mod error;

/// Engine configuration.
pub mod settings;

/// Input descriptors and type expressions.
pub mod descriptors;

/// The resolved document model and its wire format.
pub mod document;

/// The descriptor-to-document pipeline.
pub mod translator;

pub use descriptors::{
    DescriptorSet, GroupDescriptor, HttpVerb, MethodDescriptor, MethodHint, ParameterDescriptor,
    TypeCatalog, TypeDefinition, TypeRef,
};
pub use document::{
    Binding, Document, Operation, Parameter, Response, SchemaKind, SchemaNode, Tag,
};
pub use error::{AppError, AppResult};
pub use settings::Settings;
pub use translator::{assemble, assemble_groups};

/// Assembles a descriptor set and renders it as Swagger 2.0 JSON.
pub fn generate_document(set: &DescriptorSet, settings: &Settings) -> AppResult<serde_json::Value> {
    let document = assemble(set, settings)?;
    Ok(document::wire::to_json(&document))
}
