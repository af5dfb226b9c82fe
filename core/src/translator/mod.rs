#![deny(missing_docs)]

//! # Translator
//!
//! The translation pipeline from descriptors to a [`crate::document::Document`]:
//! shape classification, schema resolution, route and parameter resolution,
//! operation building and document assembly.

pub mod assembler;
pub mod naming;
pub mod operation;
pub mod params;
pub mod routes;
pub mod schema;
pub mod shape;

pub use assembler::{assemble, assemble_groups, disambiguate_operation_ids};
pub use operation::build_operations;
pub use params::{classify_parameter, classify_parameters, ensure_single_body, PathTemplate};
pub use routes::{resolve_route, ResolvedRoute};
pub use schema::{schema_name, SchemaCache, SchemaResolver, SchemaTable};
pub use shape::{Classified, Shape, ShapeClassifier, WrapperKind};
