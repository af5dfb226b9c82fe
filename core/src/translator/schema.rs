#![deny(missing_docs)]

//! # Schema Resolution
//!
//! Turns type references into schema nodes. Objects and enums are registered
//! once in the document's schema table and referenced everywhere else;
//! primitives, arrays and dictionaries stay inline.
//!
//! Object names enter the cache *before* their members are resolved, so a type
//! that reaches itself (directly or through other objects) resolves to a
//! `Reference` instead of expanding forever.

use crate::descriptors::{MemberDescriptor, TypeDefinition, TypeKind, TypeRef};
use crate::document::{AdditionalProperties, EnumSchema, ObjectSchema, SchemaKind, SchemaNode};
use crate::error::{AppError, AppResult};
use crate::settings::SchemaSettings;
use crate::translator::shape::{Classified, Shape, ShapeClassifier};
use indexmap::IndexMap;
use serde_json::json;
use std::collections::{HashMap, HashSet};

/// The document's schema table, keyed by schema name.
pub type SchemaTable = IndexMap<String, SchemaNode>;

/// Type identity → canonical schema name, scoped to one document build.
#[derive(Debug, Default)]
pub struct SchemaCache {
    names: HashMap<TypeRef, String>,
    taken: HashSet<String>,
}

impl SchemaCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The canonical name registered for a type, if any.
    pub fn lookup(&self, ty: &TypeRef) -> Option<&str> {
        self.names.get(ty).map(String::as_str)
    }

    /// Registers a type under `preferred`, or `preferred2`, `preferred3`, ...
    /// when another identity already owns that name.
    pub fn register(&mut self, ty: &TypeRef, preferred: &str) -> String {
        let mut name = preferred.to_string();
        let mut counter = 2;
        while self.taken.contains(&name) {
            name = format!("{}{}", preferred, counter);
            counter += 1;
        }
        self.taken.insert(name.clone());
        self.names.insert(ty.clone(), name.clone());
        name
    }

    /// Number of registered identities.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Resolves types into schema nodes for one document build.
#[derive(Debug)]
pub struct SchemaResolver<'a> {
    classifier: ShapeClassifier<'a>,
    settings: &'a SchemaSettings,
    cache: SchemaCache,
}

impl<'a> SchemaResolver<'a> {
    /// Creates a resolver with a fresh cache.
    pub fn new(classifier: ShapeClassifier<'a>, settings: &'a SchemaSettings) -> Self {
        Self {
            classifier,
            settings,
            cache: SchemaCache::new(),
        }
    }

    /// The shape classifier used for every resolution.
    pub fn classifier(&self) -> &ShapeClassifier<'a> {
        &self.classifier
    }

    /// The identity → name cache.
    pub fn cache(&self) -> &SchemaCache {
        &self.cache
    }

    /// Classifies and resolves a type.
    pub fn resolve(&mut self, ty: &TypeRef, schemas: &mut SchemaTable) -> AppResult<SchemaNode> {
        let classified = self.classifier.classify(ty)?;
        self.resolve_classified(&classified, schemas)
    }

    /// Resolves an already classified type.
    pub fn resolve_classified(
        &mut self,
        classified: &Classified<'a>,
        schemas: &mut SchemaTable,
    ) -> AppResult<SchemaNode> {
        let nullable = classified.is_nullable();

        if let Some(name) = self.cache.lookup(&classified.ty) {
            return Ok(SchemaNode::reference(name).nullable(nullable));
        }

        let node = match &classified.shape {
            Shape::Void => {
                return Err(AppError::unresolvable(
                    classified.ty.to_string(),
                    "void has no schema",
                ))
            }
            Shape::Any => self.any_schema(),
            Shape::Primitive(kind) => SchemaNode::primitive(*kind),
            Shape::Array(element) => {
                let item = self.resolve(element, schemas)?;
                SchemaNode::array(item)
            }
            Shape::Dictionary(value) => {
                let value_schema = self.resolve(value, schemas)?;
                SchemaNode::new(SchemaKind::Object(ObjectSchema {
                    properties: IndexMap::new(),
                    required: Vec::new(),
                    additional: AdditionalProperties::Schema(Box::new(value_schema)),
                }))
            }
            Shape::Enum(def) => {
                let name = self.cache.register(&classified.ty, &schema_name(&classified.ty));
                schemas.insert(name.clone(), enum_schema(def));
                SchemaNode::reference(name)
            }
            Shape::Object(def) => {
                let name = self.cache.register(&classified.ty, &schema_name(&classified.ty));
                // Reserve the slot so the table keeps encounter order
                schemas.insert(name.clone(), empty_object(AdditionalProperties::Any));
                let object = match def {
                    Some(def) => self.object_schema(&classified.ty, *def, schemas)?,
                    None => empty_object(AdditionalProperties::Any),
                };
                schemas.insert(name.clone(), object);
                SchemaNode::reference(name)
            }
        };

        Ok(node.nullable(nullable))
    }

    fn any_schema(&self) -> SchemaNode {
        let additional = if self.settings.allow_additional_properties_on_any {
            AdditionalProperties::Any
        } else {
            AdditionalProperties::Forbidden
        };
        empty_object(additional)
    }

    fn object_schema(
        &mut self,
        ty: &TypeRef,
        def: &'a TypeDefinition,
        schemas: &mut SchemaTable,
    ) -> AppResult<SchemaNode> {
        let members = self.collect_members(ty, def, &mut Vec::new())?;

        let mut properties = IndexMap::new();
        let mut required = Vec::new();
        for member in members {
            let classified = self.classifier.classify(&member.ty)?;
            let mut schema = self.resolve_classified(&classified, schemas)?;
            schema.description = non_empty(member.description.as_deref());

            let name = member.property_name().to_string();
            if member.is_forced_required() || (!member.optional && !classified.is_nullable()) {
                required.push(name.clone());
            }
            properties.insert(name, schema);
        }

        let mut node = SchemaNode::new(SchemaKind::Object(ObjectSchema {
            properties,
            required,
            additional: AdditionalProperties::Forbidden,
        }));
        node.description = non_empty(def.description.as_deref());
        Ok(node)
    }

    /// Members of `ty` with generic parameters bound, base members first.
    fn collect_members(
        &self,
        ty: &TypeRef,
        def: &'a TypeDefinition,
        visiting: &mut Vec<String>,
    ) -> AppResult<Vec<MemberDescriptor>> {
        if visiting.contains(&def.name) {
            return Err(AppError::unresolvable(
                ty.to_string(),
                format!("cyclic base type chain through '{}'", def.name),
            ));
        }
        visiting.push(def.name.clone());

        let bindings: Vec<(String, TypeRef)> = def
            .generic_params
            .iter()
            .cloned()
            .zip(ty.args.iter().cloned())
            .collect();

        let mut members: Vec<MemberDescriptor> = Vec::new();
        if let Some(base) = &def.base {
            let base_ty = base.substitute(&bindings);
            let base_def = self.classifier.catalog().get(&base_ty.name).ok_or_else(|| {
                AppError::unresolvable(base_ty.to_string(), "base type is not declared")
            })?;
            if base_def.kind != TypeKind::Object {
                return Err(AppError::unresolvable(
                    base_ty.to_string(),
                    "base type must be an object",
                ));
            }
            members = self.collect_members(&base_ty, base_def, visiting)?;
        }

        for member in def.members.iter().filter(|m| !m.is_ignored()) {
            let mut bound = member.clone();
            bound.ty = member.ty.substitute(&bindings);
            match members
                .iter_mut()
                .find(|m| m.property_name() == bound.property_name())
            {
                Some(existing) => *existing = bound,
                None => members.push(bound),
            }
        }

        visiting.pop();
        Ok(members)
    }
}

/// The table name for a type: `Page<User>` becomes `PageOfUser`.
pub fn schema_name(ty: &TypeRef) -> String {
    let base: String = ty
        .name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if ty.args.is_empty() {
        return base;
    }
    let args = ty.args.iter().map(schema_name).collect::<Vec<_>>();
    format!("{}Of{}", base, args.join("And"))
}

fn enum_schema(def: &TypeDefinition) -> SchemaNode {
    let numbered = !def.values.is_empty() && def.values.iter().all(|v| v.value.is_some());
    let values = def
        .values
        .iter()
        .map(|v| match (numbered, v.value) {
            (true, Some(n)) => json!(n),
            _ => json!(v.name),
        })
        .collect();
    let names = def.values.iter().map(|v| v.name.clone()).collect();

    let mut node = SchemaNode::new(SchemaKind::Enum(EnumSchema { values, names }));
    node.description = non_empty(def.description.as_deref());
    node
}

fn empty_object(additional: AdditionalProperties) -> SchemaNode {
    SchemaNode::new(SchemaKind::Object(ObjectSchema {
        properties: IndexMap::new(),
        required: Vec::new(),
        additional,
    }))
}

pub(crate) fn non_empty(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
