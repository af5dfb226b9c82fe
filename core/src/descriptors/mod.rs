#![deny(missing_docs)]

//! # Descriptors
//!
//! The input boundary of the translator: endpoint groups, their methods, and
//! the catalog of declared types those methods reference. Front ends (a static
//! analysis pass, a build-time exporter, a sandboxed introspection worker)
//! produce a [`DescriptorSet`] as YAML or JSON.

pub mod hints;
pub mod type_expr;

use crate::error::{AppError, AppResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use hints::{GroupHint, HttpVerb, MemberHint, MethodHint, ParameterHint, ResponseTypeHint};
pub use type_expr::TypeRef;

/// Whether a declared type is a structure or an enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// A structure with named members.
    #[default]
    Object,
    /// An enumeration with a fixed value list.
    Enum,
}

/// A declared member of an object type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberDescriptor {
    /// Declared member name.
    pub name: String,
    /// Declared member type.
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// Whether the member may be omitted.
    #[serde(default)]
    pub optional: bool,
    /// Documentation text.
    #[serde(default)]
    pub description: Option<String>,
    /// Attached hints.
    #[serde(default)]
    pub hints: Vec<MemberHint>,
}

impl MemberDescriptor {
    /// The serialized property name (honours `rename`).
    pub fn property_name(&self) -> &str {
        self.hints
            .iter()
            .find_map(|h| match h {
                MemberHint::Rename(n) => Some(n.as_str()),
                _ => None,
            })
            .unwrap_or(&self.name)
    }

    /// Whether the member is skipped.
    pub fn is_ignored(&self) -> bool {
        self.hints.contains(&MemberHint::Ignore)
    }

    /// Whether the member is explicitly required.
    pub fn is_forced_required(&self) -> bool {
        self.hints.contains(&MemberHint::Required)
    }
}

/// A single enumeration value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumValue {
    /// Symbolic name.
    pub name: String,
    /// Numeric value; when absent across all values the enum is string-valued.
    #[serde(default)]
    pub value: Option<i64>,
}

/// The declared part of a type: members, enum values and documentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDefinition {
    /// Type name, as referenced by [`TypeRef::name`].
    pub name: String,
    /// Structure or enumeration.
    #[serde(default)]
    pub kind: TypeKind,
    /// Generic parameter names (e.g. `T`), in declaration order.
    #[serde(default)]
    pub generic_params: Vec<String>,
    /// Documentation text.
    #[serde(default)]
    pub description: Option<String>,
    /// Base type whose members are inherited.
    #[serde(default)]
    pub base: Option<TypeRef>,
    /// Declared members (objects only).
    #[serde(default)]
    pub members: Vec<MemberDescriptor>,
    /// Declared values (enums only).
    #[serde(default)]
    pub values: Vec<EnumValue>,
}

/// A method parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    /// Declared parameter name.
    pub name: String,
    /// Declared parameter type.
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// Whether the parameter has a default value.
    #[serde(default)]
    pub optional: bool,
    /// Documentation text.
    #[serde(default)]
    pub documentation: Option<String>,
    /// Attached binding hints.
    #[serde(default)]
    pub hints: Vec<ParameterHint>,
}

fn void_type() -> TypeRef {
    TypeRef::void()
}

/// A candidate operation source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    /// Declared method name.
    pub name: String,
    /// Ordered parameters.
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
    /// Declared return type.
    #[serde(default = "void_type")]
    pub returns: TypeRef,
    /// Routing, verb and response hints.
    #[serde(default)]
    pub hints: Vec<MethodHint>,
    /// Method documentation text.
    #[serde(default)]
    pub documentation: Option<String>,
    /// Return value documentation text.
    #[serde(default)]
    pub return_documentation: Option<String>,
}

impl MethodDescriptor {
    /// Whether a hint of the given shape is attached.
    pub fn has_hint(&self, hint: &MethodHint) -> bool {
        self.hints.contains(hint)
    }
}

/// An endpoint group (a controller).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDescriptor {
    /// Declared group name, e.g. `UsersController`.
    pub name: String,
    /// Group-level hints.
    #[serde(default)]
    pub hints: Vec<GroupHint>,
    /// Candidate methods.
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
}

impl GroupDescriptor {
    /// The explicit route prefix, if any.
    pub fn route_prefix(&self) -> Option<&str> {
        self.hints.iter().find_map(|h| match h {
            GroupHint::RoutePrefix(p) => Some(p.as_str()),
            _ => None,
        })
    }

    /// The group description, if any.
    pub fn description(&self) -> Option<&str> {
        self.hints.iter().find_map(|h| match h {
            GroupHint::Description(text) => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Everything a front end hands to the translator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DescriptorSet {
    /// Declared object and enum types.
    #[serde(default)]
    pub types: Vec<TypeDefinition>,
    /// Endpoint groups.
    #[serde(default)]
    pub groups: Vec<GroupDescriptor>,
}

impl DescriptorSet {
    /// Parses a descriptor set from YAML (JSON is valid YAML too).
    ///
    /// Valued hints are read as single-key maps (`- route: "{id}"`), the same
    /// shape JSON uses, instead of YAML tags.
    pub fn from_yaml(content: &str) -> AppResult<Self> {
        let de = serde_yaml::Deserializer::from_str(content);
        serde_yaml::with::singleton_map_recursive::deserialize(de).map_err(|e| {
            AppError::InvalidDescriptor(format!("failed to parse descriptor set: {}", e))
        })
    }

    /// Parses a descriptor set from JSON.
    pub fn from_json(content: &str) -> AppResult<Self> {
        serde_json::from_str(content).map_err(|e| {
            AppError::InvalidDescriptor(format!("failed to parse descriptor set: {}", e))
        })
    }

    /// Loads a descriptor set, picking the parser from the file extension.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_yaml(&content),
        }
    }

    /// Builds the lookup catalog for the declared types.
    pub fn catalog(&self) -> AppResult<TypeCatalog> {
        TypeCatalog::new(self.types.iter().cloned())
    }
}

/// Declared types indexed by name.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    types: IndexMap<String, TypeDefinition>,
}

impl TypeCatalog {
    /// Indexes the given definitions, rejecting duplicate names.
    pub fn new(definitions: impl IntoIterator<Item = TypeDefinition>) -> AppResult<Self> {
        let mut types = IndexMap::new();
        for def in definitions {
            if types.contains_key(&def.name) {
                return Err(AppError::InvalidDescriptor(format!(
                    "type '{}' is declared more than once",
                    def.name
                )));
            }
            types.insert(def.name.clone(), def);
        }
        Ok(Self { types })
    }

    /// Looks a declared type up by name.
    pub fn get(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    /// Number of declared types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether no types are declared.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
types:
  - name: User
    description: A registered user
    members:
      - name: id
        type: i64
      - name: displayName
        type: Option<String>
        hints:
          - rename: display_name
  - name: Role
    kind: enum
    values:
      - name: Admin
      - name: Member
groups:
  - name: UsersController
    hints:
      - route_prefix: api/users
    methods:
      - name: GetUser
        parameters:
          - name: id
            type: i64
        returns: Task<User>
        hints:
          - route: "{id}"
"#;

    #[test]
    fn test_parse_descriptor_set_yaml() {
        let set = DescriptorSet::from_yaml(SAMPLE).unwrap();
        assert_eq!(set.types.len(), 2);
        assert_eq!(set.types[1].kind, TypeKind::Enum);
        assert_eq!(set.types[0].members[1].property_name(), "display_name");

        let group = &set.groups[0];
        assert_eq!(group.route_prefix(), Some("api/users"));
        let method = &group.methods[0];
        assert_eq!(method.returns.to_string(), "Task<User>");
        assert!(method.has_hint(&MethodHint::Route("{id}".into())));
    }

    #[test]
    fn test_yaml_and_json_hint_forms_agree() {
        let json = r#"{
  "groups": [{
    "name": "UsersController",
    "hints": [{ "route_prefix": "api/users" }, { "description": "Users" }],
    "methods": [{
      "name": "Save",
      "hints": [
        "http_put",
        { "accept_verbs": ["post"] },
        { "action_name": "Store" },
        { "response_type": { "status": "201", "type": "i64" } }
      ]
    }]
  }]
}"#;
        let from_json = DescriptorSet::from_json(json).unwrap();
        // JSON fed through the YAML reader
        let from_yaml_json = DescriptorSet::from_yaml(json).unwrap();
        let from_yaml = DescriptorSet::from_yaml(
            r#"
groups:
  - name: UsersController
    hints:
      - route_prefix: api/users
      - description: Users
    methods:
      - name: Save
        hints:
          - http_put
          - accept_verbs: [post]
          - action_name: Store
          - response_type:
              status: "201"
              type: i64
"#,
        )
        .unwrap();

        assert_eq!(from_json, from_yaml);
        assert_eq!(from_json, from_yaml_json);
        assert_eq!(from_yaml.groups[0].route_prefix(), Some("api/users"));
        assert_eq!(from_yaml.groups[0].description(), Some("Users"));
        assert_eq!(from_yaml.groups[0].methods[0].hints.len(), 4);
    }

    #[test]
    fn test_method_defaults_to_void_return() {
        let yaml = "groups:\n  - name: PingController\n    methods:\n      - name: Ping\n";
        let set = DescriptorSet::from_yaml(yaml).unwrap();
        assert!(set.groups[0].methods[0].returns.is_void());
    }

    #[test]
    fn test_catalog_rejects_duplicates() {
        let def = TypeDefinition {
            name: "User".into(),
            kind: TypeKind::Object,
            generic_params: vec![],
            description: None,
            base: None,
            members: vec![],
            values: vec![],
        };
        let err = TypeCatalog::new(vec![def.clone(), def]).unwrap_err();
        assert!(matches!(err, AppError::InvalidDescriptor(_)));
    }

    #[test]
    fn test_bad_type_expression_is_reported() {
        let yaml = "types:\n  - name: Broken\n    members:\n      - name: x\n        type: \"Vec<\"\n";
        let err = DescriptorSet::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("failed to parse descriptor set"));
    }
}
