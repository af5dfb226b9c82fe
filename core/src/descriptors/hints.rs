#![deny(missing_docs)]

//! # Hints
//!
//! The fixed, enumerated set of annotations a front end may attach to groups,
//! methods, parameters and members. The engine matches on these variants only.
//!
//! In YAML, unit hints are plain strings (`- http_get`) and valued hints are
//! single-key maps (`- route: "users/{id}"`).

use crate::descriptors::type_expr::TypeRef;
use serde::{Deserialize, Serialize};

/// HTTP verbs an operation can be exposed under.
///
/// The declaration order is the order operations of one method are emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpVerb {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
    /// OPTIONS
    Options,
    /// HEAD
    Head,
    /// PATCH
    Patch,
}

impl HttpVerb {
    /// Parses a verb name case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "GET" => Some(HttpVerb::Get),
            "POST" => Some(HttpVerb::Post),
            "PUT" => Some(HttpVerb::Put),
            "DELETE" => Some(HttpVerb::Delete),
            "OPTIONS" => Some(HttpVerb::Options),
            "HEAD" => Some(HttpVerb::Head),
            "PATCH" => Some(HttpVerb::Patch),
            _ => None,
        }
    }

    /// Lower-case name used as the path item key.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Get => "get",
            HttpVerb::Post => "post",
            HttpVerb::Put => "put",
            HttpVerb::Delete => "delete",
            HttpVerb::Options => "options",
            HttpVerb::Head => "head",
            HttpVerb::Patch => "patch",
        }
    }
}

impl std::fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_ascii_uppercase())
    }
}

/// Explicit response declaration attached to a method.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResponseTypeHint {
    /// Declared status code; inferred from the payload when absent.
    #[serde(default)]
    pub status: Option<String>,
    /// Payload type; absent means no payload.
    #[serde(default, rename = "type")]
    pub ty: Option<TypeRef>,
    /// Response description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Hints attached to a method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodHint {
    /// Explicit route template.
    Route(String),
    /// Overrides the logical action name.
    ActionName(String),
    /// Per-verb marker.
    HttpGet,
    /// Per-verb marker.
    HttpPost,
    /// Per-verb marker.
    HttpPut,
    /// Per-verb marker.
    HttpDelete,
    /// Per-verb marker.
    HttpOptions,
    /// Per-verb marker.
    HttpHead,
    /// Per-verb marker.
    HttpPatch,
    /// Catch-all verb list; entries are case-normalized.
    AcceptVerbs(Vec<String>),
    /// Explicit response override.
    ResponseType(ResponseTypeHint),
    /// Operation summary.
    Description(String),
    /// Marks the operation deprecated.
    Obsolete,
    /// Excludes the method from the document.
    NonAction,
}

impl MethodHint {
    /// The verb this hint marks, for per-verb markers.
    pub fn verb(&self) -> Option<HttpVerb> {
        match self {
            MethodHint::HttpGet => Some(HttpVerb::Get),
            MethodHint::HttpPost => Some(HttpVerb::Post),
            MethodHint::HttpPut => Some(HttpVerb::Put),
            MethodHint::HttpDelete => Some(HttpVerb::Delete),
            MethodHint::HttpOptions => Some(HttpVerb::Options),
            MethodHint::HttpHead => Some(HttpVerb::Head),
            MethodHint::HttpPatch => Some(HttpVerb::Patch),
            _ => None,
        }
    }
}

/// Hints attached to an endpoint group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupHint {
    /// Prefix joined in front of explicit method routes.
    RoutePrefix(String),
    /// Group description.
    Description(String),
}

/// Hints attached to a method parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterHint {
    /// Bind from the request body.
    FromBody,
    /// Bind from the route or query string.
    FromUri,
}

/// Hints attached to an object member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberHint {
    /// Serialized property name.
    Rename(String),
    /// Forces the property into the required list.
    Required,
    /// Skips the member entirely.
    Ignore,
}
