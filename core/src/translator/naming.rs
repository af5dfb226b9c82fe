#![deny(missing_docs)]

//! # Naming Utilities
//!
//! Helper functions for deriving controller, action and operation names from descriptors.

use crate::descriptors::{HttpVerb, MethodDescriptor, MethodHint};

const CONTROLLER_SUFFIX: &str = "Controller";
const ASYNC_SUFFIX: &str = "Async";

/// Strips the conventional `Controller` suffix from a group name.
///
/// e.g. `UsersController` -> `Users`
pub fn controller_name(group_name: &str) -> &str {
    match group_name.strip_suffix(CONTROLLER_SUFFIX) {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => group_name,
    }
}

/// The logical action name: an explicit `action_name` hint, else the method name.
pub fn action_name(method: &MethodDescriptor) -> &str {
    method
        .hints
        .iter()
        .find_map(|h| match h {
            MethodHint::ActionName(name) => Some(name.as_str()),
            _ => None,
        })
        .unwrap_or(&method.name)
}

/// Derives an operation id from an action name by stripping a trailing `Async`.
///
/// e.g. `GetUserAsync` -> `GetUser`
pub fn operation_id(action: &str) -> String {
    match action.strip_suffix(ASYNC_SUFFIX) {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => action.to_string(),
    }
}

/// Infers a verb from the action name prefix, defaulting to POST.
pub fn convention_verb(action: &str) -> HttpVerb {
    let prefixes = [
        ("get", HttpVerb::Get),
        ("post", HttpVerb::Post),
        ("put", HttpVerb::Put),
        ("delete", HttpVerb::Delete),
    ];
    prefixes
        .iter()
        .find(|(prefix, _)| {
            action
                .get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
        })
        .map(|(_, verb)| *verb)
        .unwrap_or(HttpVerb::Post)
}

/// Joins route fragments with single slashes, dropping empty segments.
pub fn join_route(parts: &[&str]) -> String {
    parts
        .iter()
        .flat_map(|p| p.split('/'))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(name: &str, hints: Vec<MethodHint>) -> MethodDescriptor {
        MethodDescriptor {
            name: name.into(),
            parameters: vec![],
            returns: crate::descriptors::TypeRef::void(),
            hints,
            documentation: None,
            return_documentation: None,
        }
    }

    #[test]
    fn test_controller_name() {
        assert_eq!(controller_name("UsersController"), "Users");
        assert_eq!(controller_name("Users"), "Users");
        assert_eq!(controller_name("Controller"), "Controller");
    }

    #[test]
    fn test_action_name_override() {
        assert_eq!(action_name(&method("Fetch", vec![])), "Fetch");
        assert_eq!(
            action_name(&method(
                "Fetch",
                vec![MethodHint::ActionName("Lookup".into())]
            )),
            "Lookup"
        );
    }

    #[test]
    fn test_operation_id_strips_async() {
        assert_eq!(operation_id("GetUserAsync"), "GetUser");
        assert_eq!(operation_id("GetUser"), "GetUser");
        assert_eq!(operation_id("Async"), "Async");
    }

    #[test]
    fn test_convention_verb() {
        assert_eq!(convention_verb("GetUser"), HttpVerb::Get);
        assert_eq!(convention_verb("get_user"), HttpVerb::Get);
        assert_eq!(convention_verb("PutUser"), HttpVerb::Put);
        assert_eq!(convention_verb("DeleteUser"), HttpVerb::Delete);
        assert_eq!(convention_verb("PostUser"), HttpVerb::Post);
        assert_eq!(convention_verb("RemoveUser"), HttpVerb::Post);
        assert_eq!(convention_verb("Ge"), HttpVerb::Post);
    }

    #[test]
    fn test_join_route() {
        assert_eq!(join_route(&["api/users/", "/{id}"]), "api/users/{id}");
        assert_eq!(join_route(&["", "users"]), "users");
    }
}
