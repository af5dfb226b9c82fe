use endpoint_doc_core::document::wire::to_json;
use endpoint_doc_core::{
    assemble, AppError, Binding, DescriptorSet, Document, HttpVerb, SchemaKind, SchemaNode,
    Settings,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn build_json(json: &str) -> Result<Document, AppError> {
    let set = DescriptorSet::from_json(json).expect("descriptor json parses");
    assemble(&set, &Settings::default())
}

fn build(yaml: &str) -> Result<Document, AppError> {
    let set = DescriptorSet::from_yaml(yaml).expect("descriptor yaml parses");
    assemble(&set, &Settings::default())
}

#[test]
fn test_same_type_resolves_to_one_table_entry() {
    let doc = build(
        r#"
types:
  - name: User
    members:
      - name: id
        type: i64
groups:
  - name: UsersController
    methods:
      - name: GetUser
        returns: User
        hints:
          - route: users/current
      - name: Save
        parameters:
          - name: user
            type: User
        returns: User
        hints:
          - route: users
          - http_post
"#,
    )
    .unwrap();

    assert_eq!(doc.schemas.len(), 1);
    let get = doc.operation("users/current", HttpVerb::Get).unwrap();
    let save = doc.operation("users", HttpVerb::Post).unwrap();
    assert_eq!(get.responses["200"].schema, Some(SchemaNode::reference("User")));
    assert_eq!(save.responses["200"].schema, Some(SchemaNode::reference("User")));
    assert_eq!(save.body_parameter().unwrap().schema, SchemaNode::reference("User"));
}

#[test]
fn test_self_referential_types_close_with_references() {
    let doc = build(
        r#"
types:
  - name: Node
    members:
      - name: children
        type: Vec<Node>
      - name: owner
        type: Option<Person>
  - name: Person
    members:
      - name: root
        type: Node
groups:
  - name: Tree
    methods:
      - name: GetRoot
        returns: Node
        hints:
          - route: tree
"#,
    )
    .unwrap();

    assert_eq!(doc.schemas.keys().collect::<Vec<_>>(), vec!["Node", "Person"]);
    let SchemaKind::Object(node) = &doc.schemas["Node"].kind else {
        panic!("Node should be an object");
    };
    assert_eq!(
        node.properties["children"],
        SchemaNode::array(SchemaNode::reference("Node"))
    );
    let SchemaKind::Object(person) = &doc.schemas["Person"].kind else {
        panic!("Person should be an object");
    };
    assert_eq!(person.properties["root"], SchemaNode::reference("Node"));
}

#[test]
fn test_path_placeholders_consumed_and_unmatched_removed() {
    let doc = build(
        r#"
groups:
  - name: UsersController
    methods:
      - name: GetUser
        parameters:
          - name: id
            type: i64
        returns: String
        hints:
          - route: users/{id}
      - name: ListUsers
        returns: Vec<String>
        hints:
          - route: users/{id}
          - http_get
"#,
    )
    .unwrap();

    let get = doc.operation("users/{id}", HttpVerb::Get).unwrap();
    let path_params: Vec<_> = get
        .parameters
        .iter()
        .filter(|p| p.binding == Binding::Path)
        .collect();
    assert_eq!(path_params.len(), 1);
    assert_eq!(path_params[0].name, "id");
    assert_eq!(get.parameters.len(), 1);

    let list = doc.operation("users", HttpVerb::Get).unwrap();
    assert_eq!(list.id, "ListUsers");
    assert!(list.parameters.is_empty());
}

#[test]
fn test_verb_convention_fallback() {
    let doc = build(
        r#"
groups:
  - name: UsersController
    methods:
      - name: GetUser
        hints:
          - route: users/get
      - name: RemoveUser
        hints:
          - route: users/remove
"#,
    )
    .unwrap();

    assert!(doc.operation("users/get", HttpVerb::Get).is_some());
    assert!(doc.operation("users/remove", HttpVerb::Post).is_some());
    assert_eq!(doc.operation_count(), 2);
}

#[test]
fn test_two_body_parameters_fail_the_build() {
    let err = build(
        r#"
types:
  - name: User
    members: []
  - name: Address
    members: []
groups:
  - name: UsersController
    methods:
      - name: Ping
        returns: bool
      - name: Relocate
        parameters:
          - name: user
            type: User
          - name: address
            type: Address
"#,
    )
    .unwrap_err();

    match err {
        AppError::AmbiguousBodyBinding {
            operation_id,
            parameters,
        } => {
            assert_eq!(operation_id, "Relocate");
            assert_eq!(parameters, vec!["user", "address"]);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_async_wrappers_are_unwrapped() {
    let doc = build(
        r#"
types:
  - name: User
    members:
      - name: id
        type: i64
groups:
  - name: UsersController
    hints:
      - route_prefix: users
    methods:
      - name: DeleteAsync
        returns: Task
        hints:
          - route: "{id}"
          - http_delete
        parameters:
          - name: id
            type: i64
      - name: GetAsync
        returns: Task<User>
        hints:
          - route: "{id}"
        parameters:
          - name: id
            type: i64
"#,
    )
    .unwrap();

    let delete = doc.operation("users/{id}", HttpVerb::Delete).unwrap();
    assert_eq!(delete.id, "Delete");
    assert_eq!(delete.responses.keys().collect::<Vec<_>>(), vec!["204"]);
    assert_eq!(delete.responses["204"].schema, None);

    let get = doc.operation("users/{id}", HttpVerb::Get).unwrap();
    assert_eq!(get.responses.keys().collect::<Vec<_>>(), vec!["200"]);
    assert_eq!(get.responses["200"].schema, Some(SchemaNode::reference("User")));
}

#[test]
fn test_operation_ids_unique_across_groups() {
    let doc = build(
        r#"
groups:
  - name: UsersController
    methods:
      - name: Get
        returns: String
  - name: OrdersController
    methods:
      - name: Get
        returns: String
"#,
    )
    .unwrap();

    let ids: Vec<&str> = doc.operations().map(|op| op.id.as_str()).collect();
    assert_eq!(ids, vec!["Get", "Get2"]);
    assert!(doc.operation("api/Users/Get", HttpVerb::Get).is_some());
    assert!(doc.operation("api/Orders/Get", HttpVerb::Get).is_some());
}

#[test]
fn test_unknown_type_fails_the_build() {
    let err = build(
        r#"
groups:
  - name: UsersController
    methods:
      - name: GetThing
        returns: Thing
"#,
    )
    .unwrap_err();
    assert!(matches!(err, AppError::UnresolvableTypeShape { .. }));
}

#[test]
fn test_wire_document() {
    let doc = build(
        r#"
types:
  - name: Page
    generic_params: [T]
    members:
      - name: items
        type: Vec<T>
      - name: total
        type: i32
  - name: User
    description: A registered user.
    members:
      - name: id
        type: i64
      - name: email
        type: Option<String>
        hints:
          - rename: mail
groups:
  - name: UsersController
    hints:
      - description: User management
    methods:
      - name: Search
        documentation: Finds users.
        parameters:
          - name: term
            type: String
            optional: true
        returns: Task<Page<User>>
        hints:
          - http_get
      - name: Swagger
        returns: String
"#,
    )
    .unwrap();

    let expected = json!({
        "swagger": "2.0",
        "info": { "title": "Web API", "version": "1.0.0" },
        "consumes": ["application/json"],
        "produces": ["application/json"],
        "tags": [{ "name": "Users", "description": "User management" }],
        "paths": {
            "/api/Users/Search": {
                "get": {
                    "tags": ["Users"],
                    "operationId": "Search",
                    "summary": "Finds users.",
                    "parameters": [
                        {
                            "name": "term",
                            "in": "query",
                            "required": false,
                            "type": "string"
                        }
                    ],
                    "responses": {
                        "200": {
                            "description": "",
                            "schema": { "$ref": "#/definitions/PageOfUser" }
                        }
                    }
                }
            }
        },
        "definitions": {
            "PageOfUser": {
                "type": "object",
                "required": ["items", "total"],
                "properties": {
                    "items": {
                        "type": "array",
                        "items": { "$ref": "#/definitions/User" }
                    },
                    "total": { "type": "integer", "format": "int32" }
                },
                "additionalProperties": false
            },
            "User": {
                "type": "object",
                "required": ["id"],
                "properties": {
                    "id": { "type": "integer", "format": "int64" },
                    "mail": { "type": "string", "x-nullable": true }
                },
                "additionalProperties": false,
                "description": "A registered user."
            }
        }
    });
    assert_eq!(to_json(&doc), expected);
}

#[test]
fn test_json_descriptors_with_valued_hints() {
    let doc = build_json(
        r#"{
  "types": [
    { "name": "User", "members": [{ "name": "id", "type": "i64" }] }
  ],
  "groups": [{
    "name": "UsersController",
    "hints": [{ "route_prefix": "users" }],
    "methods": [
      {
        "name": "FetchAsync",
        "parameters": [{ "name": "ID", "type": "i64" }],
        "returns": "Task<User>",
        "hints": [{ "route": "{id:long}" }, { "action_name": "GetUserAsync" }]
      },
      {
        "name": "Save",
        "parameters": [{ "name": "user", "type": "User" }],
        "hints": [
          { "route": "~/accounts" },
          { "accept_verbs": ["PUT", "post"] },
          { "response_type": { "status": "201", "type": "User" } }
        ]
      }
    ]
  }]
}"#,
    )
    .unwrap();

    let get = doc.operation("users/{id}", HttpVerb::Get).unwrap();
    assert_eq!(get.id, "GetUser");
    assert_eq!(get.parameters[0].name, "id");
    assert_eq!(get.parameters[0].binding, Binding::Path);
    assert_eq!(get.responses["200"].schema, Some(SchemaNode::reference("User")));

    let post = doc.operation("accounts", HttpVerb::Post).unwrap();
    let put = doc.operation("accounts", HttpVerb::Put).unwrap();
    assert_eq!(post.id, "Save");
    assert_eq!(put.id, "Save2");
    assert_eq!(post.responses.keys().collect::<Vec<_>>(), vec!["201"]);
    assert_eq!(post.body_parameter().unwrap().name, "user");
    assert_eq!(doc.schemas.len(), 1);
}
