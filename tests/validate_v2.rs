use openapi_examples::{
    ErrorType, ValidationOptions, validate, validate_file, validate_with_options,
};
use serde_json::{Value, json};

/// Helper: a Swagger 2.0 document with one `GET <path>` 200 response.
fn spec_with_response(path: &str, response: Value) -> Value {
    json!({
        "swagger": "2.0",
        "info": {"title": "pets", "version": "1"},
        "paths": {
            path: {"get": {"responses": {"200": response}}}
        }
    })
}

fn versions_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "versions": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {"id": {"type": "string"}}
                }
            }
        }
    })
}

// ─── Matching pairs ─────────────────────────────────────────────────────────

#[test]
fn valid_example_produces_no_errors() {
    let doc = spec_with_response(
        "/versions",
        json!({
            "schema": versions_schema(),
            "examples": {"application/json": {"versions": [{"id": "v1"}]}}
        }),
    );
    let response = validate(&doc);
    assert!(response.valid, "unexpected errors: {:?}", response.errors);
    assert_eq!(response.statistics.schemas_with_examples, 1);
    assert_eq!(response.statistics.examples_total, 1);
    assert_eq!(response.statistics.examples_without_schema, 0);
    assert_eq!(response.statistics.matching_file_paths_mapping, None);
}

#[test]
fn type_mismatch_points_at_the_offending_field() {
    let doc = spec_with_response(
        "/versions",
        json!({
            "schema": versions_schema(),
            "examples": {"application/json": {"versions": [{"id": 1}]}}
        }),
    );
    let response = validate(&doc);
    assert!(!response.valid);
    assert_eq!(response.errors.len(), 1);

    let err = &response.errors[0];
    assert_eq!(err.error_type(), ErrorType::Validation);
    assert_eq!(err.keyword(), Some("type"));
    assert_eq!(err.data_path(), Some(".versions[0].id"));
    assert_eq!(
        err.example_path.as_deref(),
        Some("/paths/~1versions/get/responses/200/examples/application~1json")
    );
    assert_eq!(err.example_file_path, None);
}

#[test]
fn whole_example_of_wrong_type_reports_the_root() {
    let doc = spec_with_response(
        "/versions",
        json!({
            "schema": {"type": "string"},
            "examples": {"application/json": {"versions": [{"id": 1}]}}
        }),
    );
    let response = validate(&doc);
    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].keyword(), Some("type"));
    assert_eq!(response.errors[0].data_path(), Some(""));
}

#[test]
fn references_to_definitions_are_resolved() {
    let mut doc = spec_with_response(
        "/pets",
        json!({
            "schema": {"type": "array", "items": {"$ref": "#/definitions/Pet"}},
            "examples": {"application/json": [{"name": "Rex", "tag": "dog"}, {"name": 5}]}
        }),
    );
    doc["definitions"] = json!({
        "Pet": {
            "type": "object",
            "required": ["name"],
            "properties": {
                "name": {"type": "string"},
                "tag": {"$ref": "#/definitions/Tag"}
            }
        },
        "Tag": {"type": "string", "enum": ["dog", "cat"]}
    });

    let response = validate(&doc);
    assert_eq!(response.errors.len(), 1, "{:?}", response.errors);
    assert_eq!(response.errors[0].data_path(), Some("[1].name"));
    assert_eq!(response.errors[0].keyword(), Some("type"));
}

#[test]
fn violations_through_refs_carry_keyword_params() {
    let mut doc = spec_with_response(
        "/pets",
        json!({
            "schema": {"$ref": "#/definitions/Pet"},
            "examples": {"application/json": {"name": 7}}
        }),
    );
    doc["definitions"] = json!({
        "Pet": {"type": "object", "properties": {"name": {"type": "string"}}}
    });

    let response = validate(&doc);
    assert_eq!(response.errors.len(), 1, "{:?}", response.errors);
    let err = serde_json::to_value(&response.errors[0]).unwrap();
    assert_eq!(err["keyword"], "type");
    assert_eq!(err["dataPath"], ".name");
    assert_eq!(err["params"], json!({"type": "string"}));
}

#[test]
fn uncompilable_schema_fails_only_its_own_pair() {
    let doc = json!({
        "swagger": "2.0",
        "paths": {
            "/broken": {"get": {"responses": {"200": {
                "schema": {"$ref": "#/definitions/Missing"},
                "examples": {"application/json": {}}
            }}}},
            "/count": {"get": {"responses": {"200": {
                "schema": {"type": "integer"},
                "examples": {"application/json": "many"}
            }}}}
        }
    });

    let response = validate(&doc);
    assert_eq!(response.errors.len(), 2, "{:?}", response.errors);

    let broken = &response.errors[0];
    assert_eq!(broken.error_type(), ErrorType::Error);
    assert!(broken.message().starts_with("Schema could not be compiled"));
    assert_eq!(
        broken.example_path.as_deref(),
        Some("/paths/~1broken/get/responses/200/examples/application~1json")
    );

    assert_eq!(response.errors[1].keyword(), Some("type"));
    assert_eq!(response.statistics.examples_total, 2);
}

// ─── Incomplete pairs ───────────────────────────────────────────────────────

#[test]
fn schema_without_example_is_reported() {
    let doc = spec_with_response("/pets", json!({"schema": {"type": "string"}}));
    let response = validate(&doc);
    assert!(!response.valid);
    assert_eq!(response.statistics.schemas_with_examples, 0);
    assert_eq!(response.statistics.examples_total, 0);
    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].error_type(), ErrorType::Validation);
    assert!(
        response.errors[0].message().ends_with("is missing examples."),
        "{}",
        response.errors[0].message()
    );
}

#[test]
fn example_without_schema_is_reported() {
    let doc = spec_with_response(
        "/pets",
        json!({"examples": {"application/json": {"name": "Rex"}}}),
    );
    let response = validate(&doc);
    assert!(!response.valid);
    assert_eq!(response.statistics.examples_without_schema, 1);
    assert_eq!(response.statistics.examples_total, 1);
    assert_eq!(response.statistics.schemas_with_examples, 0);
    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0].message().ends_with("is missing a schema."));
    assert_eq!(
        response.errors[0].example_path.as_deref(),
        Some("/paths/~1pets/get/responses/200/examples/application~1json")
    );
}

#[test]
fn body_parameter_schemas_count_as_schemas_without_examples() {
    let doc = json!({
        "swagger": "2.0",
        "paths": {
            "/pets": {
                "post": {
                    "parameters": [{"in": "body", "name": "pet", "schema": {"type": "object"}}],
                    "responses": {"201": {
                        "schema": {"type": "object"},
                        "examples": {"application/json": {}}
                    }}
                }
            }
        }
    });
    let response = validate(&doc);
    assert_eq!(response.statistics.schemas_with_examples, 1);
    assert_eq!(response.statistics.examples_total, 1);
    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0].message().contains("/paths/~1pets/post/parameters/0/schema"));
}

#[test]
fn errors_follow_document_order() {
    let doc = json!({
        "swagger": "2.0",
        "paths": {
            "/b": {"get": {"responses": {"200": {
                "schema": {"type": "integer"},
                "examples": {"application/json": "b"}
            }}}},
            "/a": {"get": {"responses": {"200": {
                "schema": {"type": "integer"},
                "examples": {"application/json": "a"}
            }}}}
        }
    });
    let response = validate(&doc);
    let paths: Vec<&str> = response
        .errors
        .iter()
        .filter_map(|e| e.example_path.as_deref())
        .collect();
    assert_eq!(
        paths,
        [
            "/paths/~1b/get/responses/200/examples/application~1json",
            "/paths/~1a/get/responses/200/examples/application~1json",
        ]
    );
}

// ─── Versions and idempotence ───────────────────────────────────────────────

#[test]
fn document_without_version_marker_is_unsupported() {
    let response = validate(&json!({"info": {"title": "x"}, "paths": {}}));
    assert!(!response.valid);
    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].error_type(), ErrorType::UnsupportedVersion);
}

#[test]
fn validating_twice_gives_the_same_response() {
    let doc = spec_with_response(
        "/versions",
        json!({
            "schema": versions_schema(),
            "examples": {"application/json": {"versions": [{"id": 1}, {"id": true}]}}
        }),
    );
    let before = doc.clone();
    let first = validate(&doc);
    let second = validate(&doc);
    assert_eq!(first, second);
    assert_eq!(doc, before);
}

// ─── Options ────────────────────────────────────────────────────────────────

#[test]
fn no_additional_properties_rejects_undeclared_fields() {
    let doc = spec_with_response(
        "/versions",
        json!({
            "schema": versions_schema(),
            "examples": {"application/json": {"versions": [], "extra": true}}
        }),
    );
    assert!(validate(&doc).valid);

    let options = ValidationOptions {
        no_additional_properties: true,
        ..Default::default()
    };
    let response = validate_with_options(&doc, &options);
    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].keyword(), Some("additionalProperties"));
}

#[test]
fn ignored_formats_are_not_checked() {
    let doc = spec_with_response(
        "/when",
        json!({
            "schema": {"type": "string", "format": "date"},
            "examples": {"application/json": "yesterday"}
        }),
    );
    let options = ValidationOptions {
        ignore_formats: vec!["date".to_string()],
        ..Default::default()
    };
    assert!(validate_with_options(&doc, &options).valid);
}

// ─── Files ──────────────────────────────────────────────────────────────────

#[test]
fn validate_file_reads_yaml_specs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spec.yaml");
    std::fs::write(
        &path,
        r#"
swagger: "2.0"
paths:
  /pets:
    get:
      responses:
        "200":
          schema:
            type: integer
          examples:
            application/json: "seven"
"#,
    )
    .unwrap();

    let response = validate_file(&path);
    assert_eq!(response.errors.len(), 1, "{:?}", response.errors);
    assert_eq!(response.errors[0].keyword(), Some("type"));
}

#[test]
fn validate_file_reports_missing_files() {
    let response = validate_file("no/such/spec.json");
    assert!(!response.valid);
    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].error_type(), ErrorType::FileNotFound);
}
