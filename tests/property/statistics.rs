use openapi_examples::validate;
use proptest::prelude::*;
use serde_json::{Map, Value, json};

/// One `GET /pN` response: optional schema, optional example.
#[derive(Clone, Debug)]
struct Operation {
    schema: Option<Value>,
    example: Option<Value>,
}

fn arb_schema() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(json!({"type": "string"})),
        Just(json!({"type": "integer"})),
        Just(json!({"type": "array", "items": {"type": "boolean"}})),
        Just(json!({"type": "object", "required": ["id"]})),
        Just(json!({"$ref": "#/definitions/Thing"})),
    ]
}

fn arb_example() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|i| json!(i)),
        "[a-z]{0,6}".prop_map(Value::String),
    ];
    leaf.prop_recursive(2, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec(("[a-z]{1,4}", inner), 0..4)
                .prop_map(|pairs| Value::Object(pairs.into_iter().collect())),
        ]
    })
}

fn arb_operations() -> impl Strategy<Value = Vec<Operation>> {
    prop::collection::vec(
        (prop::option::of(arb_schema()), prop::option::of(arb_example()))
            .prop_map(|(schema, example)| Operation { schema, example }),
        0..6,
    )
}

fn document(operations: &[Operation]) -> Value {
    let mut paths = Map::new();
    for (i, op) in operations.iter().enumerate() {
        let mut response = Map::new();
        if let Some(schema) = &op.schema {
            response.insert("schema".to_string(), schema.clone());
        }
        if let Some(example) = &op.example {
            response.insert("examples".to_string(), json!({"application/json": example}));
        }
        paths.insert(
            format!("/p{i}"),
            json!({"get": {"responses": {"200": response}}}),
        );
    }
    json!({
        "swagger": "2.0",
        "paths": paths,
        "definitions": {"Thing": {"type": "object", "properties": {"id": {"type": "integer"}}}}
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn valid_iff_no_errors(operations in arb_operations()) {
        let response = validate(&document(&operations));
        prop_assert_eq!(response.valid, response.errors.is_empty());
    }

    #[test]
    fn counters_follow_pair_classification(operations in arb_operations()) {
        let response = validate(&document(&operations));
        let both = operations.iter().filter(|o| o.schema.is_some() && o.example.is_some()).count();
        let example_only = operations.iter().filter(|o| o.schema.is_none() && o.example.is_some()).count();
        let schema_only = operations.iter().filter(|o| o.schema.is_some() && o.example.is_none()).count();

        prop_assert_eq!(response.statistics.schemas_with_examples, both);
        prop_assert_eq!(response.statistics.examples_total, both + example_only);
        prop_assert_eq!(response.statistics.examples_without_schema, example_only);
        prop_assert!(response.errors.len() >= schema_only + example_only);
    }

    #[test]
    fn validation_is_idempotent(operations in arb_operations()) {
        let doc = document(&operations);
        prop_assert_eq!(validate(&doc), validate(&doc));
    }
}
