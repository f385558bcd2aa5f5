//! End-to-end validation through the `Engine` API, run against both an
//! interpreted and a compiled copy of every schema.

use chrono::{TimeZone, Utc};
use norma_core::{tag, Value, Violation};
use norma_engine::{Engine, FnType, TypeOutcome, ValidateOptions, Validated};
use norma_schema::{LeafSchema, SchemaNode};
use serde_json::json;

/// Define `schema` twice, interpreted and compiled, validate `input`
/// against both and require identical results.
fn validate_both(schema: SchemaNode, input: Option<&Value>, options: &ValidateOptions) -> Validated {
    validate_both_on(Engine::new(), schema, input, options)
}

/// As [`validate_both`], on an engine prepared by the caller.
fn validate_both_on(
    mut engine: Engine,
    schema: SchemaNode,
    input: Option<&Value>,
    options: &ValidateOptions,
) -> Validated {
    engine.define_schema("interpreted", schema.clone()).unwrap();
    engine.compile("compiled", schema).unwrap();
    let interpreted = engine.validate("interpreted", input, options).unwrap();
    let compiled = engine.validate("compiled", input, options).unwrap();
    assert_eq!(interpreted, compiled);
    interpreted
}

fn validate(schema: SchemaNode, input: serde_json::Value) -> Validated {
    validate_both(schema, Some(&Value::from(input)), &ValidateOptions::default())
}

fn record_schema() -> SchemaNode {
    SchemaNode::array(SchemaNode::object([
        ("string", LeafSchema::new("string").require().into()),
        ("strict_string", LeafSchema::new("string").require().strict().into()),
        (
            "date_convert_to_iso_string_then_lowercase",
            LeafSchema::new("date").require().to("iso_datetime,lowercase").into(),
        ),
        (
            "strict_object",
            SchemaNode::object([("string", LeafSchema::new("string").into())]),
        ),
        (
            "set",
            LeafSchema::new("array")
                .element(LeafSchema::new("string").into())
                .check("set", true)
                .into(),
        ),
        (
            "unique_code",
            LeafSchema::new("array")
                .check("unique", "code")
                .element(SchemaNode::object([
                    ("code", LeafSchema::new("string").into()),
                    ("age", LeafSchema::new("number").into()),
                ]))
                .into(),
        ),
        ("boolean", LeafSchema::new("boolean").into()),
        (
            "number_min_5_max_3",
            LeafSchema::new("number").check("min", 5).check("max", 3).into(),
        ),
        (
            "custom",
            LeafSchema::new("string")
                .default_with(|ctx| {
                    let filled = ctx
                        .input
                        .and_then(Value::as_array)
                        .is_some_and(|items| !items.is_empty());
                    Value::from(if filled { "array>0" } else { "string" })
                })
                .check_with(|ctx, value| {
                    if value.as_f64().is_some_and(|n| n > 3.0) {
                        vec![Violation::new(ctx.field, "min_3")]
                    } else {
                        Vec::new()
                    }
                })
                .to_with(|_, value| match value {
                    Value::String(s) => Value::String(s.to_uppercase()),
                    other => other,
                })
                .into(),
        ),
        ("function", LeafSchema::new("function").into()),
    ]))
}

#[test]
fn test_record_scenario() {
    let now = Utc.with_ymd_and_hms(2024, 3, 5, 8, 30, 15).unwrap();
    let mut record = Value::from(json!({
        "strict_string": 3,
        "date_convert_to_iso_string_then_lowercase": null,
        "strict_object": "string",
        "set": ["1", "2", "1"],
        "unique_code": [{"code": 1, "age": 1}, {"code": 2}, {"code": 1, "age": 2}, {"code": 1, "age": 1}],
        "boolean": "true",
        "number_min_5_max_3": 4,
        "function": "string"
    }));
    if let Value::Object(fields) = &mut record {
        fields.insert(
            "date_convert_to_iso_string_then_lowercase".to_string(),
            Value::Date(now),
        );
    }
    let input = Value::Array(vec![record]);

    let validated = validate_both(record_schema(), Some(&input), &ValidateOptions::default());

    assert_eq!(
        validated.output,
        Some(Value::from(json!([{
            "strict_string": 3,
            "date_convert_to_iso_string_then_lowercase": "2024-03-05t08:30:15.000z",
            "strict_object": "string",
            "set": ["1", "2", "1"],
            "unique_code": [{"code": "1", "age": 1}, {"code": "2"}, {"code": "1", "age": 2}, {"code": "1", "age": 1}],
            "boolean": true,
            "number_min_5_max_3": 4,
            "function": "string",
            "custom": "ARRAY>0"
        }])))
    );

    let errors = serde_json::to_value(&validated.errors).unwrap();
    assert_eq!(
        errors,
        json!([
            {"field": "[0].string", "invalid": "require"},
            {"field": "[0].strict_string", "invalid": "type", "expect": "string"},
            {"field": "[0].strict_object", "invalid": "type", "expect": "object"},
            {"field": "[0].set.[0]", "invalid": "set"},
            {"field": "[0].set.[2]", "invalid": "set"},
            {"field": "[0].unique_code.[0].code", "invalid": "unique"},
            {"field": "[0].unique_code.[2].code", "invalid": "unique"},
            {"field": "[0].unique_code.[3].code", "invalid": "unique"},
            {"field": "[0].number_min_5_max_3", "invalid": "min", "min_value": 5},
            {"field": "[0].number_min_5_max_3", "invalid": "max", "min_value": 3},
            {"field": "[0].function", "invalid": "type", "expect": "function"}
        ])
    );
}

#[test]
fn test_min_and_max_both_fire() {
    let schema = SchemaNode::object([(
        "n",
        LeafSchema::new("number").check("min", 5).check("max", 3).into(),
    )]);
    let validated = validate(schema, json!({"n": 4}));
    assert_eq!(validated.output, Some(Value::from(json!({"n": 4}))));
    assert_eq!(
        validated.errors,
        vec![
            Violation::bound("n", tag::MIN, &Value::from(5)),
            Violation::bound("n", tag::MAX, &Value::from(3)),
        ]
    );
}

#[test]
fn test_errors_accumulate_across_siblings() {
    let schema = SchemaNode::object([
        ("a", LeafSchema::new("number").into()),
        ("b", LeafSchema::new("boolean").strict().into()),
    ]);
    let validated = validate(schema, json!({"a": "x", "b": "y"}));
    assert_eq!(
        validated.errors,
        vec![
            Violation::type_mismatch("a", "number"),
            Violation::type_mismatch("b", "boolean"),
        ]
    );
}

#[test]
fn test_union_first_match_follows_declared_order() {
    let number_first = SchemaNode::object([("v", LeafSchema::new("number,string").into())]);
    let string_first = SchemaNode::object([("v", LeafSchema::new("string,number").into())]);
    assert_eq!(
        validate(number_first, json!({"v": "5"})).output,
        Some(Value::from(json!({"v": 5})))
    );
    assert_eq!(
        validate(string_first, json!({"v": "5"})).output,
        Some(Value::from(json!({"v": "5"})))
    );
}

#[test]
fn test_union_failure_reports_every_candidate() {
    let schema = SchemaNode::object([("v", LeafSchema::new("number,boolean").strict().into())]);
    let validated = validate(schema, json!({"v": "x"}));
    assert_eq!(
        validated.errors,
        vec![
            Violation::type_mismatch("v", "number"),
            Violation::type_mismatch("v", "boolean"),
        ]
    );
}

#[test]
fn test_strict_mode_suppresses_coercion() {
    let strict = SchemaNode::object([("flag", LeafSchema::new("boolean").strict().into())]);
    let lenient = SchemaNode::object([("flag", LeafSchema::new("boolean").into())]);
    let validated = validate(strict, json!({"flag": "true"}));
    assert_eq!(validated.errors, vec![Violation::type_mismatch("flag", "boolean")]);
    assert_eq!(validated.output, Some(Value::from(json!({"flag": "true"}))));

    let validated = validate(lenient, json!({"flag": "true"}));
    assert!(validated.is_valid());
    assert_eq!(validated.output, Some(Value::from(json!({"flag": true}))));
}

#[test]
fn test_global_strict_option() {
    let schema = SchemaNode::object([("n", LeafSchema::new("number").into())]);
    let input = Value::from(json!({"n": "1", "extra": true}));
    let validated = validate_both(schema, Some(&input), &ValidateOptions::new().strict(true));
    assert_eq!(
        validated.errors,
        vec![
            Violation::new("extra", tag::NOT_SPECIFIC),
            Violation::type_mismatch("n", "number"),
        ]
    );
}

#[test]
fn test_require_short_circuits_descent() {
    let schema = SchemaNode::object([(
        "address",
        LeafSchema::new("object")
            .require()
            .properties([
                ("street", LeafSchema::new("string").require().into()),
                ("zip", LeafSchema::new("string").require().into()),
            ])
            .into(),
    )]);
    let validated = validate(schema, json!({}));
    assert_eq!(validated.errors, vec![Violation::require("address")]);
    assert_eq!(validated.output, Some(Value::from(json!({}))));
}

#[test]
fn test_additional_fields() {
    let schema = SchemaNode::object([("keep", LeafSchema::new("string").into())]);
    let input = Value::from(json!({"drop": 1, "keep": "x"}));

    let pruned = validate_both(schema.clone(), Some(&input), &ValidateOptions::default());
    assert_eq!(pruned.output, Some(Value::from(json!({"keep": "x"}))));

    let kept = validate_both(
        schema,
        Some(&input),
        &ValidateOptions::new().remove_additional_field(false),
    );
    assert_eq!(kept.output, Some(input));
}

#[test]
fn test_strict_object_flags_unknown_keys() {
    let schema = LeafSchema::new("object")
        .strict()
        .property("a", LeafSchema::new("number").into())
        .into();
    let validated = validate(schema, json!({"a": 1, "b": 2}));
    assert_eq!(validated.errors, vec![Violation::new("b", tag::NOT_SPECIFIC)]);
}

#[test]
fn test_nullable_and_defaults() {
    let schema = SchemaNode::object([
        ("maybe", LeafSchema::new("string").nullable().into()),
        ("never", LeafSchema::new("string").into()),
        ("fallback", LeafSchema::new("number").default_value(7).into()),
        ("absent", LeafSchema::new("number").into()),
    ]);
    let validated = validate(schema, json!({"never": null}));
    assert_eq!(validated.errors, vec![Violation::not_nullable("never")]);
    assert_eq!(
        validated.output,
        Some(Value::from(json!({"never": null, "maybe": null, "fallback": 7})))
    );
}

#[test]
fn test_default_callback_sees_parent() {
    let schema = SchemaNode::object([
        ("first", LeafSchema::new("string").into()),
        (
            "display",
            LeafSchema::new("string")
                .default_with(|ctx| {
                    ctx.parent
                        .and_then(|parent| parent.get("first"))
                        .cloned()
                        .unwrap_or(Value::Null)
                })
                .into(),
        ),
    ]);
    let validated = validate(schema, json!({"first": "Ada"}));
    assert_eq!(
        validated.output,
        Some(Value::from(json!({"first": "Ada", "display": "Ada"})))
    );
}

#[test]
fn test_enum_rejects_value_outside_the_list() {
    let schema = SchemaNode::object([(
        "size",
        LeafSchema::new("string").one_of(["s", "m", "l"]).into(),
    )]);
    let validated = validate(schema, json!({"size": "xl"}));
    let errors = serde_json::to_value(&validated.errors).unwrap();
    assert_eq!(
        errors,
        json!([{"field": "size", "invalid": "enum", "enum": ["s", "m", "l"]}])
    );
}

#[test]
fn test_checks_skip_nodes_with_descendant_errors() {
    let schema = SchemaNode::object([(
        "items",
        LeafSchema::new("array")
            .element(LeafSchema::new("number").into())
            .check("min_length", 5)
            .into(),
    )]);
    let validated = validate(schema, json!({"items": [1, "x"]}));
    assert_eq!(
        validated.errors,
        vec![Violation::type_mismatch("items.[1]", "number")]
    );
}

#[test]
fn test_transforms_run_left_to_right() {
    let schema = SchemaNode::object([(
        "code",
        LeafSchema::new("string").to("trim").to("uppercase").into(),
    )]);
    let validated = validate(schema, json!({"code": "  ab1 "}));
    assert_eq!(validated.output, Some(Value::from(json!({"code": "AB1"}))));
}

#[test]
fn test_absent_root() {
    let schema: SchemaNode = LeafSchema::new("string").require().into();
    let validated = validate_both(schema, None, &ValidateOptions::default());
    assert_eq!(validated.output, None);
    assert_eq!(validated.errors, vec![Violation::require("")]);
}

#[test]
fn test_schema_from_yaml() {
    let yaml = r#"
name: { type: string, require: true, to: trim }
tags:
  - type: string
    check: { min_length: 2 }
"#;
    let json: serde_json::Value = serde_yaml::from_str(yaml).unwrap();
    let schema = SchemaNode::from_json(&json).unwrap();
    let validated = validate(schema, json!({"name": " n ", "tags": ["ok", "x"]}));
    assert_eq!(validated.output, Some(Value::from(json!({"name": "n", "tags": ["ok", "x"]}))));
    assert_eq!(
        validated.errors,
        vec![Violation::bound("tags.[1]", tag::MIN_LENGTH, &Value::from(2))]
    );
}

/// A raw type handler: comma-separated strings become lists, existing
/// lists pass through, everything else is rejected.
fn csv_type() -> impl norma_engine::TypeHandler {
    FnType::new(|ctx: &norma_engine::TypeContext<'_>, value: &Value| match value {
        Value::Array(_) => TypeOutcome::accept(None),
        Value::String(s) if !ctx.strict => TypeOutcome::accept(Some(Value::Array(
            s.split(',').map(|part| Value::from(part.trim())).collect(),
        ))),
        _ => TypeOutcome::reject(Violation::type_mismatch(ctx.field, ctx.type_name)),
    })
}

#[test]
fn test_raw_type_handler_coerces_into_output() {
    let mut engine = Engine::new();
    engine.register_type("csv", csv_type());
    let schema = SchemaNode::object([(
        "tags",
        LeafSchema::new("csv").check("min_length", 2).into(),
    )]);

    let validated = validate_both_on(
        engine,
        schema,
        Some(&Value::from(json!({"tags": "a, b"}))),
        &ValidateOptions::default(),
    );
    assert!(validated.is_valid(), "{:?}", validated.errors);
    assert_eq!(validated.output, Some(Value::from(json!({"tags": ["a", "b"]}))));
}

#[test]
fn test_raw_type_handler_rejection_keeps_input() {
    let mut engine = Engine::new();
    engine.register_type("csv", csv_type());
    let schema = SchemaNode::object([("tags", LeafSchema::new("csv").into())]);

    let validated = validate_both_on(
        engine,
        schema,
        Some(&Value::from(json!({"tags": 7}))),
        &ValidateOptions::default(),
    );
    assert_eq!(validated.errors, vec![Violation::type_mismatch("tags", "csv")]);
    assert_eq!(validated.output, Some(Value::from(json!({"tags": 7}))));
}

#[test]
fn test_raw_type_handler_sees_strict_mode() {
    let mut engine = Engine::new();
    engine.register_type("csv", csv_type());
    let schema = SchemaNode::object([("tags", LeafSchema::new("csv").into())]);

    let validated = validate_both_on(
        engine,
        schema,
        Some(&Value::from(json!({"tags": "a,b"}))),
        &ValidateOptions::new().strict(true),
    );
    assert_eq!(validated.errors, vec![Violation::type_mismatch("tags", "csv")]);
}
