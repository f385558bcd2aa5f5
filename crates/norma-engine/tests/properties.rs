//! Property tests over generated inputs.

use norma_core::Value;
use norma_engine::{Engine, ValidateOptions};
use norma_schema::{LeafSchema, SchemaNode};
use proptest::prelude::*;

fn schema() -> SchemaNode {
    SchemaNode::object([
        ("name", LeafSchema::new("string").to("trim,lowercase").into()),
        ("count", LeafSchema::new("number").check("min", 0).to("round").into()),
        (
            "tags",
            SchemaNode::array(LeafSchema::new("string").check("max_length", 8).to("uppercase").into()),
        ),
        ("flag", LeafSchema::new("boolean").into()),
        ("either", LeafSchema::new("number,string").into()),
        (
            "meta",
            SchemaNode::object([(
                "kind",
                LeafSchema::new("string").nullable().one_of(["a", "b"]).into(),
            )]),
        ),
    ])
}

fn engine() -> Engine {
    let mut engine = Engine::new();
    engine.define_schema("interpreted", schema()).unwrap();
    engine.compile("compiled", schema()).unwrap();
    engine
}

/// JSON inputs whose keys often hit the declared properties.
fn input() -> impl Strategy<Value = serde_json::Value> {
    let leaf = prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(serde_json::Value::Bool),
        (-1000i64..1000).prop_map(|n| serde_json::json!(n)),
        (-1000.0f64..1000.0).prop_map(|f| serde_json::json!(f)),
        "[ a-zA-Z0-9.]{0,12}".prop_map(serde_json::Value::String),
        prop_oneof![Just("true"), Just("false"), Just("a"), Just("b"), Just("12")]
            .prop_map(|s| serde_json::Value::String(s.to_string())),
    ];
    leaf.prop_recursive(3, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(serde_json::Value::Array),
            prop::collection::btree_map("(name|count|tags|flag|either|meta|kind|extra)", inner, 0..7)
                .prop_map(|m| serde_json::Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    /// Compiled and interpreted validation agree on every input and option set.
    #[test]
    fn compiled_matches_interpreted(
        json in input(),
        strict in any::<bool>(),
        remove in any::<bool>(),
    ) {
        let engine = engine();
        let input = Value::from(json);
        let options = ValidateOptions::new().strict(strict).remove_additional_field(remove);
        let interpreted = engine.validate("interpreted", Some(&input), &options).unwrap();
        let compiled = engine.validate("compiled", Some(&input), &options).unwrap();
        prop_assert_eq!(interpreted, compiled);
    }

    /// Feeding clean output back in changes nothing.
    #[test]
    fn clean_output_is_a_fixed_point(json in input()) {
        let engine = engine();
        let options = ValidateOptions::default();
        let input = Value::from(json);
        let first = engine.validate("compiled", Some(&input), &options).unwrap();
        prop_assume!(first.is_valid());
        let second = engine.validate("compiled", first.output.as_ref(), &options).unwrap();
        prop_assert!(second.is_valid(), "second pass errors: {:?}", second.errors);
        prop_assert_eq!(second.output, first.output);
    }

    /// Every violation path points below the root object.
    #[test]
    fn violations_are_addressed(json in input()) {
        let engine = engine();
        let input = Value::from(json);
        let validated = engine.validate("interpreted", Some(&input), &ValidateOptions::default()).unwrap();
        let root_is_object = input.as_object().is_some();
        for violation in &validated.errors {
            prop_assert_eq!(violation.field.is_empty(), !root_is_object);
        }
    }
}
