//! Built-in type handlers.
//!
//! `object` and `array` only recognise the shape; descending into
//! properties and elements is done by the traversal once one of them wins
//! the type match.

use std::sync::Arc;

use norma_core::{coerce, predicate, Value};
use norma_schema::{ARRAY, OBJECT};

use crate::handler::{PredicateType, TypeHandler};
use crate::registry::Registry;

pub fn install(types: &mut Registry<dyn TypeHandler>) {
    types.add(
        "number",
        Arc::new(
            PredicateType::new(|v| predicate::is_number(Some(v)))
                .with_convert(|v| Value::Number(coerce::to_number(v))),
        ),
    );
    types.add(
        "integer",
        Arc::new(
            PredicateType::new(|v| predicate::is_integer(Some(v)))
                .with_convert(|v| Value::Number(coerce::to_number(v))),
        ),
    );
    types.add(
        "string",
        Arc::new(
            PredicateType::new(|v| predicate::is_string(Some(v)))
                .with_convert(|v| coerce::to_string(v.clone())),
        ),
    );
    types.add(
        "boolean",
        Arc::new(
            PredicateType::new(|v| predicate::is_boolean(Some(v)))
                .with_convert(|v| coerce::to_boolean(v.clone())),
        ),
    );
    types.add(
        "date",
        Arc::new(
            PredicateType::new(|v| predicate::is_date(Some(v)))
                .with_convert(|v| coerce::to_date(v.clone())),
        ),
    );
    types.add(
        "function",
        Arc::new(PredicateType::new(|v| predicate::is_function(Some(v)))),
    );
    types.add(
        OBJECT,
        Arc::new(PredicateType::new(|v| predicate::is_object(Some(v)))),
    );
    types.add(
        ARRAY,
        Arc::new(PredicateType::new(|v| predicate::is_array(Some(v)))),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{TypeContext, TypeOutcome};
    use norma_core::Violation;
    use norma_schema::LeafSchema;

    fn run(name: &str, value: Value, strict: bool) -> TypeOutcome {
        let mut types: Registry<dyn TypeHandler> = Registry::new("type");
        install(&mut types);
        let schema = LeafSchema::new(name);
        let ctx = TypeContext {
            field: "v",
            type_name: name,
            schema: &schema,
            strict,
        };
        types.get(name).unwrap().handle(&ctx, &value)
    }

    #[test]
    fn test_number_coerces_numeric_strings() {
        assert_eq!(
            run("number", Value::from("12.5"), false).value,
            Some(Value::Number(12.5))
        );
        assert_eq!(
            run("number", Value::from("twelve"), false).errors,
            vec![Violation::type_mismatch("v", "number")]
        );
    }

    #[test]
    fn test_integer_rejects_fractions() {
        assert!(run("integer", Value::from("3"), false).errors.is_empty());
        assert!(!run("integer", Value::Number(3.5), false).errors.is_empty());
    }

    #[test]
    fn test_string_in_strict_mode_rejects_numbers() {
        assert!(!run("string", Value::Number(3.0), true).errors.is_empty());
        assert_eq!(
            run("string", Value::Number(3.0), false).value,
            Some(Value::from("3"))
        );
    }

    #[test]
    fn test_date_coerces_iso_strings() {
        let outcome = run("date", Value::from("2024-05-01T10:00:00Z"), false);
        assert!(matches!(outcome.value, Some(Value::Date(_))));
    }

    #[test]
    fn test_structural_types_do_not_coerce() {
        let outcome = run("object", Value::Object(Default::default()), false);
        assert_eq!(outcome, TypeOutcome::accept(None));
        assert!(!run("array", Value::from("[]"), false).errors.is_empty());
    }

    #[test]
    fn test_function_type() {
        let f = Value::Function(norma_core::Callable::new("f", |_| Value::Null));
        assert!(run("function", f, false).errors.is_empty());
        assert!(!run("function", Value::from("string"), false).errors.is_empty());
    }
}
