//! # Schema Assertion
//!
//! Checks a schema tree against the handlers registered in one engine.
//! Runs once, when a schema is defined, never during validation. The first
//! problem found is returned; schema errors are not accumulated.
//!
//! Data-level problems (unknown leaf keys, non-boolean flags) are caught
//! earlier by [`SchemaNode::from_json`]. Programmatically built schemas
//! cannot express them.

use norma_core::{child_path, DefinitionError};
use norma_schema::{element_path, CheckSpec, LeafSchema, Properties, SchemaNode, TransformSpec};
use norma_schema::{ARRAY, OBJECT};

use crate::registry::Registries;

/// Assert that `schema` is well-formed and only references registered
/// handlers.
pub fn assert_schema(registries: &Registries, schema: &SchemaNode) -> Result<(), DefinitionError> {
    assert_node(registries, schema, "")
}

fn assert_node(
    registries: &Registries,
    node: &SchemaNode,
    path: &str,
) -> Result<(), DefinitionError> {
    match node {
        SchemaNode::Leaf(leaf) => assert_leaf(registries, leaf, path),
        SchemaNode::Object(properties) => {
            require_type(registries, OBJECT, path)?;
            assert_properties(registries, properties, path)
        }
        SchemaNode::Array(element) => {
            require_type(registries, ARRAY, path)?;
            assert_node(registries, element, &element_path(path))
        }
    }
}

fn assert_properties(
    registries: &Registries,
    properties: &Properties,
    path: &str,
) -> Result<(), DefinitionError> {
    properties
        .iter()
        .try_for_each(|(key, node)| assert_node(registries, node, &child_path(path, key)))
}

fn require_type(registries: &Registries, name: &str, path: &str) -> Result<(), DefinitionError> {
    if registries.types.contains(name) {
        Ok(())
    } else {
        Err(DefinitionError::UnknownType {
            path: path.to_string(),
            type_name: name.to_string(),
        })
    }
}

fn assert_leaf(
    registries: &Registries,
    leaf: &LeafSchema,
    path: &str,
) -> Result<(), DefinitionError> {
    if leaf.types.is_empty() || leaf.types.iter().any(String::is_empty) {
        return Err(DefinitionError::InvalidShape {
            path: path.to_string(),
            reason: "type must name at least one type".to_string(),
        });
    }
    for name in &leaf.types {
        require_type(registries, name, path)?;
    }

    if leaf.allowed.as_ref().is_some_and(Vec::is_empty) {
        return Err(DefinitionError::EmptyEnum {
            path: path.to_string(),
        });
    }

    assert_structure(leaf, path)?;
    assert_rules(registries, leaf, path)?;

    if let Some(properties) = &leaf.properties {
        assert_properties(registries, properties, path)?;
    }
    if let Some(element) = &leaf.element {
        assert_node(registries, element, &element_path(path))?;
    }
    Ok(())
}

/// `properties` pairs with `object`, `element` with `array`.
fn assert_structure(leaf: &LeafSchema, path: &str) -> Result<(), DefinitionError> {
    let path = path.to_string();
    match (leaf.has_type(OBJECT), &leaf.properties) {
        (true, None) => return Err(DefinitionError::MissingProperties { path }),
        (false, Some(_)) => return Err(DefinitionError::UnexpectedProperties { path }),
        (true, Some(properties)) if properties.is_empty() => {
            return Err(DefinitionError::InvalidProperty {
                path,
                property: "properties",
                expected: "a non-empty map",
            })
        }
        _ => {}
    }
    match (leaf.has_type(ARRAY), &leaf.element) {
        (true, None) => Err(DefinitionError::MissingElement { path }),
        (false, Some(_)) => Err(DefinitionError::UnexpectedElement { path }),
        _ => Ok(()),
    }
}

/// `check` and `to`: single target type, registered names only.
fn assert_rules(
    registries: &Registries,
    leaf: &LeafSchema,
    path: &str,
) -> Result<(), DefinitionError> {
    if leaf.is_union() {
        let property = match (&leaf.check, &leaf.to) {
            (Some(_), _) => Some("check"),
            (None, Some(_)) => Some("to"),
            (None, None) => None,
        };
        if let Some(property) = property {
            return Err(DefinitionError::AmbiguousTarget {
                path: path.to_string(),
                property,
            });
        }
    }

    if let Some(CheckSpec::Named(checks)) = &leaf.check {
        if checks.is_empty() {
            return Err(DefinitionError::InvalidProperty {
                path: path.to_string(),
                property: "check",
                expected: "a non-empty map",
            });
        }
        if let Some(name) = checks.keys().find(|name| !registries.checks.contains(name)) {
            return Err(DefinitionError::UnknownCheck {
                path: path.to_string(),
                name: name.clone(),
            });
        }
    }

    if let Some(TransformSpec::Named(names)) = &leaf.to {
        if names.is_empty() {
            return Err(DefinitionError::InvalidProperty {
                path: path.to_string(),
                property: "to",
                expected: "a non-empty list",
            });
        }
        if let Some(name) = names.iter().find(|name| !registries.transforms.contains(name)) {
            return Err(DefinitionError::UnknownTransform {
                path: path.to_string(),
                name: name.clone(),
            });
        }
    }
    Ok(())
}
