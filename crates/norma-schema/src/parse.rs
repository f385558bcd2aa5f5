//! # Schema Documents
//!
//! Reads a schema tree out of plain data (`serde_json::Value`, which YAML
//! documents convert into). Data schemas cannot carry callbacks, so every
//! rule parsed here is the literal or named variant.
//!
//! Parsing reports the data-level definition errors: unknown leaf keys,
//! flags that are not booleans, and `enum`/`check`/`to`/`properties` of the
//! wrong kind. Whether the referenced types, checks and transforms exist is
//! decided later by assertion against an engine's registries.

use indexmap::IndexMap;
use norma_core::{child_path, DefinitionError, Value};
use serde_json::Value as Json;

use crate::model::{split_list, CheckSpec, DefaultValue, LeafSchema, Properties, SchemaNode, TransformSpec};

/// Keys allowed on a leaf schema.
pub const LEAF_KEYS: [&str; 10] = [
    "type",
    "require",
    "nullable",
    "enum",
    "default",
    "strict",
    "properties",
    "element",
    "check",
    "to",
];

impl SchemaNode {
    /// Parse a schema tree from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns the first [`DefinitionError`] found, depth-first.
    pub fn from_json(json: &Json) -> Result<Self, DefinitionError> {
        parse_node(json, "")
    }
}

fn parse_node(json: &Json, path: &str) -> Result<SchemaNode, DefinitionError> {
    match json {
        Json::Object(map) => match map.get("type") {
            Some(Json::String(types)) => parse_leaf(map, types, path).map(SchemaNode::from),
            None | Some(Json::Null) | Some(Json::Object(_)) => {
                parse_properties(map, path).map(SchemaNode::Object)
            }
            Some(_) => Err(DefinitionError::InvalidShape {
                path: path.to_string(),
                reason: "type must be a comma-separated string".to_string(),
            }),
        },
        Json::Array(items) if items.len() == 1 => {
            parse_node(&items[0], &element_path(path)).map(SchemaNode::array)
        }
        Json::Array(_) => Err(DefinitionError::InvalidShape {
            path: path.to_string(),
            reason: "array schema must have exactly one element schema".to_string(),
        }),
        other => Err(DefinitionError::InvalidShape {
            path: path.to_string(),
            reason: format!("expected a schema object or array, got {other}"),
        }),
    }
}

fn parse_properties(
    map: &serde_json::Map<String, Json>,
    path: &str,
) -> Result<Properties, DefinitionError> {
    map.iter()
        .map(|(key, node)| Ok((key.clone(), parse_node(node, &child_path(path, key))?)))
        .collect()
}

fn parse_leaf(
    map: &serde_json::Map<String, Json>,
    types: &str,
    path: &str,
) -> Result<LeafSchema, DefinitionError> {
    if let Some(key) = map.keys().find(|k| !LEAF_KEYS.contains(&k.as_str())) {
        return Err(DefinitionError::UnknownProperty {
            path: path.to_string(),
            key: key.clone(),
        });
    }

    let mut leaf = LeafSchema::new(types);
    leaf.require = parse_flag(map, "require", path)?;
    leaf.nullable = parse_flag(map, "nullable", path)?;
    leaf.strict = parse_flag(map, "strict", path)?;

    if let Some(default) = map.get("default").filter(|v| !v.is_null()) {
        leaf.default = Some(DefaultValue::Literal(Value::from(default.clone())));
    }

    match map.get("enum") {
        None | Some(Json::Null) => {}
        Some(Json::Array(items)) => {
            leaf.allowed = Some(items.iter().cloned().map(Value::from).collect());
        }
        Some(_) => return Err(invalid(path, "enum", "an array")),
    }

    match map.get("check") {
        None | Some(Json::Null) => {}
        Some(Json::Object(checks)) if !checks.is_empty() => {
            let named: IndexMap<String, Value> = checks
                .iter()
                .map(|(name, param)| (name.clone(), Value::from(param.clone())))
                .collect();
            leaf.check = Some(CheckSpec::Named(named));
        }
        Some(_) => return Err(invalid(path, "check", "a filled object of named checks")),
    }

    match map.get("to") {
        None | Some(Json::Null) => {}
        Some(Json::String(names)) if !names.is_empty() => {
            leaf.to = Some(TransformSpec::Named(split_list(names)));
        }
        Some(Json::Array(names)) if !names.is_empty() => {
            let names = names
                .iter()
                .map(|n| n.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| invalid(path, "to", "a filled string or array of names"))?;
            leaf.to = Some(TransformSpec::Named(names));
        }
        Some(_) => return Err(invalid(path, "to", "a filled string or array of names")),
    }

    match map.get("properties") {
        None | Some(Json::Null) => {}
        Some(Json::Object(properties)) if !properties.is_empty() => {
            if matches!(properties.get("type"), Some(Json::String(_))) {
                return Err(invalid(path, "properties", "a map of field schemas, not a schema"));
            }
            leaf.properties = Some(parse_properties(properties, path)?);
        }
        Some(_) => return Err(invalid(path, "properties", "a filled object")),
    }

    match map.get("element") {
        None | Some(Json::Null) => {}
        Some(element) => {
            leaf.element = Some(Box::new(parse_node(element, &element_path(path))?));
        }
    }

    Ok(leaf)
}

fn parse_flag(
    map: &serde_json::Map<String, Json>,
    property: &'static str,
    path: &str,
) -> Result<bool, DefinitionError> {
    match map.get(property) {
        None | Some(Json::Null) => Ok(false),
        Some(Json::Bool(flag)) => Ok(*flag),
        Some(_) => Err(invalid(path, property, "a boolean")),
    }
}

fn invalid(path: &str, property: &'static str, expected: &'static str) -> DefinitionError {
    DefinitionError::InvalidProperty {
        path: path.to_string(),
        property,
        expected,
    }
}

/// Schema path of an array's element node.
pub fn element_path(path: &str) -> String {
    if path.is_empty() {
        "[]".to_string()
    } else {
        format!("{path}.[]")
    }
}
