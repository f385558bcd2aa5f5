//! # Error Types
//!
//! Two disjoint taxonomies:
//!
//! - [`DefinitionError`]: the schema itself is malformed, references an
//!   unregistered handler, or reuses an identifier. Raised immediately at
//!   definition time and never recovered internally.
//! - Violations: bad input. These are data ([`crate::Violation`]) and
//!   only become an error ([`EngineError::ValidationFailed`]) when the
//!   caller opts into throw-on-violation behavior.

use thiserror::Error;

use crate::violation::Violations;

/// A schema definition problem. Every variant that concerns a node carries
/// the node's path within the schema tree (empty for the root).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DefinitionError {
    /// The value is not a leaf, object or one-element array schema.
    #[error("invalid schema at '{path}': {reason}")]
    InvalidShape { path: String, reason: String },

    /// A leaf schema carries a key outside the known property set.
    #[error("invalid schema property at '{path}': unknown key '{key}'")]
    UnknownProperty { path: String, key: String },

    /// A property is present with the wrong kind of value.
    #[error("invalid schema property at '{path}': {property} must be {expected}")]
    InvalidProperty {
        path: String,
        property: &'static str,
        expected: &'static str,
    },

    /// A leaf references a type name with no registered handler.
    #[error("invalid schema type at '{path}': '{type_name}' is not registered")]
    UnknownType { path: String, type_name: String },

    /// `enum` is present but empty.
    #[error("invalid schema property at '{path}': enum must not be empty")]
    EmptyEnum { path: String },

    /// A type list including `object` has no `properties`.
    #[error("invalid schema property at '{path}': object type must have properties")]
    MissingProperties { path: String },

    /// `properties` given without `object` among the candidate types.
    #[error("invalid schema property at '{path}': properties require the object type")]
    UnexpectedProperties { path: String },

    /// A type list including `array` has no `element`.
    #[error("invalid schema property at '{path}': array type must have element")]
    MissingElement { path: String },

    /// `element` given without `array` among the candidate types.
    #[error("invalid schema property at '{path}': element requires the array type")]
    UnexpectedElement { path: String },

    /// `check` or `to` combined with more than one candidate type.
    #[error("invalid schema property at '{path}': {property} can not target multiple types")]
    AmbiguousTarget { path: String, property: &'static str },

    /// A named check has no registered handler.
    #[error("invalid schema property at '{path}': check.{name} is not registered")]
    UnknownCheck { path: String, name: String },

    /// A named transform has no registered handler.
    #[error("invalid schema property at '{path}': to.{name} is not registered")]
    UnknownTransform { path: String, name: String },

    /// The schema identifier is already in use.
    #[error("schema '{id}' already exists")]
    DuplicateSchema { id: String },
}

/// Errors surfaced by engine entry points.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The schema failed assertion.
    #[error("schema definition error: {0}")]
    Definition(#[from] DefinitionError),

    /// No schema is stored under the identifier.
    #[error("schema '{id}' is not defined")]
    UnknownSchema { id: String },

    /// The input produced violations and the caller asked for failure.
    #[error("validation failed:\n{violations}")]
    ValidationFailed { violations: Violations },
}
