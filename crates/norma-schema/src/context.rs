//! # Callback Contexts
//!
//! What inline callbacks and registered handlers get to see about the field
//! they run on. Contexts borrow from the input tree and the schema for the
//! duration of one node visit.

use std::sync::Arc;

use norma_core::{Value, Violation};

use crate::model::LeafSchema;

/// Passed to a default callback.
#[derive(Debug, Clone, Copy)]
pub struct DefaultContext<'a> {
    /// The top-level input of the validation call.
    pub input: Option<&'a Value>,
    /// The input value containing this field (object or array), if any.
    pub parent: Option<&'a Value>,
    /// Root-relative path of the field being defaulted.
    pub field: &'a str,
}

/// Passed to check callbacks and check handlers.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    pub field: &'a str,
    pub input: Option<&'a Value>,
    pub parent: Option<&'a Value>,
    pub schema: &'a LeafSchema,
}

/// Passed to transform callbacks and transform handlers.
#[derive(Debug, Clone, Copy)]
pub struct TransformContext<'a> {
    pub field: &'a str,
    pub schema: &'a LeafSchema,
}

/// Inline default callback.
pub type DefaultFn = Arc<dyn Fn(&DefaultContext<'_>) -> Value + Send + Sync>;

/// Inline check callback. Returns the violations it found, if any.
pub type CheckFn = Arc<dyn Fn(&CheckContext<'_>, &Value) -> Vec<Violation> + Send + Sync>;

/// Inline transform callback.
pub type TransformFn = Arc<dyn Fn(&TransformContext<'_>, Value) -> Value + Send + Sync>;
