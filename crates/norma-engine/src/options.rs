//! # Validation Options and Results
//!
//! The per-call options record and the `{output, errors}` pair every
//! validation entry point returns.

use norma_core::{Value, Violation};
use serde::{Deserialize, Serialize};

/// Options for one validation call.
///
/// Missing fields take their defaults when deserialized, so `{}` is a valid
/// options document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidateOptions {
    /// Disable coercion and reject undeclared object keys everywhere.
    pub strict: bool,
    /// Drop undeclared object keys from the output.
    pub remove_additional_field: bool,
    /// Turn a non-empty violation list into
    /// [`norma_core::EngineError::ValidationFailed`].
    pub is_throw_error: bool,
}

impl ValidateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn remove_additional_field(mut self, remove: bool) -> Self {
        self.remove_additional_field = remove;
        self
    }

    pub fn throw_on_error(mut self, throw: bool) -> Self {
        self.is_throw_error = throw;
        self
    }
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            strict: false,
            remove_additional_field: true,
            is_throw_error: false,
        }
    }
}

/// Normalized output and the violations found producing it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Validated {
    /// `None` when the root input was absent and nothing defaulted it.
    pub output: Option<Value>,
    pub errors: Vec<Violation>,
}

impl Validated {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}
