//! # Violations
//!
//! A violation is one failed rule at one field path. Violations are plain
//! records: they are accumulated across the whole input tree and returned
//! as data, never raised.
//!
//! ## Wire Shape
//!
//! ```text
//! { "field": "unique_code.[2].code", "invalid": "unique" }
//! { "field": "n", "invalid": "min", "min_value": 5 }
//! { "field": "kind", "invalid": "enum", "enum": ["a", "b"] }
//! { "field": "flag", "invalid": "type", "expect": "boolean" }
//! ```
//!
//! Paths are root-relative, `.` separates object keys and `[i]` addresses
//! array elements, joined with `.` below the root (`[0].set.[2]`).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Tags emitted by the engine itself. Check and type handlers may emit any
/// other tag.
pub mod tag {
    pub const REQUIRE: &str = "require";
    pub const NOT_NULLABLE: &str = "not nullable";
    pub const ENUM: &str = "enum";
    pub const TYPE: &str = "type";
    pub const NOT_SPECIFIC: &str = "not_specific";
    pub const MIN: &str = "min";
    pub const MAX: &str = "max";
    pub const MIN_LENGTH: &str = "min_length";
    pub const MAX_LENGTH: &str = "max_length";
    pub const SET: &str = "set";
    pub const UNIQUE: &str = "unique";
}

/// A single failed rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Root-relative path of the offending value.
    pub field: String,
    /// Tag naming the rule that failed.
    pub invalid: String,
    /// Expected type name for `type` violations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expect: Option<String>,
    /// Allowed members for `enum` violations.
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<Value>>,
    /// Configured bound for ordering and length checks. Both the lower and
    /// upper bound checks report under this key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<Value>,
}

impl Violation {
    /// A violation with no auxiliary data.
    pub fn new(field: impl Into<String>, invalid: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            invalid: invalid.into(),
            expect: None,
            allowed: None,
            min_value: None,
        }
    }

    pub fn require(field: &str) -> Self {
        Self::new(field, tag::REQUIRE)
    }

    pub fn not_nullable(field: &str) -> Self {
        Self::new(field, tag::NOT_NULLABLE)
    }

    pub fn enumeration(field: &str, allowed: &[Value]) -> Self {
        Self {
            allowed: Some(allowed.to_vec()),
            ..Self::new(field, tag::ENUM)
        }
    }

    pub fn type_mismatch(field: &str, expect: &str) -> Self {
        Self {
            expect: Some(expect.to_string()),
            ..Self::new(field, tag::TYPE)
        }
    }

    /// A bound violation (`min`, `max`, `min_length`, `max_length`).
    pub fn bound(field: &str, invalid: &str, bound: &Value) -> Self {
        Self {
            min_value: Some(bound.clone()),
            ..Self::new(field, invalid)
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = if self.field.is_empty() {
            "(root)"
        } else {
            &self.field
        };
        write!(f, "  {field}: {}", self.invalid)?;
        if let Some(expect) = &self.expect {
            write!(f, " (expected {expect})")?;
        }
        if let Some(allowed) = &self.allowed {
            write!(f, " (allowed {})", Value::Array(allowed.clone()))?;
        }
        if let Some(bound) = &self.min_value {
            write!(f, " (bound {bound})")?;
        }
        Ok(())
    }
}

/// Collection of violations from one validation call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Violation] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<Violation> {
        self.0
    }
}

impl From<Vec<Violation>> for Violations {
    fn from(violations: Vec<Violation>) -> Self {
        Self(violations)
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

// ─── Paths ───────────────────────────────────────────────────────────

/// Path of an object property below `parent`.
pub fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

/// Path of an array element below `parent`.
pub fn index_path(parent: &str, index: usize) -> String {
    if parent.is_empty() {
        format!("[{index}]")
    } else {
        format!("{parent}.[{index}]")
    }
}
