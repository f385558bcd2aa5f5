//! # Shape Predicates
//!
//! Pure, total predicates over `Option<&Value>`. These are the only
//! primitives the rest of the workspace uses to branch on the shape of a
//! value. `None` stands for an absent value.

use crate::value::Value;

/// Finite number. NaN and infinities are excluded.
pub fn is_number(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Number(n)) if n.is_finite())
}

/// Finite number without a fractional part.
pub fn is_integer(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Number(n)) if n.is_finite() && n.fract() == 0.0)
}

pub fn is_string(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::String(_)))
}

/// A valid calendar instant. `Value::Date` can only hold valid instants.
pub fn is_date(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Date(_)))
}

pub fn is_boolean(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Bool(_)))
}

pub fn is_function(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Function(_)))
}

pub fn is_array(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Array(_)))
}

/// Non-array, non-null structural record.
pub fn is_object(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Object(_)))
}

/// Null or absent.
pub fn is_empty(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

pub fn is_filled_string(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::String(s)) if !s.is_empty())
}

pub fn is_filled_array(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Array(items)) if !items.is_empty())
}

pub fn is_filled_object(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Object(map)) if !map.is_empty())
}
