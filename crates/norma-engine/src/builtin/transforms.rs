//! Built-in transform handlers.
//!
//! Each transform only touches values of the kind it understands and
//! passes everything else through unchanged.

use std::sync::Arc;

use norma_core::{coerce, value::iso8601, Value};

use crate::handler::{FnTransform, TransformHandler};
use crate::registry::Registry;

pub fn install(transforms: &mut Registry<dyn TransformHandler>) {
    transforms.add("trim", Arc::new(FnTransform::new(|v| map_str(v, |s| s.trim().to_string()))));
    transforms.add("lowercase", Arc::new(FnTransform::new(|v| map_str(v, str::to_lowercase))));
    transforms.add("uppercase", Arc::new(FnTransform::new(|v| map_str(v, str::to_uppercase))));
    transforms.add("round", Arc::new(FnTransform::new(|v| map_num(v, round_half_up))));
    transforms.add("floor", Arc::new(FnTransform::new(|v| map_num(v, f64::floor))));
    transforms.add("ceil", Arc::new(FnTransform::new(|v| map_num(v, f64::ceil))));
    transforms.add("iso_datetime", Arc::new(FnTransform::new(iso_datetime)));
}

fn map_str(value: Value, f: impl Fn(&str) -> String) -> Value {
    match value {
        Value::String(s) => Value::String(f(&s)),
        other => other,
    }
}

fn map_num(value: Value, f: impl Fn(f64) -> f64) -> Value {
    match value {
        Value::Number(n) => Value::Number(f(n)),
        other => other,
    }
}

/// Halves round towards positive infinity (`-2.5` → `-2`). Works from the
/// floor so large integers and values just below a half stay exact.
fn round_half_up(n: f64) -> f64 {
    let floor = n.floor();
    if n - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Render a date as ISO-8601 UTC with milliseconds. Parseable strings and
/// epoch-millisecond numbers are read as dates first.
fn iso_datetime(value: Value) -> Value {
    match coerce::to_date(value) {
        Value::Date(date) => Value::String(iso8601(&date)),
        other => other,
    }
}
