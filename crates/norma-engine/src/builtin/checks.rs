//! Built-in check handlers.
//!
//! Ordering and length checks are independent of each other, so `min: 5`
//! and `max: 3` both fire on 4. Both bounds report under `min_value`.
//!
//! The duplicate checks report every member of a duplicate group, in
//! ascending index order.

use std::collections::HashMap;
use std::sync::Arc;

use norma_core::{coerce, index_path, tag, Value, Violation};
use norma_schema::CheckContext;

use crate::handler::CheckHandler;
use crate::registry::Registry;

pub fn install(checks: &mut Registry<dyn CheckHandler>) {
    checks.add("min", Arc::new(Bound::new(tag::MIN, |v, b| v >= b)));
    checks.add("max", Arc::new(Bound::new(tag::MAX, |v, b| v <= b)));
    checks.add("min_length", Arc::new(Length::new(tag::MIN_LENGTH, |l, b| l >= b)));
    checks.add("max_length", Arc::new(Length::new(tag::MAX_LENGTH, |l, b| l <= b)));
    checks.add("set", Arc::new(Set));
    checks.add("unique", Arc::new(Unique));
}

/// Numeric or date ordering against the configured bound.
struct Bound {
    tag: &'static str,
    holds: fn(f64, f64) -> bool,
}

impl Bound {
    fn new(tag: &'static str, holds: fn(f64, f64) -> bool) -> Self {
        Self { tag, holds }
    }
}

impl CheckHandler for Bound {
    fn check(&self, ctx: &CheckContext<'_>, value: &Value, param: &Value) -> Vec<Violation> {
        let actual = coerce::ordinal(value, value);
        let bound = coerce::ordinal(param, value);
        if (self.holds)(actual, bound) {
            Vec::new()
        } else {
            vec![Violation::bound(ctx.field, self.tag, param)]
        }
    }
}

/// Length ordering for strings (in characters) and arrays. Values without
/// a length always fail.
struct Length {
    tag: &'static str,
    holds: fn(f64, f64) -> bool,
}

impl Length {
    fn new(tag: &'static str, holds: fn(f64, f64) -> bool) -> Self {
        Self { tag, holds }
    }
}

impl CheckHandler for Length {
    fn check(&self, ctx: &CheckContext<'_>, value: &Value, param: &Value) -> Vec<Violation> {
        let length = match value {
            Value::String(s) => s.chars().count() as f64,
            Value::Array(items) => items.len() as f64,
            _ => f64::NAN,
        };
        if (self.holds)(length, coerce::to_number(param)) {
            Vec::new()
        } else {
            vec![Violation::bound(ctx.field, self.tag, param)]
        }
    }
}

/// Every element of the array must be distinct by value. Enabled by a
/// truthy parameter.
struct Set;

impl CheckHandler for Set {
    fn check(&self, ctx: &CheckContext<'_>, value: &Value, param: &Value) -> Vec<Violation> {
        let Some(items) = value.as_array().filter(|_| param.is_truthy()) else {
            return Vec::new();
        };
        duplicate_indices(items.iter().map(|item| Some(item.identity_key())))
            .into_iter()
            .map(|index| Violation::new(index_path(ctx.field, index), tag::SET))
            .collect()
    }
}

/// Every element of the array must be distinct by one or more sub-keys.
///
/// The parameter is a key name, or a list whose entries are key names or
/// key-combinations (lists of names). Each entry is checked on its own.
/// Elements missing any key of an entry take no part in that entry's check.
struct Unique;

impl Unique {
    fn key_groups(param: &Value) -> Vec<Vec<String>> {
        let names = |v: &Value| match v {
            Value::String(s) => Some(vec![s.clone()]),
            Value::Array(combo) => combo
                .iter()
                .map(|k| k.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .filter(|combo| !combo.is_empty()),
            _ => None,
        };
        match param {
            Value::String(_) => names(param).into_iter().collect(),
            Value::Array(entries) => entries.iter().filter_map(names).collect(),
            _ => Vec::new(),
        }
    }
}

impl CheckHandler for Unique {
    fn check(&self, ctx: &CheckContext<'_>, value: &Value, param: &Value) -> Vec<Violation> {
        let Some(items) = value.as_array() else {
            return Vec::new();
        };
        let mut violations = Vec::new();
        for group in Self::key_groups(param) {
            let keys = items.iter().map(|item| {
                group
                    .iter()
                    .map(|name| item.get(name).map(Value::identity_key))
                    .collect::<Option<Vec<_>>>()
                    .map(|parts| parts.join("\u{1f}"))
            });
            let suffix = group.join(",");
            violations.extend(duplicate_indices(keys).into_iter().map(|index| {
                Violation::new(
                    format!("{}.{suffix}", index_path(ctx.field, index)),
                    tag::UNIQUE,
                )
            }));
        }
        violations
    }
}

/// Indices of every element whose key is shared with another element.
fn duplicate_indices(keys: impl Iterator<Item = Option<String>>) -> Vec<usize> {
    let mut groups: HashMap<String, Vec<usize>> = HashMap::new();
    for (index, key) in keys.enumerate() {
        if let Some(key) = key {
            groups.entry(key).or_default().push(index);
        }
    }
    let mut duplicates: Vec<usize> = groups
        .into_values()
        .filter(|indices| indices.len() > 1)
        .flatten()
        .collect();
    duplicates.sort_unstable();
    duplicates
}
