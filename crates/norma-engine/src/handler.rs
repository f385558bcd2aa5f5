//! # Handler Traits
//!
//! The three capability sets a registry can hold:
//!
//! - [`TypeHandler`]: decides whether a value is of one primitive kind,
//!   optionally coercing it first;
//! - [`CheckHandler`]: a named constraint evaluated after type matching;
//! - [`TransformHandler`]: a named output mutation applied after checks.
//!
//! Implement the traits directly for full control, or build handlers from
//! plain closures with [`PredicateType`], [`FnType`], [`PredicateCheck`],
//! [`FnCheck`] and [`FnTransform`].

use norma_core::{Value, Violation};
use norma_schema::{CheckContext, LeafSchema, TransformContext};

// ─── Type Handlers ───────────────────────────────────────────────────

/// What a type handler sees about the value it is matching.
#[derive(Debug, Clone, Copy)]
pub struct TypeContext<'a> {
    /// Root-relative path of the value.
    pub field: &'a str,
    /// The candidate name this handler is registered under.
    pub type_name: &'a str,
    pub schema: &'a LeafSchema,
    /// Coercion is disabled when set.
    pub strict: bool,
}

/// Result of matching one candidate type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeOutcome {
    /// Replacement for the working value, when the handler coerced it.
    pub value: Option<Value>,
    /// Non-empty when the value does not match.
    pub errors: Vec<Violation>,
}

impl TypeOutcome {
    pub fn accept(value: Option<Value>) -> Self {
        Self {
            value,
            errors: Vec::new(),
        }
    }

    pub fn reject(violation: Violation) -> Self {
        Self {
            value: None,
            errors: vec![violation],
        }
    }
}

pub trait TypeHandler: Send + Sync {
    fn handle(&self, ctx: &TypeContext<'_>, value: &Value) -> TypeOutcome;
}

type ConvertFn = Box<dyn Fn(&Value) -> Value + Send + Sync>;
type ShapeFn = Box<dyn Fn(&Value) -> bool + Send + Sync>;

/// A type defined by a shape predicate and an optional coercion.
///
/// Outside strict mode the value is coerced before the predicate runs.
/// In strict mode the raw value must already satisfy the predicate. A
/// mismatch reports `{field, invalid: "type", expect: <type name>}`.
pub struct PredicateType {
    convert: Option<ConvertFn>,
    check: ShapeFn,
}

impl PredicateType {
    pub fn new<C>(check: C) -> Self
    where
        C: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            convert: None,
            check: Box::new(check),
        }
    }

    pub fn with_convert<F>(mut self, convert: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.convert = Some(Box::new(convert));
        self
    }
}

impl TypeHandler for PredicateType {
    fn handle(&self, ctx: &TypeContext<'_>, value: &Value) -> TypeOutcome {
        let converted = match &self.convert {
            Some(convert) if !ctx.strict => Some(convert(value)),
            _ => None,
        };
        if (self.check)(converted.as_ref().unwrap_or(value)) {
            TypeOutcome::accept(converted)
        } else {
            TypeOutcome::reject(Violation::type_mismatch(ctx.field, ctx.type_name))
        }
    }
}

/// A type handler from a raw closure.
pub struct FnType<F>(F);

impl<F> FnType<F>
where
    F: Fn(&TypeContext<'_>, &Value) -> TypeOutcome + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> TypeHandler for FnType<F>
where
    F: Fn(&TypeContext<'_>, &Value) -> TypeOutcome + Send + Sync,
{
    fn handle(&self, ctx: &TypeContext<'_>, value: &Value) -> TypeOutcome {
        (self.0)(ctx, value)
    }
}

// ─── Check Handlers ──────────────────────────────────────────────────

pub trait CheckHandler: Send + Sync {
    /// Evaluate the constraint. `param` is the value configured for this
    /// check in the schema (`check: {min: 5}` → `5`).
    fn check(&self, ctx: &CheckContext<'_>, value: &Value, param: &Value) -> Vec<Violation>;
}

type HoldsFn = Box<dyn Fn(&Value, &Value) -> bool + Send + Sync>;
type MakeErrorFn = Box<dyn Fn(&CheckContext<'_>, &Value, &Value) -> Violation + Send + Sync>;

/// A check built from a predicate and an error factory. At most one
/// violation per value.
pub struct PredicateCheck {
    holds: HoldsFn,
    make_error: MakeErrorFn,
}

impl PredicateCheck {
    pub fn new<H, E>(holds: H, make_error: E) -> Self
    where
        H: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
        E: Fn(&CheckContext<'_>, &Value, &Value) -> Violation + Send + Sync + 'static,
    {
        Self {
            holds: Box::new(holds),
            make_error: Box::new(make_error),
        }
    }
}

impl CheckHandler for PredicateCheck {
    fn check(&self, ctx: &CheckContext<'_>, value: &Value, param: &Value) -> Vec<Violation> {
        if (self.holds)(value, param) {
            Vec::new()
        } else {
            vec![(self.make_error)(ctx, value, param)]
        }
    }
}

/// A check handler from a raw closure.
pub struct FnCheck<F>(F);

impl<F> FnCheck<F>
where
    F: Fn(&CheckContext<'_>, &Value, &Value) -> Vec<Violation> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> CheckHandler for FnCheck<F>
where
    F: Fn(&CheckContext<'_>, &Value, &Value) -> Vec<Violation> + Send + Sync,
{
    fn check(&self, ctx: &CheckContext<'_>, value: &Value, param: &Value) -> Vec<Violation> {
        (self.0)(ctx, value, param)
    }
}

// ─── Transform Handlers ──────────────────────────────────────────────

pub trait TransformHandler: Send + Sync {
    fn apply(&self, ctx: &TransformContext<'_>, value: Value) -> Value;
}

/// A transform from a plain value-to-value function.
pub struct FnTransform<F>(F);

impl<F> FnTransform<F>
where
    F: Fn(Value) -> Value + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> TransformHandler for FnTransform<F>
where
    F: Fn(Value) -> Value + Send + Sync,
{
    fn apply(&self, _ctx: &TransformContext<'_>, value: Value) -> Value {
        (self.0)(value)
    }
}
