//! # Recursive Traversal
//!
//! The validation algorithm, written once over the [`Plan`] abstraction.
//! The interpreter ([`crate::interpret::Interpreter`]) plans straight from a
//! schema tree and resolves handlers by name at call time; a compiled
//! [`crate::compile::Program`] plans from an arena of pre-resolved blocks.
//! Both run through [`Traversal`], so their `{output, errors}` agree.
//!
//! ## Per-node steps
//!
//! 1. `require`: an absent required value is a violation; stop.
//! 2. `default`: an absent value takes the default, if any.
//! 3. `nullable`: a still absent nullable value becomes null. Null on a
//!    non-nullable node is a violation. Either way, null stops here.
//! 4. `enum`: a value outside the allowed set is a violation; stop.
//! 5. type matching: candidates in declared order, first match wins and
//!    its coerced value replaces the working value. No match: every
//!    candidate's violation is reported.
//! 6. structure: a matched `object` descends into declared properties, a
//!    matched `array` into every element.
//! 7. `check`: only if this node and its descendants produced nothing.
//! 8. `to`: only if still clean.

use std::borrow::Cow;

use indexmap::IndexMap;
use norma_core::{child_path, index_path, tag, Map, Value, Violation};
use norma_schema::{CheckContext, DefaultContext, LeafSchema, TransformContext, ARRAY, OBJECT};

use crate::handler::{TypeContext, TypeHandler, TypeOutcome};
use crate::options::{ValidateOptions, Validated};

/// Where the traversal gets its rules and handlers from.
pub trait Plan {
    type Node;

    /// The rule set of a node.
    fn rules<'s>(&'s self, node: &'s Self::Node) -> Cow<'s, LeafSchema>;

    /// Handler of the candidate type at `position` in the node's type list.
    fn type_handler(&self, node: &Self::Node, position: usize, name: &str)
        -> Option<&dyn TypeHandler>;

    /// Declared properties, in declaration order.
    fn properties<'s>(&'s self, node: &'s Self::Node) -> Vec<(&'s str, &'s Self::Node)>;

    fn element<'s>(&'s self, node: &'s Self::Node) -> Option<&'s Self::Node>;

    /// Run the node's `check` rule, if it has one.
    fn check(&self, node: &Self::Node, ctx: &CheckContext<'_>, value: &Value) -> Vec<Violation>;

    /// Run the node's `to` rule, if it has one.
    fn transform(&self, node: &Self::Node, ctx: &TransformContext<'_>, value: Value) -> Value;
}

/// One validation call.
pub struct Traversal<'a, P: Plan> {
    plan: &'a P,
    options: &'a ValidateOptions,
    /// The top-level input, handed to default and check callbacks.
    input: Option<&'a Value>,
}

impl<'a, P: Plan> Traversal<'a, P> {
    /// Validate `input` against the plan rooted at `root`.
    pub fn run(
        plan: &'a P,
        root: &P::Node,
        input: Option<&'a Value>,
        options: &'a ValidateOptions,
    ) -> Validated {
        let traversal = Traversal {
            plan,
            options,
            input,
        };
        let mut errors = Vec::new();
        let output = traversal.visit(root, input, None, "", &mut errors);
        Validated { output, errors }
    }

    fn visit(
        &self,
        node: &P::Node,
        value: Option<&Value>,
        parent: Option<&Value>,
        field: &str,
        errors: &mut Vec<Violation>,
    ) -> Option<Value> {
        let mut local = Vec::new();
        let output = self.visit_node(node, value, parent, field, &mut local);
        errors.append(&mut local);
        output
    }

    /// `local` starts empty and collects this node's violations together
    /// with those of its descendants.
    fn visit_node(
        &self,
        node: &P::Node,
        value: Option<&Value>,
        parent: Option<&Value>,
        field: &str,
        local: &mut Vec<Violation>,
    ) -> Option<Value> {
        let rules = self.plan.rules(node);
        let rules: &LeafSchema = &rules;

        if rules.require && value.is_none() {
            local.push(Violation::require(field));
            return None;
        }

        let mut working = value.map(Cow::Borrowed);
        if working.is_none() {
            if let Some(default) = &rules.default {
                let ctx = DefaultContext {
                    input: self.input,
                    parent,
                    field,
                };
                working = Some(Cow::Owned(default.resolve(&ctx)));
            }
        }
        if working.is_none() && rules.nullable {
            working = Some(Cow::Owned(Value::Null));
        }

        let value = match working {
            None => return None,
            Some(value) if matches!(*value, Value::Null) => {
                if !rules.nullable {
                    local.push(Violation::not_nullable(field));
                }
                return Some(Value::Null);
            }
            Some(value) => value,
        };

        if let Some(allowed) = &rules.allowed {
            if !allowed.contains(&*value) {
                local.push(Violation::enumeration(field, allowed));
                return Some(value.into_owned());
            }
        }

        let strict = self.options.strict || rules.strict;
        let (matched, value) = self.match_type(node, rules, value, field, strict, local);
        if matched == Matched::Nothing {
            return Some(value.into_owned());
        }
        let descended = match (matched, &*value) {
            (Matched::Object, Value::Object(map)) => Some(Value::Object(
                self.descend_object(node, map, &value, field, strict, local),
            )),
            (Matched::Array, Value::Array(items)) => Some(Value::Array(
                self.descend_array(node, items, &value, field, local),
            )),
            _ => None,
        };
        let mut value = descended.unwrap_or_else(|| value.into_owned());

        if local.is_empty() {
            let ctx = CheckContext {
                field,
                input: self.input,
                parent,
                schema: rules,
            };
            local.extend(self.plan.check(node, &ctx, &value));
        }
        if local.is_empty() {
            let ctx = TransformContext {
                field,
                schema: rules,
            };
            value = self.plan.transform(node, &ctx, value);
        }
        Some(value)
    }

    /// Try every candidate type in order. Returns the winning kind and the
    /// working value, coerced if the winner coerced it. On no match the
    /// value is kept as given and every candidate's violation lands in
    /// `local`.
    fn match_type<'v>(
        &self,
        node: &P::Node,
        rules: &LeafSchema,
        value: Cow<'v, Value>,
        field: &str,
        strict: bool,
        local: &mut Vec<Violation>,
    ) -> (Matched, Cow<'v, Value>) {
        let mut rejected = Vec::new();
        for (position, name) in rules.types.iter().enumerate() {
            let ctx = TypeContext {
                field,
                type_name: name,
                schema: rules,
                strict,
            };
            let outcome = match self.plan.type_handler(node, position, name) {
                Some(handler) => handler.handle(&ctx, &value),
                None => TypeOutcome::reject(Violation::type_mismatch(field, name)),
            };
            if outcome.errors.is_empty() {
                let value = outcome.value.map_or(value, Cow::Owned);
                return (Matched::from_name(name), value);
            }
            rejected.extend(outcome.errors);
        }
        local.append(&mut rejected);
        (Matched::Nothing, value)
    }

    fn descend_object(
        &self,
        node: &P::Node,
        map: &Map,
        parent: &Value,
        field: &str,
        strict: bool,
        local: &mut Vec<Violation>,
    ) -> Map {
        let declared = self.plan.properties(node);
        if strict {
            for key in map.keys() {
                if !declared.iter().any(|(name, _)| *name == key.as_str()) {
                    local.push(Violation::new(child_path(field, key), tag::NOT_SPECIFIC));
                }
            }
        }

        let mut outputs: IndexMap<&str, Option<Value>> = IndexMap::with_capacity(declared.len());
        for (key, child) in &declared {
            let output = self.visit(child, map.get(*key), Some(parent), &child_path(field, key), local);
            outputs.insert(*key, output);
        }

        // Input key order first, then declared keys the input lacked.
        let mut assembled = Map::with_capacity(map.len().max(outputs.len()));
        for (key, original) in map {
            match outputs.get_mut(key.as_str()) {
                Some(output) => {
                    if let Some(value) = output.take() {
                        assembled.insert(key.clone(), value);
                    }
                }
                None if !self.options.remove_additional_field => {
                    assembled.insert(key.clone(), original.clone());
                }
                None => {}
            }
        }
        for (key, output) in outputs {
            if let Some(value) = output {
                assembled.insert(key.to_string(), value);
            }
        }
        assembled
    }

    fn descend_array(
        &self,
        node: &P::Node,
        items: &[Value],
        parent: &Value,
        field: &str,
        local: &mut Vec<Violation>,
    ) -> Vec<Value> {
        let Some(element) = self.plan.element(node) else {
            return items.to_vec();
        };
        let mut output = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let path = index_path(field, index);
            let value = self.visit(element, Some(item), Some(parent), &path, local);
            output.push(value.unwrap_or(Value::Null));
        }
        output
    }
}

/// Which kind of candidate won the type match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Matched {
    Object,
    Array,
    Scalar,
    /// No candidate accepted the value.
    Nothing,
}

impl Matched {
    fn from_name(name: &str) -> Self {
        match name {
            OBJECT => Matched::Object,
            ARRAY => Matched::Array,
            _ => Matched::Scalar,
        }
    }
}
