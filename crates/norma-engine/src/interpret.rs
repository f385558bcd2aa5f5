//! # Interpreter
//!
//! Plans directly from a [`SchemaNode`] tree, looking handlers up by name
//! on every visit. Used for schemas stored with
//! [`crate::Engine::define_schema`] and for ad hoc validation.

use std::borrow::Cow;

use norma_core::{Value, Violation};
use norma_schema::{CheckContext, CheckSpec, LeafSchema, SchemaNode, TransformContext, TransformSpec};

use crate::handler::TypeHandler;
use crate::options::{ValidateOptions, Validated};
use crate::registry::Registries;
use crate::traverse::{Plan, Traversal};

/// Tree-walking validator over one set of registries.
#[derive(Debug, Clone, Copy)]
pub struct Interpreter<'r> {
    registries: &'r Registries,
}

impl<'r> Interpreter<'r> {
    pub fn new(registries: &'r Registries) -> Self {
        Self { registries }
    }

    /// Validate `input` against `schema`. The schema is expected to have
    /// passed assertion against the same registries; a type name that is
    /// not registered rejects every value, unknown checks and transforms
    /// are skipped.
    pub fn run(
        &self,
        schema: &SchemaNode,
        input: Option<&Value>,
        options: &ValidateOptions,
    ) -> Validated {
        Traversal::run(self, schema, input, options)
    }
}

impl Plan for Interpreter<'_> {
    type Node = SchemaNode;

    fn rules<'s>(&'s self, node: &'s SchemaNode) -> Cow<'s, LeafSchema> {
        node.rules()
    }

    fn type_handler(&self, _node: &SchemaNode, _position: usize, name: &str) -> Option<&dyn TypeHandler> {
        self.registries.types.get(name).map(|handler| &**handler)
    }

    fn properties<'s>(&'s self, node: &'s SchemaNode) -> Vec<(&'s str, &'s SchemaNode)> {
        node.properties()
            .map(|properties| properties.iter().map(|(key, child)| (key.as_str(), child)).collect())
            .unwrap_or_default()
    }

    fn element<'s>(&'s self, node: &'s SchemaNode) -> Option<&'s SchemaNode> {
        node.element()
    }

    fn check(&self, _node: &SchemaNode, ctx: &CheckContext<'_>, value: &Value) -> Vec<Violation> {
        match &ctx.schema.check {
            None => Vec::new(),
            Some(CheckSpec::Callback(f)) => f(ctx, value),
            Some(CheckSpec::Named(checks)) => checks
                .iter()
                .filter_map(|(name, param)| {
                    self.registries
                        .checks
                        .get(name)
                        .map(|handler| handler.check(ctx, value, param))
                })
                .flatten()
                .collect(),
        }
    }

    fn transform(&self, _node: &SchemaNode, ctx: &TransformContext<'_>, value: Value) -> Value {
        match &ctx.schema.to {
            None => value,
            Some(TransformSpec::Callback(f)) => f(ctx, value),
            Some(TransformSpec::Named(names)) => names.iter().fold(value, |value, name| {
                match self.registries.transforms.get(name) {
                    Some(handler) => handler.apply(ctx, value),
                    None => value,
                }
            }),
        }
    }
}
