//! # Engine
//!
//! An explicitly constructed validation context: its own handler
//! registries plus a store of asserted schemas keyed by identifier.
//! Independent engines share nothing, so tests and embedders can run
//! several side by side. [`crate::global`] wraps one default instance.
//!
//! ## Definition modes
//!
//! - [`Engine::define_schema`] stores the asserted tree; validation walks
//!   it through the [`Interpreter`].
//! - [`Engine::compile`] additionally lowers it into a [`Program`];
//!   validation runs the program.
//!
//! Both modes produce the same `{output, errors}` for the same input.

use std::collections::HashMap;
use std::sync::Arc;

use norma_core::{DefinitionError, EngineError, Value};
use norma_schema::SchemaNode;

use crate::assert::assert_schema;
use crate::compile::Program;
use crate::handler::{CheckHandler, TransformHandler, TypeHandler};
use crate::interpret::Interpreter;
use crate::options::{ValidateOptions, Validated};
use crate::registry::Registries;

#[derive(Debug)]
struct StoredSchema {
    /// The asserted tree with every shorthand node lowered.
    root: SchemaNode,
    program: Option<Program>,
}

/// Registries and stored schemas for one validation context.
#[derive(Debug, Default)]
pub struct Engine {
    registries: Registries,
    schemas: HashMap<String, StoredSchema>,
}

impl Engine {
    /// An engine with the built-in handlers registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine with no handlers at all, not even `object` and `array`.
    pub fn empty() -> Self {
        Self {
            registries: Registries::empty(),
            schemas: HashMap::new(),
        }
    }

    pub fn registries(&self) -> &Registries {
        &self.registries
    }

    // ─── Extension Points ────────────────────────────────────────────

    /// Register a type handler. An existing handler of the same name is
    /// replaced with a warning.
    pub fn register_type(&mut self, name: &str, handler: impl TypeHandler + 'static) {
        self.registries.types.add(name, Arc::new(handler));
    }

    pub fn register_check(&mut self, name: &str, handler: impl CheckHandler + 'static) {
        self.registries.checks.add(name, Arc::new(handler));
    }

    pub fn register_transform(&mut self, name: &str, handler: impl TransformHandler + 'static) {
        self.registries.transforms.add(name, Arc::new(handler));
    }

    // ─── Schema Store ────────────────────────────────────────────────

    /// Assert `schema` against this engine's registries without storing it.
    pub fn assert_schema(&self, schema: &SchemaNode) -> Result<(), DefinitionError> {
        assert_schema(&self.registries, schema)
    }

    /// Assert and store `schema` under `id` for interpreted validation.
    pub fn define_schema(&mut self, id: &str, schema: SchemaNode) -> Result<(), DefinitionError> {
        self.store(id, schema, false)
    }

    /// Assert, lower and store `schema` under `id` for compiled validation.
    pub fn compile(&mut self, id: &str, schema: SchemaNode) -> Result<(), DefinitionError> {
        self.store(id, schema, true)
    }

    fn store(&mut self, id: &str, schema: SchemaNode, compiled: bool) -> Result<(), DefinitionError> {
        if self.schemas.contains_key(id) {
            return Err(DefinitionError::DuplicateSchema { id: id.to_string() });
        }
        assert_schema(&self.registries, &schema)?;
        let root = schema.normalize();
        let program = if compiled {
            Some(Program::compile(&self.registries, &root)?)
        } else {
            None
        };
        tracing::debug!(id, nodes = root.node_count(), compiled, "schema defined");
        self.schemas
            .insert(id.to_string(), StoredSchema { root, program });
        Ok(())
    }

    pub fn is_defined(&self, id: &str) -> bool {
        self.schemas.contains_key(id)
    }

    /// Identifiers of the stored schemas, sorted.
    pub fn schema_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Drop the schema stored under `id`. Returns whether one was stored.
    pub fn discard(&mut self, id: &str) -> bool {
        let removed = self.schemas.remove(id).is_some();
        if removed {
            tracing::debug!(id, "schema discarded");
        }
        removed
    }

    /// The compiled program stored under `id`, if it was compiled.
    pub fn program(&self, id: &str) -> Option<&Program> {
        self.schemas.get(id).and_then(|stored| stored.program.as_ref())
    }

    // ─── Validation ──────────────────────────────────────────────────

    /// Validate `input` against the schema stored under `id`.
    ///
    /// Violations are returned as data unless `options.is_throw_error` is
    /// set, in which case a non-empty list becomes
    /// [`EngineError::ValidationFailed`].
    pub fn validate(
        &self,
        id: &str,
        input: Option<&Value>,
        options: &ValidateOptions,
    ) -> Result<Validated, EngineError> {
        let stored = self
            .schemas
            .get(id)
            .ok_or_else(|| EngineError::UnknownSchema { id: id.to_string() })?;
        let validated = match &stored.program {
            Some(program) => program.run(input, options),
            None => Interpreter::new(&self.registries).run(&stored.root, input, options),
        };
        finish(validated, options)
    }

    /// Assert `schema`, then validate `input` against it without storing
    /// anything.
    pub fn validate_schema(
        &self,
        schema: &SchemaNode,
        input: Option<&Value>,
        options: &ValidateOptions,
    ) -> Result<Validated, EngineError> {
        self.assert_schema(schema)?;
        finish(Interpreter::new(&self.registries).run(schema, input, options), options)
    }

    /// Validate and return only the output, failing on any violation.
    pub fn assert_validate(
        &self,
        id: &str,
        input: Option<&Value>,
        options: &ValidateOptions,
    ) -> Result<Option<Value>, EngineError> {
        let options = options.throw_on_error(true);
        self.validate(id, input, &options).map(|validated| validated.output)
    }
}

fn finish(validated: Validated, options: &ValidateOptions) -> Result<Validated, EngineError> {
    if options.is_throw_error && !validated.errors.is_empty() {
        return Err(EngineError::ValidationFailed {
            violations: validated.errors.into(),
        });
    }
    Ok(validated)
}
