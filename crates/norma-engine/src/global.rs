//! # Default Engine
//!
//! A process-wide [`Engine`] for hosts that want one shared context
//! instead of passing an engine around. Created with the built-in handlers
//! on first use.
//!
//! Validation takes a read lock, so concurrent validation calls proceed in
//! parallel. Registration and definition take the write lock.
//!
//! ## Re-entrancy
//!
//! Schema callbacks and handlers run while the read lock is held. They must
//! not call the registration or definition functions of this module: the
//! write lock would wait on the read lock its own caller holds, and the
//! thread deadlocks. Register everything before validating, or use an
//! explicit [`Engine`] when callbacks need to extend it.

use std::sync::OnceLock;

use norma_core::{DefinitionError, EngineError, Value};
use norma_schema::SchemaNode;
use parking_lot::RwLock;

use crate::engine::Engine;
use crate::handler::{CheckHandler, TransformHandler, TypeHandler};
use crate::options::{ValidateOptions, Validated};

static DEFAULT_ENGINE: OnceLock<RwLock<Engine>> = OnceLock::new();

/// The shared engine.
pub fn engine() -> &'static RwLock<Engine> {
    DEFAULT_ENGINE.get_or_init(|| RwLock::new(Engine::new()))
}

pub fn register_type(name: &str, handler: impl TypeHandler + 'static) {
    engine().write().register_type(name, handler);
}

pub fn register_check(name: &str, handler: impl CheckHandler + 'static) {
    engine().write().register_check(name, handler);
}

pub fn register_transform(name: &str, handler: impl TransformHandler + 'static) {
    engine().write().register_transform(name, handler);
}

pub fn define_schema(id: &str, schema: SchemaNode) -> Result<(), DefinitionError> {
    engine().write().define_schema(id, schema)
}

pub fn compile(id: &str, schema: SchemaNode) -> Result<(), DefinitionError> {
    engine().write().compile(id, schema)
}

pub fn discard(id: &str) -> bool {
    engine().write().discard(id)
}

pub fn validate(
    id: &str,
    input: Option<&Value>,
    options: &ValidateOptions,
) -> Result<Validated, EngineError> {
    engine().read().validate(id, input, options)
}

/// Assert `schema` against the shared engine's handlers, then validate
/// `input` against it without storing anything.
pub fn validate_schema(
    schema: &SchemaNode,
    input: Option<&Value>,
    options: &ValidateOptions,
) -> Result<Validated, EngineError> {
    engine().read().validate_schema(schema, input, options)
}

pub fn assert_validate(
    id: &str,
    input: Option<&Value>,
    options: &ValidateOptions,
) -> Result<Option<Value>, EngineError> {
    engine().read().assert_validate(id, input, options)
}
