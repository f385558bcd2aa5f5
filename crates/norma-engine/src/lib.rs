//! # norma-engine: Validation and Normalization Engine
//!
//! Given a schema tree and an input value, verifies shape and type, applies
//! default, nullability and enum rules, runs constraint checks, applies
//! transforms, and returns the normalized output together with every
//! violation found. Ordinary invalid input never produces an `Err`.
//!
//! ## Usage
//!
//! ```
//! use norma_core::Value;
//! use norma_engine::{Engine, ValidateOptions};
//! use norma_schema::{LeafSchema, SchemaNode};
//!
//! let mut engine = Engine::new();
//! engine
//!     .compile(
//!         "signup",
//!         SchemaNode::object([
//!             ("email", LeafSchema::new("string").require().to("trim,lowercase").into()),
//!             ("age", LeafSchema::new("number").check("min", 18).into()),
//!         ]),
//!     )
//!     .unwrap();
//!
//! let input = Value::from(serde_json::json!({"email": " Ada@Example.org ", "age": "17"}));
//! let validated = engine
//!     .validate("signup", Some(&input), &ValidateOptions::default())
//!     .unwrap();
//! assert_eq!(validated.errors.len(), 1);
//! assert_eq!(validated.errors[0].field, "age");
//! ```
//!
//! ## Layout
//!
//! - [`handler`], [`registry`], [`builtin`]: the plugin surface.
//! - [`assert`]: definition-time schema checks.
//! - [`traverse`]: the recursive algorithm, shared by [`interpret`] and
//!   [`compile`].
//! - [`engine`]: the context that ties registries and stored schemas
//!   together; [`global`] is a process-wide instance of it.
//!
//! ## Crate Policy
//!
//! - No file or network I/O.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod assert;
pub mod builtin;
pub mod compile;
pub mod engine;
pub mod global;
pub mod handler;
pub mod interpret;
pub mod options;
pub mod registry;
pub mod traverse;

pub use assert::assert_schema;
pub use compile::Program;
pub use engine::Engine;
pub use handler::{
    CheckHandler, FnCheck, FnTransform, FnType, PredicateCheck, PredicateType, TransformHandler,
    TypeContext, TypeHandler, TypeOutcome,
};
pub use interpret::Interpreter;
pub use options::{ValidateOptions, Validated};
pub use registry::{Registries, Registry};
