//! # norma-core: Foundational Types for the norma Engine
//!
//! The leaf of the workspace DAG. Defines the value model every schema
//! operates on and the records the engine hands back.
//!
//! ## Key Design Principles
//!
//! 1. **One dynamic value type.** [`Value`] covers JSON plus dates and host
//!    functions. Absence is `Option<Value>::None`, never a variant.
//!
//! 2. **Predicates over tags.** Shape decisions go through the functions in
//!    [`predicate`]; nothing else matches on value variants to decide
//!    validity.
//!
//! 3. **Violations are data.** [`Violation`] is a plain serializable record.
//!    The only errors are definition errors and the opt-in
//!    [`EngineError::ValidationFailed`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `norma-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod coerce;
pub mod error;
pub mod predicate;
pub mod value;
pub mod violation;

pub use error::{DefinitionError, EngineError};
pub use value::{Callable, Map, Value};
pub use violation::{child_path, index_path, tag, Violation, Violations};
