//! # norma-schema: Schema Model
//!
//! The data shapes that describe validation rules, and the two ways to
//! produce them:
//!
//! - programmatically, through [`LeafSchema`]'s builder methods and the
//!   [`SchemaNode::object`] / [`SchemaNode::array`] shorthands: the only
//!   way to attach inline callbacks;
//! - from data, through [`SchemaNode::from_json`], for schemas stored as
//!   JSON or YAML documents.
//!
//! ## Crate Policy
//!
//! - Depends only on `norma-core` internally.
//! - Nothing here consults the handler registries. A schema that parses
//!   may still fail assertion in `norma-engine`.

pub mod context;
pub mod model;
pub mod parse;

pub use context::{CheckContext, CheckFn, DefaultContext, DefaultFn, TransformContext, TransformFn};
pub use model::{
    CheckSpec, DefaultValue, LeafSchema, Properties, SchemaNode, TransformSpec, ARRAY, OBJECT,
};
pub use parse::{element_path, LEAF_KEYS};
