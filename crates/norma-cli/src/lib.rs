//! # norma-cli: Command-Line Interface
//!
//! Validates JSON and YAML documents against schema files from the shell.
//!
//! ## Subcommands
//!
//! - `validate`: validate one input document, print `{output, errors}`
//! - `check-schema`: parse and assert schema documents
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; the subcommand modules take parsed
//!   arguments and an output sink so they can be tested without a process.
//! - All file I/O of the workspace happens here.
//! - Logs go to stderr; stdout carries only JSON.

pub mod check;
pub mod load;
pub mod validate;
