//! # Check-Schema Subcommand
//!
//! Parses schema documents and asserts them against the built-in handlers
//! without validating any input. Prints one report line per schema.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use norma_engine::{Engine, Program};
use serde::Serialize;

use crate::validate::{load_schema, schema_id};

/// Arguments for the check-schema subcommand.
#[derive(Args, Debug)]
pub struct CheckSchemaArgs {
    /// Schema documents (JSON or YAML).
    #[arg(required = true)]
    pub schemas: Vec<PathBuf>,
}

/// Outcome of checking one schema document.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SchemaReport {
    pub id: String,
    pub path: String,
    pub ok: bool,
    /// Node count of a valid schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Check every schema, writing one JSON report per line. Returns whether
/// all of them passed.
pub fn run(args: &CheckSchemaArgs, out: &mut impl Write) -> anyhow::Result<bool> {
    let engine = Engine::new();
    let mut all_ok = true;
    for path in &args.schemas {
        let report = check_one(&engine, path);
        if !report.ok {
            tracing::warn!(path = %report.path, error = ?report.error, "schema rejected");
            all_ok = false;
        }
        serde_json::to_writer(&mut *out, &report)?;
        writeln!(out)?;
    }
    Ok(all_ok)
}

fn check_one(engine: &Engine, path: &Path) -> SchemaReport {
    let id = schema_id(path);
    let checked = load_schema(path).and_then(|schema| {
        engine.assert_schema(&schema)?;
        let program = Program::compile(engine.registries(), &schema.normalize())?;
        Ok(program.len())
    });
    let path = path.display().to_string();
    match checked {
        Ok(nodes) => SchemaReport {
            id,
            path,
            ok: true,
            nodes: Some(nodes),
            error: None,
        },
        Err(err) => SchemaReport {
            id,
            path,
            ok: false,
            nodes: None,
            error: Some(format!("{err:#}")),
        },
    }
}
