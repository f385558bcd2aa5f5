//! # Validate Subcommand
//!
//! Validates one input document against one schema document and prints
//! `{output, errors}` as JSON on stdout.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use norma_core::Value;
use norma_engine::{Engine, ValidateOptions, Validated};
use norma_schema::SchemaNode;

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema document (JSON or YAML).
    #[arg(long, short)]
    pub schema: PathBuf,

    /// Input document, or `-` for standard input.
    #[arg(long, short)]
    pub input: PathBuf,

    /// Options document; flags below override it.
    #[arg(long)]
    pub options: Option<PathBuf>,

    /// Disable coercion and reject undeclared object keys.
    #[arg(long)]
    pub strict: bool,

    /// Keep undeclared object keys in the output.
    #[arg(long)]
    pub keep_additional_fields: bool,

    /// Fail with the violation list instead of printing it.
    #[arg(long)]
    pub throw: bool,

    /// Run the schema as a compiled program.
    #[arg(long)]
    pub compile: bool,

    /// Print compact JSON.
    #[arg(long)]
    pub compact: bool,
}

impl ValidateArgs {
    /// Options document first, then flags.
    pub fn resolve_options(&self) -> anyhow::Result<ValidateOptions> {
        let mut options = match &self.options {
            Some(path) => {
                let document = crate::load::read_document(path)?;
                serde_json::from_value(document)
                    .with_context(|| format!("invalid options in {}", path.display()))?
            }
            None => ValidateOptions::default(),
        };
        if self.strict {
            options.strict = true;
        }
        if self.keep_additional_fields {
            options.remove_additional_field = false;
        }
        if self.throw {
            options.is_throw_error = true;
        }
        Ok(options)
    }
}

/// Run the subcommand, writing the result to `out`. Returns whether the
/// input was valid.
pub fn run(args: &ValidateArgs, out: &mut impl Write) -> anyhow::Result<bool> {
    let options = args.resolve_options()?;
    let schema = load_schema(&args.schema)?;
    let input = Value::from(crate::load::read_document(&args.input)?);

    let id = schema_id(&args.schema);
    let mut engine = Engine::new();
    let defined = if args.compile {
        engine.compile(&id, schema)
    } else {
        engine.define_schema(&id, schema)
    };
    defined.with_context(|| format!("invalid schema {}", args.schema.display()))?;

    let validated = engine.validate(&id, Some(&input), &options)?;
    tracing::info!(
        schema = %id,
        violations = validated.errors.len(),
        compiled = args.compile,
        "validated"
    );
    write_result(&validated, args.compact, out)?;
    Ok(validated.is_valid())
}

/// Read and parse a schema document.
pub fn load_schema(path: &Path) -> anyhow::Result<SchemaNode> {
    let document = crate::load::read_document(path)?;
    SchemaNode::from_json(&document).with_context(|| format!("invalid schema {}", path.display()))
}

/// Identifier a schema file is stored under: its file stem.
pub fn schema_id(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "schema".to_string())
}

fn write_result(validated: &Validated, compact: bool, out: &mut impl Write) -> anyhow::Result<()> {
    if compact {
        serde_json::to_writer(&mut *out, validated)?;
    } else {
        serde_json::to_writer_pretty(&mut *out, validated)?;
    }
    writeln!(out)?;
    Ok(())
}
