//! # norma CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules. Exits with
//! status 1 when an input or schema is invalid.

use std::process::ExitCode;

use clap::Parser;

/// Declarative validation and normalization of JSON/YAML documents.
#[derive(Parser, Debug)]
#[command(name = "norma", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Validate a document against a schema.
    Validate(norma_cli::validate::ValidateArgs),
    /// Check schema documents without validating input.
    CheckSchema(norma_cli::check::CheckSchemaArgs),
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();

    let ok = match &cli.command {
        Commands::Validate(args) => norma_cli::validate::run(args, &mut stdout)?,
        Commands::CheckSchema(args) => norma_cli::check::run(args, &mut stdout)?,
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
