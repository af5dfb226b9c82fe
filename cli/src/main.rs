#![deny(missing_docs)]

//! # Endpoint Doc CLI
//!
//! Command Line Interface for the endpoint document translator.
//!
//! Supported Commands:
//! - `generate`: Descriptors -> Swagger 2.0 document (JSON or YAML).

use clap::{Parser, Subcommand};
use endpoint_doc_core::AppResult;
use tracing_subscriber::EnvFilter;

mod generate;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Endpoint descriptor to API document translator")]
struct Cli {
    /// Log filter used when `RUST_LOG` is unset.
    #[clap(long, global = true, default_value = "info")]
    log_level: String,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate endpoint descriptors into an API document.
    Generate(generate::GenerateArgs),
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // Logs go to stderr so stdout stays clean for the document
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match &cli.command {
        Commands::Generate(args) => generate::execute(args)?,
    }

    Ok(())
}
