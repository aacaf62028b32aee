//! Folio CLI - documentation site tooling.
//!
//! Provides commands for:
//! - `serve`: Start the documentation server
//! - `generate-meta`: Write `meta.json` files from `docs.json`
//! - `generate-openapi`: Write API reference pages from `OpenAPI` documents
//! - `export`: Write every page as static HTML and markdown

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ExportArgs, GenerateMetaArgs, GenerateOpenApiArgs, ServeArgs};
use output::Output;

/// Application version from Cargo.toml.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Folio - documentation site tooling.
#[derive(Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the documentation server.
    Serve(ServeArgs),
    /// Generate folder `meta.json` files from the navigation document.
    GenerateMeta(GenerateMetaArgs),
    /// Generate API reference pages from `OpenAPI` documents.
    #[command(name = "generate-openapi")]
    GenerateOpenApi(GenerateOpenApiArgs),
    /// Export all pages as static files.
    Export(ExportArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = matches!(&cli.command, Commands::Serve(args) if args.verbose);

    // --verbose enables INFO level, otherwise use RUST_LOG
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Serve(args) => {
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            rt.block_on(args.execute(VERSION))
        }
        Commands::GenerateMeta(args) => args.execute(),
        Commands::GenerateOpenApi(args) => {
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            rt.block_on(args.execute())
        }
        Commands::Export(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
