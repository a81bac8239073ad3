//! Main entry point for the chemxref application.

// #![deny(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
// #![warn(missing_docs)]

use clap::{Parser, Subcommand};

pub mod common;
pub mod download;
pub mod mapping;

/// CLI parser based on clap.
#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "chemxref - CAS to ChEBI cross-referencing",
    long_about = "This tool derives CAS to ChEBI identifier mappings from the PubChem synonym corpus"
)]
struct Cli {
    /// Commonly used arguments
    #[command(flatten)]
    common: common::Args,

    /// The sub command to run
    #[command(subcommand)]
    command: Commands,
}

/// Enum supporting the parsing of top-level commands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Mapping derivation related commands.
    Mapping(mapping::Args),
    /// Corpus download related commands.
    Download(download::Args),
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Build a tracing subscriber according to the configuration in `cli.common`.
    let collector = tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_max_level(match cli.common.verbose.log_level() {
            Some(level) => match level {
                log::Level::Error => tracing::Level::ERROR,
                log::Level::Warn => tracing::Level::WARN,
                log::Level::Info => tracing::Level::INFO,
                log::Level::Debug => tracing::Level::DEBUG,
                log::Level::Trace => tracing::Level::TRACE,
            },
            None => tracing::Level::INFO,
        })
        .compact()
        .finish();
    tracing::subscriber::set_global_default(collector)?;

    tracing::info!("Starting chemxref -- bridging your identifier namespaces...");

    match &cli.command {
        Commands::Mapping(args) => mapping::run(&cli.common, args)?,
        Commands::Download(args) => download::run(&cli.common, args).await?,
    }

    tracing::info!("All done. Have a nice day!");

    Ok(())
}
