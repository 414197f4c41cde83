//! prdgen CLI - Convert TDD implementation plans into PRDs
//!
//! Produces CCPM-compatible PRDs that the `/pm:*` commands turn into issues.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use prdgen_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{BatchArgs, ConvertArgs, InspectArgs};

/// prdgen: Convert TDD implementation plans into PRDs
#[derive(Parser, Debug)]
#[command(name = "prdgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory PRDs are written to (overrides config and env)
    #[arg(long, global = true, env = "PRDGEN_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Convert a plan into a PRD
    #[command(visible_alias = "c")]
    Convert(ConvertArgs),

    /// Show the parsed structure of a plan
    Inspect(InspectArgs),

    /// Convert every plan in a directory
    Batch(BatchArgs),

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    // Load configuration with overrides
    let config = Config::load_with_overrides(cli.output_dir.clone())?;

    if cli.verbose {
        tracing::info!(
            output_dir = %config.output.dir.display(),
            labels = ?config.render.labels,
            "Configuration loaded"
        );
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("prdgen {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Convert(args)) => {
            args.execute(cli.verbose, &config).await?;
        }
        Some(Commands::Inspect(args)) => {
            args.execute(cli.verbose).await?;
        }
        Some(Commands::Batch(args)) => {
            args.execute(cli.verbose, &config).await?;
        }
        Some(Commands::Config) => {
            println!("prdgen Configuration");
            println!("====================");
            println!();
            println!("Output Settings:");
            println!("  dir: {}", config.output.dir.display());
            println!();
            println!("Render Settings:");
            println!("  labels: {}", config.render.labels.join(", "));
            println!();
            if let Some(path) = Config::default_config_path() {
                println!("Config file: {}", path.display());
                if path.exists() {
                    println!("  (exists)");
                } else {
                    println!("  (not found - using defaults)");
                }
            }
        }
        None => {
            println!("prdgen - Convert TDD implementation plans into PRDs");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}
