use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

// Import the library
use vast_builder::async_api;
use vast_builder::Result;

/// VAST document builder
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a VAST document from a JSON manifest
    Build {
        /// Path to the JSON manifest
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (if not specified, prints to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Disable indentation
        #[arg(short, long)]
        compact: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the document
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Build { input, output, compact } => {
            let manifest = tokio::fs::read_to_string(input).await?;
            info!("Read manifest from {}", input.display());

            let xml = if *compact {
                async_api::render_manifest_compact(&manifest).await?
            } else {
                async_api::render_manifest(&manifest).await?
            };

            if let Some(output_path) = output {
                tokio::fs::write(output_path, &xml).await?;
                info!("VAST written to {}", output_path.display());
            } else {
                println!("{}", xml);
            }
        }
    }

    Ok(())
}
