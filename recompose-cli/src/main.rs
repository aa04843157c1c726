use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod client;
mod commands;

#[derive(Parser)]
#[command(name = "recompose")]
#[command(about = "Reverse-derive compose files from a running swarm", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where the snapshot comes from: the engine API by default, JSON files when
/// both paths are given.
#[derive(Args)]
struct SnapshotArgs {
    /// Read the service snapshot from a JSON file instead of the engine API
    #[arg(long, value_name = "FILE", requires = "networks_json")]
    services_json: Option<PathBuf>,

    /// Read the network snapshot from a JSON file instead of the engine API
    #[arg(long, value_name = "FILE", requires = "services_json")]
    networks_json: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive compose documents for matching stacks
    Export {
        /// Stack selector: "*" or a regex matched against stack names
        #[arg(short, long, default_value = "*")]
        stack: String,

        /// Strip the "<stack>_" prefix from managed network names
        #[arg(long)]
        strip_prefix: bool,

        /// Force an encrypted driver option onto managed networks
        #[arg(long)]
        encrypt: bool,

        /// Suppress the per-stack banner lines
        #[arg(short, long)]
        quiet: bool,

        #[command(flatten)]
        snapshot: SnapshotArgs,
    },

    /// List stacks discovered in the cluster
    Ls {
        #[command(flatten)]
        snapshot: SnapshotArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    recompose_core::observability::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export { stack, strip_prefix, encrypt, quiet, snapshot } => {
            commands::export::run(&stack, strip_prefix, encrypt, quiet, &snapshot).await?;
        }

        Commands::Ls { snapshot } => {
            commands::ls::run(&snapshot).await?;
        }
    }

    Ok(())
}
