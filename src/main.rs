mod commands;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tripcal")]
#[command(about = "Convert iCal feeds into trips and sync them into remote tables")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a feed as trips with nested subevents
    Convert {
        /// Feed URL (http or https)
        url: String,

        /// Network timeout in seconds (1-60)
        #[arg(short, long)]
        timeout: Option<String>,

        /// Print JSON on a single line
        #[arg(long)]
        compact: bool,
    },
    /// Convert a feed and sync trips and events into the remote tables
    Sync {
        url: String,

        /// Network timeout in seconds (1-60)
        #[arg(short, long)]
        timeout: Option<String>,

        /// Bearer token for the table API
        #[arg(long, env = "TRIPCAL_API_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Print the sync report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            url,
            timeout,
            compact,
        } => commands::convert::run(&url, timeout.as_deref(), compact).await,
        Commands::Sync {
            url,
            timeout,
            token,
            json,
        } => commands::sync::run(&url, timeout.as_deref(), token.as_deref(), json).await,
    }
}
