use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "jobscout")]
#[command(about = "JobScout CLI - chat with the job-application assistant", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat session against the configured backend
    Chat {
        /// Backend base URL (overrides the config file and environment)
        #[arg(long)]
        backend: Option<String>,
        /// User identifier the session is keyed by
        #[arg(long)]
        user: Option<String>,
        /// Path to a profile JSON document sent along with every turn
        #[arg(long)]
        profile: Option<PathBuf>,
    },
    /// Print the current applied/rejected jobs snapshot
    Jobs {
        /// Backend base URL (overrides the config file and environment)
        #[arg(long)]
        backend: Option<String>,
        /// User identifier to fetch the snapshot for
        #[arg(long)]
        user: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    jobscout_engine::init_logging();

    let cli = Cli::parse();
    match cli.command {
        Commands::Chat {
            backend,
            user,
            profile,
        } => commands::chat::run(backend, user, profile).await,
        Commands::Jobs { backend, user } => commands::jobs::run(backend, user).await,
    }
}
