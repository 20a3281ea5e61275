use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod sync;

#[derive(Debug, Parser)]
#[command(name = "creatives")]
#[command(about = "Creative performance aggregation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch the performance sheet and aggregate grouped creatives.
    Sync {
        /// Write the full JSON report here instead of printing a summary.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Limit the printed summary to the first N creatives.
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Sync, then additionally build the ad-set grouping index.
    Adsets {
        /// Write the full JSON report here instead of printing a summary.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = creatives_core::load_app_config()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Sync { out, limit } => sync::run_sync(&config, out.as_deref(), limit).await,
        Commands::Adsets { out } => sync::run_adsets(&config, out.as_deref()).await,
    }
}
