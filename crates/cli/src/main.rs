//! anchorwall CLI: the main entry point.
//!
//! Commands:
//! - `onboard`: Write a default config and create data directories
//! - `match`: Run one matching pass
//! - `watch`: Poll for content and match until Ctrl-C
//! - `anchors`: List, place and remove anchors
//! - `status`: Show configuration and stored state

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "anchorwall",
    about = "anchorwall — tag-driven photo placement on spatial anchors",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration and data directories
    Onboard,

    /// Run one matching pass over the current content and anchors
    Match,

    /// Re-run matching on an interval, prioritizing newly arrived content
    Watch {
        /// Override the poll interval in seconds
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Manage anchors
    Anchors {
        #[command(subcommand)]
        action: AnchorAction,
    },

    /// Show configuration and stored state
    Status,
}

#[derive(Subcommand)]
enum AnchorAction {
    /// List anchors in placement order
    List,

    /// Place a new anchor, e.g. `forest_horizontal`
    Place {
        name: String,

        /// Place a preview object instead of a real anchor
        #[arg(long)]
        preview: bool,
    },

    /// Remove the most recently placed anchor
    RemoveLast,

    /// Remove every anchor
    Clear,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Match => commands::match_cmd::run().await?,
        Commands::Watch { interval } => commands::watch::run(interval).await?,
        Commands::Anchors { action } => match action {
            AnchorAction::List => commands::anchors::list().await?,
            AnchorAction::Place { name, preview } => commands::anchors::place(&name, preview).await?,
            AnchorAction::RemoveLast => commands::anchors::remove_last().await?,
            AnchorAction::Clear => commands::anchors::clear().await?,
        },
        Commands::Status => commands::status::run().await?,
    }

    Ok(())
}
