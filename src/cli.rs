use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "subwatch",
    version,
    about = "Track subscribed anime series against a release feed"
)]
pub struct Cli {
    /// Feed URL or path to a local RSS file
    #[arg(long, global = true)]
    pub feed: Option<String>,

    /// Watchlist file to use instead of the default data directory
    #[arg(long, global = true)]
    pub watchlist: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the feed and list releases by index
    Releases,
    /// Subscribe to the series of the given release indices
    Add {
        #[arg(required = true)]
        indices: Vec<String>,
    },
    /// Remove watchlist entries by index (all or nothing)
    Remove {
        #[arg(required = true)]
        indices: Vec<String>,
    },
    /// Show the watchlist in scheduled order
    List {
        #[arg(long)]
        json: bool,
    },
    /// Download the latest episode of a watchlist entry
    Download { index: usize },
    /// Download a release by feed index
    Get { index: usize },
    /// Open the interactive dashboard (default)
    Tui,
}
