mod app;
mod cli;
mod config;
mod feed;
mod http;
mod logging;
mod paths;
mod watchlist;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    let _log_guard = match paths::data_dir_path().and_then(|dir| logging::init(&dir)) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("Warning: logging disabled: {err:#}");
            None
        }
    };
    app::run(cli)
}
