mod display;
mod download;
mod state;
mod tui;


use anyhow::Result;

use crate::cli::{Cli, Command};
use crate::config::Config;

use self::display::{release_line, rows_json, watch_line};
use self::state::AppState;

const TITLE_WIDTH: usize = 70;
const SERIES_WIDTH: usize = 50;

pub fn run(cli: Cli) -> Result<()> {
    let config = Config::resolve(&cli)?;
    let mut state = AppState::open(config)?;
    emit_warnings(&state.refresh());

    match cli.command {
        Some(Command::Releases) => run_releases(&state),
        Some(Command::Add { indices }) => run_add(&mut state, &indices)?,
        Some(Command::Remove { indices }) => run_remove(&mut state, &indices)?,
        Some(Command::List { json }) => run_list(&state, json)?,
        Some(Command::Download { index }) => run_download(&mut state, index)?,
        Some(Command::Get { index }) => run_get(&mut state, index)?,
        Some(Command::Tui) | None => tui::run_tui(&mut state)?,
    }

    Ok(())
}

fn emit_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("Warning: {warning}");
    }
}

fn run_releases(state: &AppState) {
    if state.releases().is_empty() {
        println!("No releases in the feed.");
        return;
    }
    for (index, release) in state.releases().iter().enumerate() {
        println!("{}", release_line(index, release, TITLE_WIDTH));
    }
}

fn run_add(state: &mut AppState, indices: &[String]) -> Result<()> {
    let (added, warnings) = state.add(indices);
    emit_warnings(&warnings);
    for series in &added {
        println!("Added to watchlist: {series}");
    }
    state.save()
}

fn run_remove(state: &mut AppState, indices: &[String]) -> Result<()> {
    let removed = state.remove(indices)?;
    for series in &removed {
        println!("Removed from watchlist: {series}");
    }
    if state.watchlist().is_empty() {
        println!("Watchlist is now empty.");
    }
    state.save()
}

fn run_list(state: &AppState, json: bool) -> Result<()> {
    let rows = state.rows();
    if json {
        println!("{}", serde_json::to_string_pretty(&rows_json(&rows))?);
        return Ok(());
    }
    if rows.is_empty() {
        println!("There is no anime in the watchlist. Run `subwatch add <index>` first.");
        return Ok(());
    }

    println!(
        "{:>3} {:<width$} {:<6} {:<18} {}",
        "#",
        "SERIES",
        "EP",
        "STATUS",
        "NEXT RELEASE",
        width = SERIES_WIDTH,
    );
    for row in &rows {
        println!("{}", watch_line(row, SERIES_WIDTH));
    }
    Ok(())
}

fn run_download(state: &mut AppState, index: usize) -> Result<()> {
    let message = state.download_entry(index)?;
    println!("{message}");
    state.save()
}

fn run_get(state: &mut AppState, index: usize) -> Result<()> {
    let message = state.download_release(index)?;
    println!("{message}");
    state.save()
}
