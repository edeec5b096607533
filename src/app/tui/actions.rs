use anyhow::Result;
use ratatui::widgets::TableState;

use super::super::state::AppState;
use super::{Pane, PendingRemove};

pub(super) fn status_info(msg: &str) -> String {
    format!("INFO: {msg}")
}

pub(super) fn status_error(msg: &str) -> String {
    format!("ERROR: {msg}")
}

/// Keeps a selection inside `len` rows, selecting the first row when
/// something appears and nothing when the table empties.
pub(super) fn clamp_selection(table_state: &mut TableState, len: usize) {
    if len == 0 {
        table_state.select(None);
        return;
    }
    match table_state.selected() {
        Some(selected) => table_state.select(Some(selected.min(len - 1))),
        None => table_state.select(Some(0)),
    }
}

pub(super) fn move_selection(table_state: &mut TableState, len: usize, down: bool) {
    let Some(selected) = table_state.selected() else {
        clamp_selection(table_state, len);
        return;
    };
    let next = if down {
        (selected + 1).min(len.saturating_sub(1))
    } else {
        selected.saturating_sub(1)
    };
    table_state.select(Some(next));
}

fn saved(state: &AppState, message: String) -> String {
    match state.save() {
        Ok(()) => status_info(&message),
        Err(err) => status_error(&format!("{message}, but {err:#}")),
    }
}

pub(super) fn refresh(state: &mut AppState) -> String {
    let warnings = state.refresh();
    if warnings.is_empty() {
        status_info(&format!("Feed refreshed: {} releases.", state.releases().len()))
    } else {
        status_error(&format!("Refresh: {}", warnings.join(" | ")))
    }
}

pub(super) fn add_release(state: &mut AppState, index: usize) -> String {
    let (added, warnings) = state.add(&[index.to_string()]);
    if let Some(warning) = warnings.first() {
        return status_error(warning);
    }
    match added.first() {
        Some(series) => saved(state, format!("Added \"{series}\" to the watchlist")),
        None => status_info("Nothing added."),
    }
}

pub(super) fn confirm_remove(state: &mut AppState, pending: &PendingRemove) -> String {
    match state.remove(&[pending.index.to_string()]) {
        Ok(_) => saved(state, format!("Removed \"{}\" from the watchlist", pending.series)),
        Err(err) => status_error(&format!("{err:#}")),
    }
}

pub(super) fn download(state: &mut AppState, focus: Pane, index: usize) -> Result<String> {
    let message = match focus {
        Pane::Releases => state.download_release(index)?,
        Pane::Watchlist => state.download_entry(index)?,
    };
    Ok(saved(state, message))
}
