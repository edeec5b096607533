mod actions;
mod render;
mod session;

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::widgets::TableState;

use super::state::AppState;

use self::actions::{
    add_release, clamp_selection, confirm_remove, download, move_selection, refresh,
    status_error, status_info,
};
use self::render::draw_tui;
use self::session::TuiSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pane {
    Releases,
    Watchlist,
}

impl Pane {
    pub(crate) fn toggle(self) -> Self {
        match self {
            Self::Releases => Self::Watchlist,
            Self::Watchlist => Self::Releases,
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Releases => "RELEASES",
            Self::Watchlist => "WATCHLIST",
        }
    }
}

#[derive(Debug, Clone)]
pub(super) struct PendingRemove {
    pub(super) index: usize,
    pub(super) series: String,
}

pub(super) struct View {
    pub(super) focus: Pane,
    pub(super) releases: TableState,
    pub(super) watchlist: TableState,
    pub(super) status: String,
    pub(super) pending_remove: Option<PendingRemove>,
}

impl View {
    fn new(state: &AppState) -> Self {
        let mut view = Self {
            focus: Pane::Releases,
            releases: TableState::default(),
            watchlist: TableState::default(),
            status: if state.releases().is_empty() {
                status_info("No releases loaded. Press r to refresh the feed.")
            } else {
                status_info("Ready.")
            },
            pending_remove: None,
        };
        view.clamp(state);
        view
    }

    fn clamp(&mut self, state: &AppState) {
        clamp_selection(&mut self.releases, state.releases().len());
        clamp_selection(&mut self.watchlist, state.watchlist().len());
    }

    fn focused(&mut self) -> &mut TableState {
        match self.focus {
            Pane::Releases => &mut self.releases,
            Pane::Watchlist => &mut self.watchlist,
        }
    }
}

pub(crate) fn run_tui(state: &mut AppState) -> Result<()> {
    let mut session = TuiSession::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
        .context("failed to initialize terminal backend")?;
    terminal.clear()?;

    let mut view = View::new(state);

    loop {
        terminal.draw(|frame| draw_tui(frame, state, &mut view))?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if let Some(pending) = view.pending_remove.take() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    view.status = confirm_remove(state, &pending);
                    view.clamp(state);
                }
                KeyCode::Char('n') | KeyCode::Esc => {
                    view.status = status_info("Removal canceled.");
                }
                _ => view.pending_remove = Some(pending),
            }
            continue;
        }

        match key.code {
            KeyCode::Char('q') => break,
            KeyCode::Tab => view.focus = view.focus.toggle(),
            KeyCode::Up | KeyCode::Down => {
                let len = match view.focus {
                    Pane::Releases => state.releases().len(),
                    Pane::Watchlist => state.watchlist().len(),
                };
                move_selection(view.focused(), len, key.code == KeyCode::Down);
            }
            KeyCode::Char('r') => {
                view.status = refresh(state);
                view.clamp(state);
            }
            KeyCode::Char('a') => {
                let Some(selected) = view.releases.selected() else {
                    view.status = status_error("Add failed: no release selected.");
                    continue;
                };
                view.status = add_release(state, selected);
                view.clamp(state);
            }
            KeyCode::Char('d') => {
                let selected = view.watchlist.selected();
                match selected.and_then(|idx| state.watchlist().get(idx).map(|e| (idx, e))) {
                    Some((index, entry)) => {
                        view.pending_remove = Some(PendingRemove {
                            index,
                            series: entry.series.clone(),
                        });
                        view.status =
                            status_info("Confirm removal: y/Enter to remove, n/Esc to cancel.");
                    }
                    None => {
                        view.status = status_error("Remove failed: no watchlist entry selected.");
                    }
                }
            }
            KeyCode::Enter => {
                let focus = view.focus;
                let Some(selected) = view.focused().selected() else {
                    continue;
                };
                let result = session.suspended(|| download(state, focus, selected))?;
                terminal.clear()?;
                view.status = match result {
                    Ok(message) => message,
                    Err(err) => status_error(&format!("Download failed: {err:#}")),
                };
                view.clamp(state);
            }
            _ => {}
        }
    }

    terminal.show_cursor()?;
    session.leave()?;
    Ok(())
}
