use std::io;

use anyhow::{Context, Result};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};

/// Raw-mode alternate screen that is restored on drop, including on panics
/// and early returns.
pub(super) struct TuiSession {
    active: bool,
}

impl TuiSession {
    pub(super) fn enter() -> Result<Self> {
        let mut session = Self { active: false };
        session.resume()?;
        Ok(session)
    }

    /// Hands the terminal back for the duration of `f`, e.g. while a
    /// downloader prints to it.
    pub(super) fn suspended<R>(&mut self, f: impl FnOnce() -> R) -> Result<R> {
        self.suspend()?;
        let out = f();
        self.resume()?;
        Ok(out)
    }

    fn suspend(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        disable_raw_mode().context("failed to disable raw mode")?;
        execute!(io::stdout(), LeaveAlternateScreen).context("failed to leave alternate screen")?;
        self.active = false;
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        if self.active {
            return Ok(());
        }
        execute!(io::stdout(), EnterAlternateScreen).context("failed to enter alternate screen")?;
        enable_raw_mode().context("failed to enable raw mode")?;
        self.active = true;
        Ok(())
    }

    pub(super) fn leave(mut self) -> Result<()> {
        self.suspend()
    }
}

impl Drop for TuiSession {
    fn drop(&mut self) {
        if self.active {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}
