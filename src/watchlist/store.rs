use std::collections::HashSet;

use tracing::{debug, info};

use super::schedule::schedule_order;
use super::{DELIMITER, WatchEntry, WatchlistError};

/// Subscribed series, always held in scheduled order after a mutation.
#[derive(Debug, Clone, Default)]
pub(crate) struct Watchlist {
    entries: Vec<WatchEntry>,
}

impl Watchlist {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Builds a store from already-validated entries (e.g. a decoded file).
    pub(crate) fn from_entries(entries: Vec<WatchEntry>) -> Self {
        let mut watchlist = Self { entries };
        watchlist.sort();
        watchlist
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn entries(&self) -> &[WatchEntry] {
        &self.entries
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &WatchEntry> {
        self.entries.iter()
    }

    pub(crate) fn get(&self, index: usize) -> Option<&WatchEntry> {
        self.entries.get(index)
    }

    pub(crate) fn contains_series(&self, series: &str) -> bool {
        self.entries.iter().any(|entry| entry.series == series)
    }

    pub(crate) fn add(&mut self, entry: WatchEntry) -> Result<(), WatchlistError> {
        if entry.series.contains(DELIMITER) {
            return Err(WatchlistError::ReservedDelimiter {
                series: entry.series,
            });
        }
        if self.contains_series(&entry.series) {
            return Err(WatchlistError::DuplicateEntry {
                series: entry.series,
            });
        }
        info!(series = %entry.series, "added watchlist entry");
        self.entries.push(entry);
        self.sort();
        Ok(())
    }

    /// Removes every named series or nothing at all.
    pub(crate) fn remove_named(
        &mut self,
        names: &HashSet<String>,
    ) -> Result<Vec<WatchEntry>, WatchlistError> {
        if let Some(missing) = names.iter().find(|name| !self.contains_series(name)) {
            return Err(WatchlistError::invalid_index(missing));
        }
        let (removed, kept): (Vec<_>, Vec<_>) = self
            .entries
            .drain(..)
            .partition(|entry| names.contains(&entry.series));
        self.entries = kept;
        self.sort();
        info!(count = removed.len(), "removed watchlist entries");
        Ok(removed)
    }

    /// Resolves user-supplied positions and removes them as one batch; a
    /// single unparseable or out-of-range index rejects the whole batch.
    pub(crate) fn remove_at<S: AsRef<str>>(
        &mut self,
        indices: &[S],
    ) -> Result<Vec<WatchEntry>, WatchlistError> {
        let mut names = HashSet::with_capacity(indices.len());
        for raw in indices {
            let index = parse_index(raw.as_ref(), self.len())?;
            names.insert(self.entries[index].series.clone());
        }
        self.remove_named(&names)
    }

    pub(crate) fn find_by_substring_match(&self, title: &str) -> Option<&WatchEntry> {
        find_match(&self.entries, title).map(|idx| &self.entries[idx])
    }

    pub(crate) fn find_by_substring_match_mut(&mut self, title: &str) -> Option<&mut WatchEntry> {
        let idx = find_match(&self.entries, title)?;
        self.entries.get_mut(idx)
    }

    /// First entry (in current order) matching `title` whose current episode
    /// is `episode`; matches on another episode are passed over.
    pub(crate) fn find_current_episode_mut(
        &mut self,
        title: &str,
        episode: i32,
    ) -> Option<&mut WatchEntry> {
        self.entries.iter_mut().find(|entry| {
            entry.latest_episode == episode && title.contains(entry.series.as_str())
        })
    }

    /// Positional fast path: flags the entry as downloaded without checking
    /// which episode the caller actually fetched.
    pub(crate) fn mark_downloaded_at(&mut self, index: usize) -> Result<(), WatchlistError> {
        let entry = self
            .entries
            .get_mut(index)
            .ok_or_else(|| WatchlistError::invalid_index(index))?;
        entry.downloaded = true;
        debug!(series = %entry.series, "marked downloaded by index");
        Ok(())
    }

    pub(crate) fn latest_link(&self, index: usize) -> Option<&str> {
        self.entries
            .get(index)
            .map(|entry| entry.latest_link.as_str())
            .filter(|link| !link.is_empty())
    }

    pub(crate) fn sort(&mut self) {
        self.entries.sort_by(schedule_order);
    }
}

/// Index of the first entry (in current order) whose series name occurs
/// anywhere in `title`.
///
/// A short name embedded in an unrelated longer title matches as well; the
/// first entry in scheduled order wins in that case.
pub(crate) fn find_match(entries: &[WatchEntry], title: &str) -> Option<usize> {
    entries
        .iter()
        .position(|entry| title.contains(entry.series.as_str()))
}

pub(crate) fn parse_index(raw: &str, len: usize) -> Result<usize, WatchlistError> {
    match raw.trim().parse::<usize>() {
        Ok(index) if index < len => Ok(index),
        _ => Err(WatchlistError::invalid_index(raw.trim())),
    }
}
