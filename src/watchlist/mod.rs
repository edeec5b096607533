//! Watchlist core: identifies series/episodes in release titles, keeps the
//! subscribed entries in scheduled order and reconciles feed releases
//! against them.

mod codec;
mod error;
mod identify;
mod reconcile;
mod schedule;
mod store;

#[cfg(test)]
mod tests;

use chrono::{DateTime, FixedOffset};

pub(crate) use codec::{load, save};
pub(crate) use error::WatchlistError;
#[cfg(test)]
pub(crate) use identify::{Identified, identify};
pub(crate) use reconcile::{
    AnnotatedRelease, mark_downloaded, reconcile, subscribe, unsubscribe,
};
#[cfg(test)]
pub(crate) use schedule::schedule_order;
pub(crate) use schedule::{EntryStatus, ScheduleRow, schedule_rows};
pub(crate) use store::Watchlist;
#[cfg(test)]
pub(crate) use store::find_match;

/// Field delimiter of the persisted watchlist file.
pub(crate) const DELIMITER: char = ';';

/// One announced episode as delivered by the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReleaseRecord {
    pub(crate) title: String,
    pub(crate) link: String,
    pub(crate) published_at: DateTime<FixedOffset>,
}

/// A subscription to one series.
///
/// `latest_link` is session data taken from the current feed and is never
/// persisted; an empty link means no episode has been observed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WatchEntry {
    pub(crate) series: String,
    pub(crate) latest_episode: i32,
    pub(crate) downloaded: bool,
    pub(crate) release_at: DateTime<FixedOffset>,
    pub(crate) latest_link: String,
}

impl WatchEntry {
    pub(crate) fn new(series: impl Into<String>, release_at: DateTime<FixedOffset>) -> Self {
        Self {
            series: series.into(),
            latest_episode: 0,
            downloaded: false,
            release_at,
            latest_link: String::new(),
        }
    }

    pub(crate) fn has_link(&self) -> bool {
        !self.latest_link.is_empty()
    }
}
