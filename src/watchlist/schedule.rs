use std::cmp::Ordering;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Timelike};

use super::{WatchEntry, Watchlist};

const RELEASE_INTERVAL_DAYS: i64 = 7;

/// Entries with a known episode come first, ordered by release date and then
/// time of day; entries without one compare equal so a stable sort keeps
/// their insertion order.
pub(crate) fn schedule_order(left: &WatchEntry, right: &WatchEntry) -> Ordering {
    match (left.has_link(), right.has_link()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => Ordering::Equal,
        (true, true) => left
            .release_at
            .date_naive()
            .cmp(&right.release_at.date_naive())
            .then_with(|| left.release_at.time().cmp(&right.release_at.time())),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryStatus {
    NoEpisodes,
    Pending,
    Downloaded,
}

impl EntryStatus {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::NoEpisodes => "no episodes found",
            Self::Pending => "new",
            Self::Downloaded => "downloaded",
        }
    }
}

/// Display projection of one entry, in scheduled position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScheduleRow {
    pub(crate) index: usize,
    pub(crate) series: String,
    pub(crate) latest_episode: i32,
    pub(crate) status: EntryStatus,
    pub(crate) next_release: Option<DateTime<FixedOffset>>,
    pub(crate) next_release_is_today: bool,
}

impl ScheduleRow {
    /// `Today 18:30` / `2024-05-11 18:00`, minutes snapped down to the half hour.
    pub(crate) fn next_release_label(&self) -> String {
        let Some(next) = self.next_release else {
            return "-".to_string();
        };
        let slot = if next.minute() < 30 { "00" } else { "30" };
        if self.next_release_is_today {
            format!("Today {}:{slot}", next.hour())
        } else {
            format!("{} {}:{slot}", next.format("%Y-%m-%d"), next.hour())
        }
    }
}

pub(crate) fn next_release(entry: &WatchEntry) -> DateTime<FixedOffset> {
    entry.release_at + Duration::days(RELEASE_INTERVAL_DAYS)
}

pub(crate) fn schedule_rows(watchlist: &Watchlist, today: NaiveDate) -> Vec<ScheduleRow> {
    watchlist
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let status = if !entry.has_link() {
                EntryStatus::NoEpisodes
            } else if entry.downloaded {
                EntryStatus::Downloaded
            } else {
                EntryStatus::Pending
            };
            let next_release = entry.has_link().then(|| next_release(entry));
            ScheduleRow {
                index,
                series: entry.series.clone(),
                latest_episode: entry.latest_episode,
                status,
                next_release,
                next_release_is_today: next_release.is_some_and(|next| next.date_naive() == today),
            }
        })
        .collect()
}
