use chrono::NaiveDate;
use tracing::{debug, info};

use super::identify::{episode_number, identify};
use super::store::parse_index;
use super::{ReleaseRecord, WatchEntry, Watchlist, WatchlistError};

/// A release together with the flags derived from the current watchlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AnnotatedRelease {
    pub(crate) record: ReleaseRecord,
    pub(crate) in_watchlist: bool,
    pub(crate) is_today: bool,
}

#[derive(Debug, Default)]
pub(crate) struct SubscribeOutcome {
    pub(crate) added: Vec<String>,
    pub(crate) warnings: Vec<WatchlistError>,
    pub(crate) releases: Vec<AnnotatedRelease>,
}

#[derive(Debug, Default)]
pub(crate) struct UnsubscribeOutcome {
    pub(crate) removed: Vec<WatchEntry>,
    pub(crate) releases: Vec<AnnotatedRelease>,
}

/// Runs every release through the update policy and returns the annotated
/// release set; the watchlist is re-sorted once the whole pass is done.
pub(crate) fn reconcile(
    watchlist: &mut Watchlist,
    releases: &[ReleaseRecord],
    today: NaiveDate,
) -> Vec<AnnotatedRelease> {
    let annotated: Vec<AnnotatedRelease> = releases
        .iter()
        .map(|record| AnnotatedRelease {
            in_watchlist: apply_release(watchlist, record),
            is_today: record.published_at.date_naive() == today,
            record: record.clone(),
        })
        .collect();
    watchlist.sort();

    debug!(
        releases = annotated.len(),
        matched = annotated.iter().filter(|r| r.in_watchlist).count(),
        "reconciled releases"
    );
    annotated
}

fn apply_release(watchlist: &mut Watchlist, record: &ReleaseRecord) -> bool {
    let Some(entry) = watchlist.find_by_substring_match_mut(&record.title) else {
        return false;
    };

    match episode_number(&record.title) {
        Some(episode) if episode > entry.latest_episode => {
            info!(series = %entry.series, episode, "new episode");
            entry.latest_link = record.link.clone();
            entry.latest_episode = episode;
            entry.downloaded = false;
            entry.release_at = record.published_at;
        }
        Some(episode) if episode == entry.latest_episode => {
            entry.latest_link = record.link.clone();
        }
        _ => {}
    }
    true
}

/// Adds one entry per selected release. Bad indices, unidentifiable titles
/// and duplicates are reported and skipped; the rest of the batch goes on.
pub(crate) fn subscribe<S: AsRef<str>>(
    watchlist: &mut Watchlist,
    releases: &[ReleaseRecord],
    indices: &[S],
    today: NaiveDate,
) -> SubscribeOutcome {
    let mut outcome = SubscribeOutcome::default();

    for raw in indices {
        let record = match parse_index(raw.as_ref(), releases.len()) {
            Ok(index) => &releases[index],
            Err(err) => {
                outcome.warnings.push(err);
                continue;
            }
        };
        let Some(found) = identify(&record.title) else {
            outcome.warnings.push(WatchlistError::UnparseableTitle {
                title: record.title.clone(),
            });
            continue;
        };
        match watchlist.add(WatchEntry::new(found.series.clone(), record.published_at)) {
            Ok(()) => outcome.added.push(found.series),
            Err(err) => outcome.warnings.push(err),
        }
    }

    outcome.releases = reconcile(watchlist, releases, today);
    outcome
}

/// Removes watchlist entries by position as a single all-or-nothing batch.
pub(crate) fn unsubscribe<S: AsRef<str>>(
    watchlist: &mut Watchlist,
    releases: &[ReleaseRecord],
    indices: &[S],
    today: NaiveDate,
) -> Result<UnsubscribeOutcome, WatchlistError> {
    let removed = watchlist.remove_at(indices)?;
    Ok(UnsubscribeOutcome {
        removed,
        releases: reconcile(watchlist, releases, today),
    })
}

/// Flags the first matching entry whose current episode is the one `record`
/// carries. Returns whether anything changed.
pub(crate) fn mark_downloaded(watchlist: &mut Watchlist, record: &ReleaseRecord) -> bool {
    let Some(episode) = episode_number(&record.title) else {
        return false;
    };
    let Some(entry) = watchlist.find_current_episode_mut(&record.title, episode) else {
        return false;
    };

    entry.downloaded = true;
    entry.release_at = record.published_at;
    info!(series = %entry.series, episode = entry.latest_episode, "marked downloaded");
    watchlist.sort();
    true
}
