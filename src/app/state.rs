use std::fs;

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use tracing::warn;

use crate::config::Config;
use crate::feed;
use crate::watchlist::{
    self, AnnotatedRelease, ReleaseRecord, ScheduleRow, Watchlist, mark_downloaded, reconcile,
    schedule_rows, subscribe, unsubscribe,
};

use super::download;

/// Watchlist plus the release set it was last reconciled against.
pub(crate) struct AppState {
    pub(crate) config: Config,
    watchlist: Watchlist,
    records: Vec<ReleaseRecord>,
    releases: Vec<AnnotatedRelease>,
    emptied_by_removal: bool,
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl AppState {
    /// Loads the watchlist file; a corrupt file stops here so it is never
    /// overwritten.
    pub(crate) fn open(config: Config) -> Result<Self> {
        let watchlist = watchlist::load(&config.watchlist_path).with_context(|| {
            format!(
                "cannot use watchlist {}; fix or remove the file",
                config.watchlist_path.display()
            )
        })?;
        Ok(Self {
            config,
            watchlist,
            records: Vec::new(),
            releases: Vec::new(),
            emptied_by_removal: false,
        })
    }

    pub(crate) fn watchlist(&self) -> &Watchlist {
        &self.watchlist
    }

    pub(crate) fn releases(&self) -> &[AnnotatedRelease] {
        &self.releases
    }

    pub(crate) fn rows(&self) -> Vec<ScheduleRow> {
        schedule_rows(&self.watchlist, today())
    }

    /// Pulls the feed, reconciles it and saves the result. A failed fetch
    /// keeps the previous release set; fetch and save failures come back as
    /// warnings.
    pub(crate) fn refresh(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();
        match feed::load(&self.config) {
            Ok(read) => {
                if read.skipped > 0 {
                    warnings.push(format!(
                        "ignored {} incomplete feed item(s)",
                        read.skipped
                    ));
                }
                self.set_records(read.releases);
                if let Err(err) = self.save() {
                    warn!(error = %format!("{err:#}"), "saving reconciled watchlist failed");
                    warnings.push(format!("{err:#}"));
                }
            }
            Err(err) => {
                warn!(error = %format!("{err:#}"), "feed refresh failed");
                warnings.push(format!("{err:#}"));
            }
        }
        warnings
    }

    pub(crate) fn set_records(&mut self, records: Vec<ReleaseRecord>) {
        self.records = records;
        self.releases = reconcile(&mut self.watchlist, &self.records, today());
    }

    /// Returns the added series names and the per-item warnings.
    pub(crate) fn add<S: AsRef<str>>(&mut self, indices: &[S]) -> (Vec<String>, Vec<String>) {
        let outcome = subscribe(&mut self.watchlist, &self.records, indices, today());
        self.releases = outcome.releases;
        let warnings = outcome.warnings.iter().map(ToString::to_string).collect();
        (outcome.added, warnings)
    }

    pub(crate) fn remove<S: AsRef<str>>(&mut self, indices: &[S]) -> Result<Vec<String>> {
        let outcome = unsubscribe(&mut self.watchlist, &self.records, indices, today())
            .context("removal stopped, nothing was removed")?;
        self.releases = outcome.releases;
        self.emptied_by_removal = self.watchlist.is_empty();
        Ok(outcome
            .removed
            .into_iter()
            .map(|entry| entry.series)
            .collect())
    }

    /// Downloads the current episode of a watchlist entry and flags it
    /// through the positional fast path.
    pub(crate) fn download_entry(&mut self, index: usize) -> Result<String> {
        let Some(entry) = self.watchlist.get(index) else {
            bail!("invalid index {index}: no such watchlist entry");
        };
        let Some(link) = self.watchlist.latest_link(index) else {
            bail!("no episode of \"{}\" found in the feed yet", entry.series);
        };
        let message = format!(
            "Downloaded {} episode {}",
            entry.series, entry.latest_episode
        );

        download::launch(link, &self.config.downloader)?;
        self.watchlist.mark_downloaded_at(index)?;
        Ok(message)
    }

    /// Downloads a release by feed position and flags the matching entry when
    /// the release is its current episode.
    pub(crate) fn download_release(&mut self, index: usize) -> Result<String> {
        let Some(record) = self.records.get(index).cloned() else {
            bail!("invalid index {index}: no such release");
        };

        download::launch(&record.link, &self.config.downloader)?;
        if mark_downloaded(&mut self.watchlist, &record) {
            return Ok(format!("Downloaded {} (watchlist updated)", record.title));
        }
        Ok(match self.watchlist.find_by_substring_match(&record.title) {
            Some(entry) => format!(
                "Downloaded {}; \"{}\" stays on episode {}",
                record.title, entry.series, entry.latest_episode
            ),
            None => format!("Downloaded {}", record.title),
        })
    }

    /// Persists the watchlist. An empty watchlist is never written, but
    /// removing the last entry deletes the file (a missing file loads empty).
    pub(crate) fn save(&self) -> Result<()> {
        let path = &self.config.watchlist_path;
        if self.emptied_by_removal && self.watchlist.is_empty() {
            if path.exists() {
                fs::remove_file(path)
                    .with_context(|| format!("failed to delete watchlist {}", path.display()))?;
            }
            return Ok(());
        }
        watchlist::save(path, &self.watchlist)
            .with_context(|| format!("failed to save watchlist {}", path.display()))?;
        Ok(())
    }
}
