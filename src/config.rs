use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use crate::cli::Cli;
use crate::http::RetryPolicy;
use crate::paths::watchlist_file_path;

pub(crate) const DEFAULT_FEED_URL: &str = "https://subsplease.org/rss/?r=720";

const FEED_URL_ENV: &str = "SUBWATCH_FEED_URL";
const WATCHLIST_ENV: &str = "SUBWATCH_WATCHLIST";
const DOWNLOADER_ENV: &str = "SUBWATCH_DOWNLOADER";

#[derive(Debug, Clone)]
pub(crate) struct Config {
    /// `http(s)://` URL or path of a local RSS document.
    pub(crate) feed_source: String,
    pub(crate) watchlist_path: PathBuf,
    /// Program launched with a release link as its only argument.
    pub(crate) downloader: PathBuf,
    pub(crate) http: RetryPolicy,
}

impl Config {
    /// Flags win over environment variables, which win over defaults.
    pub(crate) fn resolve(cli: &Cli) -> Result<Self> {
        let feed_source = cli
            .feed
            .clone()
            .or_else(|| non_empty_env(FEED_URL_ENV))
            .unwrap_or_else(|| DEFAULT_FEED_URL.to_string());

        let watchlist_path = match cli
            .watchlist
            .clone()
            .or_else(|| non_empty_env(WATCHLIST_ENV).map(PathBuf::from))
        {
            Some(path) => path,
            None => watchlist_file_path()?,
        };

        let downloader = non_empty_env(DOWNLOADER_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_downloader);

        Ok(Self {
            feed_source,
            watchlist_path,
            downloader,
            http: RetryPolicy::default(),
        })
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(15),
            attempts: 3,
            retry_delay: Duration::from_secs(1),
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn default_downloader() -> PathBuf {
    if cfg!(target_os = "macos") {
        PathBuf::from("open")
    } else {
        PathBuf::from("xdg-open")
    }
}
