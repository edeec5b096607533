//! Release feed collaborator: turns an RSS document (remote or local) into
//! release records for the watchlist core.

use std::fs;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Local};
use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::{info, warn};

use crate::config::Config;
use crate::http::get_text_with_retries;
use crate::watchlist::ReleaseRecord;

#[derive(Debug, Default)]
pub(crate) struct FeedRead {
    pub(crate) releases: Vec<ReleaseRecord>,
    /// Items dropped for a missing title, link or date.
    pub(crate) skipped: usize,
}

#[derive(Debug, Clone, Copy)]
enum ItemField {
    Title,
    Link,
    PubDate,
}

#[derive(Debug, Default)]
struct ItemDraft {
    title: String,
    link: String,
    pub_date: String,
}

impl ItemDraft {
    fn push(&mut self, field: ItemField, text: &str) {
        let target = match field {
            ItemField::Title => &mut self.title,
            ItemField::Link => &mut self.link,
            ItemField::PubDate => &mut self.pub_date,
        };
        target.push_str(text);
    }

    fn finish(self) -> Option<ReleaseRecord> {
        let title = self.title.trim();
        let link = self.link.trim();
        if title.is_empty() || link.is_empty() {
            return None;
        }
        let published_at = DateTime::parse_from_rfc2822(self.pub_date.trim())
            .ok()?
            .with_timezone(&Local)
            .fixed_offset();
        Some(ReleaseRecord {
            title: title.to_string(),
            link: link.to_string(),
            published_at,
        })
    }
}

pub(crate) fn parse_rss(xml: &str) -> Result<FeedRead> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut read = FeedRead::default();
    let mut item: Option<ItemDraft> = None;
    let mut field: Option<ItemField> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                field = None;
                match e.name().as_ref() {
                    b"item" => item = Some(ItemDraft::default()),
                    b"title" if item.is_some() => field = Some(ItemField::Title),
                    b"link" if item.is_some() => field = Some(ItemField::Link),
                    b"pubDate" if item.is_some() => field = Some(ItemField::PubDate),
                    _ => {}
                }
            }
            Ok(Event::Text(e)) => {
                if let (Some(draft), Some(field)) = (item.as_mut(), field) {
                    let text = e
                        .unescape()
                        .map_err(|err| anyhow!("bad text in feed item: {err}"))?;
                    draft.push(field, &text);
                }
            }
            Ok(Event::CData(e)) => {
                if let (Some(draft), Some(field)) = (item.as_mut(), field) {
                    draft.push(field, &String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::End(e)) => {
                field = None;
                if e.name().as_ref() == b"item"
                    && let Some(draft) = item.take()
                {
                    match draft.finish() {
                        Some(record) => read.releases.push(record),
                        None => read.skipped += 1,
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(anyhow!(
                    "malformed feed at byte {}: {err}",
                    reader.buffer_position()
                ));
            }
            _ => {}
        }
    }

    Ok(read)
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Reads the configured feed from a URL or a local file.
pub(crate) fn load(config: &Config) -> Result<FeedRead> {
    let source = config.feed_source.as_str();
    let raw = if is_remote(source) {
        get_text_with_retries(source, &config.http)
            .with_context(|| format!("failed to fetch feed {source}"))?
    } else {
        fs::read_to_string(source).with_context(|| format!("failed to read feed file {source}"))?
    };

    let read = parse_rss(&raw).with_context(|| format!("failed to parse feed {source}"))?;
    if read.skipped > 0 {
        warn!(source, skipped = read.skipped, "dropped incomplete feed items");
    }
    info!(source, releases = read.releases.len(), "loaded feed");
    Ok(read)
}
