use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use chrono::DateTime;
use tracing::{debug, info};

use super::{DELIMITER, WatchEntry, Watchlist, WatchlistError};

const FIELD_COUNT: usize = 4;

/// One `series;episode;downloaded;release_at` line per entry. Links are
/// session data and are not written.
pub(crate) fn encode(watchlist: &Watchlist) -> String {
    let mut out = String::new();
    for entry in watchlist.iter() {
        out.push_str(&format!(
            "{series}{d}{episode}{d}{downloaded}{d}{release_at}\n",
            series = entry.series,
            episode = entry.latest_episode,
            downloaded = entry.downloaded,
            release_at = entry.release_at.to_rfc3339(),
            d = DELIMITER,
        ));
    }
    out
}

pub(crate) fn decode(raw: &str) -> Result<Vec<WatchEntry>, WatchlistError> {
    let mut entries: Vec<WatchEntry> = Vec::new();
    for (idx, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let entry = decode_line(line, idx + 1)?;
        if entries.iter().any(|seen| seen.series == entry.series) {
            return Err(WatchlistError::CorruptPersistedState {
                line: idx + 1,
                reason: format!("duplicate series \"{}\"", entry.series),
            });
        }
        entries.push(entry);
    }
    Ok(entries)
}

fn decode_line(line: &str, line_no: usize) -> Result<WatchEntry, WatchlistError> {
    let corrupt = |reason: String| WatchlistError::CorruptPersistedState {
        line: line_no,
        reason,
    };

    let fields: Vec<&str> = line.split(DELIMITER).collect();
    if fields.len() != FIELD_COUNT {
        return Err(corrupt(format!(
            "expected {FIELD_COUNT} fields, found {}",
            fields.len()
        )));
    }

    let series = fields[0];
    if series.trim().is_empty() {
        return Err(corrupt("empty series name".to_string()));
    }
    let latest_episode = fields[1]
        .trim()
        .parse::<i32>()
        .map_err(|_| corrupt(format!("bad episode number '{}'", fields[1])))?;
    let downloaded = parse_flag(fields[2])
        .ok_or_else(|| corrupt(format!("bad downloaded flag '{}'", fields[2])))?;
    let release_at = DateTime::parse_from_rfc3339(fields[3].trim())
        .map_err(|err| corrupt(format!("bad release time '{}': {err}", fields[3])))?;

    Ok(WatchEntry {
        series: series.to_string(),
        latest_episode,
        downloaded,
        release_at,
        latest_link: String::new(),
    })
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// A missing file is an empty watchlist. Any malformed line discards the
/// whole load.
pub(crate) fn load(path: &Path) -> Result<Watchlist, WatchlistError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no watchlist file, starting empty");
            return Ok(Watchlist::new());
        }
        Err(source) => {
            return Err(WatchlistError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let entries = decode(&raw)?;
    info!(path = %path.display(), entries = entries.len(), "loaded watchlist");
    Ok(Watchlist::from_entries(entries))
}

/// Writes the watchlist, returning `false` without touching the file when it
/// is empty.
pub(crate) fn save(path: &Path, watchlist: &Watchlist) -> Result<bool, WatchlistError> {
    if watchlist.is_empty() {
        return Ok(false);
    }
    let io_err = |source| WatchlistError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, encode(watchlist)).map_err(io_err)?;
    info!(path = %path.display(), entries = watchlist.len(), "saved watchlist");
    Ok(true)
}
