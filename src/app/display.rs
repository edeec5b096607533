use chrono::{DateTime, FixedOffset};
use serde_json::{Value, json};

use crate::watchlist::{AnnotatedRelease, ScheduleRow};

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    s.chars().take(max.saturating_sub(3)).collect::<String>() + "..."
}

pub(crate) fn format_published(at: &DateTime<FixedOffset>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

pub(crate) fn release_marker(release: &AnnotatedRelease) -> &'static str {
    if release.in_watchlist { "*" } else { " " }
}

pub(crate) fn release_line(index: usize, release: &AnnotatedRelease, width: usize) -> String {
    let when = if release.is_today {
        format!("Today {}", release.record.published_at.format("%H:%M"))
    } else {
        format_published(&release.record.published_at)
    };
    format!(
        "{:>3} {} {:<width$} {}",
        index,
        release_marker(release),
        truncate(&release.record.title, width),
        when,
    )
}

pub(crate) fn watch_line(row: &ScheduleRow, width: usize) -> String {
    format!(
        "{:>3} {:<width$} {:<6} {:<18} {}",
        row.index,
        truncate(&row.series, width),
        row.latest_episode,
        row.status.label(),
        row.next_release_label(),
    )
}

pub(crate) fn rows_json(rows: &[ScheduleRow]) -> Value {
    Value::Array(
        rows.iter()
            .map(|row| {
                json!({
                    "index": row.index,
                    "series": row.series,
                    "latest_episode": row.latest_episode,
                    "status": row.status.label(),
                    "next_release": row.next_release.map(|at| at.to_rfc3339()),
                    "next_release_is_today": row.next_release_is_today,
                })
            })
            .collect(),
    )
}
