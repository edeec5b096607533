/// Series name and episode number recovered from a release title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Identified {
    pub(crate) series: String,
    pub(crate) episode: i32,
}

/// Splits a `"<series> - <episode> <tags>"` title at its last `-`.
///
/// Best effort only: `None` when there is no separator after the first
/// character or when the first token behind it is not an integer.
pub(crate) fn identify(title: &str) -> Option<Identified> {
    let sep = title
        .char_indices()
        .rev()
        .find(|&(idx, ch)| idx > 0 && ch == '-')
        .map(|(idx, _)| idx)?;

    let episode = title[sep + 1..]
        .split_whitespace()
        .next()?
        .parse::<i32>()
        .ok()?;
    let series = title[..sep].trim();
    if series.is_empty() {
        return None;
    }

    Some(Identified {
        series: series.to_string(),
        episode,
    })
}

pub(crate) fn episode_number(title: &str) -> Option<i32> {
    identify(title).map(|found| found.episode)
}
