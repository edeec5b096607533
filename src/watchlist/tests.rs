use std::collections::HashSet;

use chrono::{DateTime, FixedOffset, NaiveDate};

use super::*;

fn at(raw: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(raw).expect("valid timestamp")
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 4).expect("valid date")
}

fn release(title: &str, link: &str, published: &str) -> ReleaseRecord {
    ReleaseRecord {
        title: title.to_string(),
        link: link.to_string(),
        published_at: at(published),
    }
}

fn entry(series: &str, episode: i32, downloaded: bool, link: &str, published: &str) -> WatchEntry {
    WatchEntry {
        series: series.to_string(),
        latest_episode: episode,
        downloaded,
        release_at: at(published),
        latest_link: link.to_string(),
    }
}

fn names(watchlist: &Watchlist) -> Vec<&str> {
    watchlist.iter().map(|e| e.series.as_str()).collect()
}

#[test]
fn identify_splits_series_and_episode() {
    let found = identify("[HorribleSubs] Boruto - Naruto Next Generations - 130 [720p].mkv")
        .expect("title should identify");
    assert_eq!(found.series, "[HorribleSubs] Boruto - Naruto Next Generations");
    assert_eq!(found.episode, 130);
}

#[test]
fn identify_handles_plain_pattern() {
    assert_eq!(
        identify("A - 3 extra"),
        Some(Identified {
            series: "A".to_string(),
            episode: 3,
        })
    );
}

#[test]
fn identify_reports_unknown_without_trailing_episode() {
    assert_eq!(identify("Movie Title [1080p].mkv"), None);
    assert_eq!(identify("Show - Special [1080p]"), None);
    assert_eq!(identify("Show - 03 [Group-Tag]"), None);
    assert_eq!(identify("-5 leading dash only"), None);
    assert_eq!(identify("Trailing dash -"), None);
}

#[test]
fn add_rejects_exact_duplicate_but_allows_substring_names() {
    let mut watchlist = Watchlist::new();
    watchlist
        .add(WatchEntry::new("Show", at("2024-05-01T10:00:00+00:00")))
        .expect("first add");
    watchlist
        .add(WatchEntry::new("Show Two", at("2024-05-01T10:00:00+00:00")))
        .expect("substring name is a different identity");

    let err = watchlist
        .add(WatchEntry::new("Show", at("2024-05-02T10:00:00+00:00")))
        .expect_err("duplicate must be rejected");
    assert!(matches!(err, WatchlistError::DuplicateEntry { .. }));
    assert_eq!(watchlist.len(), 2);
}

#[test]
fn add_rejects_delimiter_in_name() {
    let mut watchlist = Watchlist::new();
    let err = watchlist
        .add(WatchEntry::new("Bad;Name", at("2024-05-01T10:00:00+00:00")))
        .expect_err("delimiter would corrupt the file");
    assert!(matches!(err, WatchlistError::ReservedDelimiter { .. }));
    assert!(watchlist.is_empty());
}

#[test]
fn remove_at_is_all_or_nothing() {
    let mut watchlist = Watchlist::from_entries(vec![
        entry("A", 1, false, "x", "2024-05-01T10:00:00+00:00"),
        entry("B", 1, false, "y", "2024-05-02T10:00:00+00:00"),
        entry("C", 1, false, "z", "2024-05-03T10:00:00+00:00"),
    ]);

    let err = watchlist
        .remove_at(&["0", "5"])
        .expect_err("index 5 does not exist");
    assert!(matches!(err, WatchlistError::InvalidIndex { ref index } if index == "5"));
    assert_eq!(names(&watchlist), vec!["A", "B", "C"]);

    let err = watchlist
        .remove_at(&["1", "two"])
        .expect_err("non-numeric index");
    assert!(matches!(err, WatchlistError::InvalidIndex { .. }));
    assert_eq!(watchlist.len(), 3);

    let removed = watchlist.remove_at(&["2", "0"]).expect("valid batch");
    assert_eq!(removed.len(), 2);
    assert_eq!(names(&watchlist), vec!["B"]);
}

#[test]
fn remove_named_rejects_unknown_identity() {
    let mut watchlist = Watchlist::from_entries(vec![entry(
        "A",
        1,
        false,
        "x",
        "2024-05-01T10:00:00+00:00",
    )]);
    let request: HashSet<String> = ["A".to_string(), "Missing".to_string()].into();
    assert!(watchlist.remove_named(&request).is_err());
    assert_eq!(watchlist.len(), 1);
}

#[test]
fn find_match_returns_first_in_scheduled_order() {
    let entries = vec![
        entry("Show", 1, false, "x", "2024-05-01T10:00:00+00:00"),
        entry("Show Extra", 1, false, "y", "2024-05-02T10:00:00+00:00"),
    ];
    assert_eq!(find_match(&entries, "Show Extra - 02 [720p]"), Some(0));
    assert_eq!(find_match(&entries, "Other - 02 [720p]"), None);
}

#[test]
fn mark_downloaded_at_checks_bounds_only() {
    let mut watchlist = Watchlist::from_entries(vec![entry(
        "A",
        2,
        false,
        "x",
        "2024-05-01T10:00:00+00:00",
    )]);
    watchlist.mark_downloaded_at(0).expect("index in range");
    assert!(watchlist.entries()[0].downloaded);
    assert!(matches!(
        watchlist.mark_downloaded_at(1),
        Err(WatchlistError::InvalidIndex { .. })
    ));
}

#[test]
fn latest_link_is_none_until_an_episode_is_seen() {
    let watchlist = Watchlist::from_entries(vec![
        entry("A", 2, false, "x", "2024-05-01T10:00:00+00:00"),
        WatchEntry::new("B", at("2024-05-01T10:00:00+00:00")),
    ]);
    assert_eq!(watchlist.latest_link(0), Some("x"));
    assert_eq!(watchlist.latest_link(1), None);
    assert_eq!(watchlist.latest_link(7), None);
}

#[test]
fn same_episode_refreshes_link_only() {
    let mut watchlist = Watchlist::from_entries(vec![entry(
        "A",
        3,
        false,
        "x",
        "2024-05-01T10:00:00+00:00",
    )]);
    let releases = vec![release("A - 3 extra", "y", "2024-05-03T12:00:00+00:00")];

    let annotated = reconcile(&mut watchlist, &releases, today());

    let updated = &watchlist.entries()[0];
    assert_eq!(updated.latest_link, "y");
    assert_eq!(updated.latest_episode, 3);
    assert!(!updated.downloaded);
    assert_eq!(updated.release_at, at("2024-05-01T10:00:00+00:00"));
    assert!(annotated[0].in_watchlist);
}

#[test]
fn newer_episode_supersedes_download() {
    let mut watchlist = Watchlist::from_entries(vec![entry(
        "A",
        3,
        true,
        "x",
        "2024-05-01T10:00:00+00:00",
    )]);
    let releases = vec![release("A - 4 extra", "z", "2024-05-04T12:00:00+00:00")];

    let annotated = reconcile(&mut watchlist, &releases, today());

    let updated = &watchlist.entries()[0];
    assert_eq!(updated.latest_episode, 4);
    assert!(!updated.downloaded);
    assert_eq!(updated.latest_link, "z");
    assert_eq!(updated.release_at, at("2024-05-04T12:00:00+00:00"));
    assert!(annotated[0].is_today);
}

#[test]
fn older_or_unparseable_release_is_ignored_but_flagged() {
    let mut watchlist = Watchlist::from_entries(vec![entry(
        "A",
        5,
        true,
        "x",
        "2024-05-01T10:00:00+00:00",
    )]);
    let before = watchlist.entries()[0].clone();
    let releases = vec![
        release("A - 4 extra", "old", "2024-04-24T10:00:00+00:00"),
        release("A - Special", "sp", "2024-05-02T10:00:00+00:00"),
        release("Unrelated - 9", "u", "2024-05-02T10:00:00+00:00"),
    ];

    let annotated = reconcile(&mut watchlist, &releases, today());

    assert_eq!(watchlist.entries()[0], before);
    let flags: Vec<bool> = annotated.iter().map(|r| r.in_watchlist).collect();
    assert_eq!(flags, vec![true, true, false]);
}

#[test]
fn reconcile_twice_is_stable_for_non_increasing_episodes() {
    let mut watchlist = Watchlist::from_entries(vec![entry(
        "A",
        3,
        false,
        "x",
        "2024-05-01T10:00:00+00:00",
    )]);
    let releases = vec![
        release("A - 4 v1", "z1", "2024-05-04T12:00:00+00:00"),
        release("A - 4 v2", "z2", "2024-05-04T13:00:00+00:00"),
    ];

    reconcile(&mut watchlist, &releases, today());
    assert!(mark_downloaded(&mut watchlist, &releases[0]));
    let after_first = watchlist.entries()[0].clone();

    reconcile(&mut watchlist, &releases, today());
    let after_second = &watchlist.entries()[0];
    assert_eq!(after_second.downloaded, after_first.downloaded);
    assert_eq!(after_second.release_at, after_first.release_at);
    assert_eq!(after_second.latest_link, "z2");
}

#[test]
fn reconcile_leaves_input_records_untouched() {
    let mut watchlist = Watchlist::new();
    let releases = vec![release("A - 1", "x", "2024-05-04T12:00:00+00:00")];
    let snapshot = releases.clone();
    let annotated = reconcile(&mut watchlist, &releases, today());
    assert_eq!(releases, snapshot);
    assert_eq!(annotated[0].record, snapshot[0]);
    assert!(!annotated[0].in_watchlist);
}

#[test]
fn subscribe_skips_bad_items_and_reconciles_everything() {
    let mut watchlist = Watchlist::new();
    let releases = vec![
        release("Show A - 2 [720p]", "a2", "2024-05-03T18:00:00+00:00"),
        release("Show A - 1 [720p]", "a1", "2024-04-26T18:00:00+00:00"),
        release("Movie [1080p]", "m", "2024-05-01T18:00:00+00:00"),
        release("Show B - 7 [720p]", "b7", "2024-05-02T09:00:00+00:00"),
    ];

    let outcome = subscribe(&mut watchlist, &releases, &["1", "9", "2", "x", "3", "0"], today());

    assert_eq!(outcome.added, vec!["Show A".to_string(), "Show B".to_string()]);
    assert_eq!(outcome.warnings.len(), 4);
    assert!(matches!(
        outcome.warnings[0],
        WatchlistError::InvalidIndex { .. }
    ));
    assert!(matches!(
        outcome.warnings[1],
        WatchlistError::UnparseableTitle { .. }
    ));
    assert!(matches!(
        outcome.warnings[3],
        WatchlistError::DuplicateEntry { .. }
    ));

    assert_eq!(names(&watchlist), vec!["Show B", "Show A"]);
    let show_a = &watchlist.entries()[1];
    assert_eq!(show_a.latest_episode, 2);
    assert_eq!(show_a.latest_link, "a2");
    let flags: Vec<bool> = outcome.releases.iter().map(|r| r.in_watchlist).collect();
    assert_eq!(flags, vec![true, true, false, true]);
}

#[test]
fn unsubscribe_rejects_whole_batch_on_bad_index() {
    let releases = vec![release("A - 1", "x", "2024-05-04T12:00:00+00:00")];
    let mut watchlist = Watchlist::new();
    subscribe(&mut watchlist, &releases, &["0"], today());

    assert!(unsubscribe(&mut watchlist, &releases, &["0", "5"], today()).is_err());
    assert_eq!(watchlist.len(), 1);

    let outcome = unsubscribe(&mut watchlist, &releases, &["0"], today()).expect("valid batch");
    assert_eq!(outcome.removed.len(), 1);
    assert!(watchlist.is_empty());
    assert!(!outcome.releases[0].in_watchlist);
}

#[test]
fn mark_downloaded_requires_current_episode() {
    let mut watchlist = Watchlist::from_entries(vec![entry(
        "A",
        4,
        false,
        "z",
        "2024-05-01T10:00:00+00:00",
    )]);

    assert!(!mark_downloaded(
        &mut watchlist,
        &release("A - 3", "old", "2024-04-24T10:00:00+00:00")
    ));
    assert!(!watchlist.entries()[0].downloaded);

    assert!(mark_downloaded(
        &mut watchlist,
        &release("A - 4", "z", "2024-05-02T11:00:00+00:00")
    ));
    let updated = &watchlist.entries()[0];
    assert!(updated.downloaded);
    assert_eq!(updated.release_at, at("2024-05-02T11:00:00+00:00"));
}

#[test]
fn mark_downloaded_skips_overlapping_name_on_another_episode() {
    let mut watchlist = Watchlist::from_entries(vec![
        entry("Show", 12, false, "s12", "2024-04-30T10:00:00+00:00"),
        entry("Show S2", 3, false, "s2-3", "2024-05-01T10:00:00+00:00"),
    ]);
    assert_eq!(names(&watchlist), vec!["Show", "Show S2"]);

    assert!(mark_downloaded(
        &mut watchlist,
        &release("Show S2 - 03 [720p]", "s2-3", "2024-05-01T10:00:00+00:00")
    ));
    let show = watchlist.iter().find(|e| e.series == "Show").expect("Show");
    let sequel = watchlist.iter().find(|e| e.series == "Show S2").expect("Show S2");
    assert!(!show.downloaded);
    assert!(sequel.downloaded);
}

#[test]
fn schedule_puts_linked_entries_first_by_date_then_time() {
    let watchlist = Watchlist::from_entries(vec![
        WatchEntry::new("Empty 1", at("2024-01-01T00:00:00+00:00")),
        entry("Late Day", 1, false, "l", "2024-05-03T08:00:00+00:00"),
        WatchEntry::new("Empty 2", at("2023-01-01T00:00:00+00:00")),
        entry("Evening", 1, false, "e", "2024-05-01T21:00:00+00:00"),
        entry("Morning", 1, false, "m", "2024-05-01T06:30:00+00:00"),
    ]);

    assert_eq!(
        names(&watchlist),
        vec!["Morning", "Evening", "Late Day", "Empty 1", "Empty 2"]
    );
    for pair in watchlist.entries().windows(2) {
        assert_ne!(
            schedule_order(&pair[0], &pair[1]),
            std::cmp::Ordering::Greater
        );
    }
}

#[test]
fn schedule_rows_project_next_release() {
    let watchlist = Watchlist::from_entries(vec![
        entry("Due Today", 5, false, "x", "2024-04-27T18:45:00+00:00"),
        entry("Done", 2, true, "y", "2024-04-28T09:10:00+00:00"),
        WatchEntry::new("Waiting", at("2024-04-20T09:00:00+00:00")),
    ]);

    let rows = schedule_rows(&watchlist, today());

    assert_eq!(rows[0].status, EntryStatus::Pending);
    assert!(rows[0].next_release_is_today);
    assert_eq!(rows[0].next_release_label(), "Today 18:30");

    assert_eq!(rows[1].status, EntryStatus::Downloaded);
    assert!(!rows[1].next_release_is_today);
    assert_eq!(rows[1].next_release_label(), "2024-05-05 9:00");

    assert_eq!(rows[2].status, EntryStatus::NoEpisodes);
    assert_eq!(rows[2].next_release, None);
    assert_eq!(rows[2].next_release_label(), "-");
}
