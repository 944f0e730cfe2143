use super::*;
use chrono::{Duration, TimeZone};
use serde_json::json;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

fn days_ago(days: i64) -> DateTime<Utc> {
    now() - Duration::days(days)
}

fn raw(value: serde_json::Value) -> RawHistoryEntry {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected object, got {}", other),
    }
}

fn config() -> Config {
    let mut config = Config::default();
    config.apply_defaults();
    config
}

fn movie(id: i64, title: &str, year: u32, tmdb: u32) -> CatalogEntity {
    CatalogEntity::movie(id, title, Some(year))
        .with_external_id(tmdb)
        .with_path(format!("/movies/{} ({})", title, year))
        .with_size(id as u64 * 1_000_000_000)
        .with_added_at(days_ago(365))
}

fn series(id: i64, title: &str, tvdb: u32, status: &str) -> CatalogEntity {
    CatalogEntity::series(id, title)
        .with_external_id(tvdb)
        .with_path(format!("/tv/{}", title))
        .with_size(id as u64 * 1_000_000_000)
        .with_added_at(days_ago(365))
        .with_status(status)
}

fn titles(report: &Report) -> Vec<&str> {
    report.items.iter().map(|item| item.title.as_str()).collect()
}

#[test]
fn test_movie_matched_by_tmdb_guid() {
    let input = ScanInput {
        movies: vec![movie(1, "The Matrix", 1999, 603)],
        history: vec![raw(json!({
            "media_type": "movie",
            "title": "Matrix",
            "guid": "themoviedb://603?lang=en",
            "date": days_ago(60).timestamp(),
            "user": "alice",
            "duration": 8160,
            "percent_complete": 100
        }))],
        ..ScanInput::default()
    };

    let report = run(&input, &config(), &ScanOptions::default(), now());
    assert_eq!(report.generated_at, now());
    assert_eq!(report.items.len(), 1);

    let item = &report.items[0];
    assert_eq!(item.title, "The Matrix (1999)");
    assert_eq!(item.reason, Reason::WatchInactive);
    assert_eq!(item.radarr_id, Some(1));
    assert_eq!(item.tmdb_id, Some(603));
    assert_eq!(item.sonarr_id, None);
    assert_eq!(item.last_activity_at, Some(days_ago(60)));
    assert_eq!(item.top_users.len(), 1);
    assert_eq!(item.top_users[0].user, "alice");
    assert!((item.total_watch_hours - 8160.0 / 3600.0).abs() < 1e-9);
}

#[test]
fn test_movie_matched_by_year_title_only() {
    let input = ScanInput {
        movies: vec![movie(1, "Heat", 1995, 949), movie(2, "Heat", 1986, 0)],
        history: vec![raw(json!({
            "media_type": "movie",
            "title": "Heat",
            "year": 1995,
            "date": days_ago(5).timestamp(),
            "user": "bob",
        }))],
        ..ScanInput::default()
    };

    let report = run(&input, &config(), &ScanOptions::default(), now());
    // 1995 was watched recently; 1986 was never watched and is old
    assert_eq!(titles(&report), vec!["Heat (1986)"]);
    assert_eq!(report.items[0].reason, Reason::NeverWatched);
}

#[test]
fn test_episode_credits_series_via_grandparent() {
    let input = ScanInput {
        series: vec![
            series(1, "Breaking Bad", 81189, "ended"),
            series(2, "The Wire", 79126, "ended"),
        ],
        history: vec![
            raw(json!({
                "media_type": "episode",
                "title": "Pilot",
                "grandparent_title": "Breaking Bad",
                "grandparent_guid": "com.plexapp.agents.thetvdb://81189?lang=en",
                "date": days_ago(3).timestamp(),
                "user": "alice",
                "watched_duration": 3000
            })),
            raw(json!({
                "media_type": "episode",
                "grandparent_title": "The Wire",
                "guid": "tvdb://79126",
                "date": days_ago(90).timestamp(),
                "user": "carol",
                "view_offset": 1200
            })),
        ],
        ..ScanInput::default()
    };

    let report = run(&input, &config(), &ScanOptions::default(), now());
    assert_eq!(titles(&report), vec!["The Wire"]);
    let item = &report.items[0];
    assert_eq!(item.kind, MediaKind::Series);
    assert_eq!(item.sonarr_id, Some(2));
    assert_eq!(item.tvdb_id, Some(79126));
    assert_eq!(item.series_status.as_deref(), Some("ended"));
    assert_eq!(item.reason, Reason::WatchInactive);
}

#[test]
fn test_low_percent_events_are_ignored() {
    let mut config = config();
    config.rules.activity_min_percent = 50;

    let input = ScanInput {
        movies: vec![movie(1, "Heat", 1995, 949), movie(2, "Ronin", 1998, 8195)],
        history: vec![
            raw(json!({
                "media_type": "movie",
                "guid": "tmdb://949",
                "date": days_ago(1).timestamp(),
                "percent_complete": 10,
                "user": "alice"
            })),
            raw(json!({
                "media_type": "movie",
                "guid": "tmdb://8195",
                "date": days_ago(1).timestamp(),
                "user": "alice"
            })),
        ],
        ..ScanInput::default()
    };

    let report = run(&input, &config, &ScanOptions::default(), now());
    // the 10% play does not count; the unknown-percent play does
    assert_eq!(titles(&report), vec!["Heat (1995)"]);
    assert_eq!(report.items[0].reason, Reason::NeverWatched);
}

#[test]
fn test_ineligible_and_excepted_entities_are_skipped() {
    let mut config = config();
    config.exceptions.movies.path_prefixes = vec!["/movies/Keep".to_string()];
    config.exceptions.series.titles = vec!["the office".to_string()];

    let no_file = CatalogEntity::movie(9, "Ghost", Some(1990))
        .with_external_id(251)
        .with_added_at(days_ago(999));
    let input = ScanInput {
        movies: vec![no_file, movie(3, "Keep Me", 2001, 5)],
        series: vec![
            series(4, "The Office", 73244, "ended"),
            series(5, "Empty", 1, "ended").with_size(0),
            series(6, "Lost", 73739, "ended"),
        ],
        history: Vec::new(),
    };

    let report = run(&input, &config, &ScanOptions::default(), now());
    assert_eq!(titles(&report), vec!["Lost"]);
}

#[test]
fn test_series_ended_only() {
    let mut config = config();
    config.rules.series_ended_only = true;

    let input = ScanInput {
        series: vec![
            series(1, "Running", 1, "continuing"),
            series(2, "Finished", 2, " Ended "),
            series(3, "Unknown", 3, ""),
        ],
        ..ScanInput::default()
    };

    let report = run(&input, &config, &ScanOptions::default(), now());
    assert_eq!(titles(&report), vec!["Finished"]);
}

#[test]
fn test_sorted_and_top_users_limited() {
    let history: Vec<RawHistoryEntry> = ["carol", "bob", "alice"]
        .iter()
        .zip([50, 100, 100])
        .map(|(user, seconds)| {
            raw(json!({
                "media_type": "movie",
                "guid": "tmdb://100",
                "date": days_ago(200).timestamp(),
                "user": user,
                "watch_duration": seconds
            }))
        })
        .collect();

    let input = ScanInput {
        movies: vec![
            movie(3, "Small", 2000, 100),
            movie(9, "Large", 2001, 200),
            movie(5, "Medium", 2002, 300),
        ],
        history,
        ..ScanInput::default()
    };

    let report = run(&input, &config(), &ScanOptions::default(), now());
    assert_eq!(titles(&report), vec!["Large (2001)", "Medium (2002)", "Small (2000)"]);

    let small = &report.items[2];
    let users: Vec<&str> = small.top_users.iter().map(|u| u.user.as_str()).collect();
    assert_eq!(users, vec!["alice", "bob"]);
    assert!((small.top_users_total_hours - 200.0 / 3600.0).abs() < 1e-9);
    assert!((small.total_watch_hours - 250.0 / 3600.0).abs() < 1e-9);

    let options = ScanOptions::parse("size", "asc", 0).unwrap();
    let report = run(&input, &config(), &options, now());
    assert_eq!(titles(&report), vec!["Small (2000)", "Medium (2002)", "Large (2001)"]);
    assert_eq!(report.items[0].top_users.len(), 3);
}

#[test]
fn test_unknown_sort_is_rejected() {
    assert!(ScanOptions::parse("title", "desc", 2).is_err());
    assert!(ScanOptions::parse("size", "up", 2).is_err());
}

#[test]
fn test_build_indexes_skips_unusable_records() {
    let history = vec![
        raw(json!({"media_type": "movie", "title": "No Date", "user": "a"})),
        raw(json!({"media_type": "track", "title": "Song", "date": 1_700_000_000})),
        raw(json!({"media_type": "show", "title": "Lost", "guid": "tvdb://73739", "date": 1_700_000_000})),
    ];
    let (activity, watch) = build_indexes(&history, 1);

    let lost = EntityKey::new(Some(73739), None, "");
    assert!(activity.last(MediaKind::Series, &lost).is_some());
    assert_eq!(watch.total_seconds(MediaKind::Series, &lost), 0);
    assert!(activity
        .last(MediaKind::Movie, &EntityKey::new(None, None, "no date"))
        .is_none());
}
