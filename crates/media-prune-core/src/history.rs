use chrono::{DateTime, TimeZone, Utc};
use media_prune_models::{ExternalIds, HistoryEvent, HistoryMediaKind, RawHistoryEntry};
use serde_json::Value;

/// Prefix used by the legacy Plex metadata agents (`com.plexapp.agents.imdb://...`)
const LEGACY_AGENT_PREFIX: &str = "com.plexapp.agents.";

/// Duration values at or above this are assumed to be milliseconds.
///
/// Tautulli reports some durations in seconds and others in milliseconds
/// depending on the field and server version. This threshold (about 27 hours
/// in seconds) is a heuristic, not a guaranteed unit inference.
const MILLISECONDS_THRESHOLD: i64 = 100_000;

const TITLE_KEYS: &[&str] = &["title", "full_title"];
const PERCENT_KEYS: &[&str] = &["percent_complete", "percent"];
const USER_KEYS: &[&str] = &["user", "username", "friendly_name"];
const TIMESTAMP_KEYS: &[&str] = &["date", "stopped", "started", "last_viewed_at"];
const WATCHED_DURATION_KEYS: &[&str] = &["watch_duration", "watched_duration", "play_duration"];
const TOTAL_DURATION_KEYS: &[&str] = &["duration"];
const OFFSET_KEYS: &[&str] = &["view_offset"];

/// Convert a raw history record into a typed event.
///
/// Returns `None` when no timestamp field holds a positive Unix time; such
/// records are dropped rather than defaulted.
pub fn parse_history_entry(raw: &RawHistoryEntry) -> Option<HistoryEvent> {
    let watched_at = get_unix_time(raw, TIMESTAMP_KEYS)?;
    let percent_complete = get_int(raw, PERCENT_KEYS).clamp(0, 100) as u32;
    let year = u32::try_from(get_int(raw, &["year"])).ok().filter(|y| *y > 0);

    Some(HistoryEvent {
        media_kind: HistoryMediaKind::parse(&get_string(raw, &["media_type"])),
        title: get_string(raw, TITLE_KEYS),
        year,
        grandparent_title: get_string(raw, &["grandparent_title"]),
        guid: get_string(raw, &["guid"]),
        parent_guid: get_string(raw, &["parent_guid"]),
        grandparent_guid: get_string(raw, &["grandparent_guid"]),
        percent_complete,
        watched_at,
        user: get_string(raw, USER_KEYS),
        watch_seconds: watch_seconds(raw, percent_complete),
    })
}

/// Extract external IDs from a provider-tagged GUID.
///
/// Accepts `tmdb://603`, `themoviedb://603?lang=en`, `tvdb://81189`,
/// `imdb://tt0133093` and their `com.plexapp.agents.` forms. Unknown
/// providers and malformed numeric IDs yield empty IDs.
pub fn extract_ids(guid: &str) -> ExternalIds {
    let mut ids = ExternalIds::new();
    let clean = guid.trim();
    if clean.is_empty() {
        return ids;
    }
    let clean = clean.strip_prefix(LEGACY_AGENT_PREFIX).unwrap_or(clean);

    let Some((provider, rest)) = clean.split_once("://") else {
        return ids;
    };
    let value = rest.split_once('?').map(|(value, _)| value).unwrap_or(rest);

    match provider {
        "themoviedb" | "tmdb" => ids.tmdb_id = parse_numeric_id(value),
        "tvdb" | "thetvdb" => ids.tvdb_id = parse_numeric_id(value),
        "imdb" => {
            if !value.is_empty() {
                ids.imdb_id = Some(value.to_string());
            }
        }
        _ => {}
    }
    ids
}

fn parse_numeric_id(value: &str) -> Option<u32> {
    value.parse::<u32>().ok().filter(|id| *id > 0)
}

/// Seconds of playback credited to the event.
///
/// Tries an explicit watched duration, then `duration * percent / 100`, then
/// the view offset; the first positive value wins.
pub fn watch_seconds(raw: &RawHistoryEntry, percent: u32) -> u64 {
    let watched = get_duration_seconds(raw, WATCHED_DURATION_KEYS);
    if watched > 0 {
        return watched as u64;
    }

    let total = get_duration_seconds(raw, TOTAL_DURATION_KEYS);
    if total > 0 && percent > 0 {
        let credited = (total as f64 * f64::from(percent) / 100.0) as i64;
        if credited > 0 {
            return credited as u64;
        }
    }

    get_duration_seconds(raw, OFFSET_KEYS).max(0) as u64
}

fn get_string(raw: &RawHistoryEntry, keys: &[&str]) -> String {
    for key in keys {
        match raw.get(*key) {
            Some(Value::String(s)) if !s.is_empty() => return s.clone(),
            Some(Value::Number(n)) => return n.to_string(),
            _ => {}
        }
    }
    String::new()
}

fn get_int(raw: &RawHistoryEntry, keys: &[&str]) -> i64 {
    keys.iter()
        .find_map(|key| raw.get(*key).and_then(coerce_int))
        .unwrap_or(0)
}

/// Integer view of a JSON value: integers, floats (truncated), and integer or
/// decimal strings.
fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate))
        }
        _ => None,
    }
}

fn truncate(value: f64) -> Option<i64> {
    if value.is_finite() && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

fn get_unix_time(raw: &RawHistoryEntry, keys: &[&str]) -> Option<DateTime<Utc>> {
    keys.iter().find_map(|key| {
        raw.get(*key)
            .and_then(coerce_int)
            .filter(|seconds| *seconds > 0)
            .and_then(|seconds| Utc.timestamp_opt(seconds, 0).single())
    })
}

/// First present duration among `keys`, in seconds
fn get_duration_seconds(raw: &RawHistoryEntry, keys: &[&str]) -> i64 {
    keys.iter()
        .find_map(|key| raw.get(*key).and_then(coerce_int))
        .map(|value| {
            if value >= MILLISECONDS_THRESHOLD {
                value / 1000
            } else {
                value
            }
        })
        .unwrap_or(0)
}
