use std::cmp::Ordering;
use std::str::FromStr;
use chrono::{DateTime, Utc};
use media_prune_models::{Report, ReportItem};
use crate::error::CoreError;

const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Size,
    Added,
    Gap,
    LastActivity,
    Inactivity,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Size => "size",
            SortKey::Added => "added",
            SortKey::Gap => "gap",
            SortKey::LastActivity => "last_activity",
            SortKey::Inactivity => "inactivity",
        }
    }
}

impl FromStr for SortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "size" => Ok(SortKey::Size),
            "added" => Ok(SortKey::Added),
            "gap" => Ok(SortKey::Gap),
            "last_activity" => Ok(SortKey::LastActivity),
            "inactivity" => Ok(SortKey::Inactivity),
            other => Err(CoreError::UnsupportedSort(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "asc" => Ok(SortOrder::Asc),
            "" | "desc" => Ok(SortOrder::Desc),
            other => Err(CoreError::UnsupportedOrder(other.to_string())),
        }
    }
}

/// Stable sort of the report items. Equal keys keep their input order in
/// both directions. Missing timestamps sort as the earliest possible value.
pub fn sort_report(report: &mut Report, key: SortKey, order: SortOrder) {
    let generated_at = report.generated_at;
    let compare = |a: &ReportItem, b: &ReportItem| -> Ordering {
        match key {
            SortKey::Size => a.size_bytes.cmp(&b.size_bytes),
            SortKey::Added => a.added_at.cmp(&b.added_at),
            SortKey::Gap => gap_days(a, generated_at).total_cmp(&gap_days(b, generated_at)),
            SortKey::LastActivity => a.last_activity_at.cmp(&b.last_activity_at),
            SortKey::Inactivity => {
                inactivity_days(a, generated_at).total_cmp(&inactivity_days(b, generated_at))
            }
        }
    };

    match order {
        SortOrder::Asc => report.items.sort_by(compare),
        SortOrder::Desc => report.items.sort_by(|a, b| compare(b, a)),
    }
}

fn span_days(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    ((to - from).num_seconds() as f64 / SECONDS_PER_DAY).max(0.0)
}

/// Days from being added to the first play, or to `generated_at` when never
/// played. Zero without an add date.
pub fn gap_days(item: &ReportItem, generated_at: DateTime<Utc>) -> f64 {
    match item.added_at {
        Some(added) => span_days(added, item.first_activity_at.unwrap_or(generated_at)),
        None => 0.0,
    }
}

/// Days since the last play, falling back to the add date.
pub fn inactivity_days(item: &ReportItem, generated_at: DateTime<Utc>) -> f64 {
    match item.last_activity_at.or(item.added_at) {
        Some(since) => span_days(since, generated_at),
        None => 0.0,
    }
}
