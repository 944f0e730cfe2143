use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use media_prune_models::{Report, ReportItem, UserWatch};
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::ranking::{gap_days, inactivity_days};

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

pub const CSV_HEADER: [&str; 17] = [
    "type",
    "title",
    "radarr_id",
    "sonarr_id",
    "series_status",
    "path",
    "size_bytes",
    "size_gib",
    "added_at",
    "first_activity_at",
    "last_activity_at",
    "gap_days",
    "inactivity_days",
    "top_users",
    "top_users_hours_total",
    "total_watch_hours",
    "reason",
];

/// Counts of flagged items
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub by_type: BTreeMap<String, usize>,
    pub by_reason: BTreeMap<String, usize>,
}

/// Write the report as pretty JSON with a trailing newline.
pub fn write_json(path: &Path, report: &Report) -> Result<()> {
    let mut payload = serde_json::to_string_pretty(report)?;
    payload.push('\n');
    std::fs::write(path, payload)?;
    debug!(path = %path.display(), count = report.items.len(), "Wrote JSON report");
    Ok(())
}

pub fn read_json(path: &Path) -> Result<Report> {
    let content = std::fs::read_to_string(path)?;
    let report = serde_json::from_str(&content)?;
    Ok(report)
}

pub fn write_csv(path: &Path, report: &Report) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv_to(file, report)?;
    debug!(path = %path.display(), count = report.items.len(), "Wrote CSV report");
    Ok(())
}

pub fn write_csv_to<W: Write>(writer: W, report: &Report) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER)?;
    for item in &report.items {
        csv.write_record(csv_row(item, report.generated_at))?;
    }
    csv.flush()?;
    Ok(())
}

fn csv_row(item: &ReportItem, generated_at: DateTime<Utc>) -> Vec<String> {
    vec![
        item.kind.to_string(),
        item.title.clone(),
        format_optional_id(item.radarr_id),
        format_optional_id(item.sonarr_id),
        item.series_status.clone().unwrap_or_default(),
        item.path.clone(),
        item.size_bytes.to_string(),
        format_size_gib(item.size_bytes),
        format_optional_time(item.added_at),
        format_optional_time(item.first_activity_at),
        format_optional_time(item.last_activity_at),
        format_gap_days(item, generated_at),
        format_inactivity_days(item, generated_at),
        format_top_users(&item.top_users, item.top_users_total_hours),
        format_hours(item.top_users_total_hours),
        format_hours(item.total_watch_hours),
        item.reason.to_string(),
    ]
}

pub fn summarize(report: &Report) -> Summary {
    let mut summary = Summary {
        total: report.items.len(),
        ..Summary::default()
    };
    for item in &report.items {
        *summary.by_type.entry(item.kind.to_string()).or_insert(0) += 1;
        *summary.by_reason.entry(item.reason.to_string()).or_insert(0) += 1;
    }
    summary
}

fn format_optional_id(id: Option<i64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}

pub fn format_optional_time(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

pub fn format_size_gib(bytes: u64) -> String {
    if bytes == 0 {
        return "0".to_string();
    }
    format!("{:.2}", bytes as f64 / BYTES_PER_GIB)
}

/// Empty when the add date is unknown
pub fn format_gap_days(item: &ReportItem, generated_at: DateTime<Utc>) -> String {
    if item.added_at.is_none() {
        return String::new();
    }
    format!("{:.1}", gap_days(item, generated_at))
}

/// Empty when neither a last play nor an add date is known
pub fn format_inactivity_days(item: &ReportItem, generated_at: DateTime<Utc>) -> String {
    if item.last_activity_at.is_none() && item.added_at.is_none() {
        return String::new();
    }
    format!("{:.1}", inactivity_days(item, generated_at))
}

/// `alice:1.5h bob:0.5h total:2.0h`
pub fn format_top_users(users: &[UserWatch], total_hours: f64) -> String {
    if users.is_empty() {
        return String::new();
    }
    let mut parts: Vec<String> = users
        .iter()
        .map(|u| format!("{}:{:.1}h", u.user, u.hours))
        .collect();
    if total_hours > 0.0 {
        parts.push(format!("total:{:.1}h", total_hours));
    }
    parts.join(" ")
}

pub fn format_hours(hours: f64) -> String {
    if hours <= 0.0 {
        return String::new();
    }
    format!("{:.1}", hours)
}
