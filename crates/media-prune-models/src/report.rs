use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::media::MediaKind;

/// Why an item was flagged for review
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    WatchInactive,
    NeverWatched,
    LowWatch,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::WatchInactive => "watch_inactive",
            Reason::NeverWatched => "never_watched",
            Reason::LowWatch => "low_watch",
        }
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserWatch {
    pub user: String,
    pub hours: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportItem {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radarr_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sonarr_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tvdb_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    pub path: String,
    pub size_bytes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_activity_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top_users: Vec<UserWatch>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub top_users_total_hours: f64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub total_watch_hours: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_status: Option<String>,
    pub reason: Reason,
}

impl ReportItem {
    /// Catalog id in whichever service owns the item
    pub fn local_id(&self) -> Option<i64> {
        match self.kind {
            MediaKind::Movie => self.radarr_id,
            MediaKind::Series => self.sonarr_id,
        }
    }

    pub fn external_id(&self) -> Option<u32> {
        match self.kind {
            MediaKind::Movie => self.tmdb_id,
            MediaKind::Series => self.tvdb_id,
        }
    }
}

fn is_zero(value: &f64) -> bool {
    *value == 0.0
}

/// Review report produced by a scan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<ReportItem>,
}

impl Report {
    pub fn new(generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            items: Vec::new(),
        }
    }
}
