use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Untyped playback-history record as returned by Tautulli.
pub type RawHistoryEntry = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum HistoryMediaKind {
    Movie,
    Episode,
    Show,
    Other(String),
}

impl HistoryMediaKind {
    pub fn parse(media_type: &str) -> Self {
        match media_type {
            "movie" => HistoryMediaKind::Movie,
            "episode" => HistoryMediaKind::Episode,
            "show" | "series" => HistoryMediaKind::Show,
            other => HistoryMediaKind::Other(other.to_string()),
        }
    }
}

/// A single playback event after field normalization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEvent {
    pub media_kind: HistoryMediaKind,
    pub title: String,
    pub year: Option<u32>,
    /// Series title for episodes
    pub grandparent_title: String,
    pub guid: String,
    pub parent_guid: String,
    pub grandparent_guid: String,
    /// 0 means unknown
    pub percent_complete: u32,
    pub watched_at: DateTime<Utc>,
    pub user: String,
    pub watch_seconds: u64,
}
