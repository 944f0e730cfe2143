use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Series,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "series",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A movie (Radarr) or series (Sonarr) as seen by the library catalog.
///
/// `external_id` is the TMDB id for movies and the TVDB id for series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntity {
    pub kind: MediaKind,
    pub local_id: i64,
    pub external_id: Option<u32>,
    pub imdb_id: Option<String>,
    pub title: String,
    pub year: Option<u32>,
    pub path: String,
    pub size_bytes: u64,
    pub has_file: bool,
    pub added_at: Option<DateTime<Utc>>,
    /// Series lifecycle status ("ended", "continuing", ...)
    pub status: Option<String>,
}

impl CatalogEntity {
    pub fn movie(local_id: i64, title: impl Into<String>, year: Option<u32>) -> Self {
        Self {
            kind: MediaKind::Movie,
            local_id,
            external_id: None,
            imdb_id: None,
            title: title.into(),
            year,
            path: String::new(),
            size_bytes: 0,
            has_file: false,
            added_at: None,
            status: None,
        }
    }

    pub fn series(local_id: i64, title: impl Into<String>) -> Self {
        Self {
            kind: MediaKind::Series,
            local_id,
            external_id: None,
            imdb_id: None,
            title: title.into(),
            year: None,
            path: String::new(),
            size_bytes: 0,
            has_file: true,
            added_at: None,
            status: None,
        }
    }

    /// Entities without anything on disk are never candidates.
    pub fn is_eligible(&self) -> bool {
        if self.size_bytes == 0 {
            return false;
        }
        match self.kind {
            MediaKind::Movie => self.has_file,
            MediaKind::Series => true,
        }
    }

    /// Title shown in reports: movies carry their year.
    pub fn display_title(&self) -> String {
        match (self.kind, self.year) {
            (MediaKind::Movie, Some(year)) if year > 0 => format!("{} ({})", self.title, year),
            _ => self.title.clone(),
        }
    }

    pub fn with_external_id(mut self, id: u32) -> Self {
        self.external_id = Some(id);
        self
    }

    pub fn with_imdb_id(mut self, id: impl Into<String>) -> Self {
        self.imdb_id = Some(id.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_size(mut self, size_bytes: u64) -> Self {
        self.size_bytes = size_bytes;
        if self.kind == MediaKind::Movie {
            self.has_file = size_bytes > 0;
        }
        self
    }

    pub fn with_added_at(mut self, added_at: DateTime<Utc>) -> Self {
        self.added_at = Some(added_at);
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}
