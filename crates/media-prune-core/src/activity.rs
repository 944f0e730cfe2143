use chrono::{DateTime, Utc};
use media_prune_models::MediaKind;
use crate::keyed::{EntityKey, KeyedIndex};

/// First and last time any playback touched an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityWindow {
    pub first: DateTime<Utc>,
    pub last: DateTime<Utc>,
}

impl ActivityWindow {
    pub fn at(when: DateTime<Utc>) -> Self {
        Self { first: when, last: when }
    }

    /// Widen the window to include `when`. Never narrows.
    pub fn fold(&mut self, when: DateTime<Utc>) {
        if when < self.first {
            self.first = when;
        }
        if when > self.last {
            self.last = when;
        }
    }
}

/// Activity windows for movies and series, keyed by external ID, IMDB ID and
/// title key.
#[derive(Debug, Clone, Default)]
pub struct ActivityIndex {
    movies: KeyedIndex<ActivityWindow>,
    series: KeyedIndex<ActivityWindow>,
}

impl ActivityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn index(&self, kind: MediaKind) -> &KeyedIndex<ActivityWindow> {
        match kind {
            MediaKind::Movie => &self.movies,
            MediaKind::Series => &self.series,
        }
    }

    pub fn record(&mut self, kind: MediaKind, key: &EntityKey, when: DateTime<Utc>) {
        let index = match kind {
            MediaKind::Movie => &mut self.movies,
            MediaKind::Series => &mut self.series,
        };
        index.record_with(key, || ActivityWindow::at(when), |window| window.fold(when));
    }

    pub fn window(&self, kind: MediaKind, key: &EntityKey) -> Option<ActivityWindow> {
        self.index(kind).lookup(key).copied()
    }

    pub fn first(&self, kind: MediaKind, key: &EntityKey) -> Option<DateTime<Utc>> {
        self.window(kind, key).map(|window| window.first)
    }

    pub fn last(&self, kind: MediaKind, key: &EntityKey) -> Option<DateTime<Utc>> {
        self.window(kind, key).map(|window| window.last)
    }
}
