use std::collections::HashMap;
use media_prune_models::MediaKind;
use crate::keyed::{EntityKey, KeyedIndex};

/// Cumulative seconds per user for one entity
pub type WatchTotals = HashMap<String, u64>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSeconds {
    pub user: String,
    pub seconds: u64,
}

/// Per-user watch time for movies and series, keyed like the activity index.
#[derive(Debug, Clone, Default)]
pub struct WatchIndex {
    movies: KeyedIndex<WatchTotals>,
    series: KeyedIndex<WatchTotals>,
}

impl WatchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn index(&self, kind: MediaKind) -> &KeyedIndex<WatchTotals> {
        match kind {
            MediaKind::Movie => &self.movies,
            MediaKind::Series => &self.series,
        }
    }

    /// Credit `seconds` to `user`. Anonymous or zero-length plays are ignored.
    pub fn record(&mut self, kind: MediaKind, key: &EntityKey, user: &str, seconds: u64) {
        if user.is_empty() || seconds == 0 {
            return;
        }
        let index = match kind {
            MediaKind::Movie => &mut self.movies,
            MediaKind::Series => &mut self.series,
        };
        index.record_with(key, WatchTotals::new, |totals| {
            *totals.entry(user.to_string()).or_insert(0) += seconds;
        });
    }

    pub fn totals(&self, kind: MediaKind, key: &EntityKey) -> Option<&WatchTotals> {
        self.index(kind).lookup(key)
    }

    /// Users ranked by seconds descending, ties by name ascending. A `limit`
    /// of 0 returns everyone.
    pub fn top_users(&self, kind: MediaKind, key: &EntityKey, limit: usize) -> Vec<UserSeconds> {
        self.totals(kind, key)
            .map(|totals| rank_users(totals, limit))
            .unwrap_or_default()
    }

    pub fn total_seconds(&self, kind: MediaKind, key: &EntityKey) -> u64 {
        self.totals(kind, key)
            .map(|totals| totals.values().sum())
            .unwrap_or(0)
    }
}

pub fn rank_users(totals: &WatchTotals, limit: usize) -> Vec<UserSeconds> {
    let mut users: Vec<UserSeconds> = totals
        .iter()
        .map(|(user, seconds)| UserSeconds {
            user: user.clone(),
            seconds: *seconds,
        })
        .collect();
    users.sort_by(|a, b| b.seconds.cmp(&a.seconds).then_with(|| a.user.cmp(&b.user)));
    if limit > 0 {
        users.truncate(limit);
    }
    users
}
