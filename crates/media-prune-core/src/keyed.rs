use std::collections::HashMap;

/// Lookup key for one catalog entity across the three identifier spaces.
///
/// The external numeric ID is TMDB for movies and TVDB for series. Absent
/// paths are stored as `None` so they never match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityKey {
    pub external_id: Option<u32>,
    pub imdb_id: Option<String>,
    pub title_key: Option<String>,
}

impl EntityKey {
    pub fn new(external_id: Option<u32>, imdb_id: Option<&str>, title_key: &str) -> Self {
        Self {
            external_id: external_id.filter(|id| *id > 0),
            imdb_id: imdb_id
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_lowercase),
            title_key: Some(title_key).filter(|key| !key.is_empty()).map(str::to_string),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.external_id.is_none() && self.imdb_id.is_none() && self.title_key.is_none()
    }
}

/// Three parallel maps over the same logical value, one per identifier
/// space. Lookups prefer the most reliable identifier: external numeric ID,
/// then IMDB ID, then normalized title.
#[derive(Debug, Clone)]
pub struct KeyedIndex<V> {
    by_external: HashMap<u32, V>,
    by_imdb: HashMap<String, V>,
    by_title: HashMap<String, V>,
}

impl<V> Default for KeyedIndex<V> {
    fn default() -> Self {
        Self {
            by_external: HashMap::new(),
            by_imdb: HashMap::new(),
            by_title: HashMap::new(),
        }
    }
}

impl<V> KeyedIndex<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `update` to the value under every identifier present in `key`,
    /// creating it with `init` first when missing.
    pub fn record_with<I, U>(&mut self, key: &EntityKey, init: I, mut update: U)
    where
        I: Fn() -> V,
        U: FnMut(&mut V),
    {
        if let Some(id) = key.external_id {
            update(self.by_external.entry(id).or_insert_with(&init));
        }
        if let Some(ref imdb) = key.imdb_id {
            update(self.by_imdb.entry(imdb.clone()).or_insert_with(&init));
        }
        if let Some(ref title) = key.title_key {
            update(self.by_title.entry(title.clone()).or_insert_with(&init));
        }
    }

    /// First hit in priority order
    pub fn lookup(&self, key: &EntityKey) -> Option<&V> {
        key.external_id
            .and_then(|id| self.by_external.get(&id))
            .or_else(|| key.imdb_id.as_ref().and_then(|imdb| self.by_imdb.get(imdb)))
            .or_else(|| key.title_key.as_ref().and_then(|title| self.by_title.get(title)))
    }

    pub fn is_empty(&self) -> bool {
        self.by_external.is_empty() && self.by_imdb.is_empty() && self.by_title.is_empty()
    }
}
