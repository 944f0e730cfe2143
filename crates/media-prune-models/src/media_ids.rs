use serde::{Deserialize, Serialize};

/// External metadata identifiers extracted from a provider-tagged GUID
/// (`tmdb://603`, `com.plexapp.agents.imdb://tt0133093?lang=en`, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ExternalIds {
    pub tmdb_id: Option<u32>,
    pub tvdb_id: Option<u32>,
    pub imdb_id: Option<String>,
}

impl ExternalIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tmdb_id.is_none() && self.tvdb_id.is_none() && self.imdb_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_empty() {
        assert!(ExternalIds::new().is_empty());
        let ids = ExternalIds {
            tvdb_id: Some(73739),
            ..ExternalIds::new()
        };
        assert!(!ids.is_empty());
    }
}
