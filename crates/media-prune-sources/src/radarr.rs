use anyhow::Result;
use media_prune_config::ServiceConfig;
use media_prune_models::CatalogEntity;
use serde::Deserialize;
use tracing::{debug, info};

use crate::client::{parse_timestamp, ApiKeyPlacement, ServiceClient};

/// Subset of Radarr's `/api/v3/movie` record that the scan needs
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RadarrMovie {
    pub id: i64,
    pub title: String,
    pub year: u32,
    pub tmdb_id: u32,
    pub imdb_id: Option<String>,
    pub path: String,
    pub added: Option<String>,
    pub size_on_disk: u64,
    pub has_file: bool,
}

impl From<RadarrMovie> for CatalogEntity {
    fn from(movie: RadarrMovie) -> Self {
        let mut entity = CatalogEntity::movie(movie.id, movie.title, Some(movie.year).filter(|y| *y > 0));
        entity.external_id = Some(movie.tmdb_id).filter(|id| *id > 0);
        entity.imdb_id = movie.imdb_id.filter(|id| !id.is_empty());
        entity.path = movie.path;
        entity.size_bytes = movie.size_on_disk;
        entity.has_file = movie.has_file;
        entity.added_at = movie.added.as_deref().and_then(parse_timestamp);
        entity
    }
}

pub struct RadarrClient {
    http: ServiceClient,
}

impl RadarrClient {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            http: ServiceClient::new("radarr", config, ApiKeyPlacement::Header)?,
        })
    }

    pub async fn movies(&self) -> Result<Vec<CatalogEntity>> {
        info!("Fetching Radarr movies");
        let movies: Vec<RadarrMovie> = self.http.get_json("api/v3/movie", &[]).await?;
        debug!(count = movies.len(), "Loaded Radarr movies");
        Ok(movies.into_iter().map(CatalogEntity::from).collect())
    }
}
