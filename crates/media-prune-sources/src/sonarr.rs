use anyhow::Result;
use media_prune_config::ServiceConfig;
use media_prune_models::CatalogEntity;
use serde::Deserialize;
use tracing::{debug, info};

use crate::client::{parse_timestamp, ApiKeyPlacement, ServiceClient};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SonarrSeries {
    pub id: i64,
    pub title: String,
    pub year: u32,
    pub tvdb_id: u32,
    pub imdb_id: Option<String>,
    pub path: String,
    pub added: Option<String>,
    pub status: Option<String>,
    pub statistics: Option<SeriesStatistics>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeriesStatistics {
    pub size_on_disk: u64,
}

impl From<SonarrSeries> for CatalogEntity {
    fn from(show: SonarrSeries) -> Self {
        let mut entity = CatalogEntity::series(show.id, show.title);
        entity.external_id = Some(show.tvdb_id).filter(|id| *id > 0);
        entity.imdb_id = show.imdb_id.filter(|id| !id.is_empty());
        entity.path = show.path;
        entity.size_bytes = show.statistics.map(|s| s.size_on_disk).unwrap_or(0);
        entity.added_at = show.added.as_deref().and_then(parse_timestamp);
        entity.status = show.status.filter(|s| !s.is_empty());
        entity
    }
}

pub struct SonarrClient {
    http: ServiceClient,
}

impl SonarrClient {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            http: ServiceClient::new("sonarr", config, ApiKeyPlacement::Header)?,
        })
    }

    pub async fn series(&self) -> Result<Vec<CatalogEntity>> {
        info!("Fetching Sonarr series");
        let series: Vec<SonarrSeries> = self.http.get_json("api/v3/series", &[]).await?;
        debug!(count = series.len(), "Loaded Sonarr series");
        Ok(series.into_iter().map(CatalogEntity::from).collect())
    }
}
