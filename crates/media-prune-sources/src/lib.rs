pub mod client;
pub mod radarr;
pub mod sonarr;
pub mod tautulli;
pub mod error;

pub use client::{parse_timestamp, ApiKeyPlacement, ServiceClient};
pub use radarr::{RadarrClient, RadarrMovie};
pub use sonarr::{SonarrClient, SonarrSeries};
pub use tautulli::{parse_history_page, HistoryPage, TautulliClient};
pub use error::SourceError;
