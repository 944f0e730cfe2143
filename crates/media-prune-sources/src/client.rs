use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use media_prune_config::ServiceConfig;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, enabled, trace, Level};

use crate::error::SourceError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const TRACE_BODY_LIMIT: usize = 2000;

/// How the API key travels with each request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeyPlacement {
    /// `X-Api-Key` header (Radarr, Sonarr)
    Header,
    /// `apikey` query parameter (Tautulli)
    Query,
}

/// HTTP plumbing shared by the Radarr, Sonarr and Tautulli clients
#[derive(Debug, Clone)]
pub struct ServiceClient {
    service: &'static str,
    base_url: Url,
    api_key: String,
    placement: ApiKeyPlacement,
    client: Client,
}

impl ServiceClient {
    pub fn new(service: &'static str, config: &ServiceConfig, placement: ApiKeyPlacement) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("{}: parse base_url {}", service, config.base_url))?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::ACCEPT,
                    reqwest::header::HeaderValue::from_static("application/json"),
                );
                if placement == ApiKeyPlacement::Header {
                    headers.insert(
                        reqwest::header::HeaderName::from_static("x-api-key"),
                        reqwest::header::HeaderValue::from_str(&config.api_key)
                            .context("Invalid API key format")?,
                    );
                }
                headers
            })
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            service,
            base_url,
            api_key: config.api_key.clone(),
            placement,
            client,
        })
    }

    /// Append `path` to the base URL's path, keeping any base path prefix
    /// (e.g. a reverse proxy mount like `/radarr`).
    pub fn resolve(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        let joined = format!(
            "{}/{}",
            self.base_url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        url
    }

    /// GET `path` with `query` and decode the JSON body.
    ///
    /// Non-2xx responses become a [`SourceError`] carrying the body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let mut url = self.resolve(path);
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
            if self.placement == ApiKeyPlacement::Query {
                pairs.append_pair("apikey", &self.api_key);
            }
        }

        debug!(service = self.service, method = "GET", path = url.path(), "HTTP request");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("{}: request {} failed", self.service, url.path()))?;

        let status = response.status();
        debug!(service = self.service, status = status.as_u16(), path = url.path(), "HTTP response");
        let body = response
            .text()
            .await
            .with_context(|| format!("{}: failed to read response body", self.service))?;

        if enabled!(Level::TRACE) {
            trace!(
                service = self.service,
                status = status.as_u16(),
                body = %truncate_body(&body),
                "HTTP response body"
            );
        }

        if !status.is_success() {
            return Err(SourceError::status(self.service, status.as_u16(), &body).into());
        }

        serde_json::from_str(&body)
            .with_context(|| format!("{}: failed to decode {} response", self.service, url.path()))
    }
}

fn truncate_body(body: &str) -> String {
    if body.len() <= TRACE_BODY_LIMIT {
        return body.to_string();
    }
    let mut end = TRACE_BODY_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...(truncated)", &body[..end])
}

/// Parse an *arr `added` timestamp: RFC 3339, or a bare UTC date-time.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}
