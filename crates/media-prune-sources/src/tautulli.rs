use anyhow::Result;
use media_prune_config::ServiceConfig;
use media_prune_models::RawHistoryEntry;
use serde_json::Value;
use tracing::{debug, info};

use crate::client::{ApiKeyPlacement, ServiceClient};
use crate::error::SourceError;

pub const PAGE_LENGTH: usize = 200;

/// One page of `get_history` plus the total the server reports
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPage {
    pub records: Vec<RawHistoryEntry>,
    /// Rows the server returned, including any dropped from `records`
    pub rows: usize,
    /// `recordsFiltered`, falling back to `recordsTotal`; 0 when neither is set
    pub total: usize,
}

/// Unwrap Tautulli's `{"response": {"result", "data": {"data": [...]}}}` envelope.
///
/// Records that are not JSON objects are dropped.
pub fn parse_history_page(payload: &Value) -> std::result::Result<HistoryPage, SourceError> {
    let response = payload
        .get("response")
        .and_then(Value::as_object)
        .ok_or_else(|| SourceError::new("tautulli", "history: missing response"))?;

    if let Some(result) = response.get("result").and_then(Value::as_str) {
        if result != "success" {
            let message = response.get("message").and_then(Value::as_str).unwrap_or("");
            return Err(SourceError::new(
                "tautulli",
                format!("history: result {} {}", result, message).trim_end().to_string(),
            ));
        }
    }

    let data = response
        .get("data")
        .and_then(Value::as_object)
        .ok_or_else(|| SourceError::new("tautulli", "history: missing data"))?;

    let total = match count_field(data.get("recordsFiltered")) {
        0 => count_field(data.get("recordsTotal")),
        filtered => filtered,
    };

    let rows = data
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| SourceError::new("tautulli", "history: missing data list"))?;
    let records = rows
        .iter()
        .filter_map(|entry| entry.as_object().cloned())
        .collect();

    Ok(HistoryPage {
        records,
        rows: rows.len(),
        total,
    })
}

fn count_field(value: Option<&Value>) -> usize {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
            .unwrap_or(0) as usize,
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Whether another page should be requested after one with `page_len`
/// rows starting at `start`. Counts server rows, not parsed records, so a
/// malformed row never ends paging early.
fn has_more(start: usize, page_len: usize, total: usize) -> bool {
    if page_len == 0 || page_len < PAGE_LENGTH {
        return false;
    }
    total == 0 || start + page_len < total
}

pub struct TautulliClient {
    http: ServiceClient,
}

impl TautulliClient {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            http: ServiceClient::new("tautulli", config, ApiKeyPlacement::Query)?,
        })
    }

    /// Complete playback history, newest first.
    pub async fn history(&self) -> Result<Vec<RawHistoryEntry>> {
        info!("Fetching Tautulli history");
        let mut all = Vec::new();
        let mut start = 0usize;

        loop {
            let page = self.history_page(start).await?;
            let page_len = page.rows;
            debug!(
                start,
                rows = page_len,
                count = page.records.len(),
                total = page.total,
                "Fetched Tautulli history page"
            );
            all.extend(page.records);

            if !has_more(start, page_len, page.total) {
                break;
            }
            start += page_len;
        }

        debug!(count = all.len(), "Loaded Tautulli history entries");
        Ok(all)
    }

    async fn history_page(&self, start: usize) -> Result<HistoryPage> {
        let query = [
            ("cmd", "get_history".to_string()),
            ("length", PAGE_LENGTH.to_string()),
            ("start", start.to_string()),
            ("order", "desc".to_string()),
            ("sort", "date".to_string()),
        ];
        let payload: Value = self.http.get_json("api/v2", &query).await?;
        Ok(parse_history_page(&payload)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_history_page() {
        let payload = json!({
            "response": {
                "result": "success",
                "message": null,
                "data": {
                    "recordsFiltered": 2,
                    "recordsTotal": 5120,
                    "data": [
                        {"media_type": "movie", "title": "Heat", "date": 1700000000},
                        "garbage",
                        {"media_type": "episode", "grandparent_title": "Lost", "date": 1700000100}
                    ]
                }
            }
        });

        let page = parse_history_page(&payload).unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.rows, 3);
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.records[0]["title"], "Heat");
    }

    #[test]
    fn test_total_falls_back_to_records_total() {
        let payload = json!({
            "response": {"data": {"recordsFiltered": 0, "recordsTotal": "37", "data": []}}
        });
        let page = parse_history_page(&payload).unwrap();
        assert_eq!(page.total, 37);
        assert_eq!(page.rows, 0);
        assert!(page.records.is_empty());
    }

    #[test]
    fn test_envelope_errors() {
        let err = parse_history_page(&json!({"oops": true})).unwrap_err();
        assert_eq!(err.to_string(), "tautulli: history: missing response");

        let err = parse_history_page(&json!({
            "response": {"result": "error", "message": "Invalid apikey", "data": {}}
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "tautulli: history: result error Invalid apikey");

        assert!(parse_history_page(&json!({"response": {"result": "success"}})).is_err());
        assert!(parse_history_page(&json!({"response": {"data": {"recordsTotal": 1}}})).is_err());
    }

    #[test]
    fn test_full_page_with_null_row_keeps_paging() {
        let mut rows: Vec<Value> = (0..PAGE_LENGTH - 1)
            .map(|i| json!({"media_type": "movie", "title": format!("Movie {}", i), "date": 1700000000 + i}))
            .collect();
        rows.insert(50, Value::Null);
        let payload = json!({
            "response": {
                "result": "success",
                "data": {"recordsFiltered": 1000, "recordsTotal": 1000, "data": rows}
            }
        });

        let page = parse_history_page(&payload).unwrap();
        assert_eq!(page.rows, PAGE_LENGTH);
        assert_eq!(page.records.len(), PAGE_LENGTH - 1);
        assert!(has_more(0, page.rows, page.total));
    }

    #[test]
    fn test_pagination_stop_conditions() {
        assert!(!has_more(0, 0, 500));
        assert!(!has_more(0, 150, 500));
        assert!(has_more(0, PAGE_LENGTH, 500));
        assert!(has_more(200, PAGE_LENGTH, 500));
        assert!(!has_more(400, PAGE_LENGTH, 600));
        assert!(has_more(0, PAGE_LENGTH, 0));
    }
}
