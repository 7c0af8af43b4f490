//! Hosted record store reached through the Supabase PostgREST endpoint

use crate::config::SupabaseConfig;
use crate::models::VisitRow;
use crate::storage::{StorageError, StorageResult, VisitStore};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_RANGE};
use reqwest::{Client, Url};
use serde::Serialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Rows requested per window page. Hosted projects cap responses at
/// `max-rows` (1000 by default) regardless of the requested limit.
const FETCH_PAGE_SIZE: usize = 1000;

pub struct SupabaseStore {
    client: Client,
    endpoint: String,
}

#[derive(Serialize)]
struct NewVisit<'a> {
    page_path: &'a str,
}

impl SupabaseStore {
    pub fn new(config: &SupabaseConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("apikey", HeaderValue::from_str(&config.key)?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.key))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            endpoint: table_endpoint(config),
        })
    }

    fn url(&self, params: &[(&str, String)]) -> StorageResult<Url> {
        Url::parse_with_params(&self.endpoint, params)
            .map_err(|e| StorageError::Malformed(format!("invalid endpoint {}: {e}", self.endpoint)))
    }
}

fn table_endpoint(config: &SupabaseConfig) -> String {
    format!(
        "{}/rest/v1/{}",
        config.url.trim_end_matches('/'),
        config.table
    )
}

/// PostgREST filter timestamp, e.g. `2024-03-01T00:00:00.000Z`
fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Extract the total from a `Content-Range` header (`0-24/573` or `*/573`)
fn parse_content_range(value: &str) -> Option<u64> {
    let (_, total) = value.rsplit_once('/')?;
    total.trim().parse().ok()
}

#[async_trait]
impl VisitStore for SupabaseStore {
    async fn init(&self) -> Result<()> {
        // Schema is managed by the hosted project
        tracing::debug!("Using hosted analytics table at {}", self.endpoint);
        Ok(())
    }

    async fn insert_visit(&self, page_path: &str) -> StorageResult<()> {
        self.client
            .post(self.url(&[])?)
            .header("Prefer", "return=minimal")
            .json(&[NewVisit { page_path }])
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    async fn count_visits(&self, since: Option<DateTime<Utc>>) -> StorageResult<u64> {
        let mut params = vec![("select", "*".to_string())];
        if let Some(since) = since {
            params.push(("created_at", format!("gte.{}", format_timestamp(since))));
        }

        let response = self
            .client
            .head(self.url(&params)?)
            .header("Prefer", "count=exact")
            .send()
            .await?
            .error_for_status()?;

        let range = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| StorageError::Malformed("missing Content-Range header".to_string()))?;

        parse_content_range(range)
            .ok_or_else(|| StorageError::Malformed(format!("unexpected Content-Range '{range}'")))
    }

    async fn fetch_visits(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StorageResult<Vec<VisitRow>> {
        let mut rows: Vec<VisitRow> = Vec::new();

        // Pages can come back shorter than FETCH_PAGE_SIZE, so stop on the
        // reported total whenever the server sends one
        loop {
            let params = [
                ("select", "created_at,page_path".to_string()),
                ("created_at", format!("gte.{}", format_timestamp(start))),
                ("created_at", format!("lt.{}", format_timestamp(end))),
                ("order", "created_at.asc,id.asc".to_string()),
                ("limit", FETCH_PAGE_SIZE.to_string()),
                ("offset", rows.len().to_string()),
            ];

            let response = self
                .client
                .get(self.url(&params)?)
                .header("Prefer", "count=exact")
                .send()
                .await?
                .error_for_status()?;

            let total = response
                .headers()
                .get(CONTENT_RANGE)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_content_range);

            let page = response.json::<Vec<VisitRow>>().await?;
            let page_len = page.len();
            rows.extend(page);

            match total {
                Some(total) if rows.len() as u64 >= total => break,
                Some(total) if page_len == 0 => {
                    return Err(StorageError::Malformed(format!(
                        "window fetch stopped at {} of {total} rows",
                        rows.len()
                    )));
                }
                Some(_) => {
                    tracing::debug!(fetched = rows.len(), "Fetching next window page");
                }
                None if page_len < FETCH_PAGE_SIZE => break,
                None => {}
            }
        }

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_content_range() {
        assert_eq!(parse_content_range("0-24/573"), Some(573));
        assert_eq!(parse_content_range("*/0"), Some(0));
        assert_eq!(parse_content_range("*/*"), None);
        assert_eq!(parse_content_range("garbage"), None);
    }

    #[test]
    fn test_format_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 7, 5, 9).unwrap();
        assert_eq!(format_timestamp(at), "2024-03-01T07:05:09.000Z");
    }

    #[test]
    fn test_fetch_url_carries_both_bounds() {
        let store = SupabaseStore::new(&SupabaseConfig {
            url: "https://demo.supabase.co/".to_string(),
            key: "anon-key".to_string(),
            table: "analytics".to_string(),
        })
        .unwrap();

        let url = store
            .url(&[
                ("created_at", "gte.2024-03-01T00:00:00.000Z".to_string()),
                ("created_at", "lt.2024-03-08T00:00:00.000Z".to_string()),
            ])
            .unwrap();

        assert_eq!(url.path(), "/rest/v1/analytics");
        let bounds: Vec<String> = url
            .query_pairs()
            .filter(|(k, _)| k == "created_at")
            .map(|(_, v)| v.into_owned())
            .collect();
        assert_eq!(
            bounds,
            vec![
                "gte.2024-03-01T00:00:00.000Z".to_string(),
                "lt.2024-03-08T00:00:00.000Z".to_string()
            ]
        );
    }

    #[test]
    fn test_rows_decode_from_postgrest_json() {
        let body = r#"[
            {"created_at": "2024-03-01T10:00:00.123456+00:00", "page_path": "/doctors"},
            {"created_at": "2024-03-01T11:00:00+00:00", "page_path": null}
        ]"#;
        let rows: Vec<VisitRow> = serde_json::from_str(body).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].page_path.as_deref(), Some("/doctors"));
        assert_eq!(rows[1].page_path, None);
        assert_eq!(
            rows[1].created_at,
            Utc.with_ymd_and_hms(2024, 3, 1, 11, 0, 0).unwrap()
        );
    }
}
