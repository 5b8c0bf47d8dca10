use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;

use crate::model::WeatherRecord;

use super::WeatherStore;

/// Weather store backed by a PostgREST-style table endpoint.
///
/// Rows are selected with equality filters on the four integer columns; the
/// endpoint answers with a JSON array and at most one row is expected.
#[derive(Debug, Clone)]
pub struct PostgrestStore {
    base_url: String,
    api_key: String,
    table: String,
    http: Client,
}

impl PostgrestStore {
    pub fn new(base_url: String, api_key: String, table: String) -> Self {
        Self { base_url, api_key, table, http: Client::new() }
    }
}

#[async_trait]
impl WeatherStore for PostgrestStore {
    async fn fetch(
        &self,
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
    ) -> Result<Option<WeatherRecord>> {
        let url = format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), self.table);

        let query = [
            ("select", "*".to_string()),
            ("year", format!("eq.{year}")),
            ("month", format!("eq.{month}")),
            ("day", format!("eq.{day}")),
            ("hour", format!("eq.{hour}")),
        ];

        tracing::debug!(year, month, day, hour, "querying weather store");

        let res = self
            .http
            .get(&url)
            .query(&query)
            .header("apikey", self.api_key.as_str())
            .bearer_auth(self.api_key.as_str())
            .send()
            .await
            .context("Failed to send request to the weather store")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read weather store response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Weather store request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let rows: Vec<WeatherRecord> =
            serde_json::from_str(&body).context("Failed to parse weather store JSON")?;

        Ok(rows.into_iter().next())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX { format!("{}...", &body[..MAX]) } else { body.to_string() }
}
