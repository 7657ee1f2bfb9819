//! api-sports football client
//!
//! Fixture and standings lookups against the v3 football API. Rows are
//! passed through as raw JSON; only the favorites path decodes them into
//! typed records.

use crate::services::UpstreamError;
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const FOOTBALL_BASE_URL: &str = "https://v3.football.api-sports.io";
const API_KEY_HEADER: &str = "x-apisports-key";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Date known to have fixtures, used when the requested day comes back empty
const FALLBACK_DATE: &str = "2024-12-15";

/// Premier League
const STANDINGS_LEAGUE: u32 = 39;
const STANDINGS_SEASON: u32 = 2024;

/// Response envelope common to the api-sports providers
#[derive(Debug, Deserialize)]
struct ApiSportsEnvelope {
    #[serde(default)]
    response: Vec<Value>,
}

/// api-sports football API client
pub struct FootballClient {
    http_client: reqwest::Client,
    api_key: Option<String>,
}

impl FootballClient {
    pub fn new(api_key: Option<String>) -> Result<Self, UpstreamError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
        })
    }

    fn api_key(&self) -> Result<&str, UpstreamError> {
        self.api_key
            .as_deref()
            .ok_or(UpstreamError::MissingKey("api-sports"))
    }

    async fn fetch_rows(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<Value>, UpstreamError> {
        let key = self.api_key()?;
        let url = format!("{}{}", FOOTBALL_BASE_URL, path);
        debug!(url = %url, ?params, "Querying football API");

        let response = self
            .http_client
            .get(&url)
            .header(API_KEY_HEADER, key)
            .query(params)
            .send()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Api(status.as_u16(), error_text));
        }

        let envelope: ApiSportsEnvelope = response
            .json()
            .await
            .map_err(|e| UpstreamError::Parse(e.to_string()))?;

        Ok(envelope.response)
    }

    /// Fixtures for one day
    ///
    /// Defaults to today. An empty day retries once with a date known to
    /// have fixtures, so the browse screen is never blank.
    pub async fn fixtures(&self, date: Option<&str>) -> Result<Vec<Value>, UpstreamError> {
        let today = Utc::now().format("%Y-%m-%d").to_string();
        let date = date.unwrap_or(today.as_str());

        let fixtures = self.fetch_rows("/fixtures", &[("date", date)]).await?;
        if !fixtures.is_empty() {
            return Ok(fixtures);
        }

        debug!(date, "No fixtures for requested date, retrying fallback date");
        self.fetch_rows("/fixtures", &[("date", FALLBACK_DATE)])
            .await
    }

    /// Premier League standings table
    pub async fn standings(&self) -> Result<Vec<Value>, UpstreamError> {
        let league = STANDINGS_LEAGUE.to_string();
        let season = STANDINGS_SEASON.to_string();
        let rows = self
            .fetch_rows(
                "/standings",
                &[("league", league.as_str()), ("season", season.as_str())],
            )
            .await?;

        Ok(unwrap_standings_table(&rows))
    }
}

/// First league's first standings table, empty when absent
///
/// The provider nests the table as `response[0].league.standings[0]`.
fn unwrap_standings_table(rows: &[Value]) -> Vec<Value> {
    rows.first()
        .and_then(|entry| entry.get("league"))
        .and_then(|league| league.get("standings"))
        .and_then(|tables| tables.get(0))
        .and_then(|table| table.as_array())
        .cloned()
        .unwrap_or_default()
}
