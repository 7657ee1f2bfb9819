//! api-sports basketball client
//!
//! Game and standings lookups against the v1 basketball API. Like the
//! football client, rows pass through as raw JSON.

use crate::services::UpstreamError;
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const BASKETBALL_BASE_URL: &str = "https://v1.basketball.api-sports.io";
const API_KEY_HEADER: &str = "x-apisports-key";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Date known to have games, used when the requested day comes back empty
const FALLBACK_DATE: &str = "2024-12-15";

/// NBA
const STANDINGS_LEAGUE: u32 = 12;
const STANDINGS_SEASON: &str = "2024-2025";

#[derive(Debug, Deserialize)]
struct ApiSportsEnvelope {
    #[serde(default)]
    response: Vec<Value>,
}

/// api-sports basketball API client
pub struct BasketballClient {
    http_client: reqwest::Client,
    api_key: Option<String>,
}

impl BasketballClient {
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
        let url = format!("{}{}", BASKETBALL_BASE_URL, path);
        debug!(url = %url, ?params, "Querying basketball API");

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

    /// Games for one day
    ///
    /// Defaults to today. An empty day retries once with a date known to
    /// have games.
    pub async fn games(&self, date: Option<&str>) -> Result<Vec<Value>, UpstreamError> {
        let today = Utc::now().format("%Y-%m-%d").to_string();
        let date = date.unwrap_or(today.as_str());

        let games = self.fetch_rows("/games", &[("date", date)]).await?;
        if !games.is_empty() {
            return Ok(games);
        }

        debug!(date, "No games for requested date, retrying fallback date");
        self.fetch_rows("/games", &[("date", FALLBACK_DATE)]).await
    }

    /// NBA standings rows, passed through unshaped
    pub async fn standings(&self) -> Result<Vec<Value>, UpstreamError> {
        let league = STANDINGS_LEAGUE.to_string();
        self.fetch_rows(
            "/standings",
            &[("league", league.as_str()), ("season", STANDINGS_SEASON)],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_decode() {
        let envelope: ApiSportsEnvelope = serde_json::from_value(serde_json::json!({
            "results": 2,
            "response": [
                {"id": 14190, "teams": {"home": {"name": "Boston Celtics"}}},
                {"id": 14191, "teams": {"home": {"name": "Denver Nuggets"}}}
            ]
        }))
        .unwrap();

        assert_eq!(envelope.response.len(), 2);
        assert_eq!(envelope.response[0]["id"], 14190);
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_any_request() {
        let client = BasketballClient::new(None).unwrap();
        let err = client.games(Some("2024-12-15")).await.unwrap_err();
        assert!(matches!(err, UpstreamError::MissingKey("api-sports")));
    }
}
