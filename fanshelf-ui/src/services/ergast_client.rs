//! Ergast Formula 1 client
//!
//! Race calendar, results, and driver standings from the Jolpica mirror of
//! the Ergast API. No key required. Ergast wraps everything in an `MRData`
//! envelope and serializes every scalar as a string.

use crate::services::UpstreamError;
use chrono::{Datelike, Utc};
use fanshelf_common::models::{FormulaOneRace, RaceResult};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const ERGAST_BASE_URL: &str = "https://api.jolpi.ca/ergast/f1";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Finishers attached to each race in the calendar view
const PODIUM_SIZE: usize = 3;

/// Races kept when falling back to the previous season's calendar
const SEASON_FALLBACK_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
struct MrDataEnvelope {
    #[serde(rename = "MRData")]
    mr_data: MrData,
}

#[derive(Debug, Default, Deserialize)]
struct MrData {
    #[serde(rename = "RaceTable", default)]
    race_table: Option<RaceTable>,

    #[serde(rename = "StandingsTable", default)]
    standings_table: Option<StandingsTable>,
}

#[derive(Debug, Default, Deserialize)]
struct RaceTable {
    #[serde(rename = "Races", default)]
    races: Vec<FormulaOneRace>,
}

#[derive(Debug, Default, Deserialize)]
struct StandingsTable {
    #[serde(rename = "StandingsLists", default)]
    standings_lists: Vec<StandingsList>,
}

#[derive(Debug, Default, Deserialize)]
struct StandingsList {
    #[serde(rename = "DriverStandings", default)]
    driver_standings: Vec<Value>,
}

/// Ergast API client
pub struct ErgastClient {
    http_client: reqwest::Client,
}

impl ErgastClient {
    pub fn new() -> Result<Self, UpstreamError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        Ok(Self { http_client })
    }

    async fn fetch_envelope(&self, path: &str) -> Result<MrData, UpstreamError> {
        let url = format!("{}{}", ERGAST_BASE_URL, path);
        debug!(url = %url, "Querying Ergast API");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Api(status.as_u16(), error_text));
        }

        let envelope: MrDataEnvelope = response
            .json()
            .await
            .map_err(|e| UpstreamError::Parse(e.to_string()))?;

        Ok(envelope.mr_data)
    }

    /// Race calendar for a season with podium results attached
    ///
    /// `season` is a year or the literal `current`. Per-race results are
    /// fetched concurrently; a race without results gets an empty list. An
    /// empty calendar falls back to the previous year, truncated and
    /// without podiums.
    pub async fn races(&self, season: &str) -> Result<Vec<FormulaOneRace>, UpstreamError> {
        let path = season_path(season, ".json");
        let envelope = self.fetch_envelope(&path).await?;
        let races = envelope.race_table.map(|t| t.races).unwrap_or_default();

        if races.is_empty() {
            let fallback_season = Utc::now().year() - 1;
            debug!(fallback_season, "No races for requested season, using previous year");
            let fallback = self
                .fetch_envelope(&format!("/{}.json", fallback_season))
                .await?;
            let mut races = fallback.race_table.map(|t| t.races).unwrap_or_default();
            races.truncate(SEASON_FALLBACK_LIMIT);
            return Ok(races);
        }

        let with_results = races.into_iter().map(|race| self.attach_podium(race));
        Ok(futures::future::join_all(with_results).await)
    }

    async fn attach_podium(&self, mut race: FormulaOneRace) -> FormulaOneRace {
        let (Some(season), Some(round)) = (race.season.clone(), race.round.clone()) else {
            race.results = Some(Vec::new());
            return race;
        };

        match self.results(&season, &round).await {
            Ok(mut results) => {
                results.truncate(PODIUM_SIZE);
                race.results = Some(results);
            }
            Err(e) => {
                debug!(season = %season, round = %round, "No results for race: {}", e);
                race.results = Some(Vec::new());
            }
        }
        race
    }

    /// Full finishing order for one race
    pub async fn results(&self, season: &str, round: &str) -> Result<Vec<RaceResult>, UpstreamError> {
        let envelope = self
            .fetch_envelope(&format!("/{}/{}/results.json", season, round))
            .await?;

        Ok(envelope
            .race_table
            .and_then(|t| t.races.into_iter().next())
            .and_then(|race| race.results)
            .unwrap_or_default())
    }

    /// Championship driver standings for a season
    pub async fn driver_standings(&self, season: &str) -> Result<Vec<Value>, UpstreamError> {
        let path = season_path(season, "/driverStandings.json");
        let envelope = self.fetch_envelope(&path).await?;

        Ok(envelope
            .standings_table
            .and_then(|t| t.standings_lists.into_iter().next())
            .map(|list| list.driver_standings)
            .unwrap_or_default())
    }
}

fn season_path(season: &str, suffix: &str) -> String {
    if season == "current" {
        format!("/current{}", suffix)
    } else {
        format!("/{}{}", season, suffix)
    }
}
