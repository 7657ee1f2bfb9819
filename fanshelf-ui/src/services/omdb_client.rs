//! OMDB movie metadata client
//!
//! Search, detail, category, and trending lookups against the OMDB REST
//! API. OMDB reports most failures inside a 200 envelope
//! (`Response: "False"` plus an `Error` message), so the detail path
//! re-checks the envelope before decoding into a typed record.

use crate::favorites::movies::MovieDetailProvider;
use crate::services::UpstreamError;
use async_trait::async_trait;
use fanshelf_common::models::MovieRecord;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const OMDB_BASE_URL: &str = "http://www.omdbapi.com";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Trending aggregation: five fixed searches, all pinned to one year
const TRENDING_TERMS: [&str; 5] = ["2023", "2022", "2021", "marvel", "action"];
const TRENDING_YEAR: &str = "2020";
const TRENDING_LIMIT: usize = 20;

/// Search envelope returned by OMDB (and by the trending aggregation)
///
/// Passed through to the frontend as-is; a miss keeps `Response: "False"`
/// and the provider's `Error` message rather than becoming an HTTP error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPage {
    #[serde(rename = "Search", default, skip_serializing_if = "Vec::is_empty")]
    pub search: Vec<MovieRecord>,

    #[serde(rename = "totalResults", default, skip_serializing_if = "Option::is_none")]
    pub total_results: Option<String>,

    #[serde(rename = "Response")]
    pub response: String,

    #[serde(rename = "Error", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Per-category search terms (one picked at random per request)
fn category_search_terms(category: &str) -> &'static [&'static str] {
    match category {
        "trending" => &["avengers", "batman", "spider", "star wars", "marvel"],
        "top_rated" => &["godfather", "shawshank", "dark knight", "pulp fiction", "inception"],
        "action" => &["action", "fast furious", "mission impossible", "john wick", "terminator"],
        "comedy" => &["comedy", "hangover", "anchorman", "dumb dumber", "step brothers"],
        "horror" => &["horror", "conjuring", "halloween", "friday 13th", "nightmare elm"],
        _ => &["movie"],
    }
}

/// OMDB API client
pub struct OmdbClient {
    http_client: reqwest::Client,
    api_key: Option<String>,
}

impl OmdbClient {
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
            .ok_or(UpstreamError::MissingKey("OMDB"))
    }

    async fn fetch_json(
        &self,
        params: &[(&str, &str)],
    ) -> Result<serde_json::Value, UpstreamError> {
        let key = self.api_key()?;

        // Key goes in a separate query call so the params slice stays
        // loggable without it
        debug!(?params, "Querying OMDB");

        let response = self
            .http_client
            .get(OMDB_BASE_URL)
            .query(&[("apikey", key)])
            .query(params)
            .send()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Api(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| UpstreamError::Parse(e.to_string()))
    }

    async fn fetch_page(&self, params: &[(&str, &str)]) -> Result<SearchPage, UpstreamError> {
        let value = self.fetch_json(params).await?;
        serde_json::from_value(value).map_err(|e| UpstreamError::Parse(e.to_string()))
    }

    async fn search_in_year(&self, term: &str, year: &str) -> Result<SearchPage, UpstreamError> {
        self.fetch_page(&[("s", term), ("type", "movie"), ("y", year)])
            .await
    }

    /// Search movies by title
    pub async fn search(&self, query: &str, page: u32) -> Result<SearchPage, UpstreamError> {
        let page = page.to_string();
        self.fetch_page(&[("s", query), ("page", page.as_str()), ("type", "movie")])
            .await
    }

    /// Full detail record for one movie (full plot)
    pub async fn details(&self, imdb_id: &str) -> Result<MovieRecord, UpstreamError> {
        let value = self.fetch_json(&[("i", imdb_id), ("plot", "full")]).await?;

        if value.get("Response").and_then(|v| v.as_str()) != Some("True") {
            let message = value
                .get("Error")
                .and_then(|v| v.as_str())
                .unwrap_or("Movie not found")
                .to_string();
            return Err(UpstreamError::Provider(message));
        }

        let record: MovieRecord =
            serde_json::from_value(value).map_err(|e| UpstreamError::Parse(e.to_string()))?;

        debug!(imdb_id = %record.imdb_id, title = %record.title, "Retrieved movie details");
        Ok(record)
    }

    /// One search using a random term from the category's term list
    pub async fn by_category(&self, category: &str, page: u32) -> Result<SearchPage, UpstreamError> {
        let terms = category_search_terms(category);
        let term = terms
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or("movie");

        debug!(category, term, "Category search");
        self.search(term, page).await
    }

    /// Aggregate a trending page from five fixed searches
    ///
    /// Searches run concurrently; results are flattened in search order,
    /// deduplicated by `imdbID` keeping the first occurrence, and truncated
    /// to 20.
    pub async fn trending(&self) -> Result<SearchPage, UpstreamError> {
        let searches = TRENDING_TERMS
            .iter()
            .map(|&term| self.search_in_year(term, TRENDING_YEAR));
        let pages = futures::future::join_all(searches).await;

        let mut movies = Vec::new();
        for page in pages {
            movies.extend(page?.search);
        }
        let unique = dedupe_by_imdb_id(movies, TRENDING_LIMIT);

        Ok(SearchPage {
            total_results: Some(unique.len().to_string()),
            search: unique,
            response: "True".to_string(),
            error: None,
        })
    }
}

#[async_trait]
impl MovieDetailProvider for OmdbClient {
    async fn fetch_details(&self, imdb_id: &str) -> Result<MovieRecord, UpstreamError> {
        self.details(imdb_id).await
    }
}

/// Drop records repeating an already-seen `imdbID`, capping the result length
fn dedupe_by_imdb_id(movies: Vec<MovieRecord>, limit: usize) -> Vec<MovieRecord> {
    let mut unique: Vec<MovieRecord> = Vec::new();
    for movie in movies {
        if unique.len() == limit {
            break;
        }
        if unique.iter().any(|m| m.imdb_id == movie.imdb_id) {
            continue;
        }
        unique.push(movie);
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(imdb_id: &str) -> MovieRecord {
        serde_json::from_value(serde_json::json!({
            "imdbID": imdb_id,
            "Title": format!("Movie {}", imdb_id),
        }))
        .unwrap()
    }

    #[test]
    fn test_category_terms() {
        for category in ["trending", "top_rated", "action", "comedy", "horror"] {
            assert_eq!(category_search_terms(category).len(), 5, "{}", category);
        }
        assert_eq!(category_search_terms("documentary"), &["movie"]);
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let movies = vec![movie("tt1"), movie("tt2"), movie("tt1"), movie("tt3")];
        let unique = dedupe_by_imdb_id(movies, 20);
        let ids: Vec<&str> = unique.iter().map(|m| m.imdb_id.as_str()).collect();
        assert_eq!(ids, vec!["tt1", "tt2", "tt3"]);
    }

    #[test]
    fn test_dedupe_enforces_limit() {
        let movies: Vec<MovieRecord> = (0..30).map(|i| movie(&format!("tt{}", i))).collect();
        assert_eq!(dedupe_by_imdb_id(movies, 20).len(), 20);
    }

    #[test]
    fn test_search_page_decodes_hit_and_miss_envelopes() {
        let hit: SearchPage = serde_json::from_value(serde_json::json!({
            "Search": [{"imdbID": "tt0848228", "Title": "The Avengers", "Year": "2012"}],
            "totalResults": "129",
            "Response": "True"
        }))
        .unwrap();
        assert_eq!(hit.search.len(), 1);
        assert_eq!(hit.total_results.as_deref(), Some("129"));

        let miss: SearchPage = serde_json::from_value(serde_json::json!({
            "Response": "False",
            "Error": "Movie not found!"
        }))
        .unwrap();
        assert!(miss.search.is_empty());
        assert_eq!(miss.error.as_deref(), Some("Movie not found!"));
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_any_request() {
        let client = OmdbClient::new(None).unwrap();
        let err = client.search("batman", 1).await.unwrap_err();
        assert!(matches!(err, UpstreamError::MissingKey("OMDB")));
    }
}
