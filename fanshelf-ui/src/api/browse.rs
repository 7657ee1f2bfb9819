//! Browse API handlers
//!
//! Thin proxies over the upstream clients so the browser frontend never
//! talks to the providers (or carries their keys) itself. Payloads pass
//! through in the provider's own shape.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;

use crate::services::{SearchPage, UpstreamError};
use crate::{ApiError, ApiResult, AppState};
use fanshelf_common::models::{FormulaOneRace, MovieRecord};

fn default_page() -> u32 {
    1
}

fn default_season() -> String {
    "current".to_string()
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: String,
    #[serde(default = "default_page")]
    pub page: u32,
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct DateParams {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SeasonParams {
    #[serde(default = "default_season")]
    pub season: String,
}

/// GET /api/movies/search
pub async fn search_movies(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<SearchPage>> {
    let page = state.omdb.search(&params.query, params.page).await?;
    Ok(Json(page))
}

/// GET /api/movies/trending
pub async fn trending_movies(State(state): State<AppState>) -> ApiResult<Json<SearchPage>> {
    let page = state.omdb.trending().await?;
    Ok(Json(page))
}

/// GET /api/movies/category/:category
pub async fn movies_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<SearchPage>> {
    let page = state.omdb.by_category(&category, params.page).await?;
    Ok(Json(page))
}

/// GET /api/movies/:imdb_id
///
/// OMDB reports an unknown id inside a success envelope; that becomes a
/// 404 here instead of a 502.
pub async fn movie_details(
    State(state): State<AppState>,
    Path(imdb_id): Path<String>,
) -> ApiResult<Json<MovieRecord>> {
    match state.omdb.details(&imdb_id).await {
        Ok(record) => Ok(Json(record)),
        Err(UpstreamError::Provider(msg))
            if msg.contains("not found") || msg.contains("Incorrect IMDb ID") =>
        {
            Err(ApiError::NotFound(msg))
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /api/sports/football/fixtures
pub async fn football_fixtures(
    State(state): State<AppState>,
    Query(params): Query<DateParams>,
) -> ApiResult<Json<Vec<Value>>> {
    let fixtures = state.football.fixtures(params.date.as_deref()).await?;
    Ok(Json(fixtures))
}

/// GET /api/sports/football/standings
pub async fn football_standings(State(state): State<AppState>) -> ApiResult<Json<Vec<Value>>> {
    let standings = state.football.standings().await?;
    Ok(Json(standings))
}

/// GET /api/sports/basketball/games
pub async fn basketball_games(
    State(state): State<AppState>,
    Query(params): Query<DateParams>,
) -> ApiResult<Json<Vec<Value>>> {
    let games = state.basketball.games(params.date.as_deref()).await?;
    Ok(Json(games))
}

/// GET /api/sports/basketball/standings
pub async fn basketball_standings(State(state): State<AppState>) -> ApiResult<Json<Vec<Value>>> {
    let standings = state.basketball.standings().await?;
    Ok(Json(standings))
}

/// GET /api/sports/formula1/races
pub async fn formula1_races(
    State(state): State<AppState>,
    Query(params): Query<SeasonParams>,
) -> ApiResult<Json<Vec<FormulaOneRace>>> {
    let races = state.ergast.races(&params.season).await?;
    Ok(Json(races))
}

/// GET /api/sports/formula1/standings
pub async fn formula1_standings(
    State(state): State<AppState>,
    Query(params): Query<SeasonParams>,
) -> ApiResult<Json<Vec<Value>>> {
    let standings = state.ergast.driver_standings(&params.season).await?;
    Ok(Json(standings))
}

/// Build browse routes
pub fn browse_routes() -> Router<AppState> {
    Router::new()
        .route("/api/movies/search", get(search_movies))
        .route("/api/movies/trending", get(trending_movies))
        .route("/api/movies/category/:category", get(movies_by_category))
        .route("/api/movies/:imdb_id", get(movie_details))
        .route("/api/sports/football/fixtures", get(football_fixtures))
        .route("/api/sports/football/standings", get(football_standings))
        .route("/api/sports/basketball/games", get(basketball_games))
        .route("/api/sports/basketball/standings", get(basketball_standings))
        .route("/api/sports/formula1/races", get(formula1_races))
        .route("/api/sports/formula1/standings", get(formula1_standings))
}
