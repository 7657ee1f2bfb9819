//! Movie favorites API handlers
//!
//! CRUD over the movie favorites collection plus the statistics view.
//! Responses use the OMDB wire field names (`imdbID`, `Title`, ...) so the
//! frontend renders store output and search output with the same code.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use fanshelf_common::models::MovieRecord;
use fanshelf_common::stats::{CollectionStats, NOT_AVAILABLE};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::favorites::movies::{MovieAddOutcome, MovieSort};
use crate::{ApiResult, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub sort: MovieSort,
}

/// Statistics rendering for the frontend
///
/// Unavailable aggregates render as the literal `"N/A"`; the average
/// rating renders with one decimal place. Year fields stay numeric when
/// available.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total: usize,
    pub latest_year: Value,
    pub oldest_year: Value,
    pub avg_rating: Value,
    pub top_genre: Value,
    pub total_runtime: u32,
}

impl From<CollectionStats> for StatsResponse {
    fn from(stats: CollectionStats) -> Self {
        Self {
            total: stats.total,
            latest_year: or_not_available(stats.latest_year.map(Value::from)),
            oldest_year: or_not_available(stats.oldest_year.map(Value::from)),
            avg_rating: or_not_available(
                stats.avg_rating.map(|r| Value::from(format!("{:.1}", r))),
            ),
            top_genre: or_not_available(stats.top_genre.map(Value::from)),
            total_runtime: stats.total_runtime_minutes,
        }
    }
}

fn or_not_available(value: Option<Value>) -> Value {
    value.unwrap_or_else(|| Value::from(NOT_AVAILABLE))
}

/// GET /api/favorites/movies
pub async fn list_movie_favorites(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<MovieRecord>>> {
    let movies = state.movie_favorites.list(params.sort).await?;
    Ok(Json(movies))
}

/// POST /api/favorites/movies
pub async fn add_movie_favorite(
    State(state): State<AppState>,
    Json(record): Json<MovieRecord>,
) -> ApiResult<Json<MovieAddOutcome>> {
    let outcome = state.movie_favorites.add(record).await?;
    Ok(Json(outcome))
}

/// DELETE /api/favorites/movies
pub async fn clear_movie_favorites(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    state.movie_favorites.clear().await?;
    Ok(Json(json!({"status": "cleared"})))
}

/// GET /api/favorites/movies/stats
pub async fn movie_stats(State(state): State<AppState>) -> ApiResult<Json<StatsResponse>> {
    let stats = state.movie_favorites.stats().await?;
    Ok(Json(stats.into()))
}

/// POST /api/favorites/movies/toggle
pub async fn toggle_movie_favorite(
    State(state): State<AppState>,
    Json(record): Json<MovieRecord>,
) -> ApiResult<Json<Value>> {
    let favorite = state.movie_favorites.toggle(record).await?;
    Ok(Json(json!({"favorite": favorite})))
}

/// GET /api/favorites/movies/:imdb_id/status
pub async fn movie_favorite_status(
    State(state): State<AppState>,
    Path(imdb_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let favorite = state.movie_favorites.is_favorite(&imdb_id).await?;
    Ok(Json(json!({"favorite": favorite})))
}

/// DELETE /api/favorites/movies/:imdb_id
pub async fn remove_movie_favorite(
    State(state): State<AppState>,
    Path(imdb_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let removed = state.movie_favorites.remove(&imdb_id).await?;
    Ok(Json(json!({"removed": removed})))
}

/// Build movie favorites routes
pub fn movie_favorites_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/favorites/movies",
            get(list_movie_favorites)
                .post(add_movie_favorite)
                .delete(clear_movie_favorites),
        )
        .route("/api/favorites/movies/stats", get(movie_stats))
        .route("/api/favorites/movies/toggle", post(toggle_movie_favorite))
        .route("/api/favorites/movies/:imdb_id/status", get(movie_favorite_status))
        .route(
            "/api/favorites/movies/:imdb_id",
            axum::routing::delete(remove_movie_favorite),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_render_empty_collection() {
        let response = StatsResponse::from(CollectionStats {
            total: 0,
            latest_year: None,
            oldest_year: None,
            avg_rating: None,
            top_genre: None,
            total_runtime_minutes: 0,
        });

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({
                "total": 0,
                "latestYear": "N/A",
                "oldestYear": "N/A",
                "avgRating": "N/A",
                "topGenre": "N/A",
                "totalRuntime": 0
            })
        );
    }

    #[test]
    fn test_stats_render_populated_collection() {
        let response = StatsResponse::from(CollectionStats {
            total: 2,
            latest_year: Some(2019),
            oldest_year: Some(1994),
            avg_rating: Some(8.75),
            top_genre: Some("Drama".to_string()),
            total_runtime_minutes: 284,
        });

        let value = serde_json::to_value(&response).unwrap();
        // Years stay numeric, the rating renders with one decimal place
        assert_eq!(value["latestYear"], 2019);
        assert_eq!(value["oldestYear"], 1994);
        assert_eq!(value["avgRating"], "8.8");
        assert_eq!(value["topGenre"], "Drama");
        assert_eq!(value["totalRuntime"], 284);
    }
}
