//! Sports favorites API handlers
//!
//! Records arrive as tagged bodies (`sport` discriminator); identity is
//! derived server-side, never taken from the client. Status and toggle
//! take the full record because the caller usually has a provider payload
//! in hand rather than a stored id.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use fanshelf_common::identity::resolve_id;
use fanshelf_common::models::{Sport, SportsFavorite, SportsItem};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::favorites::sports::SportsAddOutcome;
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub sport: Option<Sport>,
}

/// Full favorites view: the three per-sport lists plus the combined one
#[derive(Debug, Serialize)]
pub struct SportsOverviewResponse {
    pub football: Vec<SportsFavorite>,
    pub basketball: Vec<SportsFavorite>,
    pub formula1: Vec<SportsFavorite>,
    pub all: Vec<SportsFavorite>,
}

/// GET /api/favorites/sports
///
/// With `?sport=`, one sport's list; without, the full overview.
pub async fn list_sports_favorites(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Response> {
    match params.sport {
        Some(sport) => {
            let favorites = state.sports_favorites.list(sport).await?;
            Ok(Json(favorites).into_response())
        }
        None => {
            let collection = state.sports_favorites.collection().await?;
            let all = collection.flattened();
            Ok(Json(SportsOverviewResponse {
                football: collection.football,
                basketball: collection.basketball,
                formula1: collection.formula1,
                all,
            })
            .into_response())
        }
    }
}

/// POST /api/favorites/sports
pub async fn add_sports_favorite(
    State(state): State<AppState>,
    Json(item): Json<SportsItem>,
) -> ApiResult<Json<SportsAddOutcome>> {
    let outcome = state.sports_favorites.add(item).await?;
    Ok(Json(outcome))
}

/// DELETE /api/favorites/sports
///
/// With `?sport=`, empties only that list; without, the whole collection.
pub async fn clear_sports_favorites(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Value>> {
    state.sports_favorites.clear(params.sport).await?;
    Ok(Json(json!({"status": "cleared"})))
}

/// POST /api/favorites/sports/toggle
pub async fn toggle_sports_favorite(
    State(state): State<AppState>,
    Json(item): Json<SportsItem>,
) -> ApiResult<Json<Value>> {
    let id = resolve_id(&item);
    let favorite = state.sports_favorites.toggle(item).await?;
    Ok(Json(json!({"favorite": favorite, "id": id})))
}

/// POST /api/favorites/sports/status
pub async fn sports_favorite_status(
    State(state): State<AppState>,
    Json(item): Json<SportsItem>,
) -> ApiResult<Json<Value>> {
    let id = resolve_id(&item);
    let favorite = state.sports_favorites.is_favorite(&item).await?;
    Ok(Json(json!({"favorite": favorite, "id": id})))
}

/// DELETE /api/favorites/sports/:sport/:id
pub async fn remove_sports_favorite(
    State(state): State<AppState>,
    Path((sport, id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let sport: Sport = sport
        .parse()
        .map_err(|e: fanshelf_common::Error| ApiError::BadRequest(e.to_string()))?;
    let removed = state.sports_favorites.remove(sport, &id).await?;
    Ok(Json(json!({"removed": removed})))
}

/// Build sports favorites routes
pub fn sports_favorites_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/favorites/sports",
            get(list_sports_favorites)
                .post(add_sports_favorite)
                .delete(clear_sports_favorites),
        )
        .route("/api/favorites/sports/toggle", post(toggle_sports_favorite))
        .route("/api/favorites/sports/status", post(sports_favorite_status))
        .route(
            "/api/favorites/sports/:sport/:id",
            axum::routing::delete(remove_sports_favorite),
        )
}
