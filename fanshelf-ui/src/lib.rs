//! # FanShelf UI Service
//!
//! HTTP backend for the FanShelf favorites hub:
//! - Movie and sports favorites persistence over SQLite
//! - Identity resolution for sports records
//! - Browse proxies for the upstream movie and sports APIs
//! - Collection statistics

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod favorites;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ApiKeys;
use crate::favorites::{MovieFavoritesStore, SportsFavoritesStore};
use crate::services::{BasketballClient, ErgastClient, FootballClient, OmdbClient, UpstreamError};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Movie favorites store (OMDB client doubles as its enrichment source)
    pub movie_favorites: MovieFavoritesStore,
    /// Sports favorites store
    pub sports_favorites: SportsFavoritesStore,
    /// OMDB movie metadata client
    pub omdb: Arc<OmdbClient>,
    /// api-sports football client
    pub football: Arc<FootballClient>,
    /// api-sports basketball client
    pub basketball: Arc<BasketballClient>,
    /// Ergast Formula 1 client
    pub ergast: Arc<ErgastClient>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, keys: &ApiKeys) -> Result<Self, UpstreamError> {
        let omdb = Arc::new(OmdbClient::new(keys.omdb.clone())?);
        let football = Arc::new(FootballClient::new(keys.sports.clone())?);
        let basketball = Arc::new(BasketballClient::new(keys.sports.clone())?);
        let ergast = Arc::new(ErgastClient::new()?);

        let movie_favorites = MovieFavoritesStore::new(db.clone(), omdb.clone());
        let sports_favorites = SportsFavoritesStore::new(db.clone());

        Ok(Self {
            db,
            movie_favorites,
            sports_favorites,
            omdb,
            football,
            basketball,
            ergast,
            startup_time: Utc::now(),
        })
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::movie_favorites_routes())
        .merge(api::sports_favorites_routes())
        .merge(api::browse_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
