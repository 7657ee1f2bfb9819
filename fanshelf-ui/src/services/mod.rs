//! Upstream API clients
//!
//! One module per provider. Clients are constructed once at startup and
//! shared through `AppState`; every client carries a request timeout. A
//! provider without a configured key stays constructed but fails each call
//! with `UpstreamError::MissingKey`.

pub mod basketball_client;
pub mod ergast_client;
pub mod football_client;
pub mod omdb_client;

pub use basketball_client::BasketballClient;
pub use ergast_client::ErgastClient;
pub use football_client::FootballClient;
pub use omdb_client::{OmdbClient, SearchPage};

use thiserror::Error;

/// Errors shared by the upstream clients
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// No API key configured for this provider
    #[error("{0} API key not configured")]
    MissingKey(&'static str),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    /// Provider answered 200 but rejected the request in its envelope
    #[error("Provider error: {0}")]
    Provider(String),
}
