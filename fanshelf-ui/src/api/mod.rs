//! HTTP API handlers for fanshelf-ui

pub mod browse;
pub mod health;
pub mod movies;
pub mod sports;

pub use browse::browse_routes;
pub use health::health_routes;
pub use movies::movie_favorites_routes;
pub use sports::sports_favorites_routes;
