//! Favorites stores
//!
//! Durable favorites collections over the key-value substrate. One store
//! per domain: movies keyed by IMDB id, sports keyed by derived identity.
//! Each store serializes its mutations behind a per-store async mutex so
//! a read-modify-write cycle never interleaves with another.

pub mod movies;
pub mod sports;

pub use movies::{MovieDetailProvider, MovieFavoritesStore, MovieSort};
pub use sports::SportsFavoritesStore;
