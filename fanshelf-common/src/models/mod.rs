//! Data models for the favorites collections
//!
//! Field names stay wire-compatible with the blobs the original browser
//! client persisted: movie fields keep their OMDB PascalCase names, sports
//! payloads keep their upstream names, and the store-added fields are
//! `id`, `sport`, and `dateAdded`.

pub mod movie;
pub mod sports;

pub use movie::{MovieRecord, RatingEntry};
pub use sports::{
    BasketballGame, FootballFixture, FormulaOneRace, RaceResult, Sport, SportsFavorite,
    SportsFavoritesCollection, SportsItem,
};
