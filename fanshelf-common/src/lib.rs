//! # FanShelf Common Library
//!
//! Shared code for the FanShelf favorites hub including:
//! - Database bootstrap and the key-value storage substrate
//! - Movie and sports data models
//! - Identity resolution for sports records
//! - Statistics aggregation over the movie collection
//! - Configuration loading

pub mod config;
pub mod db;
pub mod error;
pub mod identity;
pub mod models;
pub mod stats;

pub use error::{Error, Result};
