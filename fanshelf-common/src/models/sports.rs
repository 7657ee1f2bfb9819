//! Sports record models
//!
//! One tagged union over the three sports payload shapes, discriminated by
//! the `sport` field. Decoding happens once at the boundary (HTTP request
//! body or persisted blob); everything past that point works on typed
//! variants instead of probing nested optionals.
//!
//! Payload shapes follow the upstream APIs: api-sports fixtures for
//! football, api-sports games for basketball, Ergast races for Formula 1
//! (Ergast serializes every scalar as a string, including season and
//! round).

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The three supported sports
///
/// Exhaustive by design: favorites can only be filed under one of these,
/// so identity derivation never needs an unknown-sport fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Football,
    Basketball,
    Formula1,
}

impl Sport {
    pub const ALL: [Sport; 3] = [Sport::Football, Sport::Basketball, Sport::Formula1];

    /// Lowercase wire name, also used as the derived-id prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            Sport::Football => "football",
            Sport::Basketball => "basketball",
            Sport::Formula1 => "formula1",
        }
    }
}

impl std::fmt::Display for Sport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Sport {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "football" => Ok(Sport::Football),
            "basketball" => Ok(Sport::Basketball),
            "formula1" => Ok(Sport::Formula1),
            other => Err(Error::InvalidInput(format!("Unknown sport: {}", other))),
        }
    }
}

/// One favoritable sports record, tagged with its sport
///
/// Serialized flat with a `sport` discriminator field, matching both the
/// HTTP request bodies and the persisted blob layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "sport", rename_all = "lowercase")]
pub enum SportsItem {
    Football(FootballFixture),
    Basketball(BasketballGame),
    Formula1(FormulaOneRace),
}

impl SportsItem {
    pub fn sport(&self) -> Sport {
        match self {
            SportsItem::Football(_) => Sport::Football,
            SportsItem::Basketball(_) => Sport::Basketball,
            SportsItem::Formula1(_) => Sport::Formula1,
        }
    }

    /// Drop a provider-assigned top-level `id` before storage
    ///
    /// The stored favorite carries the derived key in its `id` field; a
    /// raw provider id at the same level would collide with it when the
    /// item is flattened into the favorite.
    pub fn clear_provider_id(&mut self) {
        match self {
            SportsItem::Football(fixture) => fixture.id = None,
            SportsItem::Basketball(game) => game.id = None,
            SportsItem::Formula1(_) => {}
        }
    }
}

// ============================================================================
// Football (api-sports /fixtures shape)
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FootballFixture {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixture: Option<FixtureInfo>,

    /// Generic record identifier some feeds carry at the top level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub league: Option<FixtureLeague>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub teams: Option<FixtureTeams>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub goals: Option<FixtureGoals>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixtureInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Kick-off date-time (ISO 8601 from the provider)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<FixtureStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<FixtureVenue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixtureStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixtureVenue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixtureLeague {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixtureTeams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home: Option<Team>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub away: Option<Team>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Team {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixtureGoals {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub away: Option<i64>,
}

// ============================================================================
// Basketball (games shape: home/visitors teams, date.start)
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasketballGame {
    /// Provider game identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<GameDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<GameStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub teams: Option<GameTeams>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<GameScores>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub arena: Option<Arena>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameDate {
    /// Tip-off timestamp (ISO 8601 from the provider)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameTeams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home: Option<Team>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub visitors: Option<Team>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameScores {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home: Option<TeamScore>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub visitors: Option<TeamScore>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamScore {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub linescore: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

// ============================================================================
// Formula 1 (Ergast race shape; every scalar is a string)
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormulaOneRace {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(rename = "raceName", skip_serializing_if = "Option::is_none")]
    pub race_name: Option<String>,

    #[serde(rename = "Circuit", skip_serializing_if = "Option::is_none")]
    pub circuit: Option<Circuit>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    #[serde(rename = "FirstPractice", skip_serializing_if = "Option::is_none")]
    pub first_practice: Option<SessionTime>,

    #[serde(rename = "SecondPractice", skip_serializing_if = "Option::is_none")]
    pub second_practice: Option<SessionTime>,

    #[serde(rename = "ThirdPractice", skip_serializing_if = "Option::is_none")]
    pub third_practice: Option<SessionTime>,

    #[serde(rename = "Qualifying", skip_serializing_if = "Option::is_none")]
    pub qualifying: Option<SessionTime>,

    #[serde(rename = "Sprint", skip_serializing_if = "Option::is_none")]
    pub sprint: Option<SessionTime>,

    /// Top finishers, attached by the races endpoint once results exist
    #[serde(rename = "Results", skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<RaceResult>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    #[serde(rename = "circuitId", skip_serializing_if = "Option::is_none")]
    pub circuit_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(rename = "circuitName", skip_serializing_if = "Option::is_none")]
    pub circuit_name: Option<String>,

    #[serde(rename = "Location", skip_serializing_if = "Option::is_none")]
    pub location: Option<CircuitLocation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CircuitLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionTime {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RaceResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub laps: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(rename = "Driver", skip_serializing_if = "Option::is_none")]
    pub driver: Option<Driver>,

    #[serde(rename = "Constructor", skip_serializing_if = "Option::is_none")]
    pub constructor: Option<Constructor>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    #[serde(rename = "driverId", skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(rename = "givenName", skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,

    #[serde(rename = "familyName", skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Constructor {
    #[serde(rename = "constructorId", skip_serializing_if = "Option::is_none")]
    pub constructor_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
}

// ============================================================================
// Stored favorites
// ============================================================================

/// One stored sports favorite: the item plus the two fields the store
/// stamps at insertion time
///
/// Flattened on the wire: `{"id": …, "dateAdded": …, "sport": …, …}`.
/// `date_added` is assigned once at write time and never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SportsFavorite {
    /// Derived identity (see the identity module)
    pub id: String,

    #[serde(rename = "dateAdded")]
    pub date_added: DateTime<Utc>,

    #[serde(flatten)]
    pub item: SportsItem,
}

/// The full persisted sports collection: exactly three sequences, always
/// present, insertion order preserved
///
/// A missing or partial blob materializes the absent sequences as empty;
/// serialization always writes all three keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SportsFavoritesCollection {
    #[serde(default)]
    pub football: Vec<SportsFavorite>,

    #[serde(default)]
    pub basketball: Vec<SportsFavorite>,

    #[serde(default)]
    pub formula1: Vec<SportsFavorite>,
}

impl SportsFavoritesCollection {
    pub fn list(&self, sport: Sport) -> &Vec<SportsFavorite> {
        match sport {
            Sport::Football => &self.football,
            Sport::Basketball => &self.basketball,
            Sport::Formula1 => &self.formula1,
        }
    }

    pub fn list_mut(&mut self, sport: Sport) -> &mut Vec<SportsFavorite> {
        match sport {
            Sport::Football => &mut self.football,
            Sport::Basketball => &mut self.basketball,
            Sport::Formula1 => &mut self.formula1,
        }
    }

    /// Combined flattened view in football, basketball, formula1 order
    pub fn flattened(&self) -> Vec<SportsFavorite> {
        let mut all =
            Vec::with_capacity(self.football.len() + self.basketball.len() + self.formula1.len());
        for sport in Sport::ALL {
            all.extend(self.list(sport).iter().cloned());
        }
        all
    }

    pub fn total(&self) -> usize {
        self.football.len() + self.basketball.len() + self.formula1.len()
    }
}
