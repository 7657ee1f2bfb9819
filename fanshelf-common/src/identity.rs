//! Identity resolution for sports records
//!
//! Upstream sports payloads have no shared key field, so favorites are
//! deduplicated under a derived identity: a deterministic string computed
//! from the record's content, prefixed with the sport name. The same
//! derivation runs on every add, remove, toggle, and status check; a
//! record resolves to the same key no matter which path asks.
//!
//! Derivation never fails. Missing composite parts render as empty
//! strings, which keeps the key stable for equal inputs even when the
//! provider left gaps.

use crate::models::{BasketballGame, FootballFixture, FormulaOneRace, SportsItem};

/// Derive the deduplication key for a sports record
///
/// Per-sport rule, first available part wins:
/// - football: provider fixture id, else the generic top-level id, else
///   home team + away team + kick-off date-time
/// - basketball: provider game id, else home team + visiting team + start
///   timestamp
/// - formula1: round (race name when round is absent) + season + circuit
///   id (circuit name when the id is absent)
pub fn resolve_id(item: &SportsItem) -> String {
    match item {
        SportsItem::Football(fixture) => format!("football_{}", football_key(fixture)),
        SportsItem::Basketball(game) => format!("basketball_{}", basketball_key(game)),
        SportsItem::Formula1(race) => format!("formula1_{}", formula1_key(race)),
    }
}

fn football_key(fixture: &FootballFixture) -> String {
    if let Some(id) = fixture.fixture.as_ref().and_then(|f| f.id) {
        return id.to_string();
    }
    if let Some(id) = fixture.id {
        return id.to_string();
    }

    let teams = fixture.teams.as_ref();
    let home = teams
        .and_then(|t| t.home.as_ref())
        .and_then(|t| t.name.as_deref())
        .unwrap_or_default();
    let away = teams
        .and_then(|t| t.away.as_ref())
        .and_then(|t| t.name.as_deref())
        .unwrap_or_default();
    let date = fixture
        .fixture
        .as_ref()
        .and_then(|f| f.date.as_deref())
        .unwrap_or_default();
    format!("{}_{}_{}", home, away, date)
}

fn basketball_key(game: &BasketballGame) -> String {
    if let Some(id) = game.id {
        return id.to_string();
    }

    let teams = game.teams.as_ref();
    let home = teams
        .and_then(|t| t.home.as_ref())
        .and_then(|t| t.name.as_deref())
        .unwrap_or_default();
    let visitors = teams
        .and_then(|t| t.visitors.as_ref())
        .and_then(|t| t.name.as_deref())
        .unwrap_or_default();
    let start = game
        .date
        .as_ref()
        .and_then(|d| d.start.as_deref())
        .unwrap_or_default();
    format!("{}_{}_{}", home, visitors, start)
}

fn formula1_key(race: &FormulaOneRace) -> String {
    let round_or_name = non_empty(race.round.as_deref())
        .or_else(|| non_empty(race.race_name.as_deref()))
        .unwrap_or_default();
    let season = non_empty(race.season.as_deref()).unwrap_or_default();
    let circuit = race.circuit.as_ref();
    let circuit_key = circuit
        .and_then(|c| non_empty(c.circuit_id.as_deref()))
        .or_else(|| circuit.and_then(|c| non_empty(c.circuit_name.as_deref())))
        .unwrap_or_default();
    format!("{}_{}_{}", round_or_name, season, circuit_key)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}
