//! Statistics aggregation over the movie favorites collection
//!
//! Derives a summary view (counts, year range, average rating, top genre,
//! total runtime) from stored movie records. Source fields are provider
//! strings in inconsistent shapes, so every extractor here is defensive:
//! unusable values are excluded from their aggregate, never zeroed or
//! propagated as errors.

use crate::models::MovieRecord;
use chrono::{Datelike, Utc};

/// Earliest release year accepted as plausible
const MIN_YEAR: i32 = 1800;

/// Runtimes at or above this many minutes are rejected as implausible
const MAX_RUNTIME_MINUTES: u64 = 1000;

/// Placeholder the provider uses for absent fields
pub const NOT_AVAILABLE: &str = "N/A";

/// Summary metrics over one movie collection
///
/// Derived on every read, never stored. `None` means the collection held
/// no usable value for that metric; the HTTP layer renders it as "N/A".
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionStats {
    pub total: usize,
    pub latest_year: Option<i32>,
    pub oldest_year: Option<i32>,
    pub avg_rating: Option<f64>,
    pub top_genre: Option<String>,
    pub total_runtime_minutes: u32,
}

/// Compute summary statistics for a movie collection
pub fn compute_stats(movies: &[MovieRecord]) -> CollectionStats {
    let years: Vec<i32> = movies
        .iter()
        .filter_map(|m| m.year.as_deref().and_then(parse_year))
        .collect();

    let ratings: Vec<f64> = movies
        .iter()
        .filter_map(|m| m.imdb_rating.as_deref().and_then(parse_rating))
        .collect();

    // Tally genres in first-encountered order so ties resolve stably
    let mut genre_counts: Vec<(String, u32)> = Vec::new();
    for genre_field in movies.iter().filter_map(|m| m.genre.as_deref()) {
        if genre_field.is_empty() || genre_field == NOT_AVAILABLE {
            continue;
        }
        for genre in genre_field.split(',').map(str::trim).filter(|g| !g.is_empty()) {
            match genre_counts.iter_mut().find(|(name, _)| name == genre) {
                Some((_, count)) => *count += 1,
                None => genre_counts.push((genre.to_string(), 1)),
            }
        }
    }
    let mut top_genre: Option<(String, u32)> = None;
    for (name, count) in genre_counts {
        match &top_genre {
            Some((_, best)) if *best >= count => {}
            _ => top_genre = Some((name, count)),
        }
    }

    let total_runtime_minutes: u32 = movies
        .iter()
        .filter_map(|m| m.runtime.as_deref().and_then(parse_runtime_minutes))
        .sum();

    let avg_rating = if ratings.is_empty() {
        None
    } else {
        Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
    };

    CollectionStats {
        total: movies.len(),
        latest_year: years.iter().max().copied(),
        oldest_year: years.iter().min().copied(),
        avg_rating,
        top_genre: top_genre.map(|(name, _)| name),
        total_runtime_minutes,
    }
}

/// Extract a plausible release year from a provider year field
///
/// Strips non-digit characters before parsing, so "2010" and "2010–2012"
/// both yield digits (the latter overflows the plausibility window and is
/// rejected). Accepts years in [1800, current year + 5].
pub fn parse_year(raw: &str) -> Option<i32> {
    if raw.is_empty() || raw == NOT_AVAILABLE {
        return None;
    }
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let year: i32 = digits.parse().ok()?;
    let max_year = Utc::now().year() + 5;
    (MIN_YEAR..=max_year).contains(&year).then_some(year)
}

/// Extract a rating from a provider rating field, accepting [0, 10]
///
/// Parses the leading numeric prefix, so ratio forms like "8.8/10" yield
/// their leading component.
pub fn parse_rating(raw: &str) -> Option<f64> {
    if raw.is_empty() || raw == NOT_AVAILABLE {
        return None;
    }
    let rating = leading_float(raw.trim())?;
    (0.0..=10.0).contains(&rating).then_some(rating)
}

/// Parse a runtime string into total minutes
///
/// Accepted forms: "2h 30m" / "2h30m" (hours and minutes), "2h" /
/// "2 hours" (hours only), "120 min" (minutes only), "90" (bare number,
/// assumed minutes). Values of zero or ≥ 1000 minutes are rejected as
/// implausible.
pub fn parse_runtime_minutes(raw: &str) -> Option<u32> {
    if raw.is_empty() || raw == NOT_AVAILABLE {
        return None;
    }
    let s = raw.to_ascii_lowercase();

    let minutes: u64 = if s.contains('h') && s.contains('m') {
        let hours = number_before(&s, b'h').unwrap_or(0);
        let mins = number_before(&s, b'm').unwrap_or(0);
        hours * 60 + mins
    } else if s.contains('h') {
        first_number(&s).unwrap_or(0) * 60
    } else if s.contains("min") {
        first_number(&s).unwrap_or(0)
    } else {
        let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
        digits.parse().unwrap_or(0)
    };

    (minutes > 0 && minutes < MAX_RUNTIME_MINUTES).then_some(minutes as u32)
}

/// First run of digits immediately followed by `unit`
fn number_before(s: &str, unit: u8) -> Option<u64> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i < bytes.len() && bytes[i] == unit {
                return s[start..i].parse().ok();
            }
        } else {
            i += 1;
        }
    }
    None
}

/// First run of digits anywhere in the string
fn first_number(s: &str) -> Option<u64> {
    let bytes = s.as_bytes();
    let start = bytes.iter().position(|b| b.is_ascii_digit())?;
    let end = bytes[start..]
        .iter()
        .position(|b| !b.is_ascii_digit())
        .map(|offset| start + offset)
        .unwrap_or(bytes.len());
    s[start..end].parse().ok()
}

/// Longest numeric prefix: optional sign, digits, at most one decimal point
fn leading_float(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = 0;
    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let mut seen_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => end += 1,
            b'.' if !seen_dot => {
                seen_dot = true;
                end += 1;
            }
            _ => break,
        }
    }
    s[..end].parse().ok()
}
