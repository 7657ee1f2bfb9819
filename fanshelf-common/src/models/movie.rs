//! Movie record model
//!
//! OMDB-shaped movie metadata. Search results carry only the display
//! fields (title, year, poster, type); detail fetches fill in the rest.
//! The favorites store checks [`MovieRecord::has_detail_fields`] to decide
//! whether an add needs an enrichment fetch first.

use serde::{Deserialize, Serialize};

/// One movie as delivered by the OMDB API and stored in the favorites blob
///
/// `imdb_id` is the collection key: no two favorites share it. All other
/// fields are provider data, absent on search-shaped records and present
/// (possibly as the literal `"N/A"`) on detail-shaped records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MovieRecord {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,

    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,

    #[serde(rename = "Type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rated: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub released: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub writer: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub actors: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub awards: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratings: Option<Vec<RatingEntry>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metascore: Option<String>,

    #[serde(rename = "imdbRating", skip_serializing_if = "Option::is_none")]
    pub imdb_rating: Option<String>,

    #[serde(rename = "imdbVotes", skip_serializing_if = "Option::is_none")]
    pub imdb_votes: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub box_office: Option<String>,
}

/// One entry of the per-source ratings list (`{"Source": …, "Value": …}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RatingEntry {
    pub source: String,
    pub value: String,
}

impl MovieRecord {
    /// Whether the record already carries the fields the statistics view
    /// needs: rating, runtime, and genre.
    ///
    /// A field counts as carried when it is present and non-empty; the
    /// provider's `"N/A"` placeholder counts as carried (fetching again
    /// would return the same placeholder).
    pub fn has_detail_fields(&self) -> bool {
        field_present(&self.imdb_rating)
            && field_present(&self.runtime)
            && field_present(&self.genre)
    }
}

fn field_present(value: &Option<String>) -> bool {
    matches!(value, Some(s) if !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail_record() -> MovieRecord {
        serde_json::from_value(serde_json::json!({
            "Title": "Inception",
            "Year": "2010",
            "Rated": "PG-13",
            "Released": "16 Jul 2010",
            "Runtime": "148 min",
            "Genre": "Action, Adventure, Sci-Fi",
            "Director": "Christopher Nolan",
            "Actors": "Leonardo DiCaprio, Joseph Gordon-Levitt",
            "Plot": "A thief who steals corporate secrets...",
            "Poster": "https://example.com/inception.jpg",
            "Ratings": [{"Source": "Internet Movie Database", "Value": "8.8/10"}],
            "Metascore": "74",
            "imdbRating": "8.8",
            "imdbVotes": "2,143,110",
            "imdbID": "tt1375666",
            "Type": "movie",
            "BoxOffice": "$292,576,195"
        }))
        .unwrap()
    }

    #[test]
    fn test_decodes_omdb_detail_payload() {
        let movie = detail_record();
        assert_eq!(movie.imdb_id, "tt1375666");
        assert_eq!(movie.title, "Inception");
        assert_eq!(movie.runtime.as_deref(), Some("148 min"));
        assert_eq!(movie.kind.as_deref(), Some("movie"));
        assert_eq!(movie.ratings.as_ref().unwrap().len(), 1);
        assert_eq!(movie.box_office.as_deref(), Some("$292,576,195"));
    }

    #[test]
    fn test_decodes_search_shaped_payload() {
        // Search results carry only the display fields
        let movie: MovieRecord = serde_json::from_value(serde_json::json!({
            "Title": "Inception",
            "Year": "2010",
            "imdbID": "tt1375666",
            "Type": "movie",
            "Poster": "https://example.com/inception.jpg"
        }))
        .unwrap();
        assert_eq!(movie.imdb_id, "tt1375666");
        assert!(movie.runtime.is_none());
        assert!(movie.imdb_rating.is_none());
    }

    #[test]
    fn test_serializes_with_wire_field_names() {
        let value = serde_json::to_value(detail_record()).unwrap();
        let obj = value.as_object().unwrap();
        assert!(obj.contains_key("imdbID"));
        assert!(obj.contains_key("Title"));
        assert!(obj.contains_key("imdbRating"));
        assert!(obj.contains_key("BoxOffice"));
        assert!(obj.contains_key("Type"));
        // Absent optionals stay out of the blob entirely
        assert!(!obj.contains_key("Language"));
    }

    #[test]
    fn test_has_detail_fields() {
        let mut movie = detail_record();
        assert!(movie.has_detail_fields());

        movie.runtime = None;
        assert!(!movie.has_detail_fields());

        movie.runtime = Some(String::new());
        assert!(!movie.has_detail_fields());

        // "N/A" is the provider's own placeholder; refetching cannot improve it
        movie.runtime = Some("N/A".to_string());
        assert!(movie.has_detail_fields());
    }
}
