//! Movie favorites store
//!
//! The whole collection lives under one storage key as a JSON array in
//! insertion order. Every mutation rereads the blob, applies the change,
//! and writes the full array back; the store-level mutex keeps those
//! cycles from interleaving.
//!
//! Adding a search-shaped record (no rating, runtime, or genre) triggers
//! an enrichment fetch through [`MovieDetailProvider`] so the statistics
//! view has something to aggregate. When enrichment fails the record is
//! stored as given rather than failing the add.

use crate::services::UpstreamError;
use async_trait::async_trait;
use fanshelf_common::db::kv;
use fanshelf_common::models::MovieRecord;
use fanshelf_common::stats::{compute_stats, parse_rating, CollectionStats};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::cmp::Ordering;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Storage key for the movie favorites blob
pub const MOVIE_FAVORITES_KEY: &str = "movie_favorites";

/// Source of full movie details for enrichment on add
#[async_trait]
pub trait MovieDetailProvider: Send + Sync {
    async fn fetch_details(&self, imdb_id: &str) -> Result<MovieRecord, UpstreamError>;
}

/// Result of an add: whether the collection changed, whether the stored
/// record came from an enrichment fetch, and the record as stored
#[derive(Debug, Clone, Serialize)]
pub struct MovieAddOutcome {
    pub added: bool,
    pub enriched: bool,
    pub record: MovieRecord,
}

/// Sort orders for the favorites listing
///
/// `DateAdded` is insertion order, which is how the blob is already laid
/// out, so it needs no reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovieSort {
    Title,
    Year,
    Rating,
    #[default]
    #[serde(alias = "dateAdded")]
    DateAdded,
}

/// Movie favorites store over the key-value substrate
#[derive(Clone)]
pub struct MovieFavoritesStore {
    db: SqlitePool,
    provider: Arc<dyn MovieDetailProvider>,
    write_lock: Arc<Mutex<()>>,
}

impl MovieFavoritesStore {
    pub fn new(db: SqlitePool, provider: Arc<dyn MovieDetailProvider>) -> Self {
        Self {
            db,
            provider,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Current favorites in the requested order
    pub async fn list(&self, sort: MovieSort) -> fanshelf_common::Result<Vec<MovieRecord>> {
        let mut movies = self.read_collection().await?;
        sort_movies(&mut movies, sort);
        Ok(movies)
    }

    /// Add a movie to the favorites
    ///
    /// A record already present (by IMDB id) is returned unchanged with
    /// `added: false`. A record missing its detail fields is enriched
    /// through the provider first; on provider failure the record is
    /// stored as given.
    pub async fn add(&self, record: MovieRecord) -> fanshelf_common::Result<MovieAddOutcome> {
        let _guard = self.write_lock.lock().await;

        let mut movies = self.read_collection().await?;
        if let Some(existing) = movies.iter().find(|m| m.imdb_id == record.imdb_id) {
            debug!(imdb_id = %record.imdb_id, "Movie already in favorites");
            return Ok(MovieAddOutcome {
                added: false,
                enriched: false,
                record: existing.clone(),
            });
        }

        let (record, enriched) = if record.has_detail_fields() {
            (record, false)
        } else {
            match self.provider.fetch_details(&record.imdb_id).await {
                Ok(details) => (details, true),
                Err(e) => {
                    warn!(
                        imdb_id = %record.imdb_id,
                        "Enrichment fetch failed, storing record as given: {}",
                        e
                    );
                    (record, false)
                }
            }
        };

        movies.push(record.clone());
        self.write_collection(&movies).await?;

        info!(
            imdb_id = %record.imdb_id,
            title = %record.title,
            enriched,
            total = movies.len(),
            "Added movie to favorites"
        );
        Ok(MovieAddOutcome {
            added: true,
            enriched,
            record,
        })
    }

    /// Remove a movie by IMDB id
    ///
    /// Returns whether the collection changed. Removing an absent id is
    /// not an error and skips the write entirely.
    pub async fn remove(&self, imdb_id: &str) -> fanshelf_common::Result<bool> {
        let _guard = self.write_lock.lock().await;

        let mut movies = self.read_collection().await?;
        let before = movies.len();
        movies.retain(|m| m.imdb_id != imdb_id);

        if movies.len() == before {
            debug!(imdb_id = %imdb_id, "Movie not in favorites, nothing to remove");
            return Ok(false);
        }

        self.write_collection(&movies).await?;
        info!(imdb_id = %imdb_id, total = movies.len(), "Removed movie from favorites");
        Ok(true)
    }

    /// Flip membership for a record, returning the new favorite state
    pub async fn toggle(&self, record: MovieRecord) -> fanshelf_common::Result<bool> {
        if self.is_favorite(&record.imdb_id).await? {
            self.remove(&record.imdb_id).await?;
            Ok(false)
        } else {
            self.add(record).await?;
            Ok(true)
        }
    }

    /// Drop the whole collection
    pub async fn clear(&self) -> fanshelf_common::Result<()> {
        let _guard = self.write_lock.lock().await;
        kv::remove(&self.db, MOVIE_FAVORITES_KEY).await?;
        info!("Cleared movie favorites");
        Ok(())
    }

    pub async fn is_favorite(&self, imdb_id: &str) -> fanshelf_common::Result<bool> {
        let movies = self.read_collection().await?;
        Ok(movies.iter().any(|m| m.imdb_id == imdb_id))
    }

    /// Aggregate statistics over the current collection
    pub async fn stats(&self) -> fanshelf_common::Result<CollectionStats> {
        let movies = self.read_collection().await?;
        Ok(compute_stats(&movies))
    }

    async fn read_collection(&self) -> fanshelf_common::Result<Vec<MovieRecord>> {
        let Some(blob) = kv::get(&self.db, MOVIE_FAVORITES_KEY).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&blob) {
            Ok(movies) => Ok(movies),
            Err(e) => {
                warn!("Unreadable movie favorites blob, treating as empty: {}", e);
                Ok(Vec::new())
            }
        }
    }

    async fn write_collection(&self, movies: &[MovieRecord]) -> fanshelf_common::Result<()> {
        let blob = serde_json::to_string(movies)?;
        kv::set(&self.db, MOVIE_FAVORITES_KEY, &blob).await
    }
}

/// Reorder in place; ties and unparseable values keep insertion order
fn sort_movies(movies: &mut [MovieRecord], sort: MovieSort) {
    match sort {
        MovieSort::Title => movies.sort_by(|a, b| a.title.cmp(&b.title)),
        MovieSort::Year => movies.sort_by_key(|m| std::cmp::Reverse(leading_number(m.year.as_deref()))),
        MovieSort::Rating => movies.sort_by(|a, b| {
            let ra = rating_value(a);
            let rb = rating_value(b);
            rb.partial_cmp(&ra).unwrap_or(Ordering::Equal)
        }),
        MovieSort::DateAdded => {}
    }
}

/// Leading digit run of a year string (`"2010–2015"` counts as 2010)
fn leading_number(value: Option<&str>) -> i64 {
    let digits: String = value
        .unwrap_or_default()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

fn rating_value(movie: &MovieRecord) -> f64 {
    movie
        .imdb_rating
        .as_deref()
        .and_then(parse_rating)
        .unwrap_or(0.0)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    /// Provider returning a canned record (or failing when `result` is None)
    struct MockProvider {
        result: Option<MovieRecord>,
        calls: AtomicUsize,
    }

    impl MockProvider {
        fn returning(record: MovieRecord) -> Self {
            Self {
                result: Some(record),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                result: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(AtomicOrdering::SeqCst)
        }
    }

    #[async_trait]
    impl MovieDetailProvider for MockProvider {
        async fn fetch_details(&self, _imdb_id: &str) -> Result<MovieRecord, UpstreamError> {
            self.calls.fetch_add(1, AtomicOrdering::SeqCst);
            self.result
                .clone()
                .ok_or_else(|| UpstreamError::Network("connection refused".to_string()))
        }
    }

    fn detail_record(imdb_id: &str, title: &str) -> MovieRecord {
        serde_json::from_value(json!({
            "imdbID": imdb_id,
            "Title": title,
            "Year": "2010",
            "Runtime": "148 min",
            "Genre": "Action, Sci-Fi",
            "imdbRating": "8.8"
        }))
        .unwrap()
    }

    fn search_record(imdb_id: &str, title: &str) -> MovieRecord {
        serde_json::from_value(json!({
            "imdbID": imdb_id,
            "Title": title,
            "Year": "2010",
            "Type": "movie"
        }))
        .unwrap()
    }

    async fn setup_store(provider: MockProvider) -> (MovieFavoritesStore, Arc<MockProvider>) {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        fanshelf_common::db::create_storage_table(&pool).await.unwrap();
        let provider = Arc::new(provider);
        let store = MovieFavoritesStore::new(pool, provider.clone());
        (store, provider)
    }

    #[tokio::test]
    async fn test_empty_store_lists_nothing() {
        let (store, _) = setup_store(MockProvider::failing()).await;
        assert!(store.list(MovieSort::default()).await.unwrap().is_empty());
        assert!(!store.is_favorite("tt1375666").await.unwrap());
    }

    #[tokio::test]
    async fn test_add_detail_record_skips_enrichment() {
        let (store, provider) = setup_store(MockProvider::failing()).await;

        let outcome = store.add(detail_record("tt1375666", "Inception")).await.unwrap();
        assert!(outcome.added);
        assert!(!outcome.enriched);
        assert_eq!(provider.call_count(), 0);

        let movies = store.list(MovieSort::default()).await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].imdb_id, "tt1375666");
    }

    #[tokio::test]
    async fn test_add_search_record_enriches() {
        let enriched = detail_record("tt1375666", "Inception");
        let (store, provider) = setup_store(MockProvider::returning(enriched)).await;

        let outcome = store.add(search_record("tt1375666", "Inception")).await.unwrap();
        assert!(outcome.added);
        assert!(outcome.enriched);
        assert_eq!(provider.call_count(), 1);
        assert_eq!(outcome.record.runtime.as_deref(), Some("148 min"));

        // The stored record is the enriched one
        let movies = store.list(MovieSort::default()).await.unwrap();
        assert_eq!(movies[0].imdb_rating.as_deref(), Some("8.8"));
    }

    #[tokio::test]
    async fn test_add_keeps_original_when_enrichment_fails() {
        let (store, provider) = setup_store(MockProvider::failing()).await;

        let outcome = store.add(search_record("tt1375666", "Inception")).await.unwrap();
        assert!(outcome.added);
        assert!(!outcome.enriched);
        assert_eq!(provider.call_count(), 1);

        let movies = store.list(MovieSort::default()).await.unwrap();
        assert_eq!(movies[0].title, "Inception");
        assert!(movies[0].runtime.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_add_leaves_collection_unchanged() {
        let (store, _) = setup_store(MockProvider::failing()).await;

        store.add(detail_record("tt1375666", "Inception")).await.unwrap();
        let outcome = store.add(detail_record("tt1375666", "Inception")).await.unwrap();
        assert!(!outcome.added);

        assert_eq!(store.list(MovieSort::default()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_remove() {
        let (store, _) = setup_store(MockProvider::failing()).await;

        store.add(detail_record("tt1375666", "Inception")).await.unwrap();
        store.add(detail_record("tt0468569", "The Dark Knight")).await.unwrap();

        assert!(store.remove("tt1375666").await.unwrap());
        assert!(!store.remove("tt1375666").await.unwrap());

        let movies = store.list(MovieSort::default()).await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].imdb_id, "tt0468569");
    }

    #[tokio::test]
    async fn test_toggle_flips_membership() {
        let (store, _) = setup_store(MockProvider::failing()).await;
        let record = detail_record("tt1375666", "Inception");

        assert!(store.toggle(record.clone()).await.unwrap());
        assert!(store.is_favorite("tt1375666").await.unwrap());

        assert!(!store.toggle(record).await.unwrap());
        assert!(!store.is_favorite("tt1375666").await.unwrap());
    }

    #[tokio::test]
    async fn test_clear() {
        let (store, _) = setup_store(MockProvider::failing()).await;

        store.add(detail_record("tt1375666", "Inception")).await.unwrap();
        store.clear().await.unwrap();

        assert!(store.list(MovieSort::default()).await.unwrap().is_empty());
        // The key itself is gone, not left behind as "[]"
        assert_eq!(
            kv::get(&store.db, MOVIE_FAVORITES_KEY).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_unreadable_blob_reads_as_empty() {
        let (store, _) = setup_store(MockProvider::failing()).await;

        kv::set(&store.db, MOVIE_FAVORITES_KEY, "not json at all")
            .await
            .unwrap();
        assert!(store.list(MovieSort::default()).await.unwrap().is_empty());

        // The next add starts a fresh collection over the bad blob
        store.add(detail_record("tt1375666", "Inception")).await.unwrap();
        assert_eq!(store.list(MovieSort::default()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_insertion_order_survives_reload() {
        let (store, _) = setup_store(MockProvider::failing()).await;

        store.add(detail_record("tt0111161", "The Shawshank Redemption")).await.unwrap();
        store.add(detail_record("tt1375666", "Inception")).await.unwrap();
        store.add(detail_record("tt0468569", "The Dark Knight")).await.unwrap();

        let ids: Vec<String> = store
            .list(MovieSort::DateAdded)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.imdb_id)
            .collect();
        assert_eq!(ids, vec!["tt0111161", "tt1375666", "tt0468569"]);
    }

    #[test]
    fn test_sort_by_title() {
        let mut movies = vec![
            detail_record("tt2", "Zodiac"),
            detail_record("tt1", "Alien"),
        ];
        sort_movies(&mut movies, MovieSort::Title);
        assert_eq!(movies[0].title, "Alien");
    }

    #[test]
    fn test_sort_by_year_newest_first() {
        let mut a = detail_record("tt1", "Old");
        a.year = Some("1994".to_string());
        let mut b = detail_record("tt2", "New");
        b.year = Some("2019".to_string());
        let mut c = detail_record("tt3", "Range");
        c.year = Some("2005–2013".to_string());
        let mut d = detail_record("tt4", "Unknown");
        d.year = Some("N/A".to_string());

        let mut movies = vec![a, b, c, d];
        sort_movies(&mut movies, MovieSort::Year);
        let titles: Vec<&str> = movies.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["New", "Range", "Old", "Unknown"]);
    }

    #[test]
    fn test_sort_by_rating_highest_first() {
        let mut a = detail_record("tt1", "Low");
        a.imdb_rating = Some("6.4".to_string());
        let mut b = detail_record("tt2", "High");
        b.imdb_rating = Some("9.0".to_string());
        let mut c = detail_record("tt3", "Unrated");
        c.imdb_rating = Some("N/A".to_string());
        // Ratio form sorts by its leading component, same as the stats parser
        let mut d = detail_record("tt4", "Ratio");
        d.imdb_rating = Some("8.8/10".to_string());

        let mut movies = vec![a, b, c, d];
        sort_movies(&mut movies, MovieSort::Rating);
        let titles: Vec<&str> = movies.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["High", "Ratio", "Low", "Unrated"]);
    }

    #[test]
    fn test_sort_param_decodes_both_spellings() {
        #[derive(Deserialize)]
        struct Params {
            sort: MovieSort,
        }

        let snake: Params = serde_json::from_value(json!({"sort": "date_added"})).unwrap();
        assert_eq!(snake.sort, MovieSort::DateAdded);

        let camel: Params = serde_json::from_value(json!({"sort": "dateAdded"})).unwrap();
        assert_eq!(camel.sort, MovieSort::DateAdded);

        let rating: Params = serde_json::from_value(json!({"sort": "rating"})).unwrap();
        assert_eq!(rating.sort, MovieSort::Rating);
    }

    #[tokio::test]
    async fn test_stats_over_collection() {
        let (store, _) = setup_store(MockProvider::failing()).await;

        store.add(detail_record("tt1375666", "Inception")).await.unwrap();
        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.latest_year, Some(2010));
        assert_eq!(stats.total_runtime_minutes, 148);
    }
}
