//! Sports favorites store
//!
//! Three per-sport sequences persisted together under one storage key.
//! Records carry no usable provider key across all three feeds, so
//! membership runs on the derived identity from the identity module: the
//! same derivation on add, remove, toggle, and status check.
//!
//! Unlike the movie collection, a global clear writes the canonical empty
//! triple instead of dropping the key.

use fanshelf_common::db::kv;
use fanshelf_common::identity::resolve_id;
use fanshelf_common::models::{Sport, SportsFavorite, SportsFavoritesCollection, SportsItem};
use serde::Serialize;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Storage key for the sports favorites blob
pub const SPORTS_FAVORITES_KEY: &str = "sports_favorites";

/// Result of an add: whether the collection changed, and the derived id
/// the record is filed under either way
#[derive(Debug, Clone, Serialize)]
pub struct SportsAddOutcome {
    pub added: bool,
    pub id: String,
}

/// Sports favorites store over the key-value substrate
#[derive(Clone)]
pub struct SportsFavoritesStore {
    db: SqlitePool,
    write_lock: Arc<Mutex<()>>,
}

impl SportsFavoritesStore {
    pub fn new(db: SqlitePool) -> Self {
        Self {
            db,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// The full three-sequence collection
    pub async fn collection(&self) -> fanshelf_common::Result<SportsFavoritesCollection> {
        let Some(blob) = kv::get(&self.db, SPORTS_FAVORITES_KEY).await? else {
            return Ok(SportsFavoritesCollection::default());
        };

        match serde_json::from_str(&blob) {
            Ok(collection) => Ok(collection),
            Err(e) => {
                warn!("Unreadable sports favorites blob, treating as empty: {}", e);
                Ok(SportsFavoritesCollection::default())
            }
        }
    }

    /// One sport's favorites in insertion order
    pub async fn list(&self, sport: Sport) -> fanshelf_common::Result<Vec<SportsFavorite>> {
        Ok(self.collection().await?.list(sport).clone())
    }

    /// All favorites flattened in football, basketball, formula1 order
    pub async fn list_all(&self) -> fanshelf_common::Result<Vec<SportsFavorite>> {
        Ok(self.collection().await?.flattened())
    }

    /// Add a record to its sport's favorites
    ///
    /// Membership is decided by the derived id; an already-present record
    /// leaves the collection unchanged. The stored favorite drops any
    /// provider-assigned top-level id in favor of the derived one.
    pub async fn add(&self, mut item: SportsItem) -> fanshelf_common::Result<SportsAddOutcome> {
        let _guard = self.write_lock.lock().await;

        let id = resolve_id(&item);
        let sport = item.sport();
        let mut collection = self.collection().await?;

        if collection.list(sport).iter().any(|f| f.id == id) {
            debug!(id = %id, "Sports record already in favorites");
            return Ok(SportsAddOutcome { added: false, id });
        }

        item.clear_provider_id();
        collection.list_mut(sport).push(SportsFavorite {
            id: id.clone(),
            date_added: chrono::Utc::now(),
            item,
        });
        self.write_collection(&collection).await?;

        info!(
            id = %id,
            sport = %sport,
            total = collection.total(),
            "Added sports record to favorites"
        );
        Ok(SportsAddOutcome { added: true, id })
    }

    /// Remove a favorite by derived id
    ///
    /// The full collection is rewritten whether or not anything matched;
    /// the return value reports whether something was removed.
    pub async fn remove(&self, sport: Sport, id: &str) -> fanshelf_common::Result<bool> {
        let _guard = self.write_lock.lock().await;

        let mut collection = self.collection().await?;
        let list = collection.list_mut(sport);
        let before = list.len();
        list.retain(|f| f.id != id);
        let removed = list.len() != before;

        self.write_collection(&collection).await?;
        if removed {
            info!(id = %id, sport = %sport, "Removed sports record from favorites");
        } else {
            debug!(id = %id, sport = %sport, "Sports record not in favorites");
        }
        Ok(removed)
    }

    /// Flip membership for a record, returning the new favorite state
    pub async fn toggle(&self, item: SportsItem) -> fanshelf_common::Result<bool> {
        if self.is_favorite(&item).await? {
            self.remove(item.sport(), &resolve_id(&item)).await?;
            Ok(false)
        } else {
            self.add(item).await?;
            Ok(true)
        }
    }

    /// Empty one sport's sequence, or the whole collection
    ///
    /// Both forms write a full collection with every sequence present.
    pub async fn clear(&self, sport: Option<Sport>) -> fanshelf_common::Result<()> {
        let _guard = self.write_lock.lock().await;

        let collection = match sport {
            Some(sport) => {
                let mut collection = self.collection().await?;
                collection.list_mut(sport).clear();
                collection
            }
            None => SportsFavoritesCollection::default(),
        };

        self.write_collection(&collection).await?;
        match sport {
            Some(sport) => info!(sport = %sport, "Cleared sports favorites for one sport"),
            None => info!("Cleared all sports favorites"),
        }
        Ok(())
    }

    /// Whether a record is currently a favorite, by derived id
    pub async fn is_favorite(&self, item: &SportsItem) -> fanshelf_common::Result<bool> {
        let id = resolve_id(item);
        let collection = self.collection().await?;
        Ok(collection.list(item.sport()).iter().any(|f| f.id == id))
    }

    async fn write_collection(
        &self,
        collection: &SportsFavoritesCollection,
    ) -> fanshelf_common::Result<()> {
        let blob = serde_json::to_string(collection)?;
        kv::set(&self.db, SPORTS_FAVORITES_KEY, &blob).await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn setup_store() -> SportsFavoritesStore {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        fanshelf_common::db::create_storage_table(&pool).await.unwrap();
        SportsFavoritesStore::new(pool)
    }

    fn football_fixture() -> SportsItem {
        serde_json::from_value(json!({
            "sport": "football",
            "fixture": {"id": 867955, "date": "2024-12-15T15:00:00+00:00"},
            "teams": {"home": {"name": "Liverpool"}, "away": {"name": "Manchester United"}},
            "goals": {"home": 3, "away": 0}
        }))
        .unwrap()
    }

    fn basketball_game() -> SportsItem {
        serde_json::from_value(json!({
            "sport": "basketball",
            "id": 14191,
            "date": {"start": "2024-12-15T00:30:00.000Z"},
            "teams": {"home": {"name": "Boston Celtics"}, "visitors": {"name": "Washington Wizards"}}
        }))
        .unwrap()
    }

    fn formula1_race() -> SportsItem {
        serde_json::from_value(json!({
            "sport": "formula1",
            "season": "2024",
            "round": "8",
            "raceName": "Monaco Grand Prix",
            "Circuit": {"circuitId": "monaco"}
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = setup_store().await;
        assert_eq!(store.collection().await.unwrap().total(), 0);
        assert!(store.list_all().await.unwrap().is_empty());
        assert!(!store.is_favorite(&football_fixture()).await.unwrap());
    }

    #[tokio::test]
    async fn test_add_files_under_derived_id() {
        let store = setup_store().await;

        let outcome = store.add(football_fixture()).await.unwrap();
        assert!(outcome.added);
        assert_eq!(outcome.id, "football_867955");

        let favorites = store.list(Sport::Football).await.unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].id, "football_867955");
        assert_eq!(favorites[0].item.sport(), Sport::Football);
    }

    #[tokio::test]
    async fn test_add_drops_provider_id_from_stored_item() {
        let store = setup_store().await;

        store.add(basketball_game()).await.unwrap();

        let favorites = store.list(Sport::Basketball).await.unwrap();
        match &favorites[0].item {
            SportsItem::Basketball(game) => assert_eq!(game.id, None),
            other => panic!("stored wrong variant: {:?}", other),
        }

        // The persisted flat record carries the derived id, once
        let blob = kv::get(&store.db, SPORTS_FAVORITES_KEY).await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&blob).unwrap();
        assert_eq!(value["basketball"][0]["id"], "basketball_14191");
    }

    #[tokio::test]
    async fn test_duplicate_add_is_a_noop() {
        let store = setup_store().await;

        assert!(store.add(football_fixture()).await.unwrap().added);
        let outcome = store.add(football_fixture()).await.unwrap();
        assert!(!outcome.added);
        assert_eq!(outcome.id, "football_867955");

        assert_eq!(store.list(Sport::Football).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_sports_are_independent() {
        let store = setup_store().await;

        store.add(football_fixture()).await.unwrap();
        store.add(basketball_game()).await.unwrap();
        store.add(formula1_race()).await.unwrap();

        assert_eq!(store.list(Sport::Football).await.unwrap().len(), 1);
        assert_eq!(store.list(Sport::Basketball).await.unwrap().len(), 1);
        assert_eq!(store.list(Sport::Formula1).await.unwrap().len(), 1);

        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 3);
        // Flattened view keeps football, basketball, formula1 order
        assert_eq!(all[0].id, "football_867955");
        assert_eq!(all[1].id, "basketball_14191");
        assert_eq!(all[2].id, "formula1_8_2024_monaco");
    }

    #[tokio::test]
    async fn test_remove() {
        let store = setup_store().await;

        store.add(football_fixture()).await.unwrap();
        assert!(store.remove(Sport::Football, "football_867955").await.unwrap());
        assert!(!store.remove(Sport::Football, "football_867955").await.unwrap());
        assert!(store.list(Sport::Football).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_checks_only_the_named_sport() {
        let store = setup_store().await;

        store.add(basketball_game()).await.unwrap();
        // Same id string under the wrong sport removes nothing
        assert!(!store.remove(Sport::Football, "basketball_14191").await.unwrap());
        assert_eq!(store.list(Sport::Basketball).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_toggle_flips_membership() {
        let store = setup_store().await;

        assert!(store.toggle(formula1_race()).await.unwrap());
        assert!(store.is_favorite(&formula1_race()).await.unwrap());

        assert!(!store.toggle(formula1_race()).await.unwrap());
        assert!(!store.is_favorite(&formula1_race()).await.unwrap());
    }

    #[tokio::test]
    async fn test_scoped_clear_preserves_other_sports() {
        let store = setup_store().await;

        store.add(football_fixture()).await.unwrap();
        store.add(basketball_game()).await.unwrap();

        store.clear(Some(Sport::Football)).await.unwrap();
        assert!(store.list(Sport::Football).await.unwrap().is_empty());
        assert_eq!(store.list(Sport::Basketball).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_global_clear_writes_empty_triple() {
        let store = setup_store().await;

        store.add(football_fixture()).await.unwrap();
        store.clear(None).await.unwrap();

        assert_eq!(store.collection().await.unwrap().total(), 0);

        // The key survives as the canonical empty shape, all three lists present
        let blob = kv::get(&store.db, SPORTS_FAVORITES_KEY).await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&blob).unwrap();
        assert_eq!(value["football"], json!([]));
        assert_eq!(value["basketball"], json!([]));
        assert_eq!(value["formula1"], json!([]));
    }

    #[tokio::test]
    async fn test_unreadable_blob_reads_as_empty() {
        let store = setup_store().await;

        kv::set(&store.db, SPORTS_FAVORITES_KEY, "{broken").await.unwrap();
        assert_eq!(store.collection().await.unwrap().total(), 0);

        // The next add starts a fresh collection over the bad blob
        store.add(football_fixture()).await.unwrap();
        assert_eq!(store.list(Sport::Football).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_partial_blob_materializes_missing_sequences() {
        let store = setup_store().await;

        kv::set(&store.db, SPORTS_FAVORITES_KEY, r#"{"football": []}"#)
            .await
            .unwrap();
        let collection = store.collection().await.unwrap();
        assert!(collection.basketball.is_empty());
        assert!(collection.formula1.is_empty());
    }

    #[tokio::test]
    async fn test_composite_identity_survives_round_trip() {
        let store = setup_store().await;

        // No provider id anywhere: membership runs on the composite key
        let item: SportsItem = serde_json::from_value(json!({
            "sport": "basketball",
            "date": {"start": "2024-12-15T00:30:00.000Z"},
            "teams": {"home": {"name": "Boston Celtics"}, "visitors": {"name": "Washington Wizards"}}
        }))
        .unwrap();

        let outcome = store.add(item.clone()).await.unwrap();
        assert_eq!(
            outcome.id,
            "basketball_Boston Celtics_Washington Wizards_2024-12-15T00:30:00.000Z"
        );
        assert!(store.is_favorite(&item).await.unwrap());
        assert!(!store.add(item).await.unwrap().added);
    }
}
