//! Favorites store.

use std::sync::Arc;

use tracing::debug;

use crate::domain::catalog::{order_by_ids, CatalogError, Work};
use crate::domain::foundation::{UserId, WorkId};
use crate::ports::{Clock, FavoriteRepository, WorkRepository};

use super::FavoriteEntry;

pub struct FavoritesStore {
    favorites: Arc<dyn FavoriteRepository>,
    works: Arc<dyn WorkRepository>,
    clock: Arc<dyn Clock>,
}

impl FavoritesStore {
    pub fn new(
        favorites: Arc<dyn FavoriteRepository>,
        works: Arc<dyn WorkRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            favorites,
            works,
            clock,
        }
    }

    pub async fn exists(&self, user_id: UserId, work_id: WorkId) -> Result<bool, CatalogError> {
        Ok(self.favorites.exists(user_id, work_id).await?)
    }

    /// Flips the favorite state and returns the new one.
    ///
    /// Removing never consults the catalog, so a favorite whose work has
    /// since disappeared can still be cleared.
    pub async fn toggle(&self, user_id: UserId, work_id: WorkId) -> Result<bool, CatalogError> {
        if self.favorites.delete(user_id, work_id).await? {
            debug!(user_id = %user_id, work_id = %work_id, "favorite removed");
            return Ok(false);
        }

        let work = self
            .works
            .find_by_id(work_id)
            .await?
            .ok_or(CatalogError::WorkNotFound(work_id))?;
        self.favorites
            .insert(FavoriteEntry::for_work(user_id, &work, self.clock.now()))
            .await?;
        debug!(user_id = %user_id, work_id = %work_id, "favorite added");
        Ok(true)
    }

    /// Favorited works, newest first. Works no longer in the catalog are
    /// skipped.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<Work>, CatalogError> {
        let entries = self.favorites.list_for_user(user_id).await?;
        if entries.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<WorkId> = entries.iter().map(|e| e.work_id).collect();
        let works = self.works.find_all_by_ids(&ids).await?;
        Ok(order_by_ids(&ids, works))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::FixedClock;
    use crate::adapters::memory::{InMemoryFavoriteRepository, InMemoryWorkRepository};

    fn store() -> (FavoritesStore, Arc<FixedClock>) {
        let works = Arc::new(InMemoryWorkRepository::with_works((1..=3).map(|id| Work {
            id: WorkId::new(id),
            title: Some(format!("work {}", id)),
            ..Default::default()
        })));
        let clock = Arc::new(FixedClock::at_rfc3339("2024-01-15T03:00:00Z"));
        let store = FavoritesStore::new(
            Arc::new(InMemoryFavoriteRepository::new()),
            works,
            clock.clone(),
        );
        (store, clock)
    }

    const ALICE: UserId = UserId::new(1);

    #[tokio::test]
    async fn toggle_adds_then_removes() {
        let (store, _) = store();
        let work = WorkId::new(1);

        assert!(store.toggle(ALICE, work).await.unwrap());
        assert!(store.exists(ALICE, work).await.unwrap());

        assert!(!store.toggle(ALICE, work).await.unwrap());
        assert!(!store.exists(ALICE, work).await.unwrap());
    }

    #[tokio::test]
    async fn favoriting_missing_work_is_not_found() {
        let (store, _) = store();

        let result = store.toggle(ALICE, WorkId::new(99)).await;

        assert!(matches!(result, Err(CatalogError::WorkNotFound(id)) if id == WorkId::new(99)));
        assert!(!store.exists(ALICE, WorkId::new(99)).await.unwrap());
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let (store, clock) = store();
        for id in [2, 1, 3] {
            store.toggle(ALICE, WorkId::new(id)).await.unwrap();
            clock.advance_secs(10);
        }

        let listed: Vec<i32> = store
            .list(ALICE)
            .await
            .unwrap()
            .iter()
            .map(|w| w.id.as_i32())
            .collect();

        assert_eq!(listed, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn favorites_are_per_user() {
        let (store, _) = store();
        store.toggle(ALICE, WorkId::new(1)).await.unwrap();

        assert!(!store.exists(UserId::new(2), WorkId::new(1)).await.unwrap());
        assert!(store.list(UserId::new(2)).await.unwrap().is_empty());
    }
}
