//! Favorites handlers - check, toggle, and list a user's bookmarks.

use std::sync::Arc;

use crate::domain::catalog::{CatalogError, DisplayRecord};
use crate::domain::favorites::FavoritesStore;
use crate::domain::foundation::{UserId, WorkId};

/// Identifies one (user, work) bookmark.
#[derive(Debug, Clone, Copy)]
pub struct FavoriteCommand {
    pub user_id: UserId,
    pub work_id: WorkId,
}

pub struct CheckFavoriteHandler {
    store: Arc<FavoritesStore>,
}

impl CheckFavoriteHandler {
    pub fn new(store: Arc<FavoritesStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, cmd: FavoriteCommand) -> Result<bool, CatalogError> {
        self.store.exists(cmd.user_id, cmd.work_id).await
    }
}

pub struct ToggleFavoriteHandler {
    store: Arc<FavoritesStore>,
}

impl ToggleFavoriteHandler {
    pub fn new(store: Arc<FavoritesStore>) -> Self {
        Self { store }
    }

    /// Returns the state after the toggle.
    pub async fn handle(&self, cmd: FavoriteCommand) -> Result<bool, CatalogError> {
        self.store.toggle(cmd.user_id, cmd.work_id).await
    }
}

pub struct ListFavoritesHandler {
    store: Arc<FavoritesStore>,
}

impl ListFavoritesHandler {
    pub fn new(store: Arc<FavoritesStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        user_id: UserId,
        viewer_premium: bool,
    ) -> Result<Vec<DisplayRecord>, CatalogError> {
        let works = self.store.list(user_id).await?;
        Ok(DisplayRecord::project_all(&works, viewer_premium))
    }
}
