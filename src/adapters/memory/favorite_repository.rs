use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::favorites::FavoriteEntry;
use crate::domain::foundation::{DomainError, UserId, WorkId};
use crate::ports::FavoriteRepository;

#[derive(Debug, Default)]
pub struct InMemoryFavoriteRepository {
    entries: RwLock<Vec<FavoriteEntry>>,
}

impl InMemoryFavoriteRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FavoriteRepository for InMemoryFavoriteRepository {
    async fn exists(&self, user_id: UserId, work_id: WorkId) -> Result<bool, DomainError> {
        Ok(self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|e| e.user_id == user_id && e.work_id == work_id))
    }

    async fn insert(&self, entry: FavoriteEntry) -> Result<(), DomainError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if !entries
            .iter()
            .any(|e| e.user_id == entry.user_id && e.work_id == entry.work_id)
        {
            entries.push(entry);
        }
        Ok(())
    }

    async fn delete(&self, user_id: UserId, work_id: WorkId) -> Result<bool, DomainError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|e| !(e.user_id == user_id && e.work_id == work_id));
        Ok(entries.len() != before)
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<FavoriteEntry>, DomainError> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        // Insertion order breaks ties between identical timestamps.
        let mut listed: Vec<(usize, FavoriteEntry)> = entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.user_id == user_id)
            .map(|(i, e)| (i, e.clone()))
            .collect();
        listed.sort_by(|a, b| b.1.created_at.cmp(&a.1.created_at).then(b.0.cmp(&a.0)));
        Ok(listed.into_iter().map(|(_, e)| e).collect())
    }
}
