use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Timestamp, UserId, WorkId};
use crate::domain::history::{NewViewEvent, ViewEvent};
use crate::ports::ViewHistoryRepository;

#[derive(Debug, Default)]
pub struct InMemoryViewHistoryRepository {
    events: RwLock<Vec<ViewEvent>>,
}

impl InMemoryViewHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored event in insertion order.
    pub fn all(&self) -> Vec<ViewEvent> {
        self.events
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Stores an event directly, bypassing deduplication.
    pub fn seed(&self, user_id: UserId, work_id: WorkId, viewed_at: Timestamp) {
        self.push(NewViewEvent {
            user_id,
            work_id,
            viewed_at,
            title: format!("work {}", work_id),
            author: String::new(),
        });
    }

    fn push(&self, event: NewViewEvent) -> ViewEvent {
        let mut events = self.events.write().unwrap_or_else(PoisonError::into_inner);
        let stored = event.into_event(events.len() as i64 + 1);
        events.push(stored.clone());
        stored
    }
}

#[async_trait]
impl ViewHistoryRepository for InMemoryViewHistoryRepository {
    async fn latest_for(
        &self,
        user_id: UserId,
        work_id: WorkId,
    ) -> Result<Option<ViewEvent>, DomainError> {
        Ok(self
            .events
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| e.user_id == user_id && e.work_id == work_id)
            .max_by_key(|e| (e.viewed_at, e.id))
            .cloned())
    }

    async fn append(&self, event: NewViewEvent) -> Result<ViewEvent, DomainError> {
        Ok(self.push(event))
    }

    async fn count_since(&self, user_id: UserId, since: Timestamp) -> Result<u64, DomainError> {
        Ok(self
            .events
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| e.user_id == user_id && e.viewed_at >= since)
            .count() as u64)
    }

    async fn top_viewed(&self, limit: usize) -> Result<Vec<WorkId>, DomainError> {
        let mut counts: HashMap<WorkId, u64> = HashMap::new();
        for event in self.events.read().unwrap_or_else(PoisonError::into_inner).iter() {
            *counts.entry(event.work_id).or_default() += 1;
        }
        let mut ranked: Vec<(WorkId, u64)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        Ok(ranked.into_iter().take(limit).map(|(id, _)| id).collect())
    }

    async fn recent_for(&self, user_id: UserId, limit: usize) -> Result<Vec<ViewEvent>, DomainError> {
        let mut events: Vec<ViewEvent> = self
            .events
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        events.sort_by(|a, b| b.viewed_at.cmp(&a.viewed_at).then(b.id.cmp(&a.id)));
        events.truncate(limit);
        Ok(events)
    }
}
