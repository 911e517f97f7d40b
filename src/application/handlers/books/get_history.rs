//! GetHistoryHandler - A user's recently opened works.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::catalog::{order_by_ids, CatalogError, DisplayRecord};
use crate::domain::foundation::{UserId, WorkId};
use crate::domain::history::ViewHistoryLedger;
use crate::ports::WorkRepository;

#[derive(Debug, Clone, Copy)]
pub struct GetHistoryQuery {
    pub user_id: UserId,
    pub viewer_premium: bool,
}

pub struct GetHistoryHandler {
    ledger: Arc<ViewHistoryLedger>,
    works: Arc<dyn WorkRepository>,
    limit: usize,
}

impl GetHistoryHandler {
    pub fn new(ledger: Arc<ViewHistoryLedger>, works: Arc<dyn WorkRepository>, limit: usize) -> Self {
        Self { ledger, works, limit }
    }

    /// Newest first. A work opened several times appears once, at its
    /// most recent position.
    pub async fn handle(&self, query: GetHistoryQuery) -> Result<Vec<DisplayRecord>, CatalogError> {
        let events = self.ledger.recent_history(query.user_id, self.limit).await?;

        let mut seen = HashSet::new();
        let ids: Vec<WorkId> = events
            .into_iter()
            .map(|e| e.work_id)
            .filter(|id| seen.insert(*id))
            .collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let works = self.works.find_all_by_ids(&ids).await?;
        Ok(DisplayRecord::project_all(&order_by_ids(&ids, works), query.viewer_premium))
    }
}
