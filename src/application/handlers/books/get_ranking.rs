//! GetRankingHandler - Most viewed works.

use std::sync::Arc;

use crate::domain::catalog::{order_by_ids, CatalogError, DisplayRecord};
use crate::domain::history::ViewHistoryLedger;
use crate::ports::WorkRepository;

pub struct GetRankingHandler {
    ledger: Arc<ViewHistoryLedger>,
    works: Arc<dyn WorkRepository>,
    size: usize,
}

impl GetRankingHandler {
    pub fn new(ledger: Arc<ViewHistoryLedger>, works: Arc<dyn WorkRepository>, size: usize) -> Self {
        Self { ledger, works, size }
    }

    /// Ranked works projected for the caller, highest count first.
    pub async fn handle(&self, viewer_premium: bool) -> Result<Vec<DisplayRecord>, CatalogError> {
        let ids = self.ledger.top_viewed(self.size).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let works = self.works.find_all_by_ids(&ids).await?;
        Ok(DisplayRecord::project_all(&order_by_ids(&ids, works), viewer_premium))
    }
}
