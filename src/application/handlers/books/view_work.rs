//! ViewWorkHandler - Opens a work's detail view.
//!
//! Shared by the web detail endpoint and the messaging bot. Runs the
//! entitlement checks, records the view, then projects the work with its
//! body text.

use std::sync::Arc;

use tracing::info;

use crate::domain::catalog::DisplayRecord;
use crate::domain::entitlement::{Entitlement, EntitlementEngine, EntitlementError};
use crate::domain::foundation::WorkId;
use crate::domain::history::{RecordOutcome, ViewHistoryLedger};
use crate::domain::identity::UserContext;

/// Command to open a work.
#[derive(Debug, Clone)]
pub struct ViewWorkCommand {
    pub context: UserContext,
    pub work_id: WorkId,
}

/// A granted view.
#[derive(Debug, Clone)]
pub struct ViewWorkResult {
    pub record: DisplayRecord,
    pub outcome: RecordOutcome,
}

pub struct ViewWorkHandler {
    engine: Arc<EntitlementEngine>,
    ledger: Arc<ViewHistoryLedger>,
}

impl ViewWorkHandler {
    pub fn new(engine: Arc<EntitlementEngine>, ledger: Arc<ViewHistoryLedger>) -> Self {
        Self { engine, ledger }
    }

    pub async fn handle(&self, cmd: ViewWorkCommand) -> Result<ViewWorkResult, EntitlementError> {
        let Entitlement { viewer, work } = self.engine.authorize(&cmd.context, cmd.work_id).await?;

        let outcome = self.ledger.record_view(viewer.user_id, &work).await?;
        info!(
            user_id = %viewer.user_id,
            work_id = %work.id,
            premium = viewer.premium,
            outcome = outcome.as_str(),
            "work opened"
        );

        Ok(ViewWorkResult {
            record: DisplayRecord::project(&work, viewer.premium).with_body(&work),
            outcome,
        })
    }
}
