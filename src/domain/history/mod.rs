//! History module - view events and the ledger that counts them.

mod ledger;
mod view_event;

pub use ledger::ViewHistoryLedger;
pub use view_event::{NewViewEvent, RecordOutcome, ViewEvent};
