//! Clock port.
//!
//! Every time-dependent rule (premium expiry, dedup window, day boundary)
//! reads "now" through this port so tests can pin it.

use crate::domain::foundation::Timestamp;

pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}
