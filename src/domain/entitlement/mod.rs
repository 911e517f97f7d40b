//! Entitlement module - who may open which work today.

mod engine;
mod errors;

pub use engine::{Entitlement, EntitlementEngine};
pub use errors::EntitlementError;
