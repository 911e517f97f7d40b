//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (ids, timestamps, errors)
//! - `identity` - Accounts, plans, credentials, and caller resolution
//! - `catalog` - Works, their client projection, and search criteria
//! - `history` - View events and the deduplicating ledger
//! - `entitlement` - Daily quota and detail-view authorization
//! - `favorites` - Per-user bookmarks
//! - `billing` - Payment webhooks and plan transitions

pub mod billing;
pub mod catalog;
pub mod entitlement;
pub mod favorites;
pub mod foundation;
pub mod history;
pub mod identity;
