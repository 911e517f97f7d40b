//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations. Each
//! takes its collaborators as `Arc<dyn Port>` and exposes `handle`.

pub mod auth;
pub mod billing;
pub mod books;
pub mod line;
