//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, and error types that form the
//! vocabulary of the SmartBrief domain.

mod auth;
mod errors;
mod ids;
mod timestamp;

pub use auth::AuthError;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{UserId, WorkId};
pub use timestamp::Timestamp;
