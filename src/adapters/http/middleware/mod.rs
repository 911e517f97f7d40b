//! HTTP middleware for axum.
//!
//! - `user_context` - resolves the caller once per request and exposes it
//!   through the `RequireUser` and `OptionalUser` extractors

pub mod user_context;

pub use user_context::{user_context_middleware, OptionalUser, RequireUser};
