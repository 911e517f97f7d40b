//! Axum router configuration for the messaging bot bridge.

use axum::routing::post;
use axum::Router;

use crate::adapters::http::state::AppState;

use super::handlers::{link_account, read_work};

/// Mounted at `/line`. Callers are identified by messaging id, never by
/// bearer token.
pub fn line_routes() -> Router<AppState> {
    Router::new()
        .route("/link", post(link_account))
        .route("/read", post(read_work))
}
