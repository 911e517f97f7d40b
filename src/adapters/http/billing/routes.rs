//! Axum router configuration for billing endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::adapters::http::state::AppState;

use super::handlers::{create_checkout, create_portal, get_status, receive_webhook};

/// Mounted at `/billing`.
///
/// The portal also answers GET for older clients.
pub fn billing_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(get_status))
        .route("/portal", post(create_portal).get(create_portal))
}

/// Mounted at `/checkout`.
pub fn checkout_routes() -> Router<AppState> {
    Router::new().route("/create-session", post(create_checkout))
}

/// Mounted at `/webhook`. No user authentication; requests are verified by
/// signature.
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/", post(receive_webhook))
}
