//! Axum router configuration for account endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::adapters::http::state::AppState;

use super::handlers::{
    forgot_password, login, me, register, resend_verification, reset_password, verify_email,
};

/// Mounted at `/auth`. Everything but `/me` is open to guests.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/verify-email", post(verify_email))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
        .route("/resend-verification", post(resend_verification))
        .route("/me", get(me))
}
