//! Top-level router assembly.

use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::routing::get;
use axum::{middleware, Router};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::auth::auth_routes;
use super::billing::{billing_routes, checkout_routes, webhook_routes};
use super::books::books_routes;
use super::error::{error_envelope, ApiError};
use super::line::line_routes;
use super::middleware::user_context_middleware;
use super::state::AppState;

const REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Builds the complete application.
///
/// # Routes
///
/// Everything lives under `/api/v1`:
/// - `/books` - catalog, detail, history, favorites
/// - `/billing`, `/checkout` - plan status and hosted payment pages
/// - `/webhook` - payment provider events
/// - `/line` - messaging bot bridge
/// - `/auth` - accounts
///
/// `GET /health` answers outside the API prefix.
pub fn app_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/books", books_routes())
        .nest("/billing", billing_routes())
        .nest("/checkout", checkout_routes())
        .nest("/webhook", webhook_routes())
        .nest("/line", line_routes())
        .nest("/auth", auth_routes())
        .layer(middleware::from_fn_with_state(
            state.resolver.clone(),
            user_context_middleware,
        ));

    let cors = cors_layer(&state.settings.cors_origins);
    let timeout = state.settings.request_timeout;

    Router::new()
        .nest("/api/v1", api)
        .route("/health", get(|| async { "ok" }))
        .fallback(|| async { ApiError::new(StatusCode::NOT_FOUND, "Not Found") })
        .layer(middleware::from_fn(error_envelope))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(REQUEST_ID, MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(REQUEST_ID))
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(timeout))
                .layer(cors),
        )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    if origins.is_empty() {
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();
    base.allow_origin(allowed).allow_credentials(true)
}
