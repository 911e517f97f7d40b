//! HTTP handlers for billing endpoints.

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use tracing::debug;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireUser;
use crate::adapters::http::state::AppState;
use crate::application::handlers::billing::HandlePaymentWebhookCommand;
use crate::domain::billing::WebhookError;

use super::dto::{BillingStatusResponse, RedirectResponse};

const SIGNATURE_HEADER: &str = "Stripe-Signature";

/// GET /billing/status - Plan summary for the settings page
pub async fn get_status(
    State(state): State<AppState>,
    RequireUser(viewer): RequireUser,
) -> Result<impl IntoResponse, ApiError> {
    let status = state.billing_status_handler().handle(viewer.user_id).await?;
    Ok(Json(BillingStatusResponse::from(status)))
}

/// POST /billing/portal - Billing portal session
pub async fn create_portal(
    State(state): State<AppState>,
    RequireUser(viewer): RequireUser,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.portal_handler().handle(&viewer).await?;
    Ok(Json(RedirectResponse { url: session.url }))
}

/// POST /checkout/create-session - Hosted checkout for the premium plan
pub async fn create_checkout(
    State(state): State<AppState>,
    RequireUser(viewer): RequireUser,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.checkout_handler().handle(&viewer).await?;
    Ok(Json(RedirectResponse { url: session.url }))
}

/// POST /webhook - Payment provider events
///
/// The raw body is needed for signature verification, so no JSON
/// extractor runs before the handler.
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::bad_request("Missing Stripe-Signature header"))?;

    let cmd = HandlePaymentWebhookCommand {
        payload: body.to_vec(),
        signature: signature.to_string(),
    };

    match state.webhook_handler().handle(cmd).await {
        Ok(result) => {
            debug!(result = ?result, "webhook acknowledged");
            Ok("ok")
        }
        Err(WebhookError::Ignored(reason)) => {
            debug!(reason = %reason, "webhook ignored");
            Ok("ok")
        }
        Err(err) => Err(err.into()),
    }
}
