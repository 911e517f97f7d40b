//! HTTP error mapping.
//!
//! Every failure leaves the API as the same JSON envelope:
//!
//! ```text
//! {"status": 404, "error": "Not Found", "message": "作品が見つかりません", "path": "/api/v1/books/9"}
//! ```
//!
//! Handlers return [`ApiError`]; the request path is unknown at that point,
//! so [`error_envelope`] fills it in on the way out.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{debug, error};

use crate::domain::billing::{BillingError, WebhookError};
use crate::domain::catalog::CatalogError;
use crate::domain::entitlement::EntitlementError;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::identity::IdentityError;

/// Shown in place of infrastructure details.
const GENERIC_MESSAGE: &str = "サーバー内部でエラーが発生しました。";
const BAD_PATH: &str = "URLのパラメータが正しくありません。";
const BAD_QUERY: &str = "クエリパラメータが正しくありません。";
const BAD_BODY: &str = "リクエスト本文の形式が正しくありません。";

/// Upsell text for a free account that used up today's views.
pub fn quota_exceeded_message(limit: u64, upsell_url: &str) -> String {
    format!(
        "無料プランの1日の閲覧制限（{limit}回）に達しました。\n\n\
         🚀 今すぐ無制限で読むなら：\n\
         Webでプレミアムプランに登録してください。すぐに制限が解除されます！\n\n\
         ⏳ 明日まで待つなら：\n\
         明日になれば、また{limit}回分を無料で閲覧いただけます。\n\n\
         ▼ プレミアム登録・アカウント連携はこちら\n\
         {upsell_url}"
    )
}

/// Wire shape of an error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEnvelope {
    pub status: u16,
    pub error: String,
    pub message: String,
    pub path: String,
}

/// Error returned by HTTP handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Maps a domain error code to a status.
    ///
    /// Upstream and infrastructure failures are logged in full here and
    /// reach the client only as a generic message.
    pub fn from_code(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let status = match code {
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat
            | ErrorCode::Conflict => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden | ErrorCode::QuotaExceeded => StatusCode::FORBIDDEN,
            ErrorCode::UserNotFound | ErrorCode::WorkNotFound => StatusCode::NOT_FOUND,
            ErrorCode::PaymentProviderError | ErrorCode::EmailDeliveryError => {
                error!(target: "upstream", code = %code, detail = %message, "upstream call failed");
                return Self::internal();
            }
            ErrorCode::DatabaseError | ErrorCode::InternalError => {
                error!(code = %code, detail = %message, "request failed");
                return Self::internal();
            }
        };
        Self::new(status, message)
    }

    fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_MESSAGE)
    }

    fn envelope(&self, path: String) -> ErrorEnvelope {
        ErrorEnvelope {
            status: self.status.as_u16(),
            error: self
                .status
                .canonical_reason()
                .unwrap_or("Error")
                .to_string(),
            message: self.message.clone(),
            path,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::from_code(err.code, err.message)
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        Self::from_code(err.code(), err.to_string())
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        Self::from_code(err.code(), err.to_string())
    }
}

impl From<EntitlementError> for ApiError {
    fn from(err: EntitlementError) -> Self {
        Self::from_code(err.code(), err.to_string())
    }
}

impl From<BillingError> for ApiError {
    fn from(err: BillingError) -> Self {
        Self::from_code(err.code(), err.to_string())
    }
}

impl From<WebhookError> for ApiError {
    fn from(err: WebhookError) -> Self {
        let status = err.status_code();
        if status.is_server_error() {
            error!(error = %err, "webhook processing failed");
            return Self::internal();
        }
        Self::new(status, err.to_string())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        debug!(detail = %rejection.body_text(), "path rejected");
        Self::bad_request(BAD_PATH)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        debug!(detail = %rejection.body_text(), "query rejected");
        Self::bad_request(BAD_QUERY)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(detail = %rejection.body_text(), "body rejected");
        Self::bad_request(BAD_BODY)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = self.envelope(String::new());
        let mut response = (self.status, Json(body)).into_response();
        response.extensions_mut().insert(self);
        response
    }
}

/// Rewrites error bodies so `path` names the request that failed.
pub async fn error_envelope(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let response = next.run(request).await;

    match response.extensions().get::<ApiError>().cloned() {
        Some(err) => {
            let status = response.status();
            let mut rebuilt = (status, Json(err.envelope(path))).into_response();
            rebuilt.extensions_mut().insert(err);
            rebuilt
        }
        None => response,
    }
}
