//! HTTP handlers for the messaging bot bridge.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::adapters::http::books::denied;
use crate::adapters::http::error::ApiError;
use crate::adapters::http::state::AppState;
use crate::application::handlers::line::{LinkAccountCommand, ReadWorkCommand, ReadWorkError};
use crate::domain::foundation::WorkId;
use crate::domain::identity::IdentityError;

use super::dto::{LinkRequest, MessageResponse, ReadRequest};

const LINKED_PREMIUM: &str = "連携に成功しました！\nWebのプレミアム機能がLINEでも有効になります。";
const BAD_CREDENTIALS: &str = "IDまたはパスワードが間違っています。";
const NOT_LINKED: &str =
    "アカウントが連携されていません。\nメニューの「連携する」からログイン情報を入力してください。";
const MISSING_BOOK_ID: &str = "作品IDが指定されていません。";

/// Failure rendered as `{message}`.
pub struct LineApiError {
    status: StatusCode,
    message: String,
}

impl LineApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<ApiError> for LineApiError {
    fn from(err: ApiError) -> Self {
        Self::new(err.status(), err.message())
    }
}

impl From<JsonRejection> for LineApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::from(rejection).into()
    }
}

impl IntoResponse for LineApiError {
    fn into_response(self) -> Response {
        (self.status, Json(MessageResponse::new(self.message))).into_response()
    }
}

/// JSON body whose rejection is answered as `{message}`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(LineApiError))]
pub struct LineJson<T>(pub T);

/// POST /line/link - Attach a messaging id to an account
pub async fn link_account(
    State(state): State<AppState>,
    LineJson(request): LineJson<LinkRequest>,
) -> Result<impl IntoResponse, LineApiError> {
    let cmd = LinkAccountCommand {
        username: request.username,
        password: request.password,
        messaging_id: request.line_user_id,
    };

    let linked = state
        .link_account_handler()
        .handle(cmd)
        .await
        .map_err(|err| match err {
            IdentityError::InvalidCredentials => {
                LineApiError::new(StatusCode::UNAUTHORIZED, BAD_CREDENTIALS)
            }
            other => ApiError::from(other).into(),
        })?;

    let message = if linked.premium {
        LINKED_PREMIUM.to_string()
    } else {
        format!(
            "連携に成功しました！\n1日{}回までLINEでも無料で読めるようになります。",
            state.settings.daily_free_views
        )
    };
    Ok(Json(MessageResponse::new(message)))
}

/// POST /line/read - Open a work on behalf of a linked messaging account
pub async fn read_work(
    State(state): State<AppState>,
    LineJson(request): LineJson<ReadRequest>,
) -> Result<impl IntoResponse, LineApiError> {
    let work_id = request
        .book_id
        .ok_or_else(|| LineApiError::new(StatusCode::BAD_REQUEST, MISSING_BOOK_ID))?;

    let cmd = ReadWorkCommand {
        messaging_id: request.line_user_id,
        work_id: WorkId::new(work_id),
    };

    let result = state
        .read_work_handler()
        .handle(cmd)
        .await
        .map_err(|err| match err {
            ReadWorkError::NotLinked => LineApiError::new(StatusCode::UNAUTHORIZED, NOT_LINKED),
            ReadWorkError::Denied(denial) => denied(denial, &state).into(),
        })?;

    Ok(Json(result.record))
}
