//! HTTP handlers for account endpoints.
//!
//! Success bodies are `{message}` except login (`{token}`) and `me`.

use axum::extract::{Json, State};
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::extract::{ApiJson, ApiQuery};
use crate::adapters::http::middleware::RequireUser;
use crate::adapters::http::state::AppState;
use crate::application::handlers::auth::{
    CurrentUser, LoginCommand, RegisterCommand, ResetPasswordCommand, VerifyEmailOutcome,
};
use crate::domain::identity::IdentityError;

use super::dto::{
    AuthRequest, CurrentUserResponse, EmailRequest, MessageResponse, ResetPasswordRequest,
    TokenParams, TokenResponse,
};

const REGISTERED: &str =
    "仮登録が完了しました。送信されたメール内のリンクをクリックして認証を完了してください。";
const VERIFIED: &str = "メール認証が完了しました！";
const ALREADY_VERIFIED: &str = "既に認証済みです。ログインしてください。";
const RESET_MAIL_SENT: &str = "パスワード再設定メールを送信しました。";
const PASSWORD_RESET: &str =
    "パスワードが正常に変更されました。新しいパスワードでログインしてください。";
const VERIFICATION_RESENT: &str = "認証メールを再送しました。受信トレイを確認してください。";

fn message(message: &'static str) -> Json<MessageResponse> {
    Json(MessageResponse { message })
}

/// POST /auth/login - Exchange credentials for a session token
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AuthRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(login), Some(password)) = (
        request
            .username
            .filter(|name| !name.trim().is_empty())
            .or(request.email),
        request.password,
    )
    else {
        return Err(IdentityError::InvalidCredentials.into());
    };

    let token = state
        .login_handler()
        .handle(LoginCommand { login, password })
        .await?;
    Ok(Json(TokenResponse { token }))
}

/// POST /auth/register - Create an unverified FREE account
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AuthRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .register_handler()
        .handle(RegisterCommand {
            username: request.username,
            email: request.email,
            password: request.password,
        })
        .await?;
    Ok(message(REGISTERED))
}

/// POST /auth/verify-email?token=
pub async fn verify_email(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<TokenParams>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state
        .verify_email_handler()
        .handle(params.token.as_deref())
        .await?;
    Ok(match outcome {
        VerifyEmailOutcome::Verified => message(VERIFIED),
        VerifyEmailOutcome::AlreadyVerified => message(ALREADY_VERIFIED),
    })
}

/// POST /auth/forgot-password - Email a one-hour reset link
pub async fn forgot_password(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<EmailRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .forgot_password_handler()
        .handle(request.email.as_deref())
        .await?;
    Ok(message(RESET_MAIL_SENT))
}

/// POST /auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ResetPasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .reset_password_handler()
        .handle(ResetPasswordCommand {
            token: request.token,
            password: request.password,
        })
        .await?;
    Ok(message(PASSWORD_RESET))
}

/// POST /auth/resend-verification
pub async fn resend_verification(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<EmailRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .resend_verification_handler()
        .handle(request.email.as_deref())
        .await?;
    Ok(message(VERIFICATION_RESENT))
}

/// GET /auth/me - The signed-in account
pub async fn me(RequireUser(viewer): RequireUser) -> impl IntoResponse {
    Json(CurrentUserResponse::from(CurrentUser::from(&viewer)))
}
