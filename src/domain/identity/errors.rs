//! Account errors.
//!
//! Messages are user-facing and shown verbatim by the clients.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Errors raised by sign-up, sign-in and account recovery.
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    #[error("必須項目（ID, Email, Password）が入力されていません。")]
    MissingRegistrationFields,

    #[error("IDと同じパスワードは使用できません。")]
    PasswordMatchesUsername,

    #[error("有効なメールアドレスを入力してください。")]
    InvalidEmail,

    #[error("パスワードは8文字以上で、大文字・小文字・数字・記号(!@#$%^&*)を含めてください。")]
    WeakPassword,

    #[error("このユーザーIDは既に使用されています")]
    UsernameTaken,

    #[error("このメールアドレスは既に登録されています")]
    EmailTaken,

    #[error("ユーザー名またはパスワードが正しくありません。")]
    InvalidCredentials,

    #[error("メールアドレスの認証が完了していません。受信トレイを確認してください。")]
    EmailNotVerified,

    #[error("無効なトークンか、期限切れです。")]
    InvalidVerificationToken,

    #[error("このメールアドレスは既に認証済みです。ログインしてください。")]
    AlreadyVerified,

    #[error("メールアドレスを入力してください")]
    MissingEmail,

    #[error("そのメールアドレスは登録されていません。")]
    EmailNotRegistered,

    #[error("情報が不足しています")]
    MissingResetFields,

    #[error("無効なリクエストです。")]
    InvalidResetToken,

    #[error("リンクの有効期限が切れています。もう一度リクエストしてください。")]
    ResetTokenExpired,

    #[error("LINEユーザーIDが指定されていません")]
    MissingMessagingId,

    #[error("User not found")]
    UserNotFound,

    #[error("Email delivery failed: {0}")]
    EmailDelivery(String),

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl IdentityError {
    pub fn code(&self) -> ErrorCode {
        match self {
            IdentityError::MissingRegistrationFields
            | IdentityError::PasswordMatchesUsername
            | IdentityError::InvalidEmail
            | IdentityError::WeakPassword
            | IdentityError::UsernameTaken
            | IdentityError::EmailTaken
            | IdentityError::InvalidVerificationToken
            | IdentityError::AlreadyVerified
            | IdentityError::MissingEmail
            | IdentityError::MissingResetFields
            | IdentityError::MissingMessagingId
            | IdentityError::InvalidResetToken
            | IdentityError::ResetTokenExpired => ErrorCode::ValidationFailed,
            IdentityError::InvalidCredentials | IdentityError::EmailNotVerified => {
                ErrorCode::Unauthorized
            }
            IdentityError::EmailNotRegistered | IdentityError::UserNotFound => {
                ErrorCode::UserNotFound
            }
            IdentityError::EmailDelivery(_) => ErrorCode::EmailDeliveryError,
            IdentityError::Infrastructure(_) => ErrorCode::InternalError,
        }
    }
}

impl From<DomainError> for IdentityError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::EmailDeliveryError => IdentityError::EmailDelivery(err.message),
            _ => IdentityError::Infrastructure(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_failures_are_unauthorized() {
        assert_eq!(IdentityError::InvalidCredentials.code(), ErrorCode::Unauthorized);
        assert_eq!(IdentityError::EmailNotVerified.code(), ErrorCode::Unauthorized);
    }

    #[test]
    fn unknown_email_is_not_found() {
        assert_eq!(IdentityError::EmailNotRegistered.code(), ErrorCode::UserNotFound);
    }

    #[test]
    fn delivery_failure_keeps_its_kind() {
        let err: IdentityError =
            DomainError::new(ErrorCode::EmailDeliveryError, "webhook returned 502").into();
        assert!(matches!(err, IdentityError::EmailDelivery(ref m) if m.contains("502")));
    }

    #[test]
    fn storage_failure_becomes_infrastructure() {
        let err: IdentityError = DomainError::database("connection reset").into();
        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
