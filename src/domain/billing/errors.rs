//! Billing errors.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::PaymentError;

#[derive(Debug, Clone, Error)]
pub enum BillingError {
    #[error("ログインが必要です")]
    Unauthenticated,

    #[error("すでにプレミアムプランに登録済みです")]
    AlreadyPremium,

    #[error("有料プランの登録情報が見つかりません")]
    NoCustomer,

    #[error("ユーザーが見つかりません")]
    UserNotFound,

    #[error("Payment provider error: {0}")]
    Payment(String),

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl BillingError {
    pub fn code(&self) -> ErrorCode {
        match self {
            BillingError::Unauthenticated => ErrorCode::Unauthorized,
            BillingError::AlreadyPremium => ErrorCode::Conflict,
            BillingError::NoCustomer => ErrorCode::ValidationFailed,
            BillingError::UserNotFound => ErrorCode::UserNotFound,
            BillingError::Payment(_) => ErrorCode::PaymentProviderError,
            BillingError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<DomainError> for BillingError {
    fn from(err: DomainError) -> Self {
        BillingError::Infrastructure(err.to_string())
    }
}

impl From<PaymentError> for BillingError {
    fn from(err: PaymentError) -> Self {
        BillingError::Payment(err.to_string())
    }
}
