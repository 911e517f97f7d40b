//! Entitlement denials.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, WorkId};

/// Why a detail view was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntitlementError {
    #[error("ログインしてください")]
    Unauthenticated,

    #[error("無料プランの1日の閲覧制限（{limit}回）に達しました。")]
    QuotaExceeded { limit: u64 },

    #[error("作品が見つかりません")]
    WorkNotFound(WorkId),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl EntitlementError {
    pub fn code(&self) -> ErrorCode {
        match self {
            EntitlementError::Unauthenticated => ErrorCode::Unauthorized,
            EntitlementError::QuotaExceeded { .. } => ErrorCode::QuotaExceeded,
            EntitlementError::WorkNotFound(_) => ErrorCode::WorkNotFound,
            EntitlementError::Storage(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<DomainError> for EntitlementError {
    fn from(err: DomainError) -> Self {
        EntitlementError::Storage(err.to_string())
    }
}
