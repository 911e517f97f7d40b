//! Catalog errors.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, WorkId};

#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("作品が見つかりません")]
    WorkNotFound(WorkId),

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl CatalogError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CatalogError::WorkNotFound(_) => ErrorCode::WorkNotFound,
            CatalogError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<DomainError> for CatalogError {
    fn from(err: DomainError) -> Self {
        CatalogError::Infrastructure(err.to_string())
    }
}
