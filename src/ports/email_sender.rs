//! Outbound transactional email port.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;

/// Delivers account emails.
///
/// Failures surface as `ErrorCode::EmailDeliveryError`; whether that is
/// fatal is the caller's decision.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_verification(
        &self,
        email: &str,
        username: &str,
        token: &str,
    ) -> Result<(), DomainError>;

    async fn send_password_reset(
        &self,
        email: &str,
        username: &str,
        token: &str,
    ) -> Result<(), DomainError>;
}
