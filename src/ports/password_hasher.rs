//! Password hasher port.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;

#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, plain: &str) -> Result<String, DomainError>;

    /// False for a wrong password or an unparseable hash.
    async fn matches(&self, plain: &str, hash: &str) -> Result<bool, DomainError>;
}
