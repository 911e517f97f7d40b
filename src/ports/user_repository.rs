//! User repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::identity::{NewUser, User};

/// Account storage.
///
/// Lookups return `Ok(None)` when nothing matches; errors are reserved for
/// storage failures.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Login accepts either identifier in the same field.
    async fn find_by_username_or_email(
        &self,
        username_or_email: &str,
    ) -> Result<Option<User>, DomainError>;

    async fn find_by_messaging_id(&self, messaging_id: &str) -> Result<Option<User>, DomainError>;

    async fn find_by_verification_token(&self, token: &str) -> Result<Option<User>, DomainError>;

    async fn find_by_reset_token(&self, token: &str) -> Result<Option<User>, DomainError>;

    async fn find_by_customer_id(&self, customer_id: &str) -> Result<Option<User>, DomainError>;

    /// Inserts a new account and returns it with its assigned id.
    ///
    /// Fails with `ErrorCode::Conflict` on a duplicate username or email.
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    /// Persists every mutable field of an existing account.
    async fn update(&self, user: &User) -> Result<(), DomainError>;
}
