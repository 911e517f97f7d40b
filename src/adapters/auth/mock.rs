//! Mock credential adapters for testing.
//!
//! Tokens are readable strings and passwords are "hashed" with a fixed
//! prefix, so tests can build fixtures without running Argon2 or signing
//! JWTs.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, DomainError};
use crate::ports::{PasswordHasher, TokenService};

const TOKEN_PREFIX: &str = "mock-token:";

#[derive(Debug, Default, Clone, Copy)]
pub struct MockTokenService;

impl MockTokenService {
    /// Always verifies as `TokenExpired`.
    pub const EXPIRED_TOKEN: &'static str = "mock-token-expired";

    pub fn new() -> Self {
        Self
    }

    pub fn token_for(username: &str) -> String {
        format!("{}{}", TOKEN_PREFIX, username)
    }
}

#[async_trait]
impl TokenService for MockTokenService {
    async fn issue(&self, username: &str) -> Result<String, AuthError> {
        Ok(Self::token_for(username))
    }

    async fn verify(&self, token: &str) -> Result<String, AuthError> {
        if token == Self::EXPIRED_TOKEN {
            return Err(AuthError::TokenExpired);
        }
        token
            .strip_prefix(TOKEN_PREFIX)
            .filter(|username| !username.is_empty())
            .map(str::to_string)
            .ok_or(AuthError::InvalidToken)
    }
}

const HASH_PREFIX: &str = "mock-hash:";

#[derive(Debug, Default, Clone, Copy)]
pub struct MockPasswordHasher;

impl MockPasswordHasher {
    pub fn new() -> Self {
        Self
    }

    /// The stored form of `plain`, for seeding fixtures.
    pub fn hash_of(plain: &str) -> String {
        format!("{}{}", HASH_PREFIX, plain)
    }
}

#[async_trait]
impl PasswordHasher for MockPasswordHasher {
    async fn hash(&self, plain: &str) -> Result<String, DomainError> {
        Ok(Self::hash_of(plain))
    }

    async fn matches(&self, plain: &str, hash: &str) -> Result<bool, DomainError> {
        Ok(hash == Self::hash_of(plain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_token_round_trips() {
        let svc = MockTokenService::new();
        let token = svc.issue("alice").await.unwrap();
        assert_eq!(svc.verify(&token).await.unwrap(), "alice");
    }

    #[tokio::test]
    async fn mock_token_rejects_foreign_strings() {
        let svc = MockTokenService::new();
        assert_eq!(svc.verify("eyJhbGciOi").await, Err(AuthError::InvalidToken));
        assert_eq!(svc.verify(TOKEN_PREFIX).await, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn mock_hasher_matches_only_same_password() {
        let hasher = MockPasswordHasher::new();
        let hash = hasher.hash("pw").await.unwrap();
        assert!(hasher.matches("pw", &hash).await.unwrap());
        assert!(!hasher.matches("other", &hash).await.unwrap());
    }
}
