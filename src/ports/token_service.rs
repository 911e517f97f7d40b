//! Token service port.
//!
//! Issues and verifies the bearer tokens handed out at login. The subject
//! is the username; everything else about the caller is loaded fresh from
//! the user repository on each request.

use async_trait::async_trait;

use crate::domain::foundation::AuthError;

#[async_trait]
pub trait TokenService: Send + Sync {
    /// Signs a token for `username`.
    async fn issue(&self, username: &str) -> Result<String, AuthError>;

    /// Returns the username the token was issued for.
    ///
    /// # Errors
    ///
    /// - `AuthError::InvalidToken` for malformed or tampered tokens
    /// - `AuthError::TokenExpired` once past the configured lifetime
    async fn verify(&self, token: &str) -> Result<String, AuthError>;
}
