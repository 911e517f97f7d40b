//! HS256 bearer tokens.
//!
//! The subject is the username. Expiry is enforced by `jsonwebtoken`'s
//! default validation with no leeway.

use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, Timestamp};
use crate::ports::TokenService;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry: Duration,
}

impl JwtTokenService {
    pub fn new(secret: &SecretString, expiry: Duration) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            expiry,
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation
    }
}

#[async_trait]
impl TokenService for JwtTokenService {
    async fn issue(&self, username: &str) -> Result<String, AuthError> {
        let now = Timestamp::now().as_unix_secs();
        let lifetime = i64::try_from(self.expiry.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            sub: username.to_string(),
            iat: now,
            exp: now.saturating_add(lifetime),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::service_unavailable(format!("failed to sign token: {}", e)))
    }

    async fn verify(&self, token: &str) -> Result<String, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &Self::validation())
            .map(|data| data.claims.sub)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Token expired");
                    AuthError::TokenExpired
                }
                _ => {
                    tracing::debug!("Token validation failed: {}", e);
                    AuthError::InvalidToken
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(expiry_secs: u64) -> JwtTokenService {
        JwtTokenService::new(
            &SecretString::new("0123456789abcdef0123456789abcdef".to_string()),
            Duration::from_secs(expiry_secs),
        )
    }

    #[tokio::test]
    async fn issued_token_verifies_to_username() {
        let svc = service(3600);

        let token = svc.issue("alice").await.unwrap();

        assert_eq!(svc.verify(&token).await.unwrap(), "alice");
    }

    #[tokio::test]
    async fn token_signed_with_other_secret_is_invalid() {
        let other = JwtTokenService::new(
            &SecretString::new("ffffffffffffffffffffffffffffffff".to_string()),
            Duration::from_secs(3600),
        );
        let token = other.issue("alice").await.unwrap();

        assert_eq!(service(3600).verify(&token).await, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn garbage_is_invalid() {
        assert_eq!(service(3600).verify("not.a.jwt").await, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn expired_token_is_reported_as_expired() {
        let svc = service(3600);
        let now = Timestamp::now().as_unix_secs();
        let claims = Claims {
            sub: "alice".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &svc.encoding_key).unwrap();

        assert_eq!(svc.verify(&token).await, Err(AuthError::TokenExpired));
    }
}
