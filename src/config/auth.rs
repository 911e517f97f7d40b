//! Authentication configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Authentication configuration (self-issued HS256 tokens)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared secret for signing session tokens
    pub jwt_secret: SecretString,

    /// Session token lifetime in seconds
    #[serde(default = "default_jwt_expiry")]
    pub jwt_expiry_secs: u64,

    /// Password reset token lifetime in seconds
    #[serde(default = "default_reset_token_ttl")]
    pub reset_token_ttl_secs: u64,
}

impl AuthConfig {
    pub fn jwt_expiry(&self) -> Duration {
        Duration::from_secs(self.jwt_expiry_secs)
    }

    pub fn reset_token_ttl(&self) -> Duration {
        Duration::from_secs(self.reset_token_ttl_secs)
    }

    /// Validate authentication configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let secret = self.jwt_secret.expose_secret();
        if secret.is_empty() {
            return Err(ValidationError::MissingRequired("JWT_SECRET"));
        }
        if secret.len() < 32 {
            return Err(ValidationError::JwtSecretTooShort);
        }
        if self.jwt_expiry_secs == 0 {
            return Err(ValidationError::InvalidTokenLifetime("jwt_expiry_secs"));
        }
        if self.reset_token_ttl_secs == 0 {
            return Err(ValidationError::InvalidTokenLifetime("reset_token_ttl_secs"));
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: SecretString::new(String::new()),
            jwt_expiry_secs: default_jwt_expiry(),
            reset_token_ttl_secs: default_reset_token_ttl(),
        }
    }
}

fn default_jwt_expiry() -> u64 {
    86_400
}

fn default_reset_token_ttl() -> u64 {
    3_600
}
