//! Email configuration

use serde::Deserialize;

use super::error::ValidationError;
use super::payment::is_http_url;

/// Transactional email configuration.
///
/// Mail is handed to an automation webhook which renders and sends it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmailConfig {
    /// Webhook receiving verification mail requests
    pub verification_webhook_url: String,

    /// Webhook receiving password reset mail requests
    pub password_reset_webhook_url: String,
}

impl EmailConfig {
    /// Validate email configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.verification_webhook_url.is_empty() {
            return Err(ValidationError::MissingRequired("VERIFICATION_WEBHOOK_URL"));
        }
        if self.password_reset_webhook_url.is_empty() {
            return Err(ValidationError::MissingRequired("PASSWORD_RESET_WEBHOOK_URL"));
        }
        if !is_http_url(&self.verification_webhook_url) {
            return Err(ValidationError::InvalidUrl("verification_webhook_url"));
        }
        if !is_http_url(&self.password_reset_webhook_url) {
            return Err(ValidationError::InvalidUrl("password_reset_webhook_url"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_missing_urls() {
        assert!(EmailConfig::default().validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bare_host() {
        let config = EmailConfig {
            verification_webhook_url: "hooks.example.com/verify".to_string(),
            password_reset_webhook_url: "https://hooks.example.com/reset".to_string(),
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidUrl("verification_webhook_url"))
        ));
    }

    #[test]
    fn test_validation_valid_config() {
        let config = EmailConfig {
            verification_webhook_url: "https://hooks.example.com/verify".to_string(),
            password_reset_webhook_url: "https://hooks.example.com/reset".to_string(),
        };
        assert!(config.validate().is_ok());
    }
}
