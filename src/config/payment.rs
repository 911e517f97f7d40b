//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Payment configuration (Stripe)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe API key
    pub stripe_api_key: SecretString,

    /// Stripe webhook signing secret
    pub stripe_webhook_secret: SecretString,

    /// Stripe price ID for the premium subscription
    pub premium_price_id: String,

    /// Public frontend base used for checkout and portal return URLs
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,

    /// Stripe API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl PaymentConfig {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.stripe_api_key.expose_secret().starts_with("sk_test_")
    }

    /// Frontend URL without a trailing slash.
    pub fn frontend_base(&self) -> &str {
        self.frontend_url.trim_end_matches('/')
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let api_key = self.stripe_api_key.expose_secret();
        let webhook_secret = self.stripe_webhook_secret.expose_secret();

        if api_key.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_API_KEY"));
        }
        if webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_WEBHOOK_SECRET"));
        }
        if self.premium_price_id.is_empty() {
            return Err(ValidationError::MissingRequired("PREMIUM_PRICE_ID"));
        }

        if !api_key.starts_with("sk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if !webhook_secret.starts_with("whsec_") {
            return Err(ValidationError::InvalidStripeWebhookSecret);
        }
        if !is_http_url(&self.frontend_url) {
            return Err(ValidationError::InvalidUrl("frontend_url"));
        }
        if !is_http_url(&self.api_base_url) {
            return Err(ValidationError::InvalidUrl("api_base_url"));
        }

        Ok(())
    }
}

pub(super) fn is_http_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

fn default_frontend_url() -> String {
    "https://smartbrief.jp".to_string()
}

fn default_api_base_url() -> String {
    "https://api.stripe.com".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: &str, webhook_secret: &str) -> PaymentConfig {
        PaymentConfig {
            stripe_api_key: SecretString::new(api_key.to_string()),
            stripe_webhook_secret: SecretString::new(webhook_secret.to_string()),
            premium_price_id: "price_premium".to_string(),
            frontend_url: default_frontend_url(),
            api_base_url: default_api_base_url(),
        }
    }

    #[test]
    fn test_is_test_mode() {
        assert!(config("sk_test_xxx", "whsec_xxx").is_test_mode());
        assert!(!config("sk_live_xxx", "whsec_xxx").is_test_mode());
    }

    #[test]
    fn test_frontend_base_trims_slash() {
        let cfg = PaymentConfig {
            frontend_url: "https://smartbrief.jp/".to_string(),
            ..config("sk_test_xxx", "whsec_xxx")
        };
        assert_eq!(cfg.frontend_base(), "https://smartbrief.jp");
    }

    #[test]
    fn test_validation_missing_api_key() {
        assert!(config("", "whsec_xxx").validate().is_err());
    }

    #[test]
    fn test_validation_missing_price() {
        let cfg = PaymentConfig {
            premium_price_id: String::new(),
            ..config("sk_test_xxx", "whsec_xxx")
        };
        assert!(matches!(
            cfg.validate(),
            Err(ValidationError::MissingRequired("PREMIUM_PRICE_ID"))
        ));
    }

    #[test]
    fn test_validation_invalid_prefixes() {
        assert!(matches!(
            config("pk_test_xxx", "whsec_xxx").validate(),
            Err(ValidationError::InvalidStripeKey)
        ));
        assert!(matches!(
            config("sk_test_xxx", "secret_xxx").validate(),
            Err(ValidationError::InvalidStripeWebhookSecret)
        ));
    }

    #[test]
    fn test_validation_invalid_frontend_url() {
        let cfg = PaymentConfig {
            frontend_url: "smartbrief.jp".to_string(),
            ..config("sk_test_xxx", "whsec_xxx")
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(config("sk_test_abcd1234", "whsec_xyz789").validate().is_ok());
    }
}
