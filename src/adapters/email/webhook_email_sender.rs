//! Email delivery through automation webhooks.
//!
//! Rendering and sending happen in an external workflow; this adapter
//! only posts the recipient and token as JSON.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::EmailSender;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct VerificationMail<'a> {
    email: &'a str,
    username: &'a str,
    verification_token: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordResetMail<'a> {
    email: &'a str,
    username: &'a str,
    reset_token: &'a str,
}

pub struct WebhookEmailSender {
    http_client: reqwest::Client,
    verification_url: String,
    password_reset_url: String,
}

impl WebhookEmailSender {
    pub fn new(verification_url: impl Into<String>, password_reset_url: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http_client,
            verification_url: verification_url.into(),
            password_reset_url: password_reset_url.into(),
        }
    }

    async fn post<T: Serialize + Sync>(&self, kind: &'static str, url: &str, body: &T) -> Result<(), DomainError> {
        let response = self
            .http_client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| delivery_error(kind, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(delivery_error(kind, format!("webhook returned {}", status)));
        }
        tracing::debug!(mail = kind, "email webhook accepted");
        Ok(())
    }
}

fn delivery_error(kind: &'static str, reason: String) -> DomainError {
    tracing::error!(
        target: "upstream",
        upstream = "email_webhook",
        mail = kind,
        error = %reason,
        "email delivery failed"
    );
    DomainError::new(ErrorCode::EmailDeliveryError, reason).with_detail("mail", kind)
}

#[async_trait]
impl EmailSender for WebhookEmailSender {
    async fn send_verification(
        &self,
        email: &str,
        username: &str,
        token: &str,
    ) -> Result<(), DomainError> {
        let body = VerificationMail {
            email,
            username,
            verification_token: token,
        };
        self.post("verification", &self.verification_url, &body).await
    }

    async fn send_password_reset(
        &self,
        email: &str,
        username: &str,
        token: &str,
    ) -> Result<(), DomainError> {
        let body = PasswordResetMail {
            email,
            username,
            reset_token: token,
        };
        self.post("password_reset", &self.password_reset_url, &body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_body_uses_snake_case_token_field() {
        let body = VerificationMail {
            email: "a@example.com",
            username: "a",
            verification_token: "tok",
        };

        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["verification_token"], "tok");
    }

    #[test]
    fn reset_body_uses_camel_case_token_field() {
        let body = PasswordResetMail {
            email: "a@example.com",
            username: "a",
            reset_token: "tok",
        };

        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["resetToken"], "tok");
        assert!(json.get("reset_token").is_none());
    }

    #[tokio::test]
    async fn unreachable_webhook_is_delivery_error() {
        let sender = WebhookEmailSender::new("http://127.0.0.1:9/verify", "http://127.0.0.1:9/reset");

        let err = sender.send_verification("a@example.com", "a", "tok").await.unwrap_err();

        assert_eq!(err.code, ErrorCode::EmailDeliveryError);
    }
}
