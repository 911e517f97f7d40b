//! Recording email sender for tests.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::EmailSender;

/// A mail that would have been sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub kind: MailKind,
    pub email: String,
    pub username: String,
    pub token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailKind {
    Verification,
    PasswordReset,
}

#[derive(Debug, Default)]
pub struct MockEmailSender {
    sent: Mutex<Vec<SentMail>>,
    failing: bool,
}

impl MockEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sender whose every delivery fails.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn record(&self, kind: MailKind, email: &str, username: &str, token: &str) -> Result<(), DomainError> {
        if self.failing {
            return Err(DomainError::new(ErrorCode::EmailDeliveryError, "mock delivery failure"));
        }
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SentMail {
                kind,
                email: email.to_string(),
                username: username.to_string(),
                token: token.to_string(),
            });
        Ok(())
    }
}

#[async_trait]
impl EmailSender for MockEmailSender {
    async fn send_verification(
        &self,
        email: &str,
        username: &str,
        token: &str,
    ) -> Result<(), DomainError> {
        self.record(MailKind::Verification, email, username, token)
    }

    async fn send_password_reset(
        &self,
        email: &str,
        username: &str,
        token: &str,
    ) -> Result<(), DomainError> {
        self.record(MailKind::PasswordReset, email, username, token)
    }
}
