//! ForgotPasswordHandler - Issues and emails a password reset token.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};
use uuid::Uuid;

use crate::domain::catalog::non_blank;
use crate::domain::identity::IdentityError;
use crate::ports::{Clock, EmailSender, UserRepository};

pub struct ForgotPasswordHandler {
    users: Arc<dyn UserRepository>,
    email: Arc<dyn EmailSender>,
    clock: Arc<dyn Clock>,
    token_ttl: Duration,
}

impl ForgotPasswordHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        email: Arc<dyn EmailSender>,
        clock: Arc<dyn Clock>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            users,
            email,
            clock,
            token_ttl,
        }
    }

    /// The token is stored before the mail goes out. A delivery failure
    /// is reported and the stored token simply expires.
    pub async fn handle(&self, email: Option<&str>) -> Result<(), IdentityError> {
        let email = non_blank(email).ok_or(IdentityError::MissingEmail)?;
        let mut user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(IdentityError::EmailNotRegistered)?;

        let token = Uuid::new_v4().to_string();
        let ttl_secs = i64::try_from(self.token_ttl.as_secs()).unwrap_or(i64::MAX);
        user.issue_reset_token(token.clone(), self.clock.now().plus_secs(ttl_secs));
        self.users.update(&user).await?;

        self.email
            .send_password_reset(&user.email, &user.username, &token)
            .await
            .map_err(|e| {
                error!(user_id = %user.id, error = %e, "password reset email not sent");
                IdentityError::from(e)
            })?;
        info!(user_id = %user.id, "password reset requested");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::FixedClock;
    use crate::adapters::email::{MailKind, MockEmailSender};
    use crate::adapters::memory::InMemoryUserRepository;
    use crate::domain::foundation::UserId;
    use crate::domain::identity::user::test_support::user;

    fn fixture(mail: Arc<MockEmailSender>) -> (ForgotPasswordHandler, Arc<InMemoryUserRepository>, Arc<FixedClock>) {
        let users = Arc::new(InMemoryUserRepository::with_users([user(1, "alice")]));
        let clock = Arc::new(FixedClock::at_rfc3339("2024-01-15T00:00:00Z"));
        let handler = ForgotPasswordHandler::new(
            users.clone(),
            mail,
            clock.clone(),
            Duration::from_secs(3600),
        );
        (handler, users, clock)
    }

    #[tokio::test]
    async fn reset_token_expires_in_an_hour_and_is_mailed() {
        let mail = Arc::new(MockEmailSender::new());
        let (handler, users, clock) = fixture(mail.clone());

        handler.handle(Some("alice@example.com")).await.unwrap();

        let stored = users.get(UserId::new(1)).unwrap();
        assert_eq!(stored.reset_token_expires_at, Some(clock.now().plus_secs(3600)));
        let sent = mail.sent();
        assert_eq!(sent[0].kind, MailKind::PasswordReset);
        assert_eq!(Some(sent[0].token.as_str()), stored.reset_token.as_deref());
    }

    #[tokio::test]
    async fn unknown_email_is_not_registered() {
        let (handler, _, _) = fixture(Arc::new(MockEmailSender::new()));
        let result = handler.handle(Some("nobody@example.com")).await;
        assert!(matches!(result, Err(IdentityError::EmailNotRegistered)));
    }

    #[tokio::test]
    async fn blank_email_is_missing() {
        let (handler, _, _) = fixture(Arc::new(MockEmailSender::new()));
        assert!(matches!(handler.handle(Some(" ")).await, Err(IdentityError::MissingEmail)));
    }

    #[tokio::test]
    async fn delivery_failure_is_reported() {
        let (handler, _, _) = fixture(Arc::new(MockEmailSender::failing()));
        let result = handler.handle(Some("alice@example.com")).await;
        assert!(matches!(result, Err(IdentityError::EmailDelivery(_))));
    }
}
