//! ResendVerificationHandler - Replaces and re-sends a verification token.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::catalog::non_blank;
use crate::domain::identity::IdentityError;
use crate::ports::{EmailSender, UserRepository};

pub struct ResendVerificationHandler {
    users: Arc<dyn UserRepository>,
    email: Arc<dyn EmailSender>,
}

impl ResendVerificationHandler {
    pub fn new(users: Arc<dyn UserRepository>, email: Arc<dyn EmailSender>) -> Self {
        Self { users, email }
    }

    pub async fn handle(&self, email: Option<&str>) -> Result<(), IdentityError> {
        let email = non_blank(email).ok_or(IdentityError::MissingEmail)?;
        let mut user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(IdentityError::EmailNotRegistered)?;
        if user.verified {
            return Err(IdentityError::AlreadyVerified);
        }

        let token = Uuid::new_v4().to_string();
        user.issue_verification_token(token.clone());
        self.users.update(&user).await?;

        self.email
            .send_verification(&user.email, &user.username, &token)
            .await?;
        info!(user_id = %user.id, "verification email re-sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::email::MockEmailSender;
    use crate::adapters::memory::InMemoryUserRepository;
    use crate::domain::foundation::UserId;
    use crate::domain::identity::user::test_support::user;

    fn users() -> Arc<InMemoryUserRepository> {
        let mut pending = user(1, "alice");
        pending.verified = false;
        pending.verification_token = Some("old".to_string());
        Arc::new(InMemoryUserRepository::with_users([pending, user(2, "bob")]))
    }

    #[tokio::test]
    async fn new_token_replaces_old_one() {
        let users = users();
        let mail = Arc::new(MockEmailSender::new());
        let handler = ResendVerificationHandler::new(users.clone(), mail.clone());

        handler.handle(Some("alice@example.com")).await.unwrap();

        let stored = users.get(UserId::new(1)).unwrap();
        assert_ne!(stored.verification_token.as_deref(), Some("old"));
        assert_eq!(Some(mail.sent()[0].token.as_str()), stored.verification_token.as_deref());
    }

    #[tokio::test]
    async fn verified_account_is_refused() {
        let handler = ResendVerificationHandler::new(users(), Arc::new(MockEmailSender::new()));
        let result = handler.handle(Some("bob@example.com")).await;
        assert!(matches!(result, Err(IdentityError::AlreadyVerified)));
    }

    #[tokio::test]
    async fn unknown_email_is_not_registered() {
        let handler = ResendVerificationHandler::new(users(), Arc::new(MockEmailSender::new()));
        let result = handler.handle(Some("nobody@example.com")).await;
        assert!(matches!(result, Err(IdentityError::EmailNotRegistered)));
    }
}
