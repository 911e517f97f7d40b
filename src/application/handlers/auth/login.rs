//! LoginHandler - Exchanges credentials for a session token.

use std::sync::Arc;

use tracing::info;

use crate::domain::identity::IdentityError;
use crate::ports::{PasswordHasher, TokenService, UserRepository};

#[derive(Debug, Clone)]
pub struct LoginCommand {
    /// Username or email address.
    pub login: String,
    pub password: String,
}

pub struct LoginHandler {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl LoginHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    /// Unknown accounts and wrong passwords fail identically.
    pub async fn handle(&self, cmd: LoginCommand) -> Result<String, IdentityError> {
        let user = self
            .users
            .find_by_username_or_email(cmd.login.trim())
            .await?
            .ok_or(IdentityError::InvalidCredentials)?;

        if !self.passwords.matches(&cmd.password, &user.password_hash).await? {
            return Err(IdentityError::InvalidCredentials);
        }
        if !user.verified {
            return Err(IdentityError::EmailNotVerified);
        }

        let token = self
            .tokens
            .issue(&user.username)
            .await
            .map_err(|e| IdentityError::Infrastructure(e.to_string()))?;
        info!(user_id = %user.id, "user logged in");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::{MockPasswordHasher, MockTokenService};
    use crate::adapters::memory::InMemoryUserRepository;
    use crate::domain::identity::user::test_support::user;

    fn handler() -> LoginHandler {
        let mut alice = user(1, "alice");
        alice.password_hash = MockPasswordHasher::hash_of("Secr3t!pw");
        let mut pending = user(2, "pending");
        pending.password_hash = MockPasswordHasher::hash_of("Secr3t!pw");
        pending.verified = false;

        LoginHandler::new(
            Arc::new(InMemoryUserRepository::with_users([alice, pending])),
            Arc::new(MockPasswordHasher::new()),
            Arc::new(MockTokenService::new()),
        )
    }

    fn login(login: &str, password: &str) -> LoginCommand {
        LoginCommand {
            login: login.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn login_by_username_issues_token() {
        let token = handler().handle(login("alice", "Secr3t!pw")).await.unwrap();
        assert_eq!(token, MockTokenService::token_for("alice"));
    }

    #[tokio::test]
    async fn login_by_email_issues_token_for_username() {
        let token = handler().handle(login("alice@example.com", "Secr3t!pw")).await.unwrap();
        assert_eq!(token, MockTokenService::token_for("alice"));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() {
        let wrong = handler().handle(login("alice", "nope")).await.unwrap_err();
        let unknown = handler().handle(login("nobody", "Secr3t!pw")).await.unwrap_err();

        assert!(matches!(wrong, IdentityError::InvalidCredentials));
        assert!(matches!(unknown, IdentityError::InvalidCredentials));
    }

    #[tokio::test]
    async fn unverified_account_cannot_log_in() {
        let result = handler().handle(login("pending", "Secr3t!pw")).await;
        assert!(matches!(result, Err(IdentityError::EmailNotVerified)));
    }
}
