//! ResetPasswordHandler - Sets a new password from a reset link.

use std::sync::Arc;

use tracing::info;

use crate::domain::catalog::non_blank;
use crate::domain::identity::{check_password_policy, IdentityError};
use crate::ports::{Clock, PasswordHasher, UserRepository};

#[derive(Debug, Clone, Default)]
pub struct ResetPasswordCommand {
    pub token: Option<String>,
    pub password: Option<String>,
}

pub struct ResetPasswordHandler {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
}

impl ResetPasswordHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            passwords,
            clock,
        }
    }

    pub async fn handle(&self, cmd: ResetPasswordCommand) -> Result<(), IdentityError> {
        let (Some(token), Some(password)) = (non_blank(cmd.token.as_deref()), cmd.password) else {
            return Err(IdentityError::MissingResetFields);
        };
        if password.is_empty() {
            return Err(IdentityError::MissingResetFields);
        }
        check_password_policy(&password)?;

        let mut user = self
            .users
            .find_by_reset_token(&token)
            .await?
            .ok_or(IdentityError::InvalidResetToken)?;
        if !user.reset_token_usable(self.clock.now()) {
            return Err(IdentityError::ResetTokenExpired);
        }

        let hash = self.passwords.hash(&password).await?;
        user.complete_password_reset(hash);
        self.users.update(&user).await?;
        info!(user_id = %user.id, "password reset completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockPasswordHasher;
    use crate::adapters::clock::FixedClock;
    use crate::adapters::memory::InMemoryUserRepository;
    use crate::domain::foundation::UserId;
    use crate::domain::identity::user::test_support::user;

    fn fixture() -> (ResetPasswordHandler, Arc<InMemoryUserRepository>, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::at_rfc3339("2024-01-15T00:00:00Z"));
        let mut alice = user(1, "alice");
        alice.issue_reset_token("reset-1".to_string(), clock.now().plus_secs(3600));
        let users = Arc::new(InMemoryUserRepository::with_users([alice]));
        let handler = ResetPasswordHandler::new(
            users.clone(),
            Arc::new(MockPasswordHasher::new()),
            clock.clone(),
        );
        (handler, users, clock)
    }

    fn reset(token: &str, password: &str) -> ResetPasswordCommand {
        ResetPasswordCommand {
            token: Some(token.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[tokio::test]
    async fn valid_token_sets_password_and_is_consumed() {
        let (handler, users, _) = fixture();

        handler.handle(reset("reset-1", "N3w!passw")).await.unwrap();

        let stored = users.get(UserId::new(1)).unwrap();
        assert_eq!(stored.password_hash, MockPasswordHasher::hash_of("N3w!passw"));
        assert!(stored.reset_token.is_none());
    }

    #[tokio::test]
    async fn expired_token_is_refused() {
        let (handler, _, clock) = fixture();
        clock.advance_secs(3601);

        let result = handler.handle(reset("reset-1", "N3w!passw")).await;

        assert!(matches!(result, Err(IdentityError::ResetTokenExpired)));
    }

    #[tokio::test]
    async fn policy_is_checked_before_token_lookup() {
        let (handler, _, _) = fixture();
        let result = handler.handle(reset("unknown", "weak")).await;
        assert!(matches!(result, Err(IdentityError::WeakPassword)));
    }

    #[tokio::test]
    async fn unknown_token_is_invalid() {
        let (handler, _, _) = fixture();
        let result = handler.handle(reset("unknown", "N3w!passw")).await;
        assert!(matches!(result, Err(IdentityError::InvalidResetToken)));
    }

    #[tokio::test]
    async fn missing_fields_are_rejected() {
        let (handler, _, _) = fixture();
        let result = handler.handle(ResetPasswordCommand::default()).await;
        assert!(matches!(result, Err(IdentityError::MissingResetFields)));
    }
}
