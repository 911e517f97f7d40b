//! VerifyEmailHandler - Confirms an address from the emailed link.

use std::sync::Arc;

use tracing::info;

use crate::domain::catalog::non_blank;
use crate::domain::identity::IdentityError;
use crate::ports::UserRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyEmailOutcome {
    Verified,
    AlreadyVerified,
}

pub struct VerifyEmailHandler {
    users: Arc<dyn UserRepository>,
}

impl VerifyEmailHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, token: Option<&str>) -> Result<VerifyEmailOutcome, IdentityError> {
        let token = non_blank(token).ok_or(IdentityError::InvalidVerificationToken)?;
        let mut user = self
            .users
            .find_by_verification_token(&token)
            .await?
            .ok_or(IdentityError::InvalidVerificationToken)?;

        if !user.mark_verified() {
            return Ok(VerifyEmailOutcome::AlreadyVerified);
        }
        self.users.update(&user).await?;
        info!(user_id = %user.id, "email verified");
        Ok(VerifyEmailOutcome::Verified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryUserRepository;
    use crate::domain::foundation::UserId;
    use crate::domain::identity::user::test_support::user;

    fn users() -> Arc<InMemoryUserRepository> {
        let mut pending = user(1, "alice");
        pending.verified = false;
        pending.verification_token = Some("tok-1".to_string());
        let mut stale = user(2, "bob");
        stale.verification_token = Some("tok-2".to_string());
        Arc::new(InMemoryUserRepository::with_users([pending, stale]))
    }

    #[tokio::test]
    async fn valid_token_verifies_and_is_consumed() {
        let users = users();
        let handler = VerifyEmailHandler::new(users.clone());

        assert_eq!(handler.handle(Some("tok-1")).await.unwrap(), VerifyEmailOutcome::Verified);

        let stored = users.get(UserId::new(1)).unwrap();
        assert!(stored.verified);
        assert!(stored.verification_token.is_none());
        assert!(matches!(
            handler.handle(Some("tok-1")).await,
            Err(IdentityError::InvalidVerificationToken)
        ));
    }

    #[tokio::test]
    async fn already_verified_is_informational() {
        let handler = VerifyEmailHandler::new(users());
        assert_eq!(
            handler.handle(Some("tok-2")).await.unwrap(),
            VerifyEmailOutcome::AlreadyVerified
        );
    }

    #[tokio::test]
    async fn missing_or_unknown_token_is_rejected() {
        let handler = VerifyEmailHandler::new(users());
        assert!(handler.handle(None).await.is_err());
        assert!(handler.handle(Some("nope")).await.is_err());
    }
}
