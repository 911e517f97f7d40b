//! GetBillingStatusHandler - Plan summary for the signed-in user.

use std::sync::Arc;

use crate::domain::billing::BillingError;
use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::identity::Plan;
use crate::ports::{Clock, UserRepository};

/// What the settings page shows about a subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingStatus {
    pub username: String,
    pub plan: Plan,
    pub premium: bool,
    pub expires_at: Option<Timestamp>,
}

pub struct GetBillingStatusHandler {
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl GetBillingStatusHandler {
    pub fn new(users: Arc<dyn UserRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }

    /// Reloads the account so a webhook applied mid-session is visible.
    pub async fn handle(&self, user_id: UserId) -> Result<BillingStatus, BillingError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(BillingError::UserNotFound)?;

        Ok(BillingStatus {
            premium: user.is_premium(self.clock.now()),
            username: user.username,
            plan: user.plan,
            expires_at: user.subscription_expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::FixedClock;
    use crate::adapters::memory::InMemoryUserRepository;
    use crate::domain::identity::user::test_support::{premium_user, user};

    #[tokio::test]
    async fn lapsed_premium_reports_plan_but_not_premium() {
        let clock = Arc::new(FixedClock::at_rfc3339("2024-01-15T00:00:00Z"));
        let lapsed = premium_user(3, "dave", Some(clock.now().minus_secs(1)));
        let handler = GetBillingStatusHandler::new(
            Arc::new(InMemoryUserRepository::with_users([lapsed])),
            clock.clone(),
        );

        let status = handler.handle(UserId::new(3)).await.unwrap();

        assert_eq!(status.plan, Plan::Premium);
        assert!(!status.premium);
        assert_eq!(status.expires_at, Some(clock.now().minus_secs(1)));
    }

    #[tokio::test]
    async fn free_user_has_no_expiry() {
        let handler = GetBillingStatusHandler::new(
            Arc::new(InMemoryUserRepository::with_users([user(1, "alice")])),
            Arc::new(FixedClock::at_rfc3339("2024-01-15T00:00:00Z")),
        );

        let status = handler.handle(UserId::new(1)).await.unwrap();

        assert_eq!(status.username, "alice");
        assert!(!status.premium);
        assert!(status.expires_at.is_none());
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let handler = GetBillingStatusHandler::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(FixedClock::at_rfc3339("2024-01-15T00:00:00Z")),
        );

        let result = handler.handle(UserId::new(1)).await;

        assert!(matches!(result, Err(BillingError::UserNotFound)));
    }
}
