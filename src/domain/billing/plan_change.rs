//! Plan transitions driven by the payment provider.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::UserId;
use crate::domain::identity::{Plan, User};
use crate::ports::{Clock, UserRepository};

use super::BillingError;

/// A normalized plan transition extracted from a webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanChange {
    pub user_id: UserId,
    pub plan: Plan,
    pub customer_id: Option<String>,
}

impl PlanChange {
    pub fn premium(user_id: UserId, customer_id: Option<String>) -> Self {
        Self {
            user_id,
            plan: Plan::Premium,
            customer_id,
        }
    }

    pub fn free(user_id: UserId) -> Self {
        Self {
            user_id,
            plan: Plan::Free,
            customer_id: None,
        }
    }
}

/// Applies plan changes to stored accounts.
pub struct SubscriptionBridge {
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl SubscriptionBridge {
    pub fn new(users: Arc<dyn UserRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }

    /// Upgrading resets the expiry to one month from now rather than
    /// extending it, so a redelivered upgrade is harmless even past the
    /// idempotency ledger.
    pub async fn apply(&self, change: &PlanChange) -> Result<User, BillingError> {
        let mut user = self
            .users
            .find_by_id(change.user_id)
            .await?
            .ok_or(BillingError::UserNotFound)?;

        user.change_plan(change.plan, change.customer_id.as_deref(), self.clock.now());
        self.users.update(&user).await?;

        info!(
            user_id = %user.id,
            plan = user.plan.as_str(),
            expires_at = ?user.subscription_expires_at.map(|t| t.to_rfc3339()),
            "plan changed"
        );
        Ok(user)
    }
}
