//! CreatePortalSessionHandler - Opens the hosted billing portal.

use std::sync::Arc;

use crate::domain::billing::BillingError;
use crate::domain::identity::AuthenticatedUser;
use crate::ports::{PaymentProvider, PortalSession};

pub struct CreatePortalSessionHandler {
    payments: Arc<dyn PaymentProvider>,
    frontend_url: String,
}

impl CreatePortalSessionHandler {
    pub fn new(payments: Arc<dyn PaymentProvider>, frontend_url: impl Into<String>) -> Self {
        Self {
            payments,
            frontend_url: frontend_url.into(),
        }
    }

    pub async fn handle(&self, viewer: &AuthenticatedUser) -> Result<PortalSession, BillingError> {
        let customer_id = viewer
            .user
            .customer_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(BillingError::NoCustomer)?;

        let return_url = format!("{}/settings", self.frontend_url);
        Ok(self
            .payments
            .create_portal_session(customer_id, &return_url)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::FixedClock;
    use crate::adapters::stripe::MockPaymentProvider;
    use crate::domain::identity::user::test_support::premium_user;
    use crate::domain::identity::{User, UserContext};
    use crate::ports::Clock;

    fn viewer(user: User) -> AuthenticatedUser {
        let clock = FixedClock::at_rfc3339("2024-01-15T00:00:00Z");
        match UserContext::authenticated(user, clock.now()) {
            UserContext::Authenticated(viewer) => viewer,
            UserContext::Guest => unreachable!(),
        }
    }

    #[tokio::test]
    async fn portal_returns_to_settings() {
        let payments = Arc::new(MockPaymentProvider::new());
        let handler = CreatePortalSessionHandler::new(payments.clone(), "https://smartbrief.jp");
        let mut user = premium_user(7, "bob", None);
        user.customer_id = Some("cus_123".to_string());

        handler.handle(&viewer(user)).await.unwrap();

        assert_eq!(
            payments.portal_requests(),
            vec![("cus_123".to_string(), "https://smartbrief.jp/settings".to_string())]
        );
    }

    #[tokio::test]
    async fn missing_customer_is_refused() {
        let payments = Arc::new(MockPaymentProvider::new());
        let handler = CreatePortalSessionHandler::new(payments.clone(), "https://smartbrief.jp");

        let result = handler.handle(&viewer(premium_user(7, "bob", None))).await;

        assert!(matches!(result, Err(BillingError::NoCustomer)));
        assert!(payments.portal_requests().is_empty());
    }
}
