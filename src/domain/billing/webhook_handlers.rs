//! Handlers for the webhook events that move plans.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::foundation::UserId;
use crate::ports::UserRepository;

use super::plan_change::{PlanChange, SubscriptionBridge};
use super::stripe_event::{CheckoutSessionObject, StripeEvent, StripeEventType, SubscriptionObject};
use super::webhook_errors::WebhookError;
use super::webhook_processor::{WebhookDispatcher, WebhookEventHandler};
use super::BillingError;

/// Metadata key set on checkout sessions at creation time.
pub const USER_ID_METADATA_KEY: &str = "userId";

fn bridge_error(err: BillingError) -> WebhookError {
    match err {
        BillingError::UserNotFound => WebhookError::Ignored("user not found".to_string()),
        other => WebhookError::Database(other.to_string()),
    }
}

/// `checkout.session.completed` upgrades the user named in metadata.
pub struct CheckoutCompletedHandler {
    bridge: Arc<SubscriptionBridge>,
}

impl CheckoutCompletedHandler {
    pub fn new(bridge: Arc<SubscriptionBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl WebhookEventHandler for CheckoutCompletedHandler {
    fn handles(&self) -> Vec<StripeEventType> {
        vec![StripeEventType::CheckoutSessionCompleted]
    }

    async fn handle(&self, event: &StripeEvent) -> Result<(), WebhookError> {
        let session: CheckoutSessionObject = event
            .deserialize_object()
            .map_err(|e| WebhookError::ParseError(e.to_string()))?;

        let raw_user_id = session
            .metadata
            .get(USER_ID_METADATA_KEY)
            .ok_or_else(|| WebhookError::Ignored("checkout without userId metadata".to_string()))?;
        let user_id: UserId = raw_user_id.parse().map_err(|_| {
            warn!(event_id = %event.id, user_id = %raw_user_id, "non-numeric userId metadata");
            WebhookError::Ignored(format!("invalid userId metadata: {}", raw_user_id))
        })?;

        self.bridge
            .apply(&PlanChange::premium(user_id, session.customer))
            .await
            .map(|_| ())
            .map_err(bridge_error)
    }
}

/// `customer.subscription.deleted` downgrades the customer's account.
pub struct SubscriptionDeletedHandler {
    users: Arc<dyn UserRepository>,
    bridge: Arc<SubscriptionBridge>,
}

impl SubscriptionDeletedHandler {
    pub fn new(users: Arc<dyn UserRepository>, bridge: Arc<SubscriptionBridge>) -> Self {
        Self { users, bridge }
    }
}

#[async_trait]
impl WebhookEventHandler for SubscriptionDeletedHandler {
    fn handles(&self) -> Vec<StripeEventType> {
        vec![StripeEventType::CustomerSubscriptionDeleted]
    }

    async fn handle(&self, event: &StripeEvent) -> Result<(), WebhookError> {
        let subscription: SubscriptionObject = event
            .deserialize_object()
            .map_err(|e| WebhookError::ParseError(e.to_string()))?;

        let customer_id = subscription
            .customer
            .filter(|c| !c.is_empty())
            .ok_or_else(|| WebhookError::Ignored("subscription without customer".to_string()))?;
        let user = self
            .users
            .find_by_customer_id(&customer_id)
            .await?
            .ok_or_else(|| WebhookError::Ignored(format!("no user for customer {}", customer_id)))?;

        self.bridge
            .apply(&PlanChange::free(user.id))
            .await
            .map(|_| ())
            .map_err(bridge_error)
    }
}

/// Routes events to the first registered handler that declares the type.
pub struct BillingWebhookDispatcher {
    handlers: Vec<Box<dyn WebhookEventHandler>>,
}

impl BillingWebhookDispatcher {
    pub fn new(handlers: Vec<Box<dyn WebhookEventHandler>>) -> Self {
        Self { handlers }
    }

    /// The checkout and cancellation handlers wired to one bridge.
    pub fn standard(users: Arc<dyn UserRepository>, bridge: Arc<SubscriptionBridge>) -> Self {
        Self::new(vec![
            Box::new(CheckoutCompletedHandler::new(bridge.clone())),
            Box::new(SubscriptionDeletedHandler::new(users, bridge)),
        ])
    }
}

#[async_trait]
impl WebhookDispatcher for BillingWebhookDispatcher {
    fn get_handler(&self, event_type: &StripeEventType) -> Option<&dyn WebhookEventHandler> {
        self.handlers
            .iter()
            .find(|h| h.handles().contains(event_type))
            .map(|h| h.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::FixedClock;
    use crate::adapters::memory::InMemoryUserRepository;
    use crate::domain::billing::StripeEventBuilder;
    use crate::domain::identity::user::test_support::{premium_user, user};
    use crate::domain::identity::{Plan, User};
    use crate::ports::Clock;
    use serde_json::json;

    fn dispatcher(users: Vec<User>) -> (BillingWebhookDispatcher, Arc<InMemoryUserRepository>, Arc<FixedClock>) {
        let repo = Arc::new(InMemoryUserRepository::with_users(users));
        let clock = Arc::new(FixedClock::at_rfc3339("2024-01-15T00:00:00Z"));
        let bridge = Arc::new(SubscriptionBridge::new(repo.clone(), clock.clone()));
        (BillingWebhookDispatcher::standard(repo.clone(), bridge), repo, clock)
    }

    fn checkout(user_id: serde_json::Value) -> StripeEvent {
        StripeEventBuilder::new()
            .object(json!({"id": "cs_1", "customer": "cus_7", "metadata": {"userId": user_id}}))
            .build()
    }

    #[tokio::test]
    async fn checkout_upgrades_user_from_metadata() {
        let (dispatcher, repo, clock) = dispatcher(vec![user(7, "bob")]);

        dispatcher.dispatch(&checkout(json!("7"))).await.unwrap();

        let stored = repo.get(UserId::new(7)).unwrap();
        assert_eq!(stored.plan, Plan::Premium);
        assert_eq!(stored.customer_id.as_deref(), Some("cus_7"));
        assert!(stored.is_premium(clock.now()));
    }

    #[tokio::test]
    async fn checkout_with_invalid_user_id_is_ignored() {
        let (dispatcher, _, _) = dispatcher(vec![user(7, "bob")]);

        let result = dispatcher.dispatch(&checkout(json!("abc"))).await;

        assert!(matches!(result, Err(WebhookError::Ignored(_))));
    }

    #[tokio::test]
    async fn checkout_for_unknown_user_is_ignored() {
        let (dispatcher, _, _) = dispatcher(vec![]);

        let result = dispatcher.dispatch(&checkout(json!("7"))).await;

        assert!(matches!(result, Err(WebhookError::Ignored(_))));
    }

    #[tokio::test]
    async fn checkout_without_metadata_is_ignored() {
        let (dispatcher, _, _) = dispatcher(vec![user(7, "bob")]);
        let event = StripeEventBuilder::new().object(json!({"id": "cs_1"})).build();

        let result = dispatcher.dispatch(&event).await;

        assert!(matches!(result, Err(WebhookError::Ignored(_))));
    }

    #[tokio::test]
    async fn subscription_deleted_downgrades_by_customer() {
        let mut existing = premium_user(7, "bob", None);
        existing.customer_id = Some("cus_7".to_string());
        let (dispatcher, repo, _) = dispatcher(vec![existing]);
        let event = StripeEventBuilder::new()
            .event_type("customer.subscription.deleted")
            .object(json!({"id": "sub_1", "customer": "cus_7"}))
            .build();

        dispatcher.dispatch(&event).await.unwrap();

        let stored = repo.get(UserId::new(7)).unwrap();
        assert_eq!(stored.plan, Plan::Free);
        assert!(stored.subscription_expires_at.is_none());
    }

    #[tokio::test]
    async fn subscription_deleted_for_unknown_customer_is_ignored() {
        let (dispatcher, _, _) = dispatcher(vec![user(7, "bob")]);
        let event = StripeEventBuilder::new()
            .event_type("customer.subscription.deleted")
            .object(json!({"id": "sub_1", "customer": "cus_missing"}))
            .build();

        let result = dispatcher.dispatch(&event).await;

        assert!(matches!(result, Err(WebhookError::Ignored(_))));
    }

    #[tokio::test]
    async fn unhandled_type_is_ignored() {
        let (dispatcher, _, _) = dispatcher(vec![]);
        let event = StripeEventBuilder::new().event_type("invoice.paid").build();

        let result = dispatcher.dispatch(&event).await;

        assert!(matches!(result, Err(WebhookError::Ignored(_))));
    }
}
