//! Billing module - payment webhooks and the plan transitions they drive.

mod errors;
mod plan_change;
mod stripe_event;
mod webhook_errors;
mod webhook_handlers;
mod webhook_processor;
mod webhook_verifier;

pub use errors::BillingError;
pub use plan_change::{PlanChange, SubscriptionBridge};
pub use stripe_event::{
    CheckoutSessionObject, StripeEvent, StripeEventData, StripeEventType, SubscriptionObject,
};
pub use webhook_errors::WebhookError;
pub use webhook_handlers::{
    BillingWebhookDispatcher, CheckoutCompletedHandler, SubscriptionDeletedHandler,
    USER_ID_METADATA_KEY,
};
pub use webhook_processor::{IdempotentWebhookProcessor, WebhookDispatcher, WebhookEventHandler};
pub use webhook_verifier::{SignatureHeader, StripeWebhookVerifier};

#[cfg(test)]
pub use stripe_event::StripeEventBuilder;
#[cfg(test)]
pub use webhook_verifier::test_signature_header;
