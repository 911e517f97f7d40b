//! Billing handlers - plan status, checkout, portal, and provider webhooks.

mod create_checkout_session;
mod create_portal_session;
mod get_billing_status;
mod handle_payment_webhook;

pub use create_checkout_session::{CheckoutUrls, CreateCheckoutSessionHandler};
pub use create_portal_session::CreatePortalSessionHandler;
pub use get_billing_status::{BillingStatus, GetBillingStatusHandler};
pub use handle_payment_webhook::{HandlePaymentWebhookCommand, HandlePaymentWebhookHandler};
