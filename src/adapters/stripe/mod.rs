//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` port for Stripe's hosted checkout and
//! billing portal. All secrets are handled via `secrecy::SecretString`.

mod mock_payment_provider;
mod stripe_adapter;

pub use mock_payment_provider::MockPaymentProvider;
pub use stripe_adapter::{StripeConfig, StripePaymentAdapter};
