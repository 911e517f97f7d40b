//! CreateCheckoutSessionHandler - Starts a premium subscription checkout.

use std::sync::Arc;

use tracing::info;

use crate::domain::billing::BillingError;
use crate::domain::identity::AuthenticatedUser;
use crate::ports::{CheckoutSession, CreateCheckoutRequest, PaymentProvider};

/// Where the hosted pages send the user back to.
#[derive(Debug, Clone)]
pub struct CheckoutUrls {
    pub price_id: String,
    pub frontend_url: String,
}

impl CheckoutUrls {
    fn success_url(&self) -> String {
        format!("{}/settings?session_id={{CHECKOUT_SESSION_ID}}", self.frontend_url)
    }

    fn cancel_url(&self) -> String {
        format!("{}/pricing", self.frontend_url)
    }
}

pub struct CreateCheckoutSessionHandler {
    payments: Arc<dyn PaymentProvider>,
    urls: CheckoutUrls,
}

impl CreateCheckoutSessionHandler {
    pub fn new(payments: Arc<dyn PaymentProvider>, urls: CheckoutUrls) -> Self {
        Self { payments, urls }
    }

    /// The user id travels in session metadata and comes back on the
    /// completion webhook.
    pub async fn handle(&self, viewer: &AuthenticatedUser) -> Result<CheckoutSession, BillingError> {
        if viewer.premium {
            return Err(BillingError::AlreadyPremium);
        }

        let session = self
            .payments
            .create_checkout_session(CreateCheckoutRequest {
                user_id: viewer.user_id,
                email: viewer.user.email.clone(),
                price_id: self.urls.price_id.clone(),
                success_url: self.urls.success_url(),
                cancel_url: self.urls.cancel_url(),
            })
            .await?;

        info!(user_id = %viewer.user_id, session_id = %session.id, "checkout session created");
        Ok(session)
    }
}
