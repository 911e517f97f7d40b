//! Mock payment provider for testing.
//!
//! Returns canned session URLs, records every request, and can be told to
//! fail the next call.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::ports::{
    CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentProvider, PortalSession,
};

#[derive(Default)]
pub struct MockPaymentProvider {
    state: Mutex<MockState>,
}

#[derive(Default)]
struct MockState {
    checkout_requests: Vec<CreateCheckoutRequest>,
    portal_requests: Vec<(String, String)>,
    next_error: Option<PaymentError>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the next call with `error`.
    pub fn fail_next(&self, error: PaymentError) {
        self.state().next_error = Some(error);
    }

    pub fn checkout_requests(&self) -> Vec<CreateCheckoutRequest> {
        self.state().checkout_requests.clone()
    }

    /// `(customer_id, return_url)` pairs.
    pub fn portal_requests(&self) -> Vec<(String, String)> {
        self.state().portal_requests.clone()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let mut state = self.state();
        if let Some(err) = state.next_error.take() {
            return Err(err);
        }
        let id = format!("cs_test_{}", state.checkout_requests.len() + 1);
        state.checkout_requests.push(request);
        Ok(CheckoutSession {
            url: format!("https://checkout.stripe.com/c/pay/{}", id),
            id,
            expires_at: chrono::Utc::now().timestamp() + 86_400,
        })
    }

    async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<PortalSession, PaymentError> {
        let mut state = self.state();
        if let Some(err) = state.next_error.take() {
            return Err(err);
        }
        state
            .portal_requests
            .push((customer_id.to_string(), return_url.to_string()));
        Ok(PortalSession {
            id: format!("bps_test_{}", state.portal_requests.len()),
            url: format!("https://billing.stripe.com/p/session/{}", customer_id),
        })
    }
}
