//! HandlePaymentWebhookHandler - Verifies and applies a provider webhook.

use std::sync::Arc;

use tracing::warn;

use crate::domain::billing::{IdempotentWebhookProcessor, StripeWebhookVerifier, WebhookError};
use crate::ports::{Clock, WebhookResult};

/// Command to handle a payment webhook.
#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookCommand {
    /// Raw request body, exactly as signed.
    pub payload: Vec<u8>,
    /// `Stripe-Signature` header value.
    pub signature: String,
}

pub struct HandlePaymentWebhookHandler {
    verifier: Arc<StripeWebhookVerifier>,
    processor: Arc<IdempotentWebhookProcessor>,
    clock: Arc<dyn Clock>,
}

impl HandlePaymentWebhookHandler {
    pub fn new(
        verifier: Arc<StripeWebhookVerifier>,
        processor: Arc<IdempotentWebhookProcessor>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            verifier,
            processor,
            clock,
        }
    }

    pub async fn handle(&self, cmd: HandlePaymentWebhookCommand) -> Result<WebhookResult, WebhookError> {
        let event = self
            .verifier
            .verify_and_parse(&cmd.payload, &cmd.signature, self.clock.now())
            .map_err(|e| {
                warn!(error = %e, "webhook rejected");
                e
            })?;

        self.processor.process(event).await
    }
}
