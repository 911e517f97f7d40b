//! Idempotent webhook processing.
//!
//! 1. Skip events whose id is already settled in the ledger.
//! 2. Dispatch to the handler for the event type.
//! 3. Record the outcome (success, ignored or failed).
//!
//! A failed outcome does not settle the event: the handler error goes back
//! to the provider as a 5xx and the redelivery runs the handler again.
//! Concurrent deliveries of one event race on the ledger insert; the loser
//! reports `AlreadyProcessed`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::ports::{Clock, SaveResult, WebhookEventRecord, WebhookEventRepository, WebhookResult};

use super::stripe_event::{StripeEvent, StripeEventType};
use super::webhook_errors::WebhookError;

/// Handles one or more event types.
#[async_trait]
pub trait WebhookEventHandler: Send + Sync {
    fn handles(&self) -> Vec<StripeEventType>;

    /// `Err(WebhookError::Ignored)` acknowledges without applying.
    async fn handle(&self, event: &StripeEvent) -> Result<(), WebhookError>;
}

#[async_trait]
pub trait WebhookDispatcher: Send + Sync {
    fn get_handler(&self, event_type: &StripeEventType) -> Option<&dyn WebhookEventHandler>;

    /// Events without a handler come back as `Ignored`.
    async fn dispatch(&self, event: &StripeEvent) -> Result<(), WebhookError> {
        let event_type = event.parsed_type();
        match self.get_handler(&event_type) {
            Some(handler) => handler.handle(event).await,
            None => Err(WebhookError::Ignored(format!(
                "no handler for event type {}",
                event.event_type
            ))),
        }
    }
}

pub struct IdempotentWebhookProcessor {
    repository: Arc<dyn WebhookEventRepository>,
    dispatcher: Arc<dyn WebhookDispatcher>,
    clock: Arc<dyn Clock>,
}

impl IdempotentWebhookProcessor {
    pub fn new(
        repository: Arc<dyn WebhookEventRepository>,
        dispatcher: Arc<dyn WebhookDispatcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            dispatcher,
            clock,
        }
    }

    /// Applies an event until one attempt settles it.
    ///
    /// Ignored events count as processed. Failures are recorded but stay
    /// open, so a redelivery of a failed event is applied again.
    pub async fn process(&self, event: StripeEvent) -> Result<WebhookResult, WebhookError> {
        let existing = self.repository.find_by_event_id(&event.id).await?;
        if existing.is_some_and(|record| record.outcome.is_settled()) {
            info!(event_id = %event.id, outcome = "duplicate", "webhook already processed");
            return Ok(WebhookResult::AlreadyProcessed);
        }

        let result = self.dispatcher.dispatch(&event).await;

        let payload = serde_json::to_value(&event)
            .map_err(|e| WebhookError::ParseError(format!("failed to serialize event: {}", e)))?;
        let now = self.clock.now();
        let record = match &result {
            Ok(()) => WebhookEventRecord::success(&event.id, &event.event_type, now, payload),
            Err(WebhookError::Ignored(reason)) => {
                WebhookEventRecord::ignored(&event.id, &event.event_type, reason, now, payload)
            }
            Err(e) => {
                WebhookEventRecord::failed(&event.id, &event.event_type, e.to_string(), now, payload)
            }
        };
        let outcome = record.outcome;

        match self.repository.save(record).await? {
            SaveResult::Inserted => match result {
                Ok(()) | Err(WebhookError::Ignored(_)) => {
                    info!(
                        event_id = %event.id,
                        event_type = %event.event_type,
                        outcome = outcome.as_str(),
                        "webhook processed"
                    );
                    Ok(WebhookResult::Processed)
                }
                Err(e) => {
                    error!(
                        event_id = %event.id,
                        event_type = %event.event_type,
                        error = %e,
                        "webhook handler failed"
                    );
                    Err(e)
                }
            },
            SaveResult::AlreadyExists => Ok(WebhookResult::AlreadyProcessed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::FixedClock;
    use crate::adapters::memory::InMemoryWebhookEventRepository;
    use crate::domain::billing::StripeEventBuilder;
    use crate::ports::WebhookOutcome;
    use std::sync::atomic::{AtomicU32, Ordering};

    // ══════════════════════════════════════════════════════════════
    // Test Infrastructure
    // ══════════════════════════════════════════════════════════════

    enum Behavior {
        Succeed,
        Fail,
        FailOnce,
        Ignore,
    }

    struct CountingHandler {
        behavior: Behavior,
        calls: AtomicU32,
    }

    impl CountingHandler {
        fn new(behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                calls: AtomicU32::new(0),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WebhookEventHandler for CountingHandler {
        fn handles(&self) -> Vec<StripeEventType> {
            vec![StripeEventType::CheckoutSessionCompleted]
        }

        async fn handle(&self, _event: &StripeEvent) -> Result<(), WebhookError> {
            let previous = self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behavior {
                Behavior::Succeed => Ok(()),
                Behavior::Fail => Err(WebhookError::Database("simulated failure".to_string())),
                Behavior::FailOnce if previous == 0 => {
                    Err(WebhookError::Database("transient".to_string()))
                }
                Behavior::FailOnce => Ok(()),
                Behavior::Ignore => Err(WebhookError::Ignored("test ignore".to_string())),
            }
        }
    }

    struct SingleHandlerDispatcher(Arc<CountingHandler>);

    #[async_trait]
    impl WebhookDispatcher for SingleHandlerDispatcher {
        fn get_handler(&self, event_type: &StripeEventType) -> Option<&dyn WebhookEventHandler> {
            if self.0.handles().contains(event_type) {
                Some(self.0.as_ref())
            } else {
                None
            }
        }
    }

    fn processor(
        handler: Arc<CountingHandler>,
    ) -> (IdempotentWebhookProcessor, Arc<InMemoryWebhookEventRepository>) {
        let repo = Arc::new(InMemoryWebhookEventRepository::new());
        let processor = IdempotentWebhookProcessor::new(
            repo.clone(),
            Arc::new(SingleHandlerDispatcher(handler)),
            Arc::new(FixedClock::at_rfc3339("2024-01-15T00:00:00Z")),
        );
        (processor, repo)
    }

    fn event(id: &str, event_type: &str) -> StripeEvent {
        StripeEventBuilder::new().id(id).event_type(event_type).build()
    }

    // ══════════════════════════════════════════════════════════════
    // Idempotency
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn first_delivery_is_processed() {
        let handler = CountingHandler::new(Behavior::Succeed);
        let (processor, repo) = processor(handler.clone());

        let result = processor.process(event("evt_new", "checkout.session.completed")).await;

        assert_eq!(result.unwrap(), WebhookResult::Processed);
        assert_eq!(handler.calls(), 1);
        let record = repo.find_by_event_id("evt_new").await.unwrap().unwrap();
        assert_eq!(record.outcome, WebhookOutcome::Success);
    }

    #[tokio::test]
    async fn redelivery_is_acknowledged_without_reapplying() {
        let handler = CountingHandler::new(Behavior::Succeed);
        let (processor, _) = processor(handler.clone());

        processor.process(event("evt_dup", "checkout.session.completed")).await.unwrap();
        let second = processor.process(event("evt_dup", "checkout.session.completed")).await;

        assert_eq!(second.unwrap(), WebhookResult::AlreadyProcessed);
        assert_eq!(handler.calls(), 1);
    }

    #[tokio::test]
    async fn ignored_event_counts_as_processed() {
        let handler = CountingHandler::new(Behavior::Ignore);
        let (processor, repo) = processor(handler);

        let result = processor.process(event("evt_ign", "checkout.session.completed")).await;

        assert_eq!(result.unwrap(), WebhookResult::Processed);
        let record = repo.find_by_event_id("evt_ign").await.unwrap().unwrap();
        assert_eq!(record.outcome, WebhookOutcome::Ignored);
    }

    #[tokio::test]
    async fn unhandled_type_is_recorded_as_ignored() {
        let handler = CountingHandler::new(Behavior::Succeed);
        let (processor, repo) = processor(handler.clone());

        let result = processor.process(event("evt_inv", "invoice.paid")).await;

        assert_eq!(result.unwrap(), WebhookResult::Processed);
        assert_eq!(handler.calls(), 0);
        let record = repo.find_by_event_id("evt_inv").await.unwrap().unwrap();
        assert_eq!(record.outcome, WebhookOutcome::Ignored);
    }

    #[tokio::test]
    async fn handler_failure_is_recorded_as_failed() {
        let handler = CountingHandler::new(Behavior::Fail);
        let (processor, repo) = processor(handler);

        let result = processor.process(event("evt_fail", "checkout.session.completed")).await;

        assert!(matches!(result, Err(WebhookError::Database(_))));
        let record = repo.find_by_event_id("evt_fail").await.unwrap().unwrap();
        assert_eq!(record.outcome, WebhookOutcome::Failed);
    }

    #[tokio::test]
    async fn redelivery_after_failure_is_applied() {
        let handler = CountingHandler::new(Behavior::FailOnce);
        let (processor, repo) = processor(handler.clone());

        let first = processor.process(event("evt_x", "checkout.session.completed")).await;
        let second = processor.process(event("evt_x", "checkout.session.completed")).await;

        assert!(matches!(first, Err(WebhookError::Database(_))));
        assert_eq!(second.unwrap(), WebhookResult::Processed);
        assert_eq!(handler.calls(), 2);
        let record = repo.find_by_event_id("evt_x").await.unwrap().unwrap();
        assert_eq!(record.outcome, WebhookOutcome::Success);
        assert!(record.error_message.is_none());
    }

    #[tokio::test]
    async fn settled_retry_is_not_applied_again() {
        let handler = CountingHandler::new(Behavior::FailOnce);
        let (processor, _) = processor(handler.clone());

        let _ = processor.process(event("evt_y", "checkout.session.completed")).await;
        processor.process(event("evt_y", "checkout.session.completed")).await.unwrap();
        let third = processor.process(event("evt_y", "checkout.session.completed")).await;

        assert_eq!(third.unwrap(), WebhookResult::AlreadyProcessed);
        assert_eq!(handler.calls(), 2);
    }

    #[tokio::test]
    async fn distinct_events_are_processed_independently() {
        let handler = CountingHandler::new(Behavior::Succeed);
        let (processor, _) = processor(handler.clone());

        processor.process(event("evt_1", "checkout.session.completed")).await.unwrap();
        processor.process(event("evt_2", "checkout.session.completed")).await.unwrap();

        assert_eq!(handler.calls(), 2);
    }
}
