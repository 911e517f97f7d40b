//! Webhook event repository port - idempotency ledger for provider webhooks.
//!
//! The provider retries deliveries it believes failed, so the same event id
//! can arrive more than once. Each processed id is stored with its outcome
//! and payload. A delivery that finds a settled record (success or ignored)
//! is acknowledged without being applied; a failed record stays open so the
//! next delivery runs the handler again.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Timestamp};

/// How a webhook event was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    Success,
    /// Acknowledged without changing state.
    Ignored,
    Failed,
}

impl WebhookOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookOutcome::Success => "success",
            WebhookOutcome::Ignored => "ignored",
            WebhookOutcome::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "success" => Some(WebhookOutcome::Success),
            "ignored" => Some(WebhookOutcome::Ignored),
            "failed" => Some(WebhookOutcome::Failed),
            _ => None,
        }
    }

    /// Whether a redelivery must be acknowledged without reprocessing.
    pub fn is_settled(&self) -> bool {
        matches!(self, WebhookOutcome::Success | WebhookOutcome::Ignored)
    }
}

/// Record of a processed webhook event.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookEventRecord {
    /// Provider event id (`evt_...`).
    pub event_id: String,
    pub event_type: String,
    pub processed_at: Timestamp,
    pub outcome: WebhookOutcome,
    /// Why the event was ignored or failed.
    pub error_message: Option<String>,
    pub payload: serde_json::Value,
}

impl WebhookEventRecord {
    pub fn success(
        event_id: impl Into<String>,
        event_type: impl Into<String>,
        processed_at: Timestamp,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            event_type: event_type.into(),
            processed_at,
            outcome: WebhookOutcome::Success,
            error_message: None,
            payload,
        }
    }

    pub fn ignored(
        event_id: impl Into<String>,
        event_type: impl Into<String>,
        reason: impl Into<String>,
        processed_at: Timestamp,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            outcome: WebhookOutcome::Ignored,
            error_message: Some(reason.into()),
            ..Self::success(event_id, event_type, processed_at, payload)
        }
    }

    pub fn failed(
        event_id: impl Into<String>,
        event_type: impl Into<String>,
        error: impl Into<String>,
        processed_at: Timestamp,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            outcome: WebhookOutcome::Failed,
            error_message: Some(error.into()),
            ..Self::success(event_id, event_type, processed_at, payload)
        }
    }
}

/// Result of attempting to save a webhook event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveResult {
    /// New record, or one replacing a failed attempt.
    Inserted,
    /// Another delivery of the same event settled it first.
    AlreadyExists,
}

/// Result of webhook processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookResult {
    Processed,
    AlreadyProcessed,
}

#[async_trait]
pub trait WebhookEventRepository: Send + Sync {
    async fn find_by_event_id(
        &self,
        event_id: &str,
    ) -> Result<Option<WebhookEventRecord>, DomainError>;

    /// Insert keyed by event id. An existing failed record is replaced;
    /// a settled one is kept and reported as `AlreadyExists`.
    async fn save(&self, record: WebhookEventRecord) -> Result<SaveResult, DomainError>;

    /// Deletes records processed before `cutoff` and returns how many.
    async fn delete_before(&self, cutoff: Timestamp) -> Result<u64, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at() -> Timestamp {
        Timestamp::from_unix_secs(1_705_276_800).unwrap()
    }

    #[test]
    fn success_record_has_no_error() {
        let record = WebhookEventRecord::success(
            "evt_123",
            "checkout.session.completed",
            at(),
            serde_json::json!({"id": "test"}),
        );

        assert_eq!(record.event_id, "evt_123");
        assert_eq!(record.outcome, WebhookOutcome::Success);
        assert!(record.error_message.is_none());
    }

    #[test]
    fn ignored_record_keeps_reason() {
        let record = WebhookEventRecord::ignored(
            "evt_456",
            "invoice.paid",
            "unhandled event type",
            at(),
            serde_json::json!({}),
        );

        assert_eq!(record.outcome, WebhookOutcome::Ignored);
        assert_eq!(record.error_message.as_deref(), Some("unhandled event type"));
    }

    #[test]
    fn failed_record_keeps_error() {
        let record = WebhookEventRecord::failed("evt_789", "t", "db down", at(), serde_json::json!({}));

        assert_eq!(record.outcome, WebhookOutcome::Failed);
        assert_eq!(record.error_message.as_deref(), Some("db down"));
    }

    #[test]
    fn outcome_round_trips_through_storage_text() {
        for outcome in [WebhookOutcome::Success, WebhookOutcome::Ignored, WebhookOutcome::Failed] {
            assert_eq!(WebhookOutcome::parse(outcome.as_str()), Some(outcome));
        }
        assert_eq!(WebhookOutcome::parse("unknown"), None);
    }

    #[test]
    fn only_failed_outcome_stays_open() {
        assert!(WebhookOutcome::Success.is_settled());
        assert!(WebhookOutcome::Ignored.is_settled());
        assert!(!WebhookOutcome::Failed.is_settled());
    }
}
