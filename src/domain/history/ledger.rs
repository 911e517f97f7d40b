//! View history ledger.
//!
//! Owns the counting rules behind the daily quota: which views are
//! recorded, and what "today" means.

use std::sync::Arc;

use chrono::{Duration, FixedOffset};
use tracing::debug;

use crate::domain::catalog::Work;
use crate::domain::foundation::{DomainError, UserId, WorkId};
use crate::ports::{Clock, ViewHistoryRepository};

use super::{NewViewEvent, RecordOutcome, ViewEvent};

/// Records deduplicated views and answers aggregate queries over them.
pub struct ViewHistoryLedger {
    repository: Arc<dyn ViewHistoryRepository>,
    clock: Arc<dyn Clock>,
    dedup_window: Duration,
    day_boundary: FixedOffset,
}

impl ViewHistoryLedger {
    /// `dedup_window` comes from `LimitsConfig::dedup_window`, which bounds it.
    pub fn new(
        repository: Arc<dyn ViewHistoryRepository>,
        clock: Arc<dyn Clock>,
        dedup_window: Duration,
        day_boundary: FixedOffset,
    ) -> Self {
        Self {
            repository,
            clock,
            dedup_window,
            day_boundary,
        }
    }

    /// Appends a view unless the same user viewed the same work within the
    /// dedup window.
    ///
    /// The lookup and the append are not atomic. Two concurrent first views
    /// may both be recorded.
    pub async fn record_view(
        &self,
        user_id: UserId,
        work: &Work,
    ) -> Result<RecordOutcome, DomainError> {
        let now = self.clock.now();

        if let Some(latest) = self.repository.latest_for(user_id, work.id).await? {
            if now.duration_since(&latest.viewed_at) < self.dedup_window {
                debug!(user_id = %user_id, work_id = %work.id, "view inside dedup window");
                return Ok(RecordOutcome::Deduplicated);
            }
        }

        self.repository
            .append(NewViewEvent::for_work(user_id, work, now))
            .await?;
        Ok(RecordOutcome::Recorded)
    }

    /// Views recorded since local midnight at the configured offset.
    pub async fn count_today(&self, user_id: UserId) -> Result<u64, DomainError> {
        let start_of_today = self.clock.now().start_of_day(self.day_boundary);
        self.repository.count_since(user_id, start_of_today).await
    }

    /// Most viewed works overall, by count then ascending id.
    pub async fn top_viewed(&self, limit: usize) -> Result<Vec<WorkId>, DomainError> {
        self.repository.top_viewed(limit).await
    }

    /// A user's latest views, newest first.
    pub async fn recent_history(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<ViewEvent>, DomainError> {
        self.repository.recent_for(user_id, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::FixedClock;
    use crate::adapters::memory::InMemoryViewHistoryRepository;
    use crate::domain::foundation::Timestamp;

    // ══════════════════════════════════════════════════════════════
    // Test Infrastructure
    // ══════════════════════════════════════════════════════════════

    struct Fixture {
        repo: Arc<InMemoryViewHistoryRepository>,
        clock: Arc<FixedClock>,
        ledger: ViewHistoryLedger,
    }

    fn fixture_at(rfc3339: &str) -> Fixture {
        let repo = Arc::new(InMemoryViewHistoryRepository::new());
        let clock = Arc::new(FixedClock::at_rfc3339(rfc3339));
        let ledger = ViewHistoryLedger::new(
            repo.clone(),
            clock.clone(),
            Duration::seconds(60),
            FixedOffset::east_opt(9 * 3600).unwrap(),
        );
        Fixture { repo, clock, ledger }
    }

    fn fixture() -> Fixture {
        fixture_at("2024-01-15T03:00:00Z")
    }

    fn work(id: i32) -> Work {
        Work {
            id: WorkId::new(id),
            title: Some(format!("work {}", id)),
            author: Some("author".to_string()),
            ..Default::default()
        }
    }

    const ALICE: UserId = UserId::new(1);

    // ══════════════════════════════════════════════════════════════
    // Deduplication
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn first_view_is_recorded_with_denormalized_fields() {
        let f = fixture();

        let outcome = f.ledger.record_view(ALICE, &work(42)).await.unwrap();

        assert_eq!(outcome, RecordOutcome::Recorded);
        let events = f.repo.all();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "work 42");
        assert_eq!(events[0].author, "author");
    }

    #[tokio::test]
    async fn repeat_view_within_window_is_deduplicated() {
        let f = fixture();

        f.ledger.record_view(ALICE, &work(42)).await.unwrap();
        f.clock.advance_secs(30);
        let outcome = f.ledger.record_view(ALICE, &work(42)).await.unwrap();

        assert_eq!(outcome, RecordOutcome::Deduplicated);
        assert_eq!(f.repo.all().len(), 1);
    }

    #[tokio::test]
    async fn repeat_view_after_window_is_recorded() {
        let f = fixture();

        f.ledger.record_view(ALICE, &work(42)).await.unwrap();
        f.clock.advance_secs(61);
        let outcome = f.ledger.record_view(ALICE, &work(42)).await.unwrap();

        assert_eq!(outcome, RecordOutcome::Recorded);
        assert_eq!(f.repo.all().len(), 2);
    }

    #[tokio::test]
    async fn different_works_are_not_deduplicated() {
        let f = fixture();

        f.ledger.record_view(ALICE, &work(1)).await.unwrap();
        f.ledger.record_view(ALICE, &work(2)).await.unwrap();

        assert_eq!(f.repo.all().len(), 2);
    }

    #[tokio::test]
    async fn different_users_are_not_deduplicated() {
        let f = fixture();

        f.ledger.record_view(ALICE, &work(1)).await.unwrap();
        f.ledger.record_view(UserId::new(2), &work(1)).await.unwrap();

        assert_eq!(f.repo.all().len(), 2);
    }

    // ══════════════════════════════════════════════════════════════
    // Daily Count
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn count_today_uses_configured_offset() {
        // 2024-01-15T03:00Z is 12:00 in +09:00; local midnight is 2024-01-14T15:00Z
        let f = fixture();
        f.repo.seed(ALICE, WorkId::new(1), Timestamp::from_unix_secs(1_705_244_400 - 1).unwrap());
        f.repo.seed(ALICE, WorkId::new(2), Timestamp::from_unix_secs(1_705_244_400).unwrap());
        f.ledger.record_view(ALICE, &work(3)).await.unwrap();

        assert_eq!(f.ledger.count_today(ALICE).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn deduplicated_views_do_not_count() {
        let f = fixture();
        for _ in 0..5 {
            f.ledger.record_view(ALICE, &work(42)).await.unwrap();
            f.clock.advance_secs(5);
        }

        assert_eq!(f.ledger.count_today(ALICE).await.unwrap(), 1);
    }

    // ══════════════════════════════════════════════════════════════
    // Aggregates
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn top_viewed_ranks_by_count_then_id() {
        let f = fixture();
        let t = f.clock.now();
        for (user, work) in [(1, 5), (2, 5), (1, 9), (2, 9), (3, 2)] {
            f.repo.seed(UserId::new(user), WorkId::new(work), t);
        }

        let top = f.ledger.top_viewed(10).await.unwrap();

        assert_eq!(top, vec![WorkId::new(5), WorkId::new(9), WorkId::new(2)]);
    }

    #[tokio::test]
    async fn recent_history_is_newest_first() {
        let f = fixture();
        f.ledger.record_view(ALICE, &work(1)).await.unwrap();
        f.clock.advance_secs(10);
        f.ledger.record_view(ALICE, &work(2)).await.unwrap();

        let history = f.ledger.recent_history(ALICE, 10).await.unwrap();

        let ids: Vec<i32> = history.iter().map(|e| e.work_id.as_i32()).collect();
        assert_eq!(ids, vec![2, 1]);
    }
}
