//! Entitlement engine.
//!
//! Decides whether a caller may open a work's detail view. The checks run
//! in a fixed order, each at most once:
//!
//! 1. Guests are refused.
//! 2. Premium viewers skip the quota.
//! 3. Free viewers at or over the daily limit are refused.
//! 4. The work must exist.

use std::sync::Arc;

use tracing::info;

use crate::domain::catalog::Work;
use crate::domain::foundation::WorkId;
use crate::domain::history::ViewHistoryLedger;
use crate::domain::identity::{AuthenticatedUser, UserContext};
use crate::ports::WorkRepository;

use super::EntitlementError;

/// A granted view.
#[derive(Debug, Clone)]
pub struct Entitlement {
    pub viewer: AuthenticatedUser,
    pub work: Work,
}

pub struct EntitlementEngine {
    works: Arc<dyn WorkRepository>,
    ledger: Arc<ViewHistoryLedger>,
    daily_limit: u64,
}

impl EntitlementEngine {
    pub fn new(works: Arc<dyn WorkRepository>, ledger: Arc<ViewHistoryLedger>, daily_limit: u64) -> Self {
        Self {
            works,
            ledger,
            daily_limit,
        }
    }

    pub fn daily_limit(&self) -> u64 {
        self.daily_limit
    }

    pub async fn authorize(
        &self,
        context: &UserContext,
        work_id: WorkId,
    ) -> Result<Entitlement, EntitlementError> {
        let viewer = context
            .as_authenticated()
            .ok_or(EntitlementError::Unauthenticated)?;

        if !viewer.premium {
            let viewed_today = self.ledger.count_today(viewer.user_id).await?;
            if viewed_today >= self.daily_limit {
                info!(
                    user_id = %viewer.user_id,
                    work_id = %work_id,
                    viewed_today,
                    limit = self.daily_limit,
                    "daily view quota reached"
                );
                return Err(EntitlementError::QuotaExceeded {
                    limit: self.daily_limit,
                });
            }
        }

        let work = self
            .works
            .find_by_id(work_id)
            .await?
            .ok_or(EntitlementError::WorkNotFound(work_id))?;

        Ok(Entitlement {
            viewer: viewer.clone(),
            work,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::FixedClock;
    use crate::adapters::memory::{InMemoryViewHistoryRepository, InMemoryWorkRepository};
    use crate::domain::foundation::{Timestamp, UserId};
    use crate::domain::identity::user::test_support::{premium_user, user};
    use crate::ports::Clock;
    use chrono::{Duration, FixedOffset};

    struct Fixture {
        history: Arc<InMemoryViewHistoryRepository>,
        clock: Arc<FixedClock>,
        ledger: Arc<ViewHistoryLedger>,
        engine: EntitlementEngine,
    }

    fn fixture() -> Fixture {
        let works = Arc::new(InMemoryWorkRepository::with_works((1..=20).map(|id| Work {
            id: WorkId::new(id),
            title: Some(format!("work {}", id)),
            ..Default::default()
        })));
        let history = Arc::new(InMemoryViewHistoryRepository::new());
        let clock = Arc::new(FixedClock::at_rfc3339("2024-01-15T03:00:00Z"));
        let ledger = Arc::new(ViewHistoryLedger::new(
            history.clone(),
            clock.clone(),
            Duration::seconds(60),
            FixedOffset::east_opt(9 * 3600).unwrap(),
        ));
        let engine = EntitlementEngine::new(works, ledger.clone(), 10);
        Fixture {
            history,
            clock,
            ledger,
            engine,
        }
    }

    fn free_context(clock: &FixedClock) -> UserContext {
        UserContext::authenticated(user(1, "alice"), clock.now())
    }

    #[tokio::test]
    async fn guest_is_unauthenticated() {
        let f = fixture();

        let result = f.engine.authorize(&UserContext::Guest, WorkId::new(1)).await;

        assert_eq!(result.unwrap_err(), EntitlementError::Unauthenticated);
    }

    #[tokio::test]
    async fn guest_is_refused_before_existence_check() {
        let f = fixture();

        let result = f.engine.authorize(&UserContext::Guest, WorkId::new(999)).await;

        assert_eq!(result.unwrap_err(), EntitlementError::Unauthenticated);
    }

    #[tokio::test]
    async fn tenth_view_allowed_eleventh_denied() {
        let f = fixture();
        let ctx = free_context(&f.clock);

        for id in 1..=10 {
            let granted = f.engine.authorize(&ctx, WorkId::new(id)).await.unwrap();
            f.ledger.record_view(granted.viewer.user_id, &granted.work).await.unwrap();
        }
        let eleventh = f.engine.authorize(&ctx, WorkId::new(11)).await;

        assert_eq!(eleventh.unwrap_err(), EntitlementError::QuotaExceeded { limit: 10 });
    }

    #[tokio::test]
    async fn quota_is_checked_before_existence() {
        let f = fixture();
        for id in 1..=10 {
            f.history.seed(UserId::new(1), WorkId::new(id), f.clock.now());
        }

        let result = f.engine.authorize(&free_context(&f.clock), WorkId::new(999)).await;

        assert_eq!(result.unwrap_err(), EntitlementError::QuotaExceeded { limit: 10 });
    }

    #[tokio::test]
    async fn yesterdays_views_do_not_count() {
        let f = fixture();
        let yesterday = f.clock.now().minus_secs(86_400);
        for id in 1..=10 {
            f.history.seed(UserId::new(1), WorkId::new(id), yesterday);
        }

        let result = f.engine.authorize(&free_context(&f.clock), WorkId::new(1)).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn premium_bypasses_quota() {
        let f = fixture();
        for id in 1..=15 {
            f.history.seed(UserId::new(1), WorkId::new(id), f.clock.now());
        }
        let expires = Some(f.clock.now().plus_secs(3600));
        let ctx = UserContext::authenticated(premium_user(1, "alice", expires), f.clock.now());

        let granted = f.engine.authorize(&ctx, WorkId::new(1)).await.unwrap();

        assert!(granted.viewer.premium);
        assert_eq!(granted.work.id, WorkId::new(1));
    }

    #[tokio::test]
    async fn lapsed_premium_is_subject_to_quota() {
        let f = fixture();
        for id in 1..=10 {
            f.history.seed(UserId::new(1), WorkId::new(id), f.clock.now());
        }
        let expired: Option<Timestamp> = Some(f.clock.now().minus_secs(1));
        let ctx = UserContext::authenticated(premium_user(1, "alice", expired), f.clock.now());

        let result = f.engine.authorize(&ctx, WorkId::new(1)).await;

        assert!(matches!(result, Err(EntitlementError::QuotaExceeded { .. })));
    }

    #[tokio::test]
    async fn missing_work_is_not_found() {
        let f = fixture();

        let result = f.engine.authorize(&free_context(&f.clock), WorkId::new(404)).await;

        assert_eq!(result.unwrap_err(), EntitlementError::WorkNotFound(WorkId::new(404)));
    }
}
