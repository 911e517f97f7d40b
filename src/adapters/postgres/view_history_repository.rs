//! PostgreSQL implementation of ViewHistoryRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, Timestamp, UserId, WorkId};
use crate::domain::history::{NewViewEvent, ViewEvent};
use crate::ports::ViewHistoryRepository;

pub struct PostgresViewHistoryRepository {
    pool: PgPool,
}

impl PostgresViewHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ViewRow {
    id: i64,
    user_id: i64,
    book_id: i32,
    book_title: Option<String>,
    author_name: Option<String>,
    viewed_at: DateTime<Utc>,
}

impl From<ViewRow> for ViewEvent {
    fn from(row: ViewRow) -> Self {
        ViewEvent {
            id: row.id,
            user_id: UserId::new(row.user_id),
            work_id: WorkId::new(row.book_id),
            viewed_at: Timestamp::from_datetime(row.viewed_at),
            title: row.book_title.unwrap_or_default(),
            author: row.author_name.unwrap_or_default(),
        }
    }
}

fn limit_param(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[async_trait]
impl ViewHistoryRepository for PostgresViewHistoryRepository {
    async fn latest_for(
        &self,
        user_id: UserId,
        work_id: WorkId,
    ) -> Result<Option<ViewEvent>, DomainError> {
        let row: Option<ViewRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, book_id, book_title, author_name, viewed_at
            FROM user_book_history
            WHERE user_id = $1 AND book_id = $2
            ORDER BY viewed_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(user_id.as_i64())
        .bind(work_id.as_i32())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to load latest view: {}", e)))?;

        Ok(row.map(ViewEvent::from))
    }

    async fn append(&self, event: NewViewEvent) -> Result<ViewEvent, DomainError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO user_book_history (user_id, book_id, book_title, author_name, viewed_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(event.user_id.as_i64())
        .bind(event.work_id.as_i32())
        .bind(&event.title)
        .bind(&event.author)
        .bind(event.viewed_at.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to record view: {}", e)))?;

        Ok(event.into_event(id))
    }

    async fn count_since(&self, user_id: UserId, since: Timestamp) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM user_book_history WHERE user_id = $1 AND viewed_at >= $2",
        )
        .bind(user_id.as_i64())
        .bind(since.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to count views: {}", e)))?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn top_viewed(&self, limit: usize) -> Result<Vec<WorkId>, DomainError> {
        let ids: Vec<i32> = sqlx::query_scalar(
            r#"
            SELECT book_id FROM user_book_history
            GROUP BY book_id
            ORDER BY COUNT(*) DESC, book_id ASC
            LIMIT $1
            "#,
        )
        .bind(limit_param(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to rank views: {}", e)))?;

        Ok(ids.into_iter().map(WorkId::new).collect())
    }

    async fn recent_for(&self, user_id: UserId, limit: usize) -> Result<Vec<ViewEvent>, DomainError> {
        let rows: Vec<ViewRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, book_id, book_title, author_name, viewed_at
            FROM user_book_history
            WHERE user_id = $1
            ORDER BY viewed_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(user_id.as_i64())
        .bind(limit_param(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to load history: {}", e)))?;

        Ok(rows.into_iter().map(ViewEvent::from).collect())
    }
}
