//! PostgreSQL implementation of FavoriteRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::favorites::FavoriteEntry;
use crate::domain::foundation::{DomainError, Timestamp, UserId, WorkId};
use crate::ports::FavoriteRepository;

pub struct PostgresFavoriteRepository {
    pool: PgPool,
}

impl PostgresFavoriteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct FavoriteRow {
    user_id: i64,
    book_id: i32,
    book_title: Option<String>,
    author_name: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<FavoriteRow> for FavoriteEntry {
    fn from(row: FavoriteRow) -> Self {
        FavoriteEntry {
            user_id: UserId::new(row.user_id),
            work_id: WorkId::new(row.book_id),
            title: row.book_title.unwrap_or_default(),
            author: row.author_name.unwrap_or_default(),
            created_at: Timestamp::from_datetime(row.created_at),
        }
    }
}

#[async_trait]
impl FavoriteRepository for PostgresFavoriteRepository {
    async fn exists(&self, user_id: UserId, work_id: WorkId) -> Result<bool, DomainError> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM user_favorites WHERE user_id = $1 AND book_id = $2)",
        )
        .bind(user_id.as_i64())
        .bind(work_id.as_i32())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to check favorite: {}", e)))
    }

    async fn insert(&self, entry: FavoriteEntry) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO user_favorites (user_id, book_id, book_title, author_name, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, book_id) DO NOTHING
            "#,
        )
        .bind(entry.user_id.as_i64())
        .bind(entry.work_id.as_i32())
        .bind(&entry.title)
        .bind(&entry.author)
        .bind(entry.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to add favorite: {}", e)))?;

        Ok(())
    }

    async fn delete(&self, user_id: UserId, work_id: WorkId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM user_favorites WHERE user_id = $1 AND book_id = $2")
            .bind(user_id.as_i64())
            .bind(work_id.as_i32())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to remove favorite: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<FavoriteEntry>, DomainError> {
        let rows: Vec<FavoriteRow> = sqlx::query_as(
            r#"
            SELECT user_id, book_id, book_title, author_name, created_at
            FROM user_favorites
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list favorites: {}", e)))?;

        Ok(rows.into_iter().map(FavoriteEntry::from).collect())
    }
}
