//! PostgreSQL implementation of WorkRepository.
//!
//! Matching uses ILIKE with user input escaped, so `%` and `_` in a query
//! are literal.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::domain::catalog::{SearchCriteria, SearchFilter, SearchSort, Work};
use crate::domain::foundation::{DomainError, WorkId};
use crate::ports::WorkRepository;

const WORK_COLUMNS: &str = r#"
    work_id, title, author_name, image_url, aozora_url, category,
    summary_short, summary_300, summary_hq, summary_long, catchphrase,
    insight, genre_tag, is_hq, original_title, body_text
"#;

pub struct PostgresWorkRepository {
    pool: PgPool,
}

impl PostgresWorkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct WorkRow {
    work_id: i32,
    title: Option<String>,
    author_name: Option<String>,
    image_url: Option<String>,
    aozora_url: Option<String>,
    category: Option<String>,
    summary_short: Option<String>,
    summary_300: Option<String>,
    summary_hq: Option<String>,
    summary_long: Option<String>,
    catchphrase: Option<String>,
    insight: Option<String>,
    genre_tag: Option<String>,
    is_hq: Option<bool>,
    original_title: Option<String>,
    body_text: Option<String>,
}

impl From<WorkRow> for Work {
    fn from(row: WorkRow) -> Self {
        Work {
            id: WorkId::new(row.work_id),
            title: row.title,
            author: row.author_name,
            image_url: row.image_url,
            source_url: row.aozora_url,
            category: row.category,
            summary_short: row.summary_short,
            summary_standard: row.summary_300,
            summary_hq: row.summary_hq,
            summary_long: row.summary_long,
            catchphrase: row.catchphrase,
            insight: row.insight,
            genre_tags: row.genre_tag,
            has_hq: row.is_hq.unwrap_or(false),
            original_title: row.original_title,
            body_text: row.body_text,
        }
    }
}

fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn contains_pattern(input: &str) -> String {
    format!("%{}%", escape_like(input))
}

fn prefix_pattern(input: &str) -> String {
    format!("{}%", escape_like(input))
}

fn to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::database(format!("{}: {}", context, e))
}

/// Builds the search statement for `criteria`.
fn search_query(criteria: &SearchCriteria) -> QueryBuilder<'static, Postgres> {
    let mut qb: QueryBuilder<'static, Postgres> =
        QueryBuilder::new(format!("SELECT {} FROM works WHERE ", WORK_COLUMNS));

    match &criteria.filter {
        SearchFilter::Keyword(q) => {
            let pattern = contains_pattern(q);
            qb.push("(title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR author_name ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        SearchFilter::Category(c) => {
            qb.push("category = ").push_bind(c.clone());
        }
        SearchFilter::Genre(g) => {
            qb.push("genre_tag ILIKE ").push_bind(contains_pattern(g));
        }
    }

    match (criteria.sort, &criteria.filter) {
        (SearchSort::LengthDesc, _) => {
            qb.push(" AND body_text IS NOT NULL ORDER BY LENGTH(body_text) DESC, work_id ASC");
        }
        (SearchSort::ById, SearchFilter::Category(_)) => {
            qb.push(" ORDER BY work_id DESC");
        }
        (SearchSort::ById, _) => {
            qb.push(" ORDER BY work_id ASC");
        }
    }

    qb.push(" LIMIT ")
        .push_bind(to_i64(criteria.page.limit))
        .push(" OFFSET ")
        .push_bind(to_i64(criteria.page.offset));
    qb
}

#[async_trait]
impl WorkRepository for PostgresWorkRepository {
    async fn find_by_id(&self, id: WorkId) -> Result<Option<Work>, DomainError> {
        let sql = format!("SELECT {} FROM works WHERE work_id = $1", WORK_COLUMNS);
        let row: Option<WorkRow> = sqlx::query_as(&sql)
            .bind(id.as_i32())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to load work", e))?;
        Ok(row.map(Work::from))
    }

    async fn find_all_by_ids(&self, ids: &[WorkId]) -> Result<Vec<Work>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<i32> = ids.iter().map(WorkId::as_i32).collect();
        let sql = format!("SELECT {} FROM works WHERE work_id = ANY($1)", WORK_COLUMNS);
        let rows: Vec<WorkRow> = sqlx::query_as(&sql)
            .bind(raw)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to load works", e))?;
        Ok(rows.into_iter().map(Work::from).collect())
    }

    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Work>, DomainError> {
        let rows: Vec<WorkRow> = search_query(criteria)
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to search works", e))?;
        Ok(rows.into_iter().map(Work::from).collect())
    }

    async fn suggest(&self, prefix: &str, limit: usize) -> Result<Vec<Work>, DomainError> {
        let sql = format!(
            "SELECT {} FROM works WHERE title ILIKE $1 OR author_name ILIKE $1 ORDER BY work_id ASC LIMIT $2",
            WORK_COLUMNS
        );
        let rows: Vec<WorkRow> = sqlx::query_as(&sql)
            .bind(prefix_pattern(prefix))
            .bind(to_i64(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to suggest works", e))?;
        Ok(rows.into_iter().map(Work::from).collect())
    }

    async fn list_authors(&self, limit: Option<usize>) -> Result<Vec<String>, DomainError> {
        // LIMIT NULL means no limit in Postgres
        sqlx::query_scalar(
            r#"
            SELECT author_name FROM works
            WHERE author_name IS NOT NULL AND author_name <> ''
            GROUP BY author_name
            ORDER BY COUNT(*) DESC, author_name ASC
            LIMIT $1
            "#,
        )
        .bind(limit.map(to_i64))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list authors", e))
    }

    async fn list_genre_tags(&self) -> Result<Vec<String>, DomainError> {
        sqlx::query_scalar("SELECT genre_tag FROM works WHERE genre_tag IS NOT NULL")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list genre tags", e))
    }
}
