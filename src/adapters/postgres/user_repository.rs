//! PostgreSQL implementation of UserRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::domain::identity::{NewUser, Plan, User};
use crate::ports::UserRepository;

const SELECT_USER: &str = r#"
    SELECT id, username, email, password, plan_type, subscription_expires_at,
           line_user_id, stripe_customer_id, is_verified, verification_token,
           reset_password_token, reset_password_expires_at, created_at
    FROM users
"#;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, predicate: &str, value: &str) -> Result<Option<User>, DomainError> {
        let sql = format!("{} WHERE {} LIMIT 1", SELECT_USER, predicate);
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to load user: {}", e)))?;
        row.map(User::try_from).transpose()
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    password: String,
    plan_type: String,
    subscription_expires_at: Option<DateTime<Utc>>,
    line_user_id: Option<String>,
    stripe_customer_id: Option<String>,
    is_verified: bool,
    verification_token: Option<String>,
    reset_password_token: Option<String>,
    reset_password_expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let plan: Plan = row.plan_type.parse().map_err(|_| {
            DomainError::database(format!("Invalid plan_type value: {}", row.plan_type))
        })?;

        Ok(User {
            id: UserId::new(row.id),
            username: row.username,
            email: row.email,
            password_hash: row.password,
            plan,
            subscription_expires_at: row.subscription_expires_at.map(Timestamp::from_datetime),
            messaging_id: row.line_user_id,
            customer_id: row.stripe_customer_id,
            verified: row.is_verified,
            verification_token: row.verification_token,
            reset_token: row.reset_password_token,
            reset_token_expires_at: row.reset_password_expires_at.map(Timestamp::from_datetime),
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let sql = format!("{} WHERE id = $1", SELECT_USER);
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to load user: {}", e)))?;
        row.map(User::try_from).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.find_one("username = $1", username).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.find_one("email = $1", email).await
    }

    async fn find_by_username_or_email(
        &self,
        username_or_email: &str,
    ) -> Result<Option<User>, DomainError> {
        self.find_one("(username = $1 OR email = $1)", username_or_email)
            .await
    }

    async fn find_by_messaging_id(&self, messaging_id: &str) -> Result<Option<User>, DomainError> {
        self.find_one("line_user_id = $1", messaging_id).await
    }

    async fn find_by_verification_token(&self, token: &str) -> Result<Option<User>, DomainError> {
        self.find_one("verification_token = $1", token).await
    }

    async fn find_by_reset_token(&self, token: &str) -> Result<Option<User>, DomainError> {
        self.find_one("reset_password_token = $1", token).await
    }

    async fn find_by_customer_id(&self, customer_id: &str) -> Result<Option<User>, DomainError> {
        self.find_one("stripe_customer_id = $1", customer_id).await
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (
                username, email, password, plan_type, is_verified,
                verification_token, created_at
            ) VALUES ($1, $2, $3, $4, FALSE, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(Plan::Free.as_str())
        .bind(&user.verification_token)
        .bind(user.created_at.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if matches!(db_err.constraint(), Some("users_username_key" | "users_email_key")) {
                    return DomainError::new(ErrorCode::Conflict, "username or email already exists");
                }
            }
            DomainError::database(format!("Failed to create user: {}", e))
        })?;

        Ok(user.into_user(UserId::new(id)))
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                password = $2,
                plan_type = $3,
                subscription_expires_at = $4,
                line_user_id = $5,
                stripe_customer_id = $6,
                is_verified = $7,
                verification_token = $8,
                reset_password_token = $9,
                reset_password_expires_at = $10
            WHERE id = $1
            "#,
        )
        .bind(user.id.as_i64())
        .bind(&user.password_hash)
        .bind(user.plan.as_str())
        .bind(user.subscription_expires_at.map(|t| *t.as_datetime()))
        .bind(&user.messaging_id)
        .bind(&user.customer_id)
        .bind(user.verified)
        .bind(&user.verification_token)
        .bind(&user.reset_token)
        .bind(user.reset_token_expires_at.map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to update user: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::UserNotFound, "User not found"));
        }
        Ok(())
    }
}
