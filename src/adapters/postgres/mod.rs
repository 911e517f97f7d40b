//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresUserRepository` - Accounts, plans, and auth tokens
//! - `PostgresWorkRepository` - Read-only catalog queries
//! - `PostgresViewHistoryRepository` - Append-only view ledger
//! - `PostgresFavoriteRepository` - Per-user bookmarks
//! - `PostgresWebhookEventRepository` - Webhook idempotency ledger

mod favorite_repository;
mod user_repository;
mod view_history_repository;
mod webhook_event_repository;
mod work_repository;

pub use favorite_repository::PostgresFavoriteRepository;
pub use user_repository::PostgresUserRepository;
pub use view_history_repository::PostgresViewHistoryRepository;
pub use webhook_event_repository::PostgresWebhookEventRepository;
pub use work_repository::PostgresWorkRepository;
