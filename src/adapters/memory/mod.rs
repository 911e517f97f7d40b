//! In-memory adapters.
//!
//! Back the unit and router tests. Each keeps its state behind a std lock
//! so fixtures can seed and inspect it synchronously.

mod favorite_repository;
mod user_repository;
mod view_history_repository;
mod webhook_event_repository;
mod work_repository;

pub use favorite_repository::InMemoryFavoriteRepository;
pub use user_repository::InMemoryUserRepository;
pub use view_history_repository::InMemoryViewHistoryRepository;
pub use webhook_event_repository::InMemoryWebhookEventRepository;
pub use work_repository::InMemoryWorkRepository;
