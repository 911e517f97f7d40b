//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `UserRepository`, `WorkRepository`, `ViewHistoryRepository`,
//!   `FavoriteRepository`
//! - `WebhookEventRepository` - payment webhook idempotency tracking
//!
//! ## Service Ports
//!
//! - `TokenService`, `PasswordHasher` - credentials
//! - `PaymentProvider` - hosted checkout and billing portal
//! - `EmailSender` - account emails
//! - `Clock` - the current instant

mod clock;
mod email_sender;
mod favorite_repository;
mod password_hasher;
mod payment_provider;
mod token_service;
mod user_repository;
mod view_history_repository;
mod webhook_event_repository;
mod work_repository;

pub use clock::Clock;
pub use email_sender::EmailSender;
pub use favorite_repository::FavoriteRepository;
pub use password_hasher::PasswordHasher;
pub use payment_provider::{
    CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentErrorCode, PaymentProvider,
    PortalSession,
};
pub use token_service::TokenService;
pub use user_repository::UserRepository;
pub use view_history_repository::ViewHistoryRepository;
pub use webhook_event_repository::{
    SaveResult, WebhookEventRecord, WebhookEventRepository, WebhookOutcome, WebhookResult,
};
pub use work_repository::WorkRepository;
