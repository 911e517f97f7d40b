//! HTTP adapters - REST API implementations.
//!
//! Each area has its own module with `dto`, `handlers` and `routes`. All
//! of them share one [`AppState`] and one [`ApiError`].

pub mod auth;
pub mod billing;
pub mod books;
pub mod error;
pub mod extract;
pub mod line;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::{ApiError, ErrorEnvelope};
pub use router::app_router;
pub use state::{AppPorts, AppSettings, AppState};
