//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - Axum routers, extractors, and the error envelope
//! - `postgres` - Repository implementations over sqlx
//! - `stripe` - Hosted checkout and billing portal
//! - `auth` - JWT tokens and argon2 password hashing
//! - `email` - Outbound mail through a webhook relay
//! - `memory` - In-memory repositories for tests and local runs

pub mod auth;
pub mod clock;
pub mod email;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod stripe;
