//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Entry points (HTTP routes, the messaging bridge) call handlers; handlers
//! call domain services and ports.

pub mod handlers;
