//! SmartBrief - book summary subscription backend
//!
//! Serves a catalog of literary works with a freemium daily view limit,
//! per-user history and favorites, payment-provider driven premium plans,
//! and a messaging bot bridge to the same reading flow.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
