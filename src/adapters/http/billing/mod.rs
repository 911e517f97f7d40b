//! Billing HTTP adapter - plan status, checkout, portal, and provider webhooks.

mod dto;
mod handlers;
mod routes;

pub use routes::{billing_routes, checkout_routes, webhook_routes};
