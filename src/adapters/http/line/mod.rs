//! Messaging bot HTTP adapter.

mod dto;
mod handlers;
mod routes;

pub use routes::line_routes;
