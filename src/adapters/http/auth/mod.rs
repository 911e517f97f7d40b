//! Account HTTP adapter - sign-up, sign-in, and recovery.

mod dto;
mod handlers;
mod routes;

pub use routes::auth_routes;
