//! Book HTTP adapter - catalog listings, detail views, and favorites.

mod dto;
mod handlers;
mod routes;

pub(crate) use handlers::denied;
pub use routes::books_routes;
