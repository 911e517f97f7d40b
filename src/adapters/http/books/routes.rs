//! Axum router configuration for book endpoints.

use axum::routing::get;
use axum::Router;

use crate::adapters::http::state::AppState;

use super::handlers::{
    all_authors, check_favorite, genres, get_favorites, get_history, get_ranking, get_work,
    search, search_genre, suggest, toggle_favorite, top_authors,
};

/// Create the book API router, mounted at `/books`.
///
/// # Routes
///
/// ## Public (viewer optional)
/// - `GET /ranking`, `GET /search`, `GET /search/genre`, `GET /suggest`
/// - `GET /authors`, `GET /authors/all`, `GET /genres`
///
/// ## Signed in
/// - `GET /:id` - counts against the daily quota
/// - `GET /history`, `GET /favorites`
/// - `GET /:id/favorite`, `POST /:id/favorite`
pub fn books_routes() -> Router<AppState> {
    Router::new()
        .route("/ranking", get(get_ranking))
        .route("/history", get(get_history))
        .route("/favorites", get(get_favorites))
        .route("/search", get(search))
        .route("/search/genre", get(search_genre))
        .route("/suggest", get(suggest))
        .route("/authors", get(top_authors))
        .route("/authors/all", get(all_authors))
        .route("/genres", get(genres))
        .route("/:id", get(get_work))
        .route("/:id/favorite", get(check_favorite).post(toggle_favorite))
}
