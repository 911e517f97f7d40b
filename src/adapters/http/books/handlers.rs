//! HTTP handlers for book endpoints.

use axum::extract::{Json, State};
use axum::response::IntoResponse;

use crate::adapters::http::error::{quota_exceeded_message, ApiError};
use crate::adapters::http::extract::{ApiPath, ApiQuery};
use crate::adapters::http::middleware::{OptionalUser, RequireUser};
use crate::adapters::http::state::AppState;
use crate::application::handlers::books::{FavoriteCommand, GetHistoryQuery, ViewWorkCommand};
use crate::domain::catalog::{Page, SearchCriteria, SearchSort};
use crate::domain::entitlement::EntitlementError;
use crate::domain::foundation::WorkId;

use super::dto::{FavoriteResponse, GenreSearchParams, SearchParams, SuggestParams};

// ════════════════════════════════════════════════════════════════════════════════
// Listings
// ════════════════════════════════════════════════════════════════════════════════

/// GET /books/ranking - Most viewed works
pub async fn get_ranking(
    State(state): State<AppState>,
    OptionalUser(viewer): OptionalUser,
) -> Result<impl IntoResponse, ApiError> {
    let records = state.ranking_handler().handle(viewer.is_premium()).await?;
    Ok(Json(records))
}

/// GET /books/history - The caller's recently opened works
pub async fn get_history(
    State(state): State<AppState>,
    RequireUser(viewer): RequireUser,
) -> Result<impl IntoResponse, ApiError> {
    let records = state
        .history_handler()
        .handle(GetHistoryQuery {
            user_id: viewer.user_id,
            viewer_premium: viewer.premium,
        })
        .await?;
    Ok(Json(records))
}

/// GET /books/favorites - The caller's bookmarked works
pub async fn get_favorites(
    State(state): State<AppState>,
    RequireUser(viewer): RequireUser,
) -> Result<impl IntoResponse, ApiError> {
    let records = state
        .list_favorites_handler()
        .handle(viewer.user_id, viewer.premium)
        .await?;
    Ok(Json(records))
}

// ════════════════════════════════════════════════════════════════════════════════
// Detail
// ════════════════════════════════════════════════════════════════════════════════

/// GET /books/{id} - Open a work, counting against the daily quota
pub async fn get_work(
    State(state): State<AppState>,
    OptionalUser(context): OptionalUser,
    ApiPath(work_id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .view_work_handler()
        .handle(ViewWorkCommand {
            context,
            work_id: WorkId::new(work_id),
        })
        .await
        .map_err(|err| denied(err, &state))?;
    Ok(Json(result.record))
}

/// Quota denials carry the upsell text instead of the bare reason.
pub(crate) fn denied(err: EntitlementError, state: &AppState) -> ApiError {
    match err {
        EntitlementError::QuotaExceeded { limit } => {
            ApiError::forbidden(quota_exceeded_message(limit, &state.settings.upsell_url))
        }
        other => other.into(),
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Favorites
// ════════════════════════════════════════════════════════════════════════════════

/// GET /books/{id}/favorite
pub async fn check_favorite(
    State(state): State<AppState>,
    RequireUser(viewer): RequireUser,
    ApiPath(work_id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let is_favorite = state
        .check_favorite_handler()
        .handle(FavoriteCommand {
            user_id: viewer.user_id,
            work_id: WorkId::new(work_id),
        })
        .await?;
    Ok(Json(FavoriteResponse { is_favorite }))
}

/// POST /books/{id}/favorite - Flip the bookmark
pub async fn toggle_favorite(
    State(state): State<AppState>,
    RequireUser(viewer): RequireUser,
    ApiPath(work_id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let is_favorite = state
        .toggle_favorite_handler()
        .handle(FavoriteCommand {
            user_id: viewer.user_id,
            work_id: WorkId::new(work_id),
        })
        .await?;
    Ok(Json(FavoriteResponse { is_favorite }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Search
// ════════════════════════════════════════════════════════════════════════════════

/// GET /books/search - Keyword or translation browse
pub async fn search(
    State(state): State<AppState>,
    OptionalUser(viewer): OptionalUser,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let page = Page::new(
        params.limit.unwrap_or(state.settings.search_page),
        params.offset.unwrap_or(0),
    );
    let criteria = SearchCriteria::keyword(
        params.q.as_deref(),
        params.kind.as_deref(),
        SearchSort::from_param(params.sort.as_deref()),
        page,
    );
    let records = state.search_handler().handle(criteria, viewer.is_premium()).await?;
    Ok(Json(records))
}

/// GET /books/search/genre
pub async fn search_genre(
    State(state): State<AppState>,
    OptionalUser(viewer): OptionalUser,
    ApiQuery(params): ApiQuery<GenreSearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let page = Page::new(
        params.limit.unwrap_or(state.settings.search_page),
        params.offset.unwrap_or(0),
    );
    let criteria = SearchCriteria::genre(
        params.genre.as_deref(),
        SearchSort::from_param(params.sort.as_deref()),
        page,
    );
    let records = state.search_handler().handle(criteria, viewer.is_premium()).await?;
    Ok(Json(records))
}

/// GET /books/suggest - Title prefix completion
pub async fn suggest(
    State(state): State<AppState>,
    OptionalUser(viewer): OptionalUser,
    ApiQuery(params): ApiQuery<SuggestParams>,
) -> Result<impl IntoResponse, ApiError> {
    let records = state
        .suggest_handler()
        .handle(params.q.as_deref(), viewer.is_premium())
        .await?;
    Ok(Json(records))
}

/// GET /books/authors
pub async fn top_authors(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.authors_handler().handle(false).await?))
}

/// GET /books/authors/all
pub async fn all_authors(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.authors_handler().handle(true).await?))
}

/// GET /books/genres
pub async fn genres(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.genres_handler().handle().await?))
}
