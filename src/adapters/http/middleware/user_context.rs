//! Caller resolution middleware and extractors.
//!
//! ```text
//! Request → user_context_middleware → inserts UserContext into extensions
//!                                        ↓
//!                     Handler → RequireUser / OptionalUser read it back
//! ```
//!
//! A missing, malformed or expired bearer token is not an error here; the
//! caller is simply a guest. Routes that need an account use
//! [`RequireUser`], which rejects guests with 401.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::adapters::http::error::ApiError;
use crate::domain::identity::{AuthenticatedUser, Identity, UserContext, UserContextResolver};

/// Message shown when an account is required.
pub const LOGIN_REQUIRED: &str = "ログインしてください";

/// Resolves the Authorization header into a [`UserContext`].
pub async fn user_context_middleware(
    State(resolver): State<Arc<UserContextResolver>>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    match resolver.resolve(&Identity::Bearer(header)).await {
        Ok(context) => {
            request.extensions_mut().insert(context);
            next.run(request).await
        }
        Err(err) => ApiError::from(err).into_response(),
    }
}

/// Extractor for routes that need a signed-in account.
#[derive(Debug, Clone)]
pub struct RequireUser(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<UserContext>() {
            Some(UserContext::Authenticated(user)) => Ok(RequireUser(user.clone())),
            _ => Err(ApiError::unauthorized(LOGIN_REQUIRED)),
        }
    }
}

/// Extractor for routes that serve guests too. Defaults to `Guest` when
/// the middleware did not run.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub UserContext);

#[async_trait]
impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let context = parts
            .extensions
            .get::<UserContext>()
            .cloned()
            .unwrap_or(UserContext::Guest);
        Ok(OptionalUser(context))
    }
}
