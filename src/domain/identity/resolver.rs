//! Caller resolution shared by the web and bot entry points.

use std::sync::Arc;

use tracing::debug;

use crate::domain::foundation::{AuthError, DomainError, ErrorCode};
use crate::ports::{Clock, TokenService, UserRepository};

use super::{Identity, UserContext};

/// Turns raw identity material into a [`UserContext`].
///
/// Anything that fails to identify a stored account resolves to
/// `Guest`. Only storage failures are errors.
pub struct UserContextResolver {
    tokens: Arc<dyn TokenService>,
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl UserContextResolver {
    pub fn new(
        tokens: Arc<dyn TokenService>,
        users: Arc<dyn UserRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tokens,
            users,
            clock,
        }
    }

    pub async fn resolve(&self, identity: &Identity) -> Result<UserContext, DomainError> {
        let user = match identity {
            Identity::Bearer(_) => {
                let Some(token) = identity.bearer_token() else {
                    return Ok(UserContext::Guest);
                };
                let username = match self.tokens.verify(token).await {
                    Ok(username) => username,
                    Err(AuthError::ServiceUnavailable(reason)) => {
                        return Err(DomainError::new(ErrorCode::InternalError, reason));
                    }
                    Err(err) => {
                        debug!(error = %err, "bearer token rejected");
                        return Ok(UserContext::Guest);
                    }
                };
                self.users.find_by_username(&username).await?
            }
            Identity::MessagingId(id) => {
                let id = id.trim();
                if id.is_empty() {
                    return Ok(UserContext::Guest);
                }
                self.users.find_by_messaging_id(id).await?
            }
        };

        Ok(user.map_or(UserContext::Guest, |user| {
            UserContext::authenticated(user, self.clock.now())
        }))
    }
}
