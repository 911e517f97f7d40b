//! Who is making a request.

use crate::domain::foundation::{Timestamp, UserId};

use super::User;

/// Raw identity material presented by an entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// Value of the Authorization header, if any.
    Bearer(Option<String>),
    /// Messaging-platform user id supplied by the bot bridge.
    MessagingId(String),
}

impl Identity {
    /// Extracts the JWT from a `Bearer <jwt>` header.
    ///
    /// Returns None for other identity kinds, a missing header, or a
    /// header without the exact `Bearer ` prefix.
    pub fn bearer_token(&self) -> Option<&str> {
        match self {
            Identity::Bearer(Some(header)) => header
                .strip_prefix("Bearer ")
                .map(str::trim)
                .filter(|token| !token.is_empty()),
            _ => None,
        }
    }
}

/// Resolved caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserContext {
    Guest,
    Authenticated(AuthenticatedUser),
}

/// A caller backed by a stored account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub username: String,
    /// Snapshot of [`User::is_premium`] taken at resolution time.
    pub premium: bool,
    pub user: User,
}

impl UserContext {
    /// Builds an authenticated context, evaluating premium status once.
    pub fn authenticated(user: User, now: Timestamp) -> Self {
        UserContext::Authenticated(AuthenticatedUser {
            user_id: user.id,
            username: user.username.clone(),
            premium: user.is_premium(now),
            user,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, UserContext::Authenticated(_))
    }

    /// Guests are never premium.
    pub fn is_premium(&self) -> bool {
        match self {
            UserContext::Guest => false,
            UserContext::Authenticated(viewer) => viewer.premium,
        }
    }

    pub fn as_authenticated(&self) -> Option<&AuthenticatedUser> {
        match self {
            UserContext::Guest => None,
            UserContext::Authenticated(viewer) => Some(viewer),
        }
    }
}
