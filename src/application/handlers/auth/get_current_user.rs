//! Profile summary for the signed-in user.

use crate::domain::identity::{AuthenticatedUser, Plan};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub username: String,
    pub email: String,
    pub plan: Plan,
    pub premium: bool,
}

impl From<&AuthenticatedUser> for CurrentUser {
    /// Premium comes from the resolver's snapshot of `User::is_premium`.
    fn from(viewer: &AuthenticatedUser) -> Self {
        Self {
            username: viewer.username.clone(),
            email: viewer.user.email.clone(),
            plan: viewer.user.plan,
            premium: viewer.premium,
        }
    }
}
