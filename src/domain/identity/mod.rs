//! Identity module - accounts, plans, and request callers.

mod credentials;
mod errors;
mod plan;
mod resolver;
pub(crate) mod user;
mod user_context;

pub use credentials::{check_password_policy, Registration};
pub use errors::IdentityError;
pub use plan::Plan;
pub use resolver::UserContextResolver;
pub use user::{NewUser, User};
pub use user_context::{AuthenticatedUser, Identity, UserContext};
