//! LinkAccountHandler - Attaches a messaging-platform id to an account.

use std::sync::Arc;

use tracing::info;

use crate::domain::catalog::non_blank;
use crate::domain::identity::IdentityError;
use crate::ports::{Clock, PasswordHasher, UserRepository};

#[derive(Debug, Clone)]
pub struct LinkAccountCommand {
    pub username: String,
    pub password: String,
    pub messaging_id: String,
}

/// Plan state at link time, used to pick the confirmation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkedAccount {
    pub premium: bool,
}

pub struct LinkAccountHandler {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
}

impl LinkAccountHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            passwords,
            clock,
        }
    }

    /// Re-linking overwrites the previous messaging id.
    pub async fn handle(&self, cmd: LinkAccountCommand) -> Result<LinkedAccount, IdentityError> {
        let messaging_id =
            non_blank(Some(&cmd.messaging_id)).ok_or(IdentityError::MissingMessagingId)?;

        let mut user = self
            .users
            .find_by_username(cmd.username.trim())
            .await?
            .ok_or(IdentityError::InvalidCredentials)?;
        if !self.passwords.matches(&cmd.password, &user.password_hash).await? {
            return Err(IdentityError::InvalidCredentials);
        }

        user.link_messaging_account(messaging_id);
        self.users.update(&user).await?;
        info!(user_id = %user.id, "messaging account linked");

        Ok(LinkedAccount {
            premium: user.is_premium(self.clock.now()),
        })
    }
}
