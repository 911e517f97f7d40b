//! RegisterHandler - Creates an unverified FREE account.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::foundation::ErrorCode;
use crate::domain::identity::{IdentityError, NewUser, Registration, User};
use crate::ports::{Clock, EmailSender, PasswordHasher, UserRepository};

#[derive(Debug, Clone, Default)]
pub struct RegisterCommand {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

pub struct RegisterHandler {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordHasher>,
    email: Arc<dyn EmailSender>,
    clock: Arc<dyn Clock>,
}

impl RegisterHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordHasher>,
        email: Arc<dyn EmailSender>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            passwords,
            email,
            clock,
        }
    }

    /// A failed verification email does not undo the registration; the
    /// user can ask for it again.
    pub async fn handle(&self, cmd: RegisterCommand) -> Result<User, IdentityError> {
        let registration = Registration::parse(cmd.username, cmd.email, cmd.password)?;

        if self.users.find_by_username(&registration.username).await?.is_some() {
            return Err(IdentityError::UsernameTaken);
        }
        if self.users.find_by_email(&registration.email).await?.is_some() {
            return Err(IdentityError::EmailTaken);
        }

        let password_hash = self.passwords.hash(&registration.password).await?;
        let user = self
            .users
            .create(NewUser {
                username: registration.username,
                email: registration.email,
                password_hash,
                verification_token: Uuid::new_v4().to_string(),
                created_at: self.clock.now(),
            })
            .await
            .map_err(|e| match e.code {
                ErrorCode::Conflict => IdentityError::UsernameTaken,
                _ => e.into(),
            })?;
        info!(user_id = %user.id, "user registered");

        if let Some(token) = user.verification_token.as_deref() {
            if let Err(e) = self
                .email
                .send_verification(&user.email, &user.username, token)
                .await
            {
                warn!(user_id = %user.id, error = %e, "verification email not sent");
            }
        }

        Ok(user)
    }
}
