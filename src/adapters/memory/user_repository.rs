use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::identity::{NewUser, User};
use crate::ports::UserRepository;

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<BTreeMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: RwLock::new(users.into_iter().map(|u| (u.id, u)).collect()),
        }
    }

    /// Snapshot of a stored account.
    pub fn get(&self, id: UserId) -> Option<User> {
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    fn find(&self, predicate: impl Fn(&User) -> bool) -> Option<User> {
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .find(|u| predicate(u))
            .cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        Ok(self.get(id))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        Ok(self.find(|u| u.username == username))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self.find(|u| u.email == email))
    }

    async fn find_by_username_or_email(
        &self,
        username_or_email: &str,
    ) -> Result<Option<User>, DomainError> {
        Ok(self.find(|u| u.username == username_or_email || u.email == username_or_email))
    }

    async fn find_by_messaging_id(&self, messaging_id: &str) -> Result<Option<User>, DomainError> {
        Ok(self.find(|u| u.messaging_id.as_deref() == Some(messaging_id)))
    }

    async fn find_by_verification_token(&self, token: &str) -> Result<Option<User>, DomainError> {
        Ok(self.find(|u| u.verification_token.as_deref() == Some(token)))
    }

    async fn find_by_reset_token(&self, token: &str) -> Result<Option<User>, DomainError> {
        Ok(self.find(|u| u.reset_token.as_deref() == Some(token)))
    }

    async fn find_by_customer_id(&self, customer_id: &str) -> Result<Option<User>, DomainError> {
        Ok(self.find(|u| u.customer_id.as_deref() == Some(customer_id)))
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        if users
            .values()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(DomainError::new(ErrorCode::Conflict, "username or email already exists"));
        }
        let next_id = users.keys().next_back().map_or(1, |id| id.as_i64() + 1);
        let user = user.into_user(UserId::new(next_id));
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        match users.get_mut(&user.id) {
            Some(stored) => {
                *stored = user.clone();
                Ok(())
            }
            None => Err(DomainError::new(ErrorCode::UserNotFound, "user not found")),
        }
    }
}
