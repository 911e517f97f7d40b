//! Argon2id password hashing.
//!
//! Hashing is deliberately slow, so both operations run on the blocking
//! pool.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier};
use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::PasswordHasher;

#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self
    }
}

fn join_error(err: tokio::task::JoinError) -> DomainError {
    DomainError::new(ErrorCode::InternalError, format!("hashing task failed: {}", err))
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, plain: &str) -> Result<String, DomainError> {
        let plain = plain.to_string();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(plain.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| DomainError::new(ErrorCode::InternalError, e.to_string()))
        })
        .await
        .map_err(join_error)?
    }

    async fn matches(&self, plain: &str, hash: &str) -> Result<bool, DomainError> {
        let plain = plain.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || {
            let Ok(parsed) = PasswordHash::new(&hash) else {
                return false;
            };
            Argon2::default()
                .verify_password(plain.as_bytes(), &parsed)
                .is_ok()
        })
        .await
        .map_err(join_error)
    }
}
